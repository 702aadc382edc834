//! Immutable syntax nodes.

use serde::{Deserialize, Serialize};

use super::kind::SyntaxKind;
use super::trivia::Trivia;

/// Half-open byte range `[start, end)` in a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    /// Start byte offset.
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl TextRange {
    /// Creates a new range.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the range in bytes.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the range is empty.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Returns true if `offset` lies inside this range.
    #[must_use]
    pub fn contains(self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// A 0-based line and byte column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinePosition {
    /// Line (0-indexed).
    pub line: usize,
    /// Byte column (0-indexed).
    pub column: usize,
}

impl LinePosition {
    /// Creates a new position.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Start and end positions of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineSpan {
    /// Start position.
    pub start: LinePosition,
    /// End position.
    pub end: LinePosition,
}

impl LineSpan {
    /// Creates a new span.
    #[must_use]
    pub fn new(start: LinePosition, end: LinePosition) -> Self {
        Self { start, end }
    }

    /// Number of line breaks between start and end.
    #[must_use]
    pub fn line_delta(self) -> usize {
        self.end.line.saturating_sub(self.start.line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TokenData {
    text: String,
    leading: Vec<Trivia>,
    trailing: Vec<Trivia>,
}

/// A node of the syntax tree.
///
/// Interior nodes have children; tokens are leaves with text and trivia.
/// Declarations carry their declared name in [`SyntaxNode::identifier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxNode {
    kind: SyntaxKind,
    range: TextRange,
    span: LineSpan,
    identifier: Option<String>,
    token: Option<TokenData>,
    children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Creates an interior node.
    #[must_use]
    pub fn node(kind: SyntaxKind, range: TextRange, span: LineSpan, children: Vec<Self>) -> Self {
        Self {
            kind,
            range,
            span,
            identifier: None,
            token: None,
            children,
        }
    }

    /// Creates a token.
    #[must_use]
    pub fn token(kind: SyntaxKind, range: TextRange, span: LineSpan, text: impl Into<String>) -> Self {
        Self {
            kind,
            range,
            span,
            identifier: None,
            token: Some(TokenData {
                text: text.into(),
                leading: Vec::new(),
                trailing: Vec::new(),
            }),
            children: Vec::new(),
        }
    }

    /// Sets the identifier of this node.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Sets the leading trivia. Ignored on interior nodes.
    #[must_use]
    pub fn with_leading_trivia(mut self, trivia: Vec<Trivia>) -> Self {
        if let Some(token) = &mut self.token {
            token.leading = trivia;
        }
        self
    }

    /// Sets the trailing trivia. Ignored on interior nodes.
    #[must_use]
    pub fn with_trailing_trivia(mut self, trivia: Vec<Trivia>) -> Self {
        if let Some(token) = &mut self.token {
            token.trailing = trivia;
        }
        self
    }

    /// Kind tag.
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    /// Byte range, excluding trivia.
    #[must_use]
    pub fn range(&self) -> TextRange {
        self.range
    }

    /// Line span, excluding trivia.
    #[must_use]
    pub fn span(&self) -> LineSpan {
        self.span
    }

    /// Declared name, modifier keyword, accessor keyword, referenced type
    /// text or invoked member name, depending on the kind.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Token text, `None` for interior nodes.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.text.as_str())
    }

    /// Returns true if this node is a token.
    #[must_use]
    pub fn is_token(&self) -> bool {
        self.token.is_some()
    }

    /// Direct children.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Direct children of the given kind.
    pub fn children_of_kind(&self, kind: SyntaxKind) -> impl Iterator<Item = &Self> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    /// All descendants in pre-order, excluding `self`.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// `self` followed by all descendants in pre-order.
    #[must_use]
    pub fn descendants_and_self(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Descendants of the given kind.
    pub fn descendants_of_kind(&self, kind: SyntaxKind) -> impl Iterator<Item = &Self> {
        self.descendants().filter(move |n| n.kind == kind)
    }

    /// All tokens under this node (including itself), in source order.
    pub fn tokens(&self) -> impl Iterator<Item = &Self> {
        self.descendants_and_self().filter(|n| n.is_token())
    }

    /// First token under this node.
    #[must_use]
    pub fn first_token(&self) -> Option<&Self> {
        self.tokens().next()
    }

    /// Leading trivia of this token, or of the first token under this node.
    #[must_use]
    pub fn leading_trivia(&self) -> &[Trivia] {
        self.first_token()
            .and_then(|t| t.token.as_ref())
            .map(|t| t.leading.as_slice())
            .unwrap_or_default()
    }

    /// Trailing trivia. Only tokens have trailing trivia of their own.
    #[must_use]
    pub fn trailing_trivia(&self) -> &[Trivia] {
        self.token
            .as_ref()
            .map(|t| t.trailing.as_slice())
            .unwrap_or_default()
    }

    /// Returns true if this node's leading trivia is non-empty.
    #[must_use]
    pub fn has_leading_trivia(&self) -> bool {
        !self.leading_trivia().is_empty()
    }

    /// Every trivia item under this node, leading before trailing, in
    /// source order.
    pub fn descendant_trivia(&self) -> impl Iterator<Item = &Trivia> {
        self.tokens().flat_map(|t| {
            t.token
                .as_ref()
                .map(|d| d.leading.iter().chain(d.trailing.iter()))
                .into_iter()
                .flatten()
        })
    }

    /// Modifier keywords attached directly to this declaration.
    pub fn modifiers(&self) -> impl Iterator<Item = &str> {
        self.children_of_kind(SyntaxKind::Modifier)
            .filter_map(|m| m.identifier().or_else(|| m.text()))
    }

    /// Returns true if this declaration carries the given modifier.
    #[must_use]
    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers().any(|m| m == modifier)
    }

    /// Member declarations of a type declaration, not descending into
    /// nested members.
    #[must_use]
    pub fn members(&self) -> Vec<&Self> {
        let mut members = Vec::new();
        collect_members(&self.children, &mut members);
        members
    }

    /// Variable declarators of a field declaration.
    pub fn declarators(&self) -> impl Iterator<Item = &Self> {
        self.nested_children(SyntaxKind::VariableDeclarator)
    }

    /// Accessors of a property declaration.
    pub fn accessors(&self) -> impl Iterator<Item = &Self> {
        self.nested_children(SyntaxKind::AccessorDeclaration)
    }

    /// Children of `kind`, looking through one level of wrapper nodes.
    fn nested_children(&self, kind: SyntaxKind) -> impl Iterator<Item = &Self> {
        self.children.iter().flat_map(move |child| {
            let wrapped: Vec<&Self> = if child.kind == kind {
                vec![child]
            } else if child.kind == SyntaxKind::Other {
                child.children_of_kind(kind).collect()
            } else {
                Vec::new()
            };
            wrapped
        })
    }

    /// Attribute names applied to this declaration.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.children_of_kind(SyntaxKind::AttributeList)
            .flat_map(|list| list.children_of_kind(SyntaxKind::Attribute))
            .filter_map(SyntaxNode::identifier)
    }
}

fn collect_members<'a>(nodes: &'a [SyntaxNode], out: &mut Vec<&'a SyntaxNode>) {
    for node in nodes {
        if node.kind.is_member_declaration() {
            out.push(node);
        } else if node.kind == SyntaxKind::Other {
            collect_members(&node.children, out);
        }
    }
}

/// Pre-order iterator over syntax nodes.
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a SyntaxNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
