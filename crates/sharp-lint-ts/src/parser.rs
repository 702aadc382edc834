//! C# parsing into the sharp-lint document model.

use std::mem;
use std::path::PathBuf;

use sharp_lint_core::syntax::TextRange;
use sharp_lint_core::{SyntaxKind, SyntaxNode, SyntaxTree, Trivia};
use thiserror::Error;
use tree_sitter::{Language, Node, Parser};

use crate::trivia::{self, LineIndex};

/// Errors produced while parsing one source file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The grammar could not be loaded into the parser.
    #[error("failed to load the C# grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// Tree-sitter gave up without producing a tree.
    #[error("parser produced no syntax tree")]
    NoTree,

    /// The source contains a syntax error.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        /// Line (1-indexed).
        line: usize,
        /// Column (1-indexed).
        column: usize,
        /// What went wrong.
        message: String,
    },
}

/// Parses C# source into [`SyntaxTree`]s.
///
/// Tree-sitter node kinds the rules care about are mapped onto
/// [`SyntaxKind`]s, everything else becomes [`SyntaxKind::Other`] or
/// [`SyntaxKind::Token`]. Trivia is rebuilt from the text between tokens.
pub struct CSharpParser {
    language: Language,
}

impl CSharpParser {
    /// Creates a new C# parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_c_sharp::LANGUAGE.into(),
        }
    }

    /// Parses `source`, recording `path` as the tree's path.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded or the source has a
    /// syntax error.
    pub fn parse(
        &self,
        path: impl Into<PathBuf>,
        source: impl Into<String>,
    ) -> Result<SyntaxTree, ParseError> {
        let source = source.into();
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;

        let tree = parser.parse(&source, None).ok_or(ParseError::NoTree)?;
        let root = tree.root_node();
        let index = LineIndex::new(&source);

        if root.has_error() {
            if let Some(node) = first_error(root) {
                let position = index.position(node.start_byte());
                let message = if node.is_missing() {
                    format!("missing `{}`", node.kind())
                } else {
                    format!("unexpected `{}`", snippet(&source, node))
                };
                return Err(ParseError::Syntax {
                    line: position.line + 1,
                    column: position.column + 1,
                    message,
                });
            }
        }

        let mut converter = Converter::new(&source, index);
        let root = converter.convert_root(root);
        Ok(SyntaxTree::new(path, source, root))
    }
}

impl Default for CSharpParser {
    fn default() -> Self {
        Self::new()
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn snippet(source: &str, node: Node<'_>) -> String {
    let text = &source[node.start_byte()..node.end_byte()];
    let line = text.lines().next().unwrap_or_default().trim();
    line.chars().take(24).collect()
}

struct PendingTrivia {
    leading: Vec<Trivia>,
    trailing: Vec<Trivia>,
}

struct Converter<'s> {
    source: &'s str,
    index: LineIndex,
    trivia: Vec<PendingTrivia>,
    end_of_file: Vec<Trivia>,
    next_token: usize,
}

impl<'s> Converter<'s> {
    fn new(source: &'s str, index: LineIndex) -> Self {
        Self {
            source,
            index,
            trivia: Vec::new(),
            end_of_file: Vec::new(),
            next_token: 0,
        }
    }

    fn convert_root(&mut self, root: Node<'_>) -> SyntaxNode {
        let mut tokens = Vec::new();
        self.collect_tokens(root, &mut tokens);
        self.assign_trivia(&tokens);

        let mut children = self.convert_children(root, SyntaxKind::CompilationUnit);
        let end = self.source.len();
        let eof_range = TextRange::new(end, end);
        children.push(
            SyntaxNode::token(SyntaxKind::EndOfFile, eof_range, self.index.span(eof_range), "")
                .with_leading_trivia(mem::take(&mut self.end_of_file)),
        );

        let range = TextRange::new(0, end);
        SyntaxNode::node(
            SyntaxKind::CompilationUnit,
            range,
            self.index.span(range),
            children,
        )
    }

    /// Leaves that become tokens: not part of an extra, not empty, and not
    /// on a directive line (directives are trivia).
    fn is_token(&self, node: Node<'_>) -> bool {
        node.child_count() == 0
            && node.start_byte() < node.end_byte()
            && !self.index.is_directive_line(node.start_byte())
    }

    fn collect_tokens(&self, node: Node<'_>, out: &mut Vec<TextRange>) {
        if node.is_extra() {
            return;
        }
        if node.child_count() == 0 {
            if self.is_token(node) {
                out.push(TextRange::new(node.start_byte(), node.end_byte()));
            }
            return;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_tokens(child, out);
        }
    }

    fn assign_trivia(&mut self, tokens: &[TextRange]) {
        let mut previous_end = 0;
        let mut leading = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let gap = trivia::lex(self.source, previous_end, token.start, &self.index);
            if i == 0 {
                leading = gap;
            } else {
                let (trailing, next_leading) = trivia::split_trailing(gap);
                if let Some(last) = self.trivia.last_mut() {
                    last.trailing = trailing;
                }
                leading = next_leading;
            }
            self.trivia.push(PendingTrivia {
                leading: mem::take(&mut leading),
                trailing: Vec::new(),
            });
            previous_end = token.end;
        }

        let gap = trivia::lex(self.source, previous_end, self.source.len(), &self.index);
        if let Some(last) = self.trivia.last_mut() {
            let (trailing, rest) = trivia::split_trailing(gap);
            last.trailing = trailing;
            self.end_of_file = rest;
        } else {
            self.end_of_file = gap;
        }
    }

    fn convert_children(&mut self, node: Node<'_>, kind: SyntaxKind) -> Vec<SyntaxNode> {
        let mut children = Vec::new();
        let mut cursor = node.walk();
        if !cursor.goto_first_child() {
            return children;
        }
        loop {
            let child = cursor.node();
            let role = match kind {
                SyntaxKind::BaseList if child.is_named() => Some(SyntaxKind::TypeReference),
                SyntaxKind::ObjectCreationExpression if cursor.field_name() == Some("type") => {
                    Some(SyntaxKind::TypeReference)
                }
                _ => None,
            };
            if let Some(converted) = self.convert(child, role) {
                children.push(converted);
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        children
    }

    fn convert(&mut self, node: Node<'_>, role: Option<SyntaxKind>) -> Option<SyntaxNode> {
        if node.is_extra() {
            return None;
        }
        let range = TextRange::new(node.start_byte(), node.end_byte());
        let span = self.index.span(range);

        if node.child_count() == 0 {
            if !self.is_token(node) {
                return None;
            }
            let text = &self.source[range.start..range.end];
            let kind = role.unwrap_or(if node.kind() == "identifier" {
                SyntaxKind::Identifier
            } else {
                SyntaxKind::Token
            });
            let pending = self.trivia.get_mut(self.next_token).map(|p| PendingTrivia {
                leading: mem::take(&mut p.leading),
                trailing: mem::take(&mut p.trailing),
            });
            self.next_token += 1;

            let mut token = SyntaxNode::token(kind, range, span, text);
            if let Some(pending) = pending {
                token = token
                    .with_leading_trivia(pending.leading)
                    .with_trailing_trivia(pending.trailing);
            }
            if matches!(kind, SyntaxKind::Identifier | SyntaxKind::TypeReference) {
                token = token.with_identifier(compact(text));
            }
            return Some(token);
        }

        let kind = role.unwrap_or_else(|| map_kind(node));
        let children = self.convert_children(node, kind);
        if kind == SyntaxKind::Other && children.is_empty() {
            return None;
        }

        let mut converted = SyntaxNode::node(kind, range, span, children);
        if let Some(identifier) = self.identifier(node, kind) {
            converted = converted.with_identifier(identifier);
        }
        Some(converted)
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        &self.source[node.start_byte()..node.end_byte()]
    }

    fn identifier(&self, node: Node<'_>, kind: SyntaxKind) -> Option<String> {
        match kind {
            SyntaxKind::NamespaceDeclaration
            | SyntaxKind::FileScopedNamespaceDeclaration
            | SyntaxKind::ClassDeclaration
            | SyntaxKind::StructDeclaration
            | SyntaxKind::RecordDeclaration
            | SyntaxKind::InterfaceDeclaration
            | SyntaxKind::EnumDeclaration
            | SyntaxKind::MethodDeclaration
            | SyntaxKind::ConstructorDeclaration
            | SyntaxKind::PropertyDeclaration
            | SyntaxKind::VariableDeclarator => self.declared_name(node),
            SyntaxKind::IndexerDeclaration => Some(INDEXER_NAME.to_owned()),
            SyntaxKind::AccessorDeclaration => self.accessor_keyword(node),
            SyntaxKind::Modifier => Some(self.text(node).trim().to_owned()),
            SyntaxKind::TypeReference => Some(compact(self.text(node))),
            SyntaxKind::ObjectCreationExpression => node
                .child_by_field_name("type")
                .map(|t| compact(self.text(t))),
            SyntaxKind::InvocationExpression => node
                .child_by_field_name("function")
                .map(|f| invoked_member(self.text(f))),
            SyntaxKind::Attribute => node.child_by_field_name("name").map(|n| {
                let name = compact(self.text(n));
                name.rsplit('.').next().unwrap_or_default().to_owned()
            }),
            SyntaxKind::UsingDirective => using_target(self.text(node)),
            _ => None,
        }
    }

    fn declared_name(&self, node: Node<'_>) -> Option<String> {
        if let Some(name) = node.child_by_field_name("name") {
            return Some(compact(self.text(name)));
        }
        let mut cursor = node.walk();
        let first = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "identifier" || c.kind() == "qualified_name");
        first.map(|n| compact(self.text(n)))
    }

    fn accessor_keyword(&self, node: Node<'_>) -> Option<String> {
        if let Some(name) = node.child_by_field_name("name") {
            return Some(self.text(name).to_owned());
        }
        let mut cursor = node.walk();
        let keyword = node
            .children(&mut cursor)
            .find(|c| matches!(c.kind(), "get" | "set" | "init" | "add" | "remove"));
        keyword.map(|k| k.kind().to_owned())
    }
}

fn map_kind(node: Node<'_>) -> SyntaxKind {
    match node.kind() {
        "compilation_unit" => SyntaxKind::CompilationUnit,
        "namespace_declaration" => SyntaxKind::NamespaceDeclaration,
        "file_scoped_namespace_declaration" => SyntaxKind::FileScopedNamespaceDeclaration,
        "using_directive" => SyntaxKind::UsingDirective,
        "class_declaration" => SyntaxKind::ClassDeclaration,
        "struct_declaration" | "record_struct_declaration" => SyntaxKind::StructDeclaration,
        "record_declaration" => {
            let mut cursor = node.walk();
            let is_struct = node.children(&mut cursor).any(|c| c.kind() == "struct");
            if is_struct {
                SyntaxKind::StructDeclaration
            } else {
                SyntaxKind::RecordDeclaration
            }
        }
        "interface_declaration" => SyntaxKind::InterfaceDeclaration,
        "enum_declaration" => SyntaxKind::EnumDeclaration,
        "method_declaration" => SyntaxKind::MethodDeclaration,
        "constructor_declaration" => SyntaxKind::ConstructorDeclaration,
        "property_declaration" => SyntaxKind::PropertyDeclaration,
        "indexer_declaration" => SyntaxKind::IndexerDeclaration,
        "accessor_declaration" => SyntaxKind::AccessorDeclaration,
        "field_declaration" => SyntaxKind::FieldDeclaration,
        "variable_declarator" => SyntaxKind::VariableDeclarator,
        "base_list" => SyntaxKind::BaseList,
        "object_creation_expression" => SyntaxKind::ObjectCreationExpression,
        "invocation_expression" => SyntaxKind::InvocationExpression,
        "attribute_list" => SyntaxKind::AttributeList,
        "attribute" => SyntaxKind::Attribute,
        "modifier" => SyntaxKind::Modifier,
        _ => SyntaxKind::Other,
    }
}

/// Member name of every indexer.
const INDEXER_NAME: &str = "this[]";

fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Member name of an invoked expression: `_repo.Save<T>` is `Save`.
fn invoked_member(text: &str) -> String {
    let text = compact(text);
    let text = text.split('<').next().unwrap_or_default();
    text.rsplit('.').next().unwrap_or_default().to_owned()
}

/// Namespace imported by a plain `using` directive. Aliases and
/// `using static` import no namespace.
fn using_target(text: &str) -> Option<String> {
    let mut words = text.trim().trim_end_matches(';').split_whitespace().peekable();
    if words.peek() == Some(&"global") {
        words.next();
    }
    if words.next() != Some("using") {
        return None;
    }
    if words.peek() == Some(&"static") {
        return None;
    }
    let target: String = words.collect();
    (!target.is_empty() && !target.contains('=')).then_some(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharp_lint_core::TriviaKind;

    fn parse(source: &str) -> SyntaxTree {
        CSharpParser::new()
            .parse("Test.cs", source)
            .expect("Failed to parse")
    }

    #[test]
    fn maps_declarations() {
        let tree = parse(
            "namespace Shop\n{\n    public class Order : IOrder\n    {\n        private int count;\n        public int Total { get; private set; }\n        public void Submit() { }\n    }\n}\n",
        );
        let root = tree.root();

        let class = root
            .descendants_of_kind(SyntaxKind::ClassDeclaration)
            .next()
            .unwrap();
        assert_eq!(class.identifier(), Some("Order"));
        assert!(class.has_modifier("public"));

        let bases: Vec<&str> = class
            .descendants_of_kind(SyntaxKind::TypeReference)
            .filter_map(SyntaxNode::identifier)
            .collect();
        assert_eq!(bases, vec!["IOrder"]);

        let members: Vec<SyntaxKind> = class.members().iter().map(|m| m.kind()).collect();
        assert_eq!(
            members,
            vec![
                SyntaxKind::FieldDeclaration,
                SyntaxKind::PropertyDeclaration,
                SyntaxKind::MethodDeclaration
            ]
        );

        let field = class.members()[0];
        let names: Vec<&str> = field
            .declarators()
            .filter_map(SyntaxNode::identifier)
            .collect();
        assert_eq!(names, vec!["count"]);

        let property = class.members()[1];
        let accessors: Vec<&str> = property
            .accessors()
            .filter_map(SyntaxNode::identifier)
            .collect();
        assert_eq!(accessors, vec!["get", "set"]);
        assert!(property.accessors().nth(1).unwrap().has_modifier("private"));
    }

    #[test]
    fn maps_indexers_as_properties() {
        let tree = parse("class Grid\n{\n    public Cell this[int x, int y] { get => default; private set { } }\n}\n");
        let indexer = tree
            .root()
            .descendants_of_kind(SyntaxKind::IndexerDeclaration)
            .next()
            .unwrap();
        assert_eq!(indexer.identifier(), Some("this[]"));
        assert!(indexer.kind().is_property());

        let accessors: Vec<&str> = indexer
            .accessors()
            .filter_map(SyntaxNode::identifier)
            .collect();
        assert_eq!(accessors, vec!["get", "set"]);
    }

    #[test]
    fn method_span_is_zero_based() {
        let tree = parse("class A\n{\n    void Run()\n    {\n    }\n}\n");
        let method = tree
            .root()
            .descendants_of_kind(SyntaxKind::MethodDeclaration)
            .next()
            .unwrap();
        assert_eq!(method.span().start.line, 2);
        assert_eq!(method.span().end.line, 4);
        assert_eq!(method.span().line_delta(), 2);
    }

    #[test]
    fn region_is_leading_trivia_of_next_token() {
        let tree = parse("class A\n{\n    #region Fields\n    private int _x;\n    #endregion\n}\n");
        let field = tree
            .root()
            .descendants_of_kind(SyntaxKind::FieldDeclaration)
            .next()
            .unwrap();
        let kinds: Vec<TriviaKind> = field.leading_trivia().iter().map(Trivia::kind).collect();
        assert!(kinds.contains(&TriviaKind::RegionDirective));

        let regions = tree
            .root()
            .descendant_trivia()
            .filter(|t| {
                matches!(
                    t.kind(),
                    TriviaKind::RegionDirective | TriviaKind::EndRegionDirective
                )
            })
            .count();
        assert_eq!(regions, 2);
    }

    #[test]
    fn trailing_trivia_stops_at_line_break() {
        let tree = parse("class A { } // done\n\n");
        let close = tree
            .root()
            .tokens()
            .find(|t| t.text() == Some("}"))
            .unwrap();
        let kinds: Vec<TriviaKind> = close.trailing_trivia().iter().map(Trivia::kind).collect();
        assert_eq!(
            kinds,
            vec![
                TriviaKind::Whitespace,
                TriviaKind::SingleLineComment,
                TriviaKind::EndOfLine
            ]
        );

        let eof = tree.root().children().last().unwrap();
        assert_eq!(eof.kind(), SyntaxKind::EndOfFile);
        assert_eq!(eof.leading_trivia().len(), 1);
    }

    #[test]
    fn object_creation_and_invocation_identifiers() {
        let tree = parse(
            "class A\n{\n    void Run()\n    {\n        var s = new global::Shop.OrderService();\n        s.Submit<int>(1);\n    }\n}\n",
        );
        let creation = tree
            .root()
            .descendants_of_kind(SyntaxKind::ObjectCreationExpression)
            .next()
            .unwrap();
        assert_eq!(creation.identifier(), Some("global::Shop.OrderService"));
        assert_eq!(
            creation
                .children_of_kind(SyntaxKind::TypeReference)
                .count(),
            1
        );

        let invocation = tree
            .root()
            .descendants_of_kind(SyntaxKind::InvocationExpression)
            .next()
            .unwrap();
        assert_eq!(invocation.identifier(), Some("Submit"));
    }

    #[test]
    fn using_directives() {
        assert_eq!(using_target("using System.Linq;"), Some("System.Linq".to_string()));
        assert_eq!(
            using_target("global using Shop.Core;"),
            Some("Shop.Core".to_string())
        );
        assert_eq!(using_target("using static System.Math;"), None);
        assert_eq!(using_target("using Json = Newtonsoft.Json;"), None);
    }

    #[test]
    fn attributes_use_last_name_segment() {
        let tree = parse("class T\n{\n    [NUnit.Framework.Test]\n    public void Works() { }\n}\n");
        let method = tree
            .root()
            .descendants_of_kind(SyntaxKind::MethodDeclaration)
            .next()
            .unwrap();
        assert_eq!(method.attributes().collect::<Vec<_>>(), vec!["Test"]);
    }

    #[test]
    fn syntax_errors_are_reported_with_position() {
        let err = CSharpParser::new()
            .parse("Broken.cs", "class A {\n    void Run( {\n}\n")
            .unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn empty_source() {
        let tree = parse("");
        assert_eq!(tree.root().children().len(), 1);
        assert_eq!(tree.root().children()[0].kind(), SyntaxKind::EndOfFile);
    }
}
