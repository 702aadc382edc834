//! Symbol table for one loaded code base.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::document::DocumentId;
use crate::syntax::{SyntaxKind, SyntaxNode, TextRange};

use super::symbol::{Symbol, SymbolId, TypeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct DeclKey {
    pub(crate) document: DocumentId,
    pub(crate) start: usize,
    pub(crate) kind: SyntaxKind,
}

impl DeclKey {
    pub(crate) fn of(document: DocumentId, node: &SyntaxNode) -> Self {
        Self {
            document,
            start: node.range().start,
            kind: node.kind(),
        }
    }
}

/// Lexical scopes of one document, used for type-name lookup.
#[derive(Debug, Clone, Default)]
pub(crate) struct DocumentScopes {
    pub(crate) namespaces: Vec<(TextRange, String)>,
    pub(crate) usings: Vec<(TextRange, String)>,
    pub(crate) types: Vec<(TextRange, SymbolId)>,
}

/// All symbols declared by a set of documents, plus the lookup tables that
/// map declaration nodes and type names to them.
///
/// Built once by [`Compilation::build`] and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    pub(crate) symbols: Vec<Symbol>,
    pub(crate) declarations: HashMap<DeclKey, SymbolId>,
    pub(crate) by_qualified_name: HashMap<String, SymbolId>,
    pub(crate) by_simple_name: HashMap<String, Vec<SymbolId>>,
    pub(crate) unresolved: HashMap<String, SymbolId>,
    pub(crate) scopes: HashMap<DocumentId, DocumentScopes>,
}

impl Compilation {
    /// Looks up a symbol by id.
    #[must_use]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0)
    }

    /// All symbols, declared types first in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Declared types of the given kind.
    pub fn types_of_kind(&self, kind: TypeKind) -> impl Iterator<Item = &Symbol> {
        self.symbols
            .iter()
            .filter(move |s| s.type_kind() == Some(kind))
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if no symbol was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol declared by `node` in `document`, if the node is a declaration
    /// the binder understood.
    #[must_use]
    pub fn declared_symbol(&self, document: DocumentId, node: &SyntaxNode) -> Option<&Symbol> {
        self.declarations
            .get(&DeclKey::of(document, node))
            .and_then(|id| self.get(*id))
    }

    /// Resolves a type name as written at `offset` in `document`.
    ///
    /// Lookup order: nested types of the enclosing types, the enclosing
    /// namespaces and their parents, `using` directives in scope, the global
    /// namespace, and finally a unique match on the simple name. Only types
    /// declared in the compilation resolve.
    #[must_use]
    pub fn resolve_type(&self, document: DocumentId, offset: usize, name: &str) -> Option<SymbolId> {
        let name = normalize_type_name(name);
        if name.is_empty() {
            return None;
        }

        let mut candidates = Vec::new();
        if let Some(scopes) = self.scopes.get(&document) {
            let mut types: Vec<_> = scopes
                .types
                .iter()
                .filter(|(range, _)| range.start < offset && offset < range.end)
                .collect();
            types.sort_by_key(|(range, _)| Reverse(range.start));
            for (_, id) in types {
                if let Some(symbol) = self.get(*id) {
                    candidates.push(format!("{}.{name}", symbol.qualified_name));
                }
            }

            let mut namespaces: Vec<_> = scopes
                .namespaces
                .iter()
                .filter(|(range, _)| range.start < offset && offset <= range.end)
                .collect();
            namespaces.sort_by_key(|(range, _)| Reverse(range.start));
            for (_, namespace) in namespaces {
                let mut prefix = namespace.as_str();
                loop {
                    candidates.push(format!("{prefix}.{name}"));
                    match prefix.rfind('.') {
                        Some(dot) => prefix = &prefix[..dot],
                        None => break,
                    }
                }
            }

            for (range, using) in &scopes.usings {
                if range.start <= offset && offset <= range.end {
                    candidates.push(format!("{using}.{name}"));
                }
            }
        }
        candidates.push(name.clone());

        if let Some(id) = candidates
            .iter()
            .find_map(|c| self.by_qualified_name.get(c).copied())
        {
            return Some(id);
        }

        let simple = name.rsplit('.').next().unwrap_or(&name);
        match self.by_simple_name.get(simple).map(Vec::as_slice) {
            Some([only]) => Some(*only),
            _ => None,
        }
    }

    /// Every base class and interface reachable from `id`, breadth-first,
    /// excluding `id` itself.
    #[must_use]
    pub fn all_supertypes(&self, id: SymbolId) -> Vec<SymbolId> {
        let mut seen = HashSet::from([id]);
        let mut queue: VecDeque<SymbolId> = VecDeque::from([id]);
        let mut out = Vec::new();

        while let Some(current) = queue.pop_front() {
            let Some(symbol) = self.get(current) else {
                continue;
            };
            for base in &symbol.base_types {
                if seen.insert(*base) {
                    out.push(*base);
                    queue.push_back(*base);
                }
            }
        }

        out
    }

    /// Declared interfaces implemented by `id`, directly or transitively.
    #[must_use]
    pub fn all_interfaces(&self, id: SymbolId) -> Vec<SymbolId> {
        self.all_supertypes(id)
            .into_iter()
            .filter(|s| self.get(*s).is_some_and(Symbol::is_interface))
            .collect()
    }

    /// Returns true if `id` implements an interface called `name`, declared
    /// in the compilation or named without a declaration.
    #[must_use]
    pub fn implements_named(&self, id: SymbolId, name: &str) -> bool {
        self.all_supertypes(id).into_iter().any(|s| {
            self.get(s).is_some_and(|symbol| {
                symbol.name == name
                    && matches!(
                        symbol.type_kind(),
                        Some(TypeKind::Interface | TypeKind::Unresolved)
                    )
            })
        })
    }
}

/// Strips `global::`, whitespace, generic arguments, nullable markers,
/// array ranks and constructor arguments from a type as written.
#[must_use]
pub fn normalize_type_name(text: &str) -> String {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact.strip_prefix("global::").unwrap_or(&compact);
    let end = compact
        .find(|c| matches!(c, '<' | '(' | '?' | '['))
        .unwrap_or(compact.len());
    compact[..end].to_owned()
}
