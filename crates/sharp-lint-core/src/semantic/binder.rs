//! Builds a [`Compilation`] from syntax trees.
//!
//! Binding runs in two passes. The declaration pass walks every tree, creates
//! symbols for types and members and records the lexical scopes of each
//! document. The resolution pass then resolves base lists, which may refer to
//! types declared in any document.

use std::mem;

use tracing::debug;

use crate::document::DocumentId;
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxTree, TextRange};

use super::compilation::{normalize_type_name, Compilation, DeclKey};
use super::symbol::{
    Accessibility, PropertyInfo, SetterInfo, Symbol, SymbolId, SymbolKind, SymbolLocation,
    TypeKind,
};

#[derive(Debug, Clone, Default)]
struct Scope {
    namespace: String,
    containing: Option<SymbolId>,
    in_interface: bool,
}

#[derive(Debug)]
struct PendingBases {
    ty: SymbolId,
    document: DocumentId,
    offset: usize,
    names: Vec<String>,
}

#[derive(Debug, Default)]
struct Binder {
    compilation: Compilation,
    pending: Vec<PendingBases>,
}

impl Compilation {
    /// Binds the given documents into one compilation.
    pub fn build<'a>(documents: impl IntoIterator<Item = (DocumentId, &'a SyntaxTree)>) -> Self {
        let mut binder = Binder::default();
        for (id, tree) in documents {
            binder.bind_document(id, tree);
        }
        binder.resolve_bases();

        debug!(
            "Bound {} symbols ({} unresolved base types)",
            binder.compilation.symbols.len(),
            binder.compilation.unresolved.len()
        );
        binder.compilation
    }
}

impl Binder {
    fn bind_document(&mut self, document: DocumentId, tree: &SyntaxTree) {
        self.compilation.scopes.entry(document).or_default();
        let root = tree.root();
        self.walk(document, root.children(), root.range(), &Scope::default());
    }

    fn walk(&mut self, document: DocumentId, nodes: &[SyntaxNode], parent: TextRange, scope: &Scope) {
        let mut scope = scope.clone();

        for node in nodes {
            match node.kind() {
                SyntaxKind::UsingDirective => {
                    if let Some(name) = node.identifier() {
                        self.scopes(document)
                            .usings
                            .push((parent, normalize_type_name(name)));
                    }
                }
                SyntaxKind::NamespaceDeclaration => {
                    let namespace = join(&scope.namespace, node.identifier().unwrap_or_default());
                    self.scopes(document)
                        .namespaces
                        .push((node.range(), namespace.clone()));
                    let inner = Scope {
                        namespace,
                        ..scope.clone()
                    };
                    self.walk(document, node.children(), node.range(), &inner);
                }
                SyntaxKind::FileScopedNamespaceDeclaration => {
                    // Applies to the rest of the enclosing node, including
                    // later siblings.
                    let namespace = join(&scope.namespace, node.identifier().unwrap_or_default());
                    let range = TextRange::new(node.range().start, parent.end);
                    self.scopes(document)
                        .namespaces
                        .push((range, namespace.clone()));
                    scope.namespace = namespace;
                    self.walk(document, node.children(), range, &scope);
                }
                kind if kind.is_type_declaration() => self.declare_type(document, node, &scope),
                SyntaxKind::MethodDeclaration
                | SyntaxKind::ConstructorDeclaration
                | SyntaxKind::PropertyDeclaration
                | SyntaxKind::IndexerDeclaration
                | SyntaxKind::FieldDeclaration => self.declare_member(document, node, &scope),
                SyntaxKind::Other => self.walk(document, node.children(), parent, &scope),
                _ => {}
            }
        }
    }

    fn declare_type(&mut self, document: DocumentId, node: &SyntaxNode, scope: &Scope) {
        let Some(name) = node.identifier() else {
            return;
        };
        let type_kind = match node.kind() {
            SyntaxKind::StructDeclaration => TypeKind::Struct,
            SyntaxKind::RecordDeclaration => TypeKind::Record,
            SyntaxKind::InterfaceDeclaration => TypeKind::Interface,
            SyntaxKind::EnumDeclaration => TypeKind::Enum,
            _ => TypeKind::Class,
        };

        let qualified_name = match scope.containing.and_then(|c| self.compilation.get(c)) {
            Some(outer) => format!("{}.{name}", outer.qualified_name),
            None => join(&scope.namespace, name),
        };
        let location = location_of(document, node);

        let existing = self
            .compilation
            .by_qualified_name
            .get(&qualified_name)
            .copied()
            .filter(|id| {
                self.compilation
                    .get(*id)
                    .is_some_and(|s| s.kind == SymbolKind::Type(type_kind))
            });

        let id = if let Some(id) = existing {
            // Another part of a partial type.
            self.symbol_mut(id).locations.push(location);
            id
        } else {
            let default = match scope.containing {
                Some(_) if scope.in_interface => Accessibility::Public,
                Some(_) => Accessibility::Private,
                None => Accessibility::Internal,
            };
            let id = self.push_symbol(Symbol {
                id: SymbolId(0),
                name: name.to_owned(),
                qualified_name: qualified_name.clone(),
                kind: SymbolKind::Type(type_kind),
                accessibility: Accessibility::from_modifiers(node.modifiers()).unwrap_or(default),
                containing_type: scope.containing,
                base_types: Vec::new(),
                members: Vec::new(),
                property: None,
                locations: vec![location],
            });
            self.compilation.by_qualified_name.insert(qualified_name, id);
            self.compilation
                .by_simple_name
                .entry(name.to_owned())
                .or_default()
                .push(id);
            if let Some(outer) = scope.containing {
                self.symbol_mut(outer).members.push(id);
            }
            id
        };

        self.compilation
            .declarations
            .insert(DeclKey::of(document, node), id);
        self.scopes(document).types.push((node.range(), id));

        let names: Vec<String> = node
            .children_of_kind(SyntaxKind::BaseList)
            .flat_map(|list| list.children_of_kind(SyntaxKind::TypeReference))
            .filter_map(SyntaxNode::identifier)
            .map(str::to_owned)
            .collect();
        if !names.is_empty() {
            self.pending.push(PendingBases {
                ty: id,
                document,
                offset: node.range().start,
                names,
            });
        }

        let inner = Scope {
            namespace: scope.namespace.clone(),
            containing: Some(id),
            in_interface: type_kind == TypeKind::Interface,
        };
        self.walk(document, node.children(), node.range(), &inner);
    }

    fn declare_member(&mut self, document: DocumentId, node: &SyntaxNode, scope: &Scope) {
        let Some(containing) = scope.containing else {
            return;
        };
        let default = if scope.in_interface {
            Accessibility::Public
        } else {
            Accessibility::Private
        };
        let accessibility = Accessibility::from_modifiers(node.modifiers()).unwrap_or(default);

        match node.kind() {
            SyntaxKind::FieldDeclaration => {
                let mut first = None;
                for declarator in node.declarators() {
                    let Some(name) = declarator.identifier() else {
                        continue;
                    };
                    let id = self.declare_member_symbol(
                        containing,
                        name,
                        SymbolKind::Field,
                        accessibility,
                        None,
                        location_of(document, declarator),
                    );
                    self.compilation
                        .declarations
                        .insert(DeclKey::of(document, declarator), id);
                    first.get_or_insert(id);
                }
                if let Some(id) = first {
                    self.compilation
                        .declarations
                        .insert(DeclKey::of(document, node), id);
                }
            }
            kind => {
                let Some(name) = node.identifier() else {
                    return;
                };
                let (symbol_kind, property) = match kind {
                    _ if kind.is_property() => {
                        (SymbolKind::Property, Some(property_info(node, accessibility)))
                    }
                    SyntaxKind::ConstructorDeclaration => (SymbolKind::Constructor, None),
                    _ => (SymbolKind::Method, None),
                };
                let id = self.declare_member_symbol(
                    containing,
                    name,
                    symbol_kind,
                    accessibility,
                    property,
                    location_of(document, node),
                );
                self.compilation
                    .declarations
                    .insert(DeclKey::of(document, node), id);
            }
        }
    }

    fn declare_member_symbol(
        &mut self,
        containing: SymbolId,
        name: &str,
        kind: SymbolKind,
        accessibility: Accessibility,
        property: Option<PropertyInfo>,
        location: SymbolLocation,
    ) -> SymbolId {
        let qualified_name = self
            .compilation
            .get(containing)
            .map_or_else(|| name.to_owned(), |c| format!("{}.{name}", c.qualified_name));
        let id = self.push_symbol(Symbol {
            id: SymbolId(0),
            name: name.to_owned(),
            qualified_name,
            kind,
            accessibility,
            containing_type: Some(containing),
            base_types: Vec::new(),
            members: Vec::new(),
            property,
            locations: vec![location],
        });
        self.symbol_mut(containing).members.push(id);
        id
    }

    fn resolve_bases(&mut self) {
        for pending in mem::take(&mut self.pending) {
            for name in &pending.names {
                let target = self
                    .compilation
                    .resolve_type(pending.document, pending.offset, name)
                    .unwrap_or_else(|| self.unresolved(name));
                if target == pending.ty {
                    continue;
                }
                let symbol = self.symbol_mut(pending.ty);
                if !symbol.base_types.contains(&target) {
                    symbol.base_types.push(target);
                }
            }
        }
    }

    fn unresolved(&mut self, name: &str) -> SymbolId {
        let qualified_name = normalize_type_name(name);
        if let Some(id) = self.compilation.unresolved.get(&qualified_name) {
            return *id;
        }

        let simple = qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&qualified_name)
            .to_owned();
        let id = self.push_symbol(Symbol {
            id: SymbolId(0),
            name: simple,
            qualified_name: qualified_name.clone(),
            kind: SymbolKind::Type(TypeKind::Unresolved),
            accessibility: Accessibility::NotApplicable,
            containing_type: None,
            base_types: Vec::new(),
            members: Vec::new(),
            property: None,
            locations: Vec::new(),
        });
        self.compilation.unresolved.insert(qualified_name, id);
        id
    }

    fn push_symbol(&mut self, mut symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.compilation.symbols.len());
        symbol.id = id;
        self.compilation.symbols.push(symbol);
        id
    }

    fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.compilation.symbols[id.0]
    }

    fn scopes(&mut self, document: DocumentId) -> &mut super::compilation::DocumentScopes {
        self.compilation.scopes.entry(document).or_default()
    }
}

fn property_info(node: &SyntaxNode, accessibility: Accessibility) -> PropertyInfo {
    let mut info = PropertyInfo::default();
    let mut has_accessors = false;

    for accessor in node.accessors() {
        has_accessors = true;
        let effective = Accessibility::from_modifiers(accessor.modifiers()).unwrap_or(accessibility);
        match accessor.identifier() {
            Some("get") => info.getter = Some(effective),
            Some(keyword @ ("set" | "init")) => {
                info.setter = Some(SetterInfo {
                    accessibility: effective,
                    is_init_only: keyword == "init",
                });
            }
            _ => {}
        }
    }

    // Expression-bodied: `int Total => _total;`
    if !has_accessors {
        info.getter = Some(accessibility);
    }
    info
}

fn location_of(document: DocumentId, node: &SyntaxNode) -> SymbolLocation {
    SymbolLocation {
        document,
        range: node.range(),
        span: node.span(),
    }
}

fn join(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_owned()
    } else if name.is_empty() {
        namespace.to_owned()
    } else {
        format!("{namespace}.{name}")
    }
}
