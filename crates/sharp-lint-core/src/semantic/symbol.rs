//! Symbols produced by the binder.

use serde::{Deserialize, Serialize};

use crate::document::DocumentId;
use crate::syntax::{LineSpan, TextRange};

/// Index of a symbol in its [`Compilation`](super::Compilation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub(crate) usize);

impl SymbolId {
    /// Raw index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Declared accessibility, ordered from most to least restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Accessibility {
    /// Accessibility does not apply (namespaces, unresolved types).
    NotApplicable,
    /// `private`
    Private,
    /// `private protected`
    ProtectedAndInternal,
    /// `protected`
    Protected,
    /// `internal`
    Internal,
    /// `protected internal`
    ProtectedOrInternal,
    /// `public`
    Public,
}

impl Accessibility {
    /// Reads the accessibility spelled by a modifier list, if any.
    pub fn from_modifiers<'a>(modifiers: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let (mut private, mut protected, mut internal, mut public) = (false, false, false, false);
        for modifier in modifiers {
            match modifier {
                "private" => private = true,
                "protected" => protected = true,
                "internal" => internal = true,
                "public" => public = true,
                _ => {}
            }
        }

        match (public, private, protected, internal) {
            (true, ..) => Some(Self::Public),
            (_, true, true, _) => Some(Self::ProtectedAndInternal),
            (_, _, true, true) => Some(Self::ProtectedOrInternal),
            (_, _, true, _) => Some(Self::Protected),
            (_, _, _, true) => Some(Self::Internal),
            (_, true, ..) => Some(Self::Private),
            _ => None,
        }
    }
}

impl std::fmt::Display for Accessibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotApplicable => "n/a",
            Self::Private => "private",
            Self::ProtectedAndInternal => "private protected",
            Self::Protected => "protected",
            Self::Internal => "internal",
            Self::ProtectedOrInternal => "protected internal",
            Self::Public => "public",
        };
        f.write_str(s)
    }
}

/// Kind of a type symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    /// `class`
    Class,
    /// `struct`
    Struct,
    /// `record`
    Record,
    /// `interface`
    Interface,
    /// `enum`
    Enum,
    /// Named in a base list but not declared in the analyzed code.
    Unresolved,
}

/// Kind of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    /// A named type.
    Type(TypeKind),
    /// A property.
    Property,
    /// A method.
    Method,
    /// A constructor.
    Constructor,
    /// A field.
    Field,
}

/// Setter facts of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetterInfo {
    /// Effective accessibility of the setter.
    pub accessibility: Accessibility,
    /// `init` rather than `set`.
    pub is_init_only: bool,
}

/// Accessor facts of a property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    /// Effective accessibility of the getter, if any.
    pub getter: Option<Accessibility>,
    /// Setter, if any.
    pub setter: Option<SetterInfo>,
}

impl PropertyInfo {
    /// A property without a setter.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.setter.is_none()
    }
}

/// Where a symbol is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolLocation {
    /// Declaring document.
    pub document: DocumentId,
    /// Byte range of the declaration node.
    pub range: TextRange,
    /// Line span of the declaration node.
    pub span: LineSpan,
}

/// Resolved identity of a declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    pub(crate) id: SymbolId,
    pub(crate) name: String,
    pub(crate) qualified_name: String,
    pub(crate) kind: SymbolKind,
    pub(crate) accessibility: Accessibility,
    pub(crate) containing_type: Option<SymbolId>,
    pub(crate) base_types: Vec<SymbolId>,
    pub(crate) members: Vec<SymbolId>,
    pub(crate) property: Option<PropertyInfo>,
    pub(crate) locations: Vec<SymbolLocation>,
}

impl Symbol {
    /// Identity within the compilation.
    #[must_use]
    pub fn id(&self) -> SymbolId {
        self.id
    }

    /// Simple name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace- and type-qualified name.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Kind.
    #[must_use]
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// Type kind, `None` for members.
    #[must_use]
    pub fn type_kind(&self) -> Option<TypeKind> {
        match self.kind {
            SymbolKind::Type(kind) => Some(kind),
            _ => None,
        }
    }

    /// Returns true for declared interfaces.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.type_kind() == Some(TypeKind::Interface)
    }

    /// Declared (or defaulted) accessibility.
    #[must_use]
    pub fn accessibility(&self) -> Accessibility {
        self.accessibility
    }

    /// Type declaring this member or nested type.
    #[must_use]
    pub fn containing_type(&self) -> Option<SymbolId> {
        self.containing_type
    }

    /// Base class and interfaces from the base list, in declaration order.
    #[must_use]
    pub fn base_types(&self) -> &[SymbolId] {
        &self.base_types
    }

    /// Member symbols, across all partial declarations.
    #[must_use]
    pub fn members(&self) -> &[SymbolId] {
        &self.members
    }

    /// Accessor facts for properties.
    #[must_use]
    pub fn property(&self) -> Option<&PropertyInfo> {
        self.property.as_ref()
    }

    /// Declaration sites; empty for unresolved types.
    #[must_use]
    pub fn locations(&self) -> &[SymbolLocation] {
        &self.locations
    }
}
