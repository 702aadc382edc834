//! Node kind tags.

use serde::{Deserialize, Serialize};

/// Kind tag of a [`SyntaxNode`](super::SyntaxNode).
///
/// Only the kinds the rules and the binder care about get their own tag;
/// everything else is [`SyntaxKind::Other`] (interior nodes) or
/// [`SyntaxKind::Token`] (leaves).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyntaxKind {
    /// Root of a file.
    CompilationUnit,
    /// `namespace Foo { ... }`
    NamespaceDeclaration,
    /// `namespace Foo;`
    FileScopedNamespaceDeclaration,
    /// `using Foo.Bar;`
    UsingDirective,
    /// `class Foo`
    ClassDeclaration,
    /// `struct Foo` or `record struct Foo`
    StructDeclaration,
    /// `record Foo`
    RecordDeclaration,
    /// `interface IFoo`
    InterfaceDeclaration,
    /// `enum Foo`
    EnumDeclaration,
    /// A method.
    MethodDeclaration,
    /// A constructor.
    ConstructorDeclaration,
    /// A property.
    PropertyDeclaration,
    /// `this[int i]`, named `this[]`.
    IndexerDeclaration,
    /// `get`, `set` or `init` accessor of a property.
    AccessorDeclaration,
    /// A field declaration; one or more [`SyntaxKind::VariableDeclarator`]s.
    FieldDeclaration,
    /// A single declared variable.
    VariableDeclarator,
    /// `: Base, IFoo`
    BaseList,
    /// A type named in a base list or in an object creation.
    TypeReference,
    /// `new Foo(...)`
    ObjectCreationExpression,
    /// `foo.Bar(...)`
    InvocationExpression,
    /// `[Test, Category("x")]`
    AttributeList,
    /// A single attribute inside an attribute list.
    Attribute,
    /// An accessibility or other declaration modifier.
    Modifier,
    /// An identifier token.
    Identifier,
    /// Any other token.
    Token,
    /// Synthetic token that carries the trivia at the end of a file.
    EndOfFile,
    /// Any other interior node.
    Other,
}

impl SyntaxKind {
    /// Returns true for class, struct, record, interface and enum declarations.
    #[must_use]
    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            Self::ClassDeclaration
                | Self::StructDeclaration
                | Self::RecordDeclaration
                | Self::InterfaceDeclaration
                | Self::EnumDeclaration
        )
    }

    /// Returns true for properties and indexers, which both carry accessors.
    #[must_use]
    pub fn is_property(self) -> bool {
        matches!(self, Self::PropertyDeclaration | Self::IndexerDeclaration)
    }

    /// Returns true for declarations that can appear in a type body.
    #[must_use]
    pub fn is_member_declaration(self) -> bool {
        self.is_type_declaration()
            || matches!(
                self,
                Self::MethodDeclaration
                    | Self::ConstructorDeclaration
                    | Self::PropertyDeclaration
                    | Self::IndexerDeclaration
                    | Self::FieldDeclaration
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_declarations_are_members() {
        assert!(SyntaxKind::ClassDeclaration.is_type_declaration());
        assert!(SyntaxKind::ClassDeclaration.is_member_declaration());
        assert!(SyntaxKind::FieldDeclaration.is_member_declaration());
        assert!(!SyntaxKind::FieldDeclaration.is_type_declaration());
        assert!(!SyntaxKind::AccessorDeclaration.is_member_declaration());
        assert!(SyntaxKind::IndexerDeclaration.is_member_declaration());
        assert!(SyntaxKind::IndexerDeclaration.is_property());
        assert!(!SyntaxKind::MethodDeclaration.is_property());
    }
}
