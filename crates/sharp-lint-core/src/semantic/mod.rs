//! Semantic layer of the document model.
//!
//! The binder turns the syntax trees of a whole load into one
//! [`Compilation`]; each document gets a [`SemanticModel`] view onto it.
//! Declarations the binder cannot make sense of simply have no symbol.

mod binder;
mod compilation;
mod model;
mod symbol;

pub use compilation::{normalize_type_name, Compilation};
pub use model::SemanticModel;
pub use symbol::{
    Accessibility, PropertyInfo, SetterInfo, Symbol, SymbolId, SymbolKind, SymbolLocation,
    TypeKind,
};
