//! Symbol and scope model for the kestrel class completer.
//!
//! - [`Symtab`]: the symbol table, owning the symbol and scope arenas and the
//!   package/class registries
//! - [`Symbol`] / [`SymbolData`]: packages, classes, methods, variables and
//!   type variables, addressed by [`SymbolId`]
//! - [`Scope`]: insertion-ordered name tables that can be frozen
//! - [`StarImportScope`] / [`NamedImportScope`]: the two import scopes of a
//!   compilation unit
//! - [`Type`]: class, type-variable, array, primitive and error types

pub mod flags;
pub use flags::{Flags, KindFilter};

pub mod symbol;
pub use symbol::{
    ClassData, Completer, CompletionState, MethodData, PackageData, Symbol, SymbolArena,
    SymbolData, SymbolId,
};

pub mod types;
pub use types::Type;

pub mod scope;
pub use scope::{
    Bucket, ImportFilter, NamedImport, NamedImportScope, Scope, ScopeArena, ScopeError, ScopeId,
    StarImport, StarImportScope,
};

pub mod symtab;
pub use symtab::{Symtab, WellKnown};

#[cfg(test)]
#[path = "../tests/scope_tests.rs"]
mod scope_tests;

#[cfg(test)]
#[path = "../tests/symtab_tests.rs"]
mod symtab_tests;
