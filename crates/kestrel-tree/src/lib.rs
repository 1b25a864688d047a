//! Declaration trees for the kestrel class completer.
//!
//! A parser (out of scope here) produces a [`SourceForest`]: compilation units
//! holding import clauses and class declarations. Trees are immutable once
//! added; everything the completer derives from them lives in side tables
//! keyed by [`DeclId`].

pub mod decl;
pub use decl::{
    AnnotationExpr, ClassDecl, ClassKind, EnumConstantDecl, FieldDecl, MemberDecl, MethodDecl,
    Modifiers, ParamDecl, TypeParamDecl,
};

pub mod type_expr;
pub use type_expr::{Primitive, TypeExpr};

pub mod forest;
pub use forest::{CompilationUnit, DeclId, ImportDecl, PackageDecl, SourceForest, UnitId};

#[cfg(test)]
#[path = "../tests/forest_tests.rs"]
mod forest_tests;

#[cfg(test)]
#[path = "../tests/type_expr_tests.rs"]
mod type_expr_tests;
