//! Shared helpers for completer tests.

use crate::{CompilationSession, EnterOptions};
use kestrel_common::DiagnosticKind;
use kestrel_symbols::{SymbolId, Symtab, Type};
use kestrel_tree::{ClassDecl, CompilationUnit, SourceForest};

/// A session over `forest` with the `java.lang` prelude installed.
pub(crate) fn session(forest: SourceForest) -> CompilationSession {
    CompilationSession::new(Symtab::with_prelude(), forest, EnterOptions::default())
}

pub(crate) fn session_with_options(forest: SourceForest, options: EnterOptions) -> CompilationSession {
    CompilationSession::new(Symtab::with_prelude(), forest, options)
}

/// One unit in the unnamed package declaring `classes`.
pub(crate) fn single_unit(file: &str, classes: Vec<ClassDecl>) -> SourceForest {
    let mut forest = SourceForest::new();
    let unit = forest.add_unit(CompilationUnit::new(file));
    for class in classes {
        forest.add_class(unit, class);
    }
    forest
}

/// Complete the class registered under `name` and return it.
pub(crate) fn complete_named(session: &mut CompilationSession, name: &str) -> SymbolId {
    let sym = session
        .class_named(name)
        .unwrap_or_else(|| panic!("class {name} not entered"));
    session.complete(sym).expect("completion should not be fatal");
    sym
}

pub(crate) fn kinds(session: &CompilationSession) -> Vec<DiagnosticKind> {
    session.diagnostics().iter().map(|d| d.kind).collect()
}

pub(crate) fn count(session: &CompilationSession, kind: DiagnosticKind) -> usize {
    session.log().count(kind)
}

/// Arguments of the only diagnostic of `kind`.
pub(crate) fn args_of(session: &CompilationSession, kind: DiagnosticKind) -> Vec<String> {
    let matching: Vec<_> = session.diagnostics().iter().filter(|d| d.kind == kind).collect();
    assert_eq!(matching.len(), 1, "expected one {kind:?}, got {:?}", session.diagnostics());
    matching[0].args.clone()
}

pub(crate) fn supertype(session: &CompilationSession, class: SymbolId) -> Type {
    session
        .symtab
        .class(class)
        .and_then(|c| c.supertype.clone())
        .expect("supertype computed")
}

pub(crate) fn interfaces(session: &CompilationSession, class: SymbolId) -> Vec<Type> {
    session
        .symtab
        .class(class)
        .map(|c| c.interfaces.clone())
        .unwrap_or_default()
}

/// Symbols named `name` in the member scope of `class`.
pub(crate) fn members_named(session: &CompilationSession, class: SymbolId, name: &str) -> Vec<SymbolId> {
    let scope = session.symtab.members_of(class).expect("class has members");
    session
        .symtab
        .lookup_str(scope, name, kestrel_symbols::KindFilter::ALL)
        .to_vec()
}

pub(crate) fn object(session: &CompilationSession) -> Type {
    session.symtab.object_type()
}
