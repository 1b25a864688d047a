//! Tests for placeholder classes standing in for unresolved types.

use crate::test_utils::*;
use crate::{CompilationSession, EnterOptions};
use kestrel_common::DiagnosticKind;
use kestrel_symbols::{CompletionState, Flags, SymbolId, Symtab, Type};
use kestrel_tree::{ClassDecl, CompilationUnit, FieldDecl, SourceForest, TypeExpr};

fn placeholder_of(ty: &Type) -> SymbolId {
    match ty {
        Type::Error { sym, .. } => *sym,
        other => panic!("expected a placeholder type, got {other:?}"),
    }
}

fn type_param_names(session: &CompilationSession, class: SymbolId) -> Vec<String> {
    session
        .symtab
        .class(class)
        .map(|c| {
            c.type_params
                .iter()
                .map(|&tv| session.symtab.name(tv).to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn test_placeholder_is_complete_and_empty() {
    let forest = single_unit("A.java", vec![ClassDecl::class("A").extends(TypeExpr::name("Gone"))]);
    let mut session = session(forest);
    let a = complete_named(&mut session, "A");
    let gone = placeholder_of(&supertype(&session, a));

    let flags = session.symtab.flags(gone);
    assert!(flags.contains(Flags::PLACEHOLDER | Flags::SYNTHETIC));
    assert!(!flags.contains(Flags::INTERFACE));
    let data = session.symtab.class(gone).expect("class data");
    assert_eq!(data.state, CompletionState::Complete);
    assert!(data.completer.is_none());
    assert_eq!(data.supertype, Some(object(&session)));
    let members = session.symtab.scope(data.members).expect("member scope");
    assert!(members.is_empty() && members.is_frozen());
    assert_eq!(session.placeholder_count(), 1);
}

#[test]
fn test_implements_clause_synthesizes_interface() {
    let forest = single_unit("A.java", vec![ClassDecl::class("A").implements(TypeExpr::name("Gone"))]);
    let mut session = session(forest);
    let a = complete_named(&mut session, "A");

    let data = session.symtab.class(a).expect("class data");
    // Placeholders are kept out of the resolved interface list.
    assert!(data.interfaces.is_empty());
    assert_eq!(data.all_interfaces.len(), 1);
    let gone = placeholder_of(&data.all_interfaces[0]);
    assert!(session.symtab.flags(gone).contains(Flags::INTERFACE | Flags::PLACEHOLDER));
}

#[test]
fn test_one_diagnostic_per_missing_name() {
    let forest = single_unit(
        "A.java",
        vec![
            ClassDecl::class("A").extends(TypeExpr::name("Gone")),
            ClassDecl::class("B").extends(TypeExpr::name("Gone")),
            ClassDecl::class("C").field(FieldDecl::new("g", TypeExpr::name("Gone"))),
        ],
    );
    let mut session = session(forest);
    session.complete_all().expect("complete all");

    assert_eq!(args_of(&session, DiagnosticKind::CannotFindSymbol), vec!["Gone"]);
    let a = session.class_named("A").expect("A");
    let b = session.class_named("B").expect("B");
    assert_eq!(supertype(&session, a), supertype(&session, b));
    assert_eq!(session.placeholder_count(), 1);
}

#[test]
fn test_single_type_argument_gets_parameter_t() {
    let forest = single_unit(
        "A.java",
        vec![ClassDecl::class("A").extends(TypeExpr::apply(TypeExpr::name("Gone"), vec![TypeExpr::name("String")]))],
    );
    let mut session = session(forest);
    let a = complete_named(&mut session, "A");
    let string = session.symtab.well_known.string.expect("String");

    let Type::Error { sym, args } = supertype(&session, a) else {
        panic!("supertype should be a placeholder");
    };
    assert_eq!(args, vec![Type::class(string)]);
    assert_eq!(type_param_names(&session, sym), vec!["T"]);
    assert_eq!(count(&session, DiagnosticKind::CannotFindSymbol), 1);
}

#[test]
fn test_several_type_arguments_get_numbered_parameters() {
    let pair = TypeExpr::apply(
        TypeExpr::name("Pair"),
        vec![TypeExpr::name("String"), TypeExpr::name("Object")],
    );
    let forest = single_unit("A.java", vec![ClassDecl::class("A").field(FieldDecl::new("p", pair))]);
    let mut session = session(forest);
    complete_named(&mut session, "A");

    let pair = session
        .symtab
        .interner
        .get("Pair")
        .and_then(|name| session.placeholders.get(session.symtab.unnamed_package(), name))
        .expect("Pair placeholder");
    assert_eq!(type_param_names(&session, pair), vec!["T1", "T2"]);
    assert_eq!(args_of(&session, DiagnosticKind::CannotFindSymbol), vec!["Pair"]);
}

#[test]
fn test_placeholder_keeps_parameters_of_first_use() {
    let forest = single_unit(
        "A.java",
        vec![
            ClassDecl::class("A")
                .field(FieldDecl::new(
                    "one",
                    TypeExpr::apply(TypeExpr::name("Box"), vec![TypeExpr::name("String")]),
                ))
                .field(FieldDecl::new(
                    "two",
                    TypeExpr::apply(
                        TypeExpr::name("Box"),
                        vec![TypeExpr::name("String"), TypeExpr::name("String")],
                    ),
                )),
        ],
    );
    let mut session = session(forest);
    complete_named(&mut session, "A");

    let boxed = session
        .symtab
        .interner
        .get("Box")
        .and_then(|name| session.placeholders.get(session.symtab.unnamed_package(), name))
        .expect("Box placeholder");
    assert_eq!(type_param_names(&session, boxed), vec!["T"]);
}

#[test]
fn test_qualified_name_in_existing_package() {
    let mut symtab = Symtab::with_prelude();
    symtab.enter_binary_class("p.Present", kestrel_symbols::Flags::PUBLIC);
    let forest = single_unit(
        "A.java",
        vec![
            ClassDecl::class("A").extends(TypeExpr::name("p.Gone")),
            ClassDecl::class("B").extends(TypeExpr::name("p.Gone")),
        ],
    );
    let mut session = CompilationSession::new(symtab, forest, EnterOptions::default());
    session.complete_all().expect("complete all");

    assert_eq!(args_of(&session, DiagnosticKind::CannotFindSymbol), vec!["p.Gone"]);
    let a = session.class_named("A").expect("A");
    let gone = placeholder_of(&supertype(&session, a));
    assert_eq!(session.symtab.full_name(gone), "p.Gone");
    let p = session.symtab.lookup_package("p").expect("p");
    assert_eq!(session.symtab.owner(gone), Some(p));
}

#[test]
fn test_qualified_name_in_missing_package() {
    let forest = single_unit("A.java", vec![ClassDecl::class("A").extends(TypeExpr::name("nope.Gone"))]);
    let mut session = session(forest);
    let a = complete_named(&mut session, "A");

    assert_eq!(kinds(&session), vec![DiagnosticKind::PackageDoesNotExist]);
    let gone = placeholder_of(&supertype(&session, a));
    assert_eq!(session.symtab.full_name(gone), "nope.Gone");
}

#[test]
fn test_member_of_missing_member_type_is_a_placeholder() {
    let missing = TypeExpr::name("String.Missing.Inner");
    let forest = single_unit("A.java", vec![ClassDecl::class("A").extends(missing)]);
    let mut session = session(forest);
    let a = complete_named(&mut session, "A");
    let string = session.symtab.well_known.string.expect("String");

    assert_eq!(
        args_of(&session, DiagnosticKind::CannotFindSymbol),
        vec!["java.lang.String.Missing"]
    );
    let inner = placeholder_of(&supertype(&session, a));
    assert_eq!(session.symtab.name(inner), "Inner");
    let outer = session.symtab.owner(inner).expect("owner");
    assert!(session.symtab.flags(outer).contains(Flags::PLACEHOLDER));
    assert_eq!(session.symtab.owner(outer), Some(string));
    assert_eq!(session.placeholder_count(), 2);
}

#[test]
fn test_missing_name_is_reported_once_per_unit() {
    let mut forest = SourceForest::new();
    let p = forest.add_unit(CompilationUnit::new("p/B.java").package("p"));
    forest.add_class(
        p,
        ClassDecl::class("B")
            .extends(TypeExpr::name("Missing"))
            .field(FieldDecl::new("m", TypeExpr::name("Missing"))),
    );
    let q = forest.add_unit(CompilationUnit::new("q/C.java").package("q"));
    forest.add_class(q, ClassDecl::class("C").extends(TypeExpr::name("Missing")));

    let mut session = session(forest);
    session.complete_all().expect("complete all");

    let reported: Vec<(&str, DiagnosticKind)> = session
        .diagnostics()
        .iter()
        .map(|d| (d.file.as_str(), d.kind))
        .collect();
    assert_eq!(
        reported,
        vec![
            ("p/B.java", DiagnosticKind::CannotFindSymbol),
            ("q/C.java", DiagnosticKind::CannotFindSymbol),
        ]
    );
    let b = session.class_named("p.B").expect("B");
    let c = session.class_named("q.C").expect("C");
    assert_eq!(placeholder_of(&supertype(&session, b)), placeholder_of(&supertype(&session, c)));
    assert_eq!(session.placeholder_count(), 1);
}
