//! Tests for supertype attribution, base-clause checks and cycle breaking.

use crate::test_utils::*;
use crate::{CompilationSession, EnterOptions};
use kestrel_common::DiagnosticKind;
use kestrel_symbols::{Flags, Symtab, Type};
use kestrel_tree::{AnnotationExpr, ClassDecl, CompilationUnit, Modifiers, SourceForest, TypeExpr, TypeParamDecl};

#[test]
fn test_class_without_extends_extends_object() {
    let mut session = session(single_unit("A.java", vec![ClassDecl::class("A")]));
    let a = complete_named(&mut session, "A");
    assert_eq!(supertype(&session, a), object(&session));
    assert!(interfaces(&session, a).is_empty());
}

#[test]
fn test_interface_supertype_is_object() {
    let forest = single_unit(
        "I.java",
        vec![
            ClassDecl::interface("I").implements(TypeExpr::name("J")),
            ClassDecl::interface("J"),
        ],
    );
    let mut session = session(forest);
    let i = complete_named(&mut session, "I");
    let j = session.class_named("J").expect("J");
    assert_eq!(supertype(&session, i), object(&session));
    assert_eq!(interfaces(&session, i), vec![Type::class(j)]);
}

#[test]
fn test_enum_extends_enum_of_itself() {
    let forest = single_unit("E.java", vec![ClassDecl::enumeration("E").enum_constant("A")]);
    let mut session = session(forest);
    let e = complete_named(&mut session, "E");
    let enum_ = session.symtab.well_known.enum_.expect("prelude Enum");
    assert_eq!(
        supertype(&session, e),
        Type::Class {
            sym: enum_,
            args: vec![Type::class(e)],
        }
    );
}

#[test]
fn test_hierarchy_phase_strips_type_arguments() {
    let forest = single_unit(
        "A.java",
        vec![
            ClassDecl::class("A").extends(TypeExpr::apply(TypeExpr::name("B"), vec![TypeExpr::name("String")])),
            ClassDecl::class("B").type_param(TypeParamDecl::new("T")),
        ],
    );
    let mut session = session(forest);
    let a = session.class_named("A").expect("A");
    let b = session.class_named("B").expect("B");
    let env = session.class_env(a).expect("class env");

    session.hierarchy_phase(a, env).expect("hierarchy phase");
    assert_eq!(supertype(&session, a), Type::class(b));

    // The header phase attributes the arguments.
    session.complete(a).expect("complete");
    let string = session.symtab.well_known.string.expect("String");
    assert_eq!(
        supertype(&session, a),
        Type::Class {
            sym: b,
            args: vec![Type::class(string)],
        }
    );
}

#[test]
fn test_self_cycle() {
    let forest = single_unit("A.java", vec![ClassDecl::class("A").extends(TypeExpr::name("A"))]);
    let mut session = session(forest);
    let a = complete_named(&mut session, "A");
    assert_eq!(args_of(&session, DiagnosticKind::CyclicInheritance), vec!["A"]);
    assert_eq!(supertype(&session, a), object(&session));
}

#[test]
fn test_three_class_cycle_reported_once() {
    let forest = single_unit(
        "A.java",
        vec![
            ClassDecl::class("A").extends(TypeExpr::name("B")),
            ClassDecl::class("B").extends(TypeExpr::name("C")),
            ClassDecl::class("C").extends(TypeExpr::name("A")),
        ],
    );
    let mut session = session(forest);
    session.complete_all().expect("complete all");

    assert_eq!(count(&session, DiagnosticKind::CyclicInheritance), 1);
    // Every chain ends at Object once the cycle is cut.
    for name in ["A", "B", "C"] {
        let mut current = session.class_named(name).expect("entered");
        let mut steps = 0;
        while let Some(next) = supertype(&session, current).class_sym() {
            current = next;
            steps += 1;
            assert!(steps < 10, "supertype chain of {name} does not terminate");
        }
    }
}

#[test]
fn test_interface_cycle_drops_interface() {
    let forest = single_unit(
        "I.java",
        vec![
            ClassDecl::interface("I").implements(TypeExpr::name("J")),
            ClassDecl::interface("J").implements(TypeExpr::name("I")),
        ],
    );
    let mut session = session(forest);
    let i = complete_named(&mut session, "I");
    let j = session.class_named("J").expect("J");

    assert_eq!(count(&session, DiagnosticKind::CyclicInheritance), 1);
    assert!(interfaces(&session, i).is_empty());
    assert_eq!(interfaces(&session, j), vec![Type::class(i)]);
}

#[test]
fn test_object_cannot_extend() {
    let mut symtab = Symtab::new();
    symtab.enter_binary_class("java.lang.String", Flags::PUBLIC);
    let mut forest = SourceForest::new();
    let unit = forest.add_unit(CompilationUnit::new("java/lang/Object.java").package("java.lang"));
    forest.add_class(
        unit,
        ClassDecl::class("Object")
            .modifiers(Modifiers::PUBLIC)
            .extends(TypeExpr::name("String")),
    );
    let mut session = CompilationSession::new(symtab, forest, EnterOptions::default());
    let object = session.class_named("java.lang.Object").expect("Object");
    session.symtab.well_known.object = Some(object);
    session.complete(object).expect("complete");

    assert_eq!(
        args_of(&session, DiagnosticKind::ObjectCannotExtend),
        vec!["java.lang.Object"]
    );
    assert_eq!(supertype(&session, object), Type::None);
    assert!(interfaces(&session, object).is_empty());
}

#[test]
fn test_class_extending_interface() {
    let forest = single_unit(
        "A.java",
        vec![
            ClassDecl::class("A").extends(TypeExpr::name("I")),
            ClassDecl::interface("I"),
        ],
    );
    let mut session = session(forest);
    let a = complete_named(&mut session, "A");
    let i = session.class_named("I").expect("I");
    assert_eq!(kinds(&session), vec![DiagnosticKind::NoInterfaceExpectedHere]);
    // The clause is still recorded.
    assert_eq!(supertype(&session, a), Type::class(i));
}

#[test]
fn test_class_implementing_class() {
    let forest = single_unit(
        "A.java",
        vec![
            ClassDecl::class("A").implements(TypeExpr::name("B")),
            ClassDecl::class("B"),
        ],
    );
    let mut session = session(forest);
    complete_named(&mut session, "A");
    assert_eq!(kinds(&session), vec![DiagnosticKind::InterfaceExpectedHere]);
}

#[test]
fn test_cannot_inherit_from_final() {
    let forest = single_unit(
        "A.java",
        vec![ClassDecl::class("A").extends(TypeExpr::name("String"))],
    );
    let mut session = session(forest);
    complete_named(&mut session, "A");
    assert_eq!(
        args_of(&session, DiagnosticKind::CannotInheritFromFinal),
        vec!["java.lang.String"]
    );
}

#[test]
fn test_annotation_type_implements_annotation_only() {
    let forest = single_unit("Ann.java", vec![ClassDecl::annotation_type("Ann")]);
    let mut session = session(forest);
    let ann = complete_named(&mut session, "Ann");
    let annotation = session.symtab.well_known.annotation.expect("Annotation");
    assert_eq!(interfaces(&session, ann), vec![Type::class(annotation)]);
    assert!(session.symtab.flags(ann).contains(Flags::ANNOTATION | Flags::INTERFACE));
}

#[test]
fn test_deprecated_without_arguments_marks_class() {
    let forest = single_unit(
        "A.java",
        vec![
            ClassDecl::class("A").annotate(AnnotationExpr::new(TypeExpr::name("Deprecated"))),
            ClassDecl::class("B").annotate(AnnotationExpr::new(TypeExpr::name("Deprecated")).arg("since = \"9\"")),
        ],
    );
    let mut session = session(forest);
    session.complete_all().expect("complete all");
    let a = session.class_named("A").expect("A");
    let b = session.class_named("B").expect("B");
    assert!(session.symtab.flags(a).contains(Flags::DEPRECATED));
    assert!(!session.symtab.flags(b).contains(Flags::DEPRECATED));
}

#[test]
fn test_anonymous_class_of_interface() {
    let mut forest = SourceForest::new();
    let unit = forest.add_unit(CompilationUnit::new("A.java"));
    let outer = forest.add_class(unit, ClassDecl::class("A"));
    forest.add_member_class(outer, ClassDecl::interface("I"));
    let anon = forest.add_local_class(outer, ClassDecl::anonymous(TypeExpr::name("I")));

    let mut session = session(forest);
    let sym = session
        .enter_local_class(anon, None)
        .expect("enter")
        .expect("anonymous class");
    session.complete(sym).expect("complete");

    let i = session.class_named("A$I").expect("member interface");
    assert!(session.diagnostics().is_empty(), "{:?}", session.diagnostics());
    assert_eq!(supertype(&session, sym), object(&session));
    assert_eq!(interfaces(&session, sym), vec![Type::class(i)]);
}

#[test]
fn test_member_type_of_supertype_is_visible_in_clause() {
    let mut forest = SourceForest::new();
    let unit = forest.add_unit(CompilationUnit::new("A.java"));
    let base = forest.add_class(unit, ClassDecl::class("Base"));
    forest.add_member_class(base, ClassDecl::interface("Nested"));
    let a = forest.add_class(unit, ClassDecl::class("A").extends(TypeExpr::name("Base")));
    forest.add_member_class(a, ClassDecl::class("Inner").implements(TypeExpr::name("Nested")));

    let mut session = session(forest);
    session.complete_all().expect("complete all");
    let inner = session.class_named("A$Inner").expect("Inner");
    let nested = session.class_named("Base$Nested").expect("Nested");
    assert!(session.diagnostics().is_empty(), "{:?}", session.diagnostics());
    assert_eq!(interfaces(&session, inner), vec![Type::class(nested)]);
}
