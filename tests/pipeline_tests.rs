//! End-to-end completion through the public API: library classes, several
//! compilation units and the diagnostics they produce.

use kestrel::tree::{FieldDecl, ImportDecl, MethodDecl, Modifiers, TypeExpr};
use kestrel::{
    ClassDecl, CompilationSession, CompilationUnit, DiagnosticKind, EnterOptions, Flags, Phase, SourceForest,
    Symtab, Type,
};

fn library() -> Symtab {
    let mut symtab = Symtab::with_prelude();
    let list = symtab.enter_binary_class("util.List", Flags::PUBLIC | Flags::INTERFACE | Flags::ABSTRACT);
    symtab.add_binary_type_param(list, "E");
    symtab.enter_binary_class("util.Base", Flags::PUBLIC);
    symtab
}

/// Two packages that refer to each other, one broken reference and one cycle.
fn program() -> SourceForest {
    let mut forest = SourceForest::new();

    let model = forest.add_unit(
        CompilationUnit::new("app/model/Shape.java")
            .package("app.model")
            .import(ImportDecl::on_demand("util")),
    );
    forest.add_class(
        model,
        ClassDecl::class("Shape")
            .modifiers(Modifiers::PUBLIC | Modifiers::ABSTRACT)
            .extends(TypeExpr::name("Base"))
            .implements(TypeExpr::apply(TypeExpr::name("List"), vec![TypeExpr::name("Shape")]))
            .method(MethodDecl::new("area").modifiers(Modifiers::ABSTRACT)),
    );

    let app = forest.add_unit(
        CompilationUnit::new("app/Main.java")
            .package("app")
            .import(ImportDecl::single("app.model.Shape")),
    );
    forest.add_class(
        app,
        ClassDecl::class("Main")
            .modifiers(Modifiers::PUBLIC)
            .extends(TypeExpr::name("Shape"))
            .field(FieldDecl::new("origin", TypeExpr::name("Point"))),
    );
    forest.add_class(app, ClassDecl::class("Loop").extends(TypeExpr::name("Loop")));
    forest
}

#[test]
fn completes_a_small_program() {
    kestrel::tracing_config::init_tracing();
    let mut session = CompilationSession::new(library(), program(), EnterOptions::default());
    session.complete_all().expect("no fatal errors");

    let kinds: Vec<DiagnosticKind> = session.diagnostics().iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![DiagnosticKind::CannotFindSymbol, DiagnosticKind::CyclicInheritance],
        "{:?}",
        session.diagnostics()
    );

    for name in ["app.model.Shape", "app.Main", "app.Loop"] {
        let class = session.class_named(name).expect("entered");
        assert_eq!(session.phases_of(class), Phase::ALL.to_vec(), "{name}");
    }

    let shape = session.class_named("app.model.Shape").expect("Shape");
    let main = session.class_named("app.Main").expect("Main");
    let list = session.class_named("util.List").expect("List");
    let data = session.symtab.class(main).expect("Main data");
    assert_eq!(data.supertype, Some(Type::class(shape)));
    let shape_data = session.symtab.class(shape).expect("Shape data");
    assert_eq!(
        shape_data.interfaces,
        vec![Type::Class {
            sym: list,
            args: vec![Type::class(shape)],
        }]
    );

    // Main.java holds Loop, which is not public and not named after the file.
    let looped = session.class_named("app.Loop").expect("Loop");
    assert!(session.symtab.flags(looped).contains(Flags::AUXILIARY));
}

#[test]
fn diagnostics_serialize_to_json() {
    let mut session = CompilationSession::new(library(), program(), EnterOptions::default());
    session.complete_all().expect("no fatal errors");

    let json = serde_json::to_value(session.diagnostics()).expect("serializable");
    let entries = json.as_array().expect("array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["file"], "app/Main.java");
    assert_eq!(entries[0]["args"][0], "Point");
    assert_eq!(entries[1]["args"][0], "app.Loop");
}

#[test]
fn options_from_a_config_file_reach_the_session() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("kestrel.json");
    std::fs::write(&path, r#"{ "enterOptions": { "trackDependencies": "on" } }"#).expect("write config");
    let options = kestrel::config::load_enter_options(&path).expect("options");

    let mut session = CompilationSession::new(library(), program(), options);
    let main = session.class_named("app.Main").expect("Main");
    session.complete(main).expect("no fatal errors");
    let shape = session.class_named("app.model.Shape").expect("Shape");
    assert!(session.dependencies().dependencies_of(main).any(|dep| dep == shape));
}
