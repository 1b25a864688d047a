use super::*;

fn two_class_unit() -> (SourceForest, UnitId, DeclId, DeclId) {
    let mut forest = SourceForest::new();
    let unit = forest.add_unit(
        CompilationUnit::new("src/p/A.java")
            .package("p")
            .import(ImportDecl::on_demand("q")),
    );
    let a = forest.add_class(unit, ClassDecl::class("A").extends(TypeExpr::name("B")));
    let b = forest.add_class(unit, ClassDecl::class("B"));
    (forest, unit, a, b)
}

#[test]
fn test_top_level_classes_are_listed_in_order() {
    let (forest, unit, a, b) = two_class_unit();
    assert_eq!(forest.unit(unit).classes, vec![a, b]);
    assert_eq!(forest.unit_of(a), unit);
    assert_eq!(forest.outer_of(a), None);
    assert_eq!(forest.decl_count(), 2);
}

#[test]
fn test_member_class_records_outer() {
    let (mut forest, unit, a, _) = two_class_unit();
    let inner = forest.add_member_class(a, ClassDecl::interface("I"));
    assert_eq!(forest.outer_of(inner), Some(a));
    assert_eq!(forest.unit_of(inner), unit);
    let nested: Vec<DeclId> = forest.decl(a).nested_classes().collect();
    assert_eq!(nested, vec![inner]);
}

#[test]
fn test_local_class_is_not_a_member() {
    let (mut forest, _, a, _) = two_class_unit();
    let local = forest.add_local_class(a, ClassDecl::anonymous(TypeExpr::name("B")));
    assert_eq!(forest.outer_of(local), Some(a));
    assert!(forest.decl(local).is_anonymous());
    assert_eq!(forest.decl(a).nested_classes().count(), 0);
}

#[test]
fn test_constant_body_is_nested() {
    let mut forest = SourceForest::new();
    let unit = forest.add_unit(CompilationUnit::new("Color.java"));
    let color = forest.add_class(unit, ClassDecl::enumeration("Color").enum_constant("RED"));
    let body = forest.add_constant_with_body(color, "GREEN", ClassDecl::class(""));
    let nested: Vec<DeclId> = forest.decl(color).nested_classes().collect();
    assert_eq!(nested, vec![body]);
}

#[test]
fn test_positions_are_numbered_and_distinct() {
    let (forest, unit, a, b) = two_class_unit();
    let import_pos = forest.unit(unit).imports[0].pos;
    let a_pos = forest.decl(a).pos;
    let extends_pos = forest.decl(a).extends.as_ref().map(TypeExpr::pos);
    let b_pos = forest.decl(b).pos;
    assert_ne!(import_pos, 0);
    assert_ne!(a_pos, 0);
    assert_ne!(Some(a_pos), extends_pos);
    assert_ne!(a_pos, b_pos);
}

#[test]
fn test_explicit_positions_are_kept() {
    let mut forest = SourceForest::new();
    let unit = forest.add_unit(CompilationUnit::new("A.java"));
    let a = forest.add_class(unit, ClassDecl::class("A").at(400));
    assert_eq!(forest.decl(a).pos, 400);
}

#[test]
fn test_unit_helpers() {
    let unit = CompilationUnit::new("src/p/Widget.java").package("p.q");
    assert_eq!(unit.file_stem(), "Widget");
    assert_eq!(unit.package_name(), "p.q");
    assert_eq!(CompilationUnit::new("Top.java").package_name(), "");
}

#[test]
fn test_import_split_last() {
    assert_eq!(ImportDecl::static_single("p.T.m").split_last(), ("p.T", "m"));
    assert_eq!(ImportDecl::single("T").split_last(), ("", "T"));
}

#[test]
fn test_constructors_filter() {
    let decl = ClassDecl::class("A")
        .method(MethodDecl::new("m"))
        .method(MethodDecl::constructor().param("x", TypeExpr::primitive(Primitive::Int)));
    let ctors: Vec<&MethodDecl> = decl.constructors().collect();
    assert_eq!(ctors.len(), 1);
    assert!(ctors[0].return_type.is_none());
}
