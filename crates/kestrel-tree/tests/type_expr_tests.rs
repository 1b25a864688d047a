use super::*;

#[test]
fn test_name_builds_select_chain() {
    let ty = TypeExpr::name("java.util.List");
    match &ty {
        TypeExpr::Select { qualifier, name, .. } => {
            assert_eq!(name, "List");
            assert_eq!(qualifier.qualified_name().as_deref(), Some("java.util"));
        }
        other => panic!("expected a select, got {other:?}"),
    }
}

#[test]
fn test_strip_args_and_simple_name() {
    let ty = TypeExpr::apply(TypeExpr::name("p.Box"), vec![TypeExpr::name("String")]);
    assert_eq!(ty.strip_args().qualified_name().as_deref(), Some("p.Box"));
    assert_eq!(ty.simple_name(), Some("Box"));
    assert_eq!(TypeExpr::primitive(Primitive::Int).simple_name(), None);
}

#[test]
fn test_display() {
    let ty = TypeExpr::array(TypeExpr::apply(
        TypeExpr::name("Map"),
        vec![TypeExpr::name("K"), TypeExpr::name("V")],
    ));
    assert_eq!(ty.to_string(), "Map<K,V>[]");
    assert_eq!(TypeExpr::primitive(Primitive::Void).to_string(), "void");
}

#[test]
fn test_at_sets_outer_position() {
    let ty = TypeExpr::name("a.B").at(12);
    assert_eq!(ty.pos(), 12);
}
