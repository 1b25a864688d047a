use super::*;

#[test]
fn test_unnamed_package_exists() {
    let symtab = Symtab::new();
    let unnamed = symtab.unnamed_package();
    assert!(symtab.package_exists(unnamed));
    assert_eq!(symtab.full_name(unnamed), "");
    assert!(symtab.well_known.object.is_none());
}

#[test]
fn test_prelude_classes() {
    let symtab = Symtab::with_prelude();
    let object = symtab.well_known.object.expect("Object");
    assert_eq!(symtab.full_name(object), "java.lang.Object");
    assert_eq!(symtab.class(object).and_then(|c| c.supertype.clone()), Some(Type::None));
    assert_eq!(symtab.lookup_class("java.lang.Object"), Some(object));
    assert!(symtab.is_package("java.lang"));
    assert!(symtab.is_package("java"));

    let enum_ = symtab.well_known.enum_.expect("Enum");
    let params = &symtab.class(enum_).expect("class").type_params;
    assert_eq!(params.len(), 1);
    assert_eq!(symtab.erasure(&Type::TypeVar(params[0])), Type::class(enum_));

    let deprecated = symtab.well_known.deprecated.expect("Deprecated");
    assert!(symtab.flags(deprecated).contains(Flags::ANNOTATION));
}

#[test]
fn test_enter_package_creates_enclosing_packages() {
    let mut symtab = Symtab::new();
    let q = symtab.enter_package("p.q");
    let p = symtab.lookup_package("p").expect("enclosing package");
    assert_eq!(symtab.owner(q), Some(p));
    assert_eq!(symtab.enter_package("p.q"), q);
    // Neither has a class yet.
    assert!(!symtab.is_package("p.q"));

    symtab.new_class(q, "A", Flags::PUBLIC);
    assert!(symtab.is_package("p.q"));
    assert!(symtab.is_package("p"));
}

#[test]
fn test_class_names() {
    let mut symtab = Symtab::new();
    let pkg = symtab.enter_package("p");
    let outer = symtab.new_class(pkg, "Outer", Flags::PUBLIC);
    let inner = symtab.new_class(outer, "Inner", Flags::STATIC);
    let anon1 = symtab.new_class(inner, "", Flags::ANONYMOUS);
    let anon2 = symtab.new_class(outer, "", Flags::ANONYMOUS);

    assert_eq!(symtab.full_name(inner), "p.Outer.Inner");
    assert_eq!(symtab.lookup_class("p.Outer$Inner"), Some(inner));
    assert_eq!(symtab.full_name(anon1), "p.Outer$1");
    assert_eq!(symtab.full_name(anon2), "p.Outer$2");
    assert_eq!(symtab.outermost_class(anon1), outer);
    assert_eq!(symtab.package_of(anon1), pkg);
}

#[test]
fn test_error_class_is_complete_and_frozen() {
    let mut symtab = Symtab::with_prelude();
    let unnamed = symtab.unnamed_package();
    let missing = symtab.new_error_class(unnamed, "Missing", Flags::empty());
    let flags = symtab.flags(missing);
    assert!(flags.contains(Flags::PLACEHOLDER | Flags::SYNTHETIC));
    let data = symtab.class(missing).expect("class");
    assert!(data.completer.is_none());
    assert_eq!(data.supertype, Some(symtab.object_type()));
    let members = symtab.scope(data.members).expect("scope");
    assert!(members.is_frozen());
    // Placeholders are not registered by name.
    assert_eq!(symtab.lookup_class("Missing"), None);
}

#[test]
fn test_unreadable_class_carries_completer() {
    let mut symtab = Symtab::with_prelude();
    let broken = symtab.enter_unreadable_class("lib.Broken", "bad class file");
    let data = symtab.class(broken).expect("class");
    assert_eq!(
        data.completer,
        Some(Completer::Unreadable("bad class file".to_string()))
    );
    assert_eq!(data.state, CompletionState::Uncompleted);
}

#[test]
fn test_is_subclass_walks_computed_edges() {
    let mut symtab = Symtab::with_prelude();
    let pkg = symtab.enter_package("p");
    let base = symtab.enter_binary_class("p.Base", Flags::PUBLIC);
    let iface = symtab.enter_binary_class("p.I", Flags::PUBLIC | Flags::INTERFACE);
    let derived = symtab.new_class(pkg, "Derived", Flags::PUBLIC);
    symtab.set_binary_supertype(derived, Type::class(base));
    symtab.add_binary_interface(derived, Type::class(iface));

    assert!(symtab.is_subclass(derived, base));
    assert!(symtab.is_subclass(derived, iface));
    assert!(!symtab.is_subclass(base, derived));
}

#[test]
fn test_type_to_string() {
    let symtab = Symtab::with_prelude();
    let enum_ = symtab.well_known.enum_.expect("Enum");
    let string = symtab.well_known.string.expect("String");
    let ty = Type::Array(Box::new(Type::Class {
        sym: enum_,
        args: vec![Type::class(string)],
    }));
    assert_eq!(symtab.type_to_string(&ty), "java.lang.Enum<java.lang.String>[]");
}
