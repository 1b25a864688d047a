use super::*;
use kestrel_common::Atom;
use kestrel_tree::Primitive;

fn int() -> Type {
    Type::Primitive(Primitive::Int)
}

fn method(symtab: &mut Symtab, owner: SymbolId, name: &str, params: Vec<Type>) -> SymbolId {
    symtab.new_method(
        owner,
        name,
        Flags::PUBLIC,
        MethodData {
            param_types: params,
            ..MethodData::default()
        },
    )
}

#[test]
fn test_declare_rejects_duplicate_field() {
    let mut symtab = Symtab::with_prelude();
    let pkg = symtab.enter_package("p");
    let class = symtab.new_class(pkg, "A", Flags::PUBLIC);
    let scope = symtab.members_of(class).expect("class has members");

    let x1 = symtab.new_var(class, "x", Flags::empty(), int());
    let x2 = symtab.new_var(class, "x", Flags::empty(), int());
    assert!(symtab.declare(scope, x1).is_ok());
    let err = symtab.declare(scope, x2).unwrap_err();
    assert_eq!(
        err,
        ScopeError::DuplicateDeclaration {
            name: "x".to_string(),
            existing: x1
        }
    );
}

#[test]
fn test_declare_allows_overloads_and_mixed_kinds() {
    let mut symtab = Symtab::with_prelude();
    let pkg = symtab.enter_package("p");
    let class = symtab.new_class(pkg, "A", Flags::PUBLIC);
    let scope = symtab.members_of(class).expect("class has members");

    let m0 = method(&mut symtab, class, "m", Vec::new());
    let m1 = method(&mut symtab, class, "m", vec![int()]);
    let field = symtab.new_var(class, "m", Flags::empty(), int());
    assert!(symtab.declare(scope, m0).is_ok());
    assert!(symtab.declare(scope, m1).is_ok());
    assert!(symtab.declare(scope, field).is_ok());

    let again = method(&mut symtab, class, "m", vec![int()]);
    assert!(symtab.declare(scope, again).is_err());
}

#[test]
fn test_method_conflict_uses_erasure() {
    let mut symtab = Symtab::with_prelude();
    let pkg = symtab.enter_package("p");
    let class = symtab.new_class(pkg, "A", Flags::PUBLIC);
    let scope = symtab.members_of(class).expect("class has members");
    let string = symtab.well_known.string.expect("prelude");
    let enum_ = symtab.well_known.enum_.expect("prelude");

    let raw = method(&mut symtab, class, "m", vec![Type::class(enum_)]);
    let generic = method(
        &mut symtab,
        class,
        "m",
        vec![Type::Class {
            sym: enum_,
            args: vec![Type::class(string)],
        }],
    );
    assert!(symtab.declare(scope, raw).is_ok());
    assert!(symtab.declare(scope, generic).is_err());
}

#[test]
fn test_frozen_scope_rejects_writes() {
    let mut symtab = Symtab::with_prelude();
    let pkg = symtab.enter_package("p");
    let class = symtab.new_class(pkg, "A", Flags::PUBLIC);
    let scope = symtab.members_of(class).expect("class has members");
    symtab.finalize_scope(scope);

    let x = symtab.new_var(class, "x", Flags::empty(), int());
    assert_eq!(symtab.enter(scope, x), Err(ScopeError::Frozen(scope)));
    assert!(symtab.scope(scope).is_some_and(Scope::is_frozen));
}

#[test]
fn test_lookup_recursive_falls_through() {
    let mut symtab = Symtab::with_prelude();
    let pkg = symtab.enter_package("p");
    let class = symtab.new_class(pkg, "A", Flags::PUBLIC);
    let outer = symtab.new_scope(Some(class));
    let inner = symtab.dup_scope(outer, Some(class));

    let x = symtab.new_var(class, "x", Flags::empty(), int());
    symtab.enter(outer, x).expect("outer scope is open");
    let name = symtab.interner.intern("x");

    assert!(symtab.lookup(inner, name, KindFilter::ALL, false).is_empty());
    assert_eq!(
        symtab.lookup(inner, name, KindFilter::ALL, true).as_slice(),
        &[x]
    );
    assert!(symtab.lookup(inner, name, KindFilter::TYPE, true).is_empty());
}

#[test]
fn test_shadowing_across_scopes_is_allowed() {
    let mut symtab = Symtab::with_prelude();
    let pkg = symtab.enter_package("p");
    let class = symtab.new_class(pkg, "A", Flags::PUBLIC);
    let outer = symtab.new_scope(Some(class));
    let inner = symtab.dup_scope(outer, Some(class));

    let x1 = symtab.new_var(class, "x", Flags::empty(), int());
    let x2 = symtab.new_var(class, "x", Flags::empty(), int());
    symtab.declare(outer, x1).expect("first declaration");
    symtab.declare(inner, x2).expect("shadowing is not a conflict");

    let name = symtab.interner.intern("x");
    assert_eq!(
        symtab.lookup(inner, name, KindFilter::VARIABLE, true).as_slice(),
        &[x2, x1]
    );
}

#[test]
fn test_star_import_scope_freezes() {
    let mut star = StarImportScope::default();
    assert!(star.is_empty());
    let entry = StarImport {
        origin: SymbolId(1),
        filter: ImportFilter::TypesOnly,
        pos: 3,
    };
    star.push(entry).expect("open scope");
    star.freeze();
    assert!(star.push(entry).is_err());
    assert_eq!(star.entries().len(), 1);
}

#[test]
fn test_named_import_scope_ignores_exact_duplicates() {
    let mut named = NamedImportScope::default();
    let name = Atom(7);
    let entry = NamedImport::Type {
        sym: SymbolId(3),
        pos: 10,
    };
    named.insert(name, entry).expect("open scope");
    named.insert(name, entry).expect("open scope");
    assert_eq!(named.get(name).len(), 1);
    named.freeze();
    assert!(named.insert(Atom(8), entry).is_err());
}
