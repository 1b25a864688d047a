use super::*;

#[test]
fn test_intern_same_string_returns_same_atom() {
    let mut interner = Interner::new();
    let a = interner.intern("Widget");
    let b = interner.intern("Widget");
    assert_eq!(a, b);
    assert_eq!(interner.resolve(a), "Widget");
}

#[test]
fn test_none_atom_is_empty_string() {
    let interner = Interner::new();
    assert!(Atom::NONE.is_none());
    assert_eq!(interner.resolve(Atom::NONE), "");
    assert_eq!(interner.get(""), Some(Atom::NONE));
}

#[test]
fn test_common_strings_are_pre_interned() {
    let interner = Interner::new();
    assert!(interner.get("Object").is_some());
    assert!(interner.get("<init>").is_some());
    assert!(interner.get("valueOf").is_some());
    assert!(!interner.is_empty());
}

#[test]
fn test_get_does_not_intern() {
    let mut interner = Interner::new();
    let before = interner.len();
    assert_eq!(interner.get("NotYetSeen"), None);
    assert_eq!(interner.len(), before);
    interner.intern("NotYetSeen");
    assert_eq!(interner.len(), before + 1);
}

#[test]
fn test_qualify_joins_with_dot() {
    let mut interner = Interner::new();
    let java = interner.intern("java");
    let lang = interner.intern("lang");
    let java_lang = interner.qualify(java, lang);
    assert_eq!(interner.resolve(java_lang), "java.lang");

    // Unnamed prefix leaves the simple name unchanged.
    let top = interner.qualify(Atom::NONE, lang);
    assert_eq!(top, lang);
}

#[test]
fn test_resolve_out_of_bounds_is_empty() {
    let interner = Interner::new();
    assert_eq!(interner.resolve(Atom(u32::MAX)), "");
}
