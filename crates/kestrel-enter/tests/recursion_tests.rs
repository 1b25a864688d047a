use crate::test_utils::*;
use crate::{CompletionGuard, CompletionMode, GuardResult};
use kestrel_symbols::SymbolId;
use kestrel_tree::{ClassDecl, TypeExpr};

#[test]
fn test_guard_enter_and_leave() {
    let mut guard = CompletionGuard::new();
    assert!(guard.is_outermost());

    assert_eq!(guard.enter(SymbolId(1)), GuardResult::Entered);
    assert!(guard.is_active(SymbolId(1)));
    assert_eq!(guard.depth(), 1);
    assert!(!guard.is_outermost());

    assert!(guard.enter(SymbolId(2)).is_entered());
    assert_eq!(guard.depth(), 2);

    guard.leave(SymbolId(2));
    guard.leave(SymbolId(1));
    assert!(guard.is_outermost());
    assert!(!guard.is_active(SymbolId(1)));
    assert_eq!(guard.max_depth_seen(), 2);
}

#[test]
fn test_guard_reports_reentry_as_cycle() {
    let mut guard = CompletionGuard::new();
    guard.enter(SymbolId(7));
    assert_eq!(guard.enter(SymbolId(7)), GuardResult::Cycle);
    // A refused entry does not count towards the depth.
    assert_eq!(guard.depth(), 1);
    guard.leave(SymbolId(7));
    assert!(guard.enter(SymbolId(7)).is_entered());
}

#[test]
fn test_suppression_restores_previous_mode() {
    let mut session = session(single_unit("A.java", vec![ClassDecl::class("A")]));
    assert_eq!(session.completion_mode(), CompletionMode::Enabled);

    let nested = session.with_completion_suppressed(|s| {
        let inner = s.with_completion_suppressed(|s| s.completion_mode());
        (inner, s.completion_mode())
    });
    assert_eq!(nested, (CompletionMode::Suppressed, CompletionMode::Suppressed));
    assert_eq!(session.completion_mode(), CompletionMode::Enabled);
}

#[test]
fn test_suppression_is_restored_when_closure_unwinds() {
    let mut session = session(single_unit("A.java", vec![ClassDecl::class("A")]));

    let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        session.with_completion_suppressed(|s| {
            if s.completion_mode() == CompletionMode::Suppressed {
                panic!("attribution failed");
            }
        });
    }));
    assert!(unwound.is_err());
    assert_eq!(session.completion_mode(), CompletionMode::Enabled);
}

#[test]
fn test_guard_is_released_after_completion() {
    let forest = single_unit(
        "A.java",
        vec![
            ClassDecl::class("A").extends(TypeExpr::name("B")),
            ClassDecl::class("B").extends(TypeExpr::name("A")),
        ],
    );
    let mut session = session(forest);
    let a = complete_named(&mut session, "A");
    let b = session.class_named("B").expect("B");
    assert!(!session.is_completing(a));
    assert!(!session.is_completing(b));
}
