//! Completion mode and the guard over nested completions.
//!
//! Two pieces of state decide what `complete` does when it is reached
//! recursively:
//!
//! - [`CompletionMode`]: while suppressed, completion re-arms the symbol and
//!   returns. Named imports are attributed this way so that reading an import
//!   never pulls in the imported class's hierarchy.
//! - [`CompletionGuard`]: the set of classes currently being completed and the
//!   nesting depth. Depth zero after a completion means the outermost one has
//!   returned.

use kestrel_common::limits::MAX_COMPLETION_DEPTH;
use kestrel_symbols::SymbolId;
use rustc_hash::FxHashSet;
use tracing::warn;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompletionMode {
    #[default]
    Enabled,
    Suppressed,
}

/// Result of entering a completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardResult {
    Entered,
    /// The class is already being completed further up the stack.
    Cycle,
}

impl GuardResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }
}

#[derive(Debug, Default)]
pub struct CompletionGuard {
    active: FxHashSet<SymbolId>,
    depth: u32,
    max_depth_seen: u32,
    warned: bool,
}

impl CompletionGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the completion of `sym`. On [`GuardResult::Entered`] the caller
    /// must call [`leave`](Self::leave) with the same symbol.
    pub fn enter(&mut self, sym: SymbolId) -> GuardResult {
        if self.active.contains(&sym) {
            return GuardResult::Cycle;
        }
        self.active.insert(sym);
        self.depth += 1;
        self.max_depth_seen = self.max_depth_seen.max(self.depth);
        if self.depth > MAX_COMPLETION_DEPTH && !self.warned {
            self.warned = true;
            warn!(depth = self.depth, "completion nesting is unusually deep");
        }
        GuardResult::Entered
    }

    pub fn leave(&mut self, sym: SymbolId) {
        let was_present = self.active.remove(&sym);
        debug_assert!(
            was_present,
            "CompletionGuard::leave() called for a symbol that is not being completed"
        );
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self, sym: SymbolId) -> bool {
        self.active.contains(&sym)
    }

    #[inline]
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Deepest nesting reached so far.
    #[inline]
    #[must_use]
    pub fn max_depth_seen(&self) -> u32 {
        self.max_depth_seen
    }

    #[inline]
    #[must_use]
    pub fn is_outermost(&self) -> bool {
        self.depth == 0
    }
}

impl crate::CompilationSession {
    #[must_use]
    pub fn completion_mode(&self) -> CompletionMode {
        self.mode
    }

    /// Run `f` with completion suppressed, restoring the previous mode after,
    /// also when `f` unwinds.
    pub fn with_completion_suppressed<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let mut scope = SuppressedScope::enter(self);
        f(&mut *scope)
    }
}

/// Holds the session in suppressed mode; dropping it restores the mode it
/// replaced.
struct SuppressedScope<'a> {
    session: &'a mut crate::CompilationSession,
    previous: CompletionMode,
}

impl<'a> SuppressedScope<'a> {
    fn enter(session: &'a mut crate::CompilationSession) -> Self {
        let previous = std::mem::replace(&mut session.mode, CompletionMode::Suppressed);
        Self { session, previous }
    }
}

impl std::ops::Deref for SuppressedScope<'_> {
    type Target = crate::CompilationSession;

    fn deref(&self) -> &Self::Target {
        self.session
    }
}

impl std::ops::DerefMut for SuppressedScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session
    }
}

impl Drop for SuppressedScope<'_> {
    fn drop(&mut self) {
        self.session.mode = self.previous;
    }
}
