//! Records which completion triggered which.

use kestrel_symbols::SymbolId;
use rustc_hash::FxHashSet;
use serde::Serialize;

/// Why a class was being completed when it pulled in another one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CompletionCause {
    MemberEnter,
    Imports,
    Hierarchy,
    Header,
    Members,
}

/// `from` was being processed for `cause` when `to` started completing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct DependencyEdge {
    pub from: SymbolId,
    pub to: SymbolId,
    pub cause: CompletionCause,
}

/// Stack of in-flight completions plus the deduplicated edges seen so far.
/// Disabled recorders ignore every call.
#[derive(Debug, Default)]
pub struct DependencyRecorder {
    enabled: bool,
    stack: Vec<(SymbolId, CompletionCause)>,
    edges: Vec<DependencyEdge>,
    seen: FxHashSet<DependencyEdge>,
}

impl DependencyRecorder {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn push(&mut self, sym: SymbolId, cause: CompletionCause) {
        if !self.enabled {
            return;
        }
        if let Some(&(from, from_cause)) = self.stack.last()
            && from != sym
        {
            let edge = DependencyEdge {
                from,
                to: sym,
                cause: from_cause,
            };
            if self.seen.insert(edge) {
                self.edges.push(edge);
            }
        }
        self.stack.push((sym, cause));
    }

    /// Enter a phase body of `sym`. A body may run in a batch forwarded by
    /// another class's completion, after `sym` itself was triggered, so it
    /// only changes the current cause and records no edge.
    pub fn push_phase(&mut self, sym: SymbolId, cause: CompletionCause) {
        if self.enabled {
            self.stack.push((sym, cause));
        }
    }

    pub fn pop(&mut self) {
        if self.enabled {
            self.stack.pop();
        }
    }

    /// Edges in first-seen order.
    #[must_use]
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// Classes whose completion was triggered by `sym`.
    pub fn dependencies_of(&self, sym: SymbolId) -> impl Iterator<Item = SymbolId> + '_ {
        self.edges.iter().filter(move |e| e.from == sym).map(|e| e.to)
    }
}
