//! The completion scheduler.
//!
//! `complete` detaches a class's completer and pushes the class through the
//! phase chain. Each phase keeps a queue. A phase run that finds its queue
//! empty is the *first* run: after running its body for the incoming classes
//! it hands the whole queue (including classes appended by nested runs) to
//! the next phase. A nested run only appends and returns nothing, so a class
//! discovered halfway through another class's completion catches up with it
//! phase by phase instead of racing ahead.

use crate::dependencies::CompletionCause;
use crate::env::EnvId;
use crate::error::{CompletionFailure, EnterError, EnterResult, FatalError};
use crate::recursion::GuardResult;
use crate::session::CompilationSession;
use kestrel_common::DiagnosticKind;
use kestrel_common::limits::{COMPLETION_STACK_GROW_SIZE, COMPLETION_STACK_RED_ZONE};
use kestrel_symbols::{Completer, CompletionState, Flags, SymbolId, Type};
use kestrel_tree::UnitId;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, debug_span, trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Phase {
    Imports,
    Hierarchy,
    Header,
    Members,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Imports, Phase::Hierarchy, Phase::Header, Phase::Members];

    #[must_use]
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Imports => Some(Phase::Hierarchy),
            Phase::Hierarchy => Some(Phase::Header),
            Phase::Header => Some(Phase::Members),
            Phase::Members => None,
        }
    }

    /// State a class is in while this phase's body runs for it.
    #[must_use]
    pub fn state(self) -> CompletionState {
        match self {
            Phase::Imports => CompletionState::Imports,
            Phase::Hierarchy => CompletionState::Hierarchy,
            Phase::Header => CompletionState::Header,
            Phase::Members => CompletionState::Members,
        }
    }

    #[must_use]
    pub fn cause(self) -> CompletionCause {
        match self {
            Phase::Imports => CompletionCause::Imports,
            Phase::Hierarchy => CompletionCause::Hierarchy,
            Phase::Header => CompletionCause::Header,
            Phase::Members => CompletionCause::Members,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

pub(crate) type PhaseItem = (SymbolId, EnvId);

/// One append-only queue per phase.
#[derive(Debug, Default)]
pub(crate) struct PhaseQueues {
    queues: [Vec<PhaseItem>; 4],
}

impl PhaseQueues {
    fn is_empty(&self, phase: Phase) -> bool {
        self.queues[phase.index()].is_empty()
    }

    fn push(&mut self, phase: Phase, item: PhaseItem) {
        self.queues[phase.index()].push(item);
    }

    fn take(&mut self, phase: Phase) -> Vec<PhaseItem> {
        std::mem::take(&mut self.queues[phase.index()])
    }
}

impl CompilationSession {
    /// Complete `class`: afterwards its supertype, interfaces, type
    /// parameters and members are available, unless the class is already
    /// being completed further up the stack.
    ///
    /// Completing a class twice is a no-op. Failures to load other classes
    /// are reported as diagnostics; only a fatal error is returned.
    pub fn complete(&mut self, class: SymbolId) -> Result<SymbolId, FatalError> {
        self.take_deferred_fatal()?;
        match self.complete_class(class) {
            Ok(()) => {}
            Err(EnterError::Fatal(fatal)) => return Err(fatal),
            Err(EnterError::Failure(failure)) => self.report_failure_at_decl(class, &failure),
        }
        self.flush_annotations();
        self.take_deferred_fatal()?;
        Ok(class)
    }

    /// Complete every source class, in declaration order, then check the
    /// imports of units that contributed no class.
    pub fn complete_all(&mut self) -> Result<(), FatalError> {
        let forest = Arc::clone(&self.forest);
        for (_, unit) in forest.units() {
            for &decl in &unit.classes {
                self.complete_decl_tree(decl)?;
            }
        }
        self.ensure_imports_checked()
    }

    fn complete_decl_tree(&mut self, decl: kestrel_tree::DeclId) -> Result<(), FatalError> {
        if let Some(sym) = self.symbol_for(decl) {
            self.complete(sym)?;
        }
        let forest = Arc::clone(&self.forest);
        if let Some(class) = forest.get_decl(decl) {
            for nested in class.nested_classes() {
                self.complete_decl_tree(nested)?;
            }
        }
        Ok(())
    }

    /// Resolve and finish the imports of every unit whose imports were never
    /// resolved, such as units declaring only a package.
    pub fn ensure_imports_checked(&mut self) -> Result<(), FatalError> {
        for index in 0..self.units.len() {
            let unit = UnitId(index as u32);
            if self.units[index].star_imports.is_empty() {
                match self.resolve_imports(unit) {
                    Ok(()) => {}
                    Err(EnterError::Fatal(fatal)) => return Err(fatal),
                    Err(err) => {
                        let env = self.units[index].env;
                        self.report_enter_error(env, 0, err);
                    }
                }
                self.finish_imports(unit)?;
            }
        }
        self.flush_annotations();
        self.take_deferred_fatal()
    }

    /// Internal completion entry point. Completion failures propagate to the
    /// caller, which decides where to report them.
    pub(crate) fn complete_class(&mut self, class: SymbolId) -> EnterResult<()> {
        stacker::maybe_grow(COMPLETION_STACK_RED_ZONE, COMPLETION_STACK_GROW_SIZE, || {
            self.complete_class_inner(class)
        })
    }

    fn complete_class_inner(&mut self, class: SymbolId) -> EnterResult<()> {
        let Some(data) = self.symtab.class_mut(class) else {
            return Ok(());
        };
        let Some(completer) = data.completer.take() else {
            return Ok(());
        };
        if self.mode == crate::CompletionMode::Suppressed {
            trace!(class = class.0, "completion suppressed, completer re-armed");
            data.completer = Some(completer);
            return Ok(());
        }
        match completer {
            Completer::Unreadable(reason) => Err(self.fail_unreadable(class, reason).into()),
            Completer::Source => self.complete_source(class),
        }
    }

    fn fail_unreadable(&mut self, class: SymbolId, reason: String) -> CompletionFailure {
        debug!(class = self.symtab.full_name(class), %reason, "class cannot be loaded");
        let object = self.symtab.object_type();
        self.symtab.add_flags(class, Flags::ERRONEOUS);
        let members = self.symtab.members_of(class);
        if let Some(data) = self.symtab.class_mut(class) {
            data.state = CompletionState::Complete;
            if data.supertype.is_none() {
                data.supertype = Some(object);
            }
        }
        if let Some(members) = members {
            self.symtab.finalize_scope(members);
        }
        CompletionFailure {
            sym: class,
            class: self.symtab.full_name(class).to_string(),
            reason,
        }
    }

    fn complete_source(&mut self, class: SymbolId) -> EnterResult<()> {
        let Some(env) = self.class_env(class) else {
            return Ok(());
        };
        let _span = debug_span!("complete", class = self.symtab.full_name(class)).entered();
        self.symtab.add_flags(class, Flags::UNATTRIBUTED);
        // The completer was detached above, so the class cannot already be
        // on the guard stack.
        if let GuardResult::Cycle = self.guard.enter(class) {
            trace!(class = class.0, "class already being completed");
            return Ok(());
        }
        self.annotate.enter_start();
        self.dependencies.push(class, CompletionCause::MemberEnter);

        let result = self.run_phase(Phase::Imports, vec![(class, env)]);

        self.dependencies.pop();
        self.guard.leave(class);
        let finished = result.and_then(|batch| self.finish_batch_imports(&batch));
        self.annotate.enter_done();
        if self.guard.is_outermost() {
            self.flush_annotations();
        }
        finished.map_err(EnterError::from)
    }

    /// Run the import finish step for every unit owning a top-level class of
    /// a completed batch.
    fn finish_batch_imports(&mut self, batch: &[PhaseItem]) -> Result<(), FatalError> {
        let mut seen = FxHashSet::default();
        for &(class, _) in batch {
            let top_level = self
                .symtab
                .owner(class)
                .is_some_and(|owner| !self.symtab.is_class(owner));
            if !top_level {
                continue;
            }
            if let Some(unit) = self.symtab.class(class).and_then(|c| c.unit)
                && seen.insert(unit)
            {
                self.finish_imports(unit)?;
            }
        }
        Ok(())
    }

    fn run_phase(&mut self, phase: Phase, items: Vec<PhaseItem>) -> Result<Vec<PhaseItem>, FatalError> {
        let first = self.queues.is_empty(phase);
        for (class, env) in items {
            self.queues.push(phase, (class, env));
            if let Err(fatal) = self.run_body(phase, class, env) {
                if first {
                    self.queues.take(phase);
                }
                return Err(fatal);
            }
        }
        if !first {
            return Ok(Vec::new());
        }
        let batch = self.queues.take(phase);
        match phase.next() {
            Some(next) => self.run_phase(next, batch),
            None => {
                for &(class, _) in &batch {
                    if !self.symtab.flags(class).contains(Flags::ERRONEOUS) {
                        self.advance_state(class, CompletionState::Complete);
                    }
                }
                Ok(batch)
            }
        }
    }

    /// Run one phase body. An erroneous class stays in the batch so the
    /// batch still forwards, but no later body runs for it.
    fn run_body(&mut self, phase: Phase, class: SymbolId, env: EnvId) -> Result<(), FatalError> {
        if self.symtab.flags(class).contains(Flags::ERRONEOUS) {
            trace!(class = class.0, ?phase, "erroneous class, phase skipped");
            return Ok(());
        }
        let _span = debug_span!("phase", ?phase, class = self.symtab.full_name(class)).entered();
        self.advance_state(class, phase.state());
        self.phase_trace.push((class, phase));
        self.dependencies.push_phase(class, phase.cause());
        let result = match phase {
            Phase::Imports => self.imports_phase(class, env),
            Phase::Hierarchy => self.hierarchy_phase(class, env),
            Phase::Header => self.header_phase(class, env),
            Phase::Members => self.members_phase(class, env),
        };
        self.dependencies.pop();
        match result {
            Ok(()) => Ok(()),
            Err(EnterError::Fatal(fatal)) => Err(fatal),
            Err(EnterError::Failure(failure)) => {
                self.report_failure_at_decl(class, &failure);
                self.symtab.add_flags(class, Flags::ERRONEOUS);
                let object = self.symtab.object_type();
                if let Some(data) = self.symtab.class_mut(class)
                    && data.supertype.is_none()
                {
                    data.supertype = Some(object);
                }
                if let Some(members) = self.symtab.members_of(class) {
                    self.symtab.finalize_scope(members);
                }
                Ok(())
            }
        }
    }

    fn advance_state(&mut self, class: SymbolId, state: CompletionState) {
        if let Some(data) = self.symtab.class_mut(class)
            && data.state < state
        {
            data.state = state;
        }
    }

    fn report_failure_at_decl(&mut self, class: SymbolId, failure: &CompletionFailure) {
        let forest = Arc::clone(&self.forest);
        let unit = self.symtab.class(class).and_then(|c| c.unit);
        let pos = self
            .decl_of(class)
            .and_then(|d| forest.get_decl(d))
            .map_or(0, |d| d.pos);
        let args = vec![failure.class.clone(), failure.reason.clone()];
        match unit {
            Some(unit) => self.report(unit, pos, DiagnosticKind::CannotAccess, args),
            None => {
                self.log.report("", pos, DiagnosticKind::CannotAccess, args);
            }
        }
    }

    fn imports_phase(&mut self, class: SymbolId, env: EnvId) -> EnterResult<()> {
        let Some(owner) = self.symtab.owner(class) else {
            return Ok(());
        };
        if self.symtab.is_class(owner) {
            return self.complete_class(owner);
        }
        if let Some(unit) = self.symtab.class(class).and_then(|c| c.unit) {
            self.resolve_imports(unit)?;
        }
        self.todo.push(env);
        Ok(())
    }

    /// Supertype of `class` for default-constructor and `super` decisions.
    pub(crate) fn supertype_of(&self, class: SymbolId) -> Option<Type> {
        self.symtab.class(class).and_then(|c| c.supertype.clone())
    }
}
