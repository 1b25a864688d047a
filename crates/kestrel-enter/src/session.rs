//! The compilation session: every piece of state one compilation needs.

use crate::annotate::AnnotateQueue;
use crate::default_ctor::{AnonymousContext, DefaultConstructor};
use crate::dependencies::DependencyRecorder;
use crate::env::{Env, EnvArena, EnvId};
use crate::error::{EnterError, FatalError};
use crate::log::Log;
use crate::options::EnterOptions;
use crate::recursion::{CompletionGuard, CompletionMode};
use crate::scheduler::{Phase, PhaseQueues};
use crate::synthesizer::PlaceholderRegistry;
use kestrel_common::{Atom, Diagnostic, DiagnosticKind};
use kestrel_symbols::{NamedImportScope, ScopeId, StarImportScope, SymbolId, Symtab};
use kestrel_tree::{DeclId, SourceForest, UnitId};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tracing::debug;

/// Per-unit state: the top-level scope and the two import scopes.
#[derive(Debug)]
pub(crate) struct UnitState {
    pub(crate) env: EnvId,
    pub(crate) package: SymbolId,
    pub(crate) star_imports: StarImportScope,
    pub(crate) named_imports: NamedImportScope,
    pub(crate) imports_finished: bool,
}

/// Owns the symbol table and the declaration forest of one compilation.
///
/// Creating a session enters every class declaration of the forest; nothing
/// else happens until [`CompilationSession::complete`] is called.
#[derive(Debug)]
pub struct CompilationSession {
    pub symtab: Symtab,
    pub(crate) forest: Arc<SourceForest>,
    pub(crate) options: EnterOptions,
    pub(crate) log: Log,
    pub(crate) envs: EnvArena,
    pub(crate) units: Vec<UnitState>,
    pub(crate) decl_symbols: FxHashMap<DeclId, SymbolId>,
    pub(crate) class_envs: FxHashMap<SymbolId, EnvId>,
    pub(crate) queues: PhaseQueues,
    pub(crate) mode: CompletionMode,
    pub(crate) guard: CompletionGuard,
    pub(crate) todo: Vec<EnvId>,
    pub(crate) placeholders: PlaceholderRegistry,
    pub(crate) annotate: AnnotateQueue,
    pub(crate) dependencies: DependencyRecorder,
    pub(crate) default_ctors: FxHashMap<SymbolId, DefaultConstructor>,
    pub(crate) anonymous_contexts: FxHashMap<DeclId, AnonymousContext>,
    /// Inheritance edges removed to break a cycle, as (class, base).
    pub(crate) cut_edges: FxHashSet<(SymbolId, SymbolId)>,
    /// Missing `(owner, name)` pairs already reported, per unit.
    pub(crate) missing_names: FxHashSet<(UnitId, SymbolId, Atom)>,
    pub(crate) phase_trace: Vec<(SymbolId, Phase)>,
    pub(crate) package_annotations: FxHashMap<SymbolId, Vec<SymbolId>>,
    /// A fatal error raised where it could not be returned directly.
    pub(crate) deferred_fatal: Option<FatalError>,
}

impl CompilationSession {
    #[must_use]
    pub fn new(symtab: Symtab, forest: SourceForest, options: EnterOptions) -> Self {
        let dependencies = DependencyRecorder::new(options.track_dependencies);
        let mut session = Self {
            symtab,
            forest: Arc::new(forest),
            options,
            log: Log::new(),
            envs: EnvArena::default(),
            units: Vec::new(),
            decl_symbols: FxHashMap::default(),
            class_envs: FxHashMap::default(),
            queues: PhaseQueues::default(),
            mode: CompletionMode::Enabled,
            guard: CompletionGuard::new(),
            todo: Vec::new(),
            placeholders: PlaceholderRegistry::default(),
            annotate: AnnotateQueue::default(),
            dependencies,
            default_ctors: FxHashMap::default(),
            anonymous_contexts: FxHashMap::default(),
            cut_edges: FxHashSet::default(),
            missing_names: FxHashSet::default(),
            phase_trace: Vec::new(),
            package_annotations: FxHashMap::default(),
            deferred_fatal: None,
        };
        if let Err(err) = session.enter_trees() {
            session.deferred_fatal = Some(err.into());
        }
        debug!(
            units = session.units.len(),
            classes = session.decl_symbols.len(),
            "classes entered"
        );
        session
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn options(&self) -> &EnterOptions {
        &self.options
    }

    #[must_use]
    pub fn forest(&self) -> &SourceForest {
        &self.forest
    }

    #[must_use]
    pub fn log(&self) -> &Log {
        &self.log
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.log.diagnostics()
    }

    /// The class symbol entered for a declaration.
    #[must_use]
    pub fn symbol_for(&self, decl: DeclId) -> Option<SymbolId> {
        self.decl_symbols.get(&decl).copied()
    }

    /// Class by fully qualified (top-level) or flat (`p.Outer$Inner`) name.
    #[must_use]
    pub fn class_named(&self, name: &str) -> Option<SymbolId> {
        self.symtab.lookup_class(name)
    }

    /// The environment of a class body.
    #[must_use]
    pub fn class_env(&self, class: SymbolId) -> Option<EnvId> {
        self.class_envs.get(&class).copied()
    }

    /// The top-level environment of a compilation unit.
    #[must_use]
    pub fn unit_env(&self, unit: UnitId) -> Option<EnvId> {
        self.units.get(unit.0 as usize).map(|u| u.env)
    }

    #[must_use]
    pub fn env(&self, id: EnvId) -> Option<&Env> {
        self.envs.get(id)
    }

    /// Scope of a class body environment, holding `this`, `super` and the
    /// class's type parameters.
    #[must_use]
    pub fn env_scope(&self, class: SymbolId) -> Option<ScopeId> {
        self.class_env(class)
            .and_then(|env| self.envs.get(env))
            .map(|env| env.scope)
    }

    #[must_use]
    pub fn star_imports(&self, unit: UnitId) -> Option<&StarImportScope> {
        self.units.get(unit.0 as usize).map(|u| &u.star_imports)
    }

    #[must_use]
    pub fn named_imports(&self, unit: UnitId) -> Option<&NamedImportScope> {
        self.units.get(unit.0 as usize).map(|u| &u.named_imports)
    }

    /// Every phase body run so far, in execution order.
    #[must_use]
    pub fn phase_trace(&self) -> &[(SymbolId, Phase)] {
        &self.phase_trace
    }

    /// Phases run for one class, in execution order.
    #[must_use]
    pub fn phases_of(&self, class: SymbolId) -> Vec<Phase> {
        self.phase_trace
            .iter()
            .filter(|(sym, _)| *sym == class)
            .map(|(_, phase)| *phase)
            .collect()
    }

    /// Environments of top-level classes whose imports phase has run.
    #[must_use]
    pub fn todo(&self) -> &[EnvId] {
        &self.todo
    }

    #[must_use]
    pub fn default_constructor(&self, class: SymbolId) -> Option<&DefaultConstructor> {
        self.default_ctors.get(&class)
    }

    #[must_use]
    pub fn dependencies(&self) -> &DependencyRecorder {
        &self.dependencies
    }

    /// Whether `class` is being completed somewhere up the stack.
    #[must_use]
    pub fn is_completing(&self, class: SymbolId) -> bool {
        self.guard.is_active(class)
    }

    /// Placeholder classes synthesized so far.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.placeholders.len()
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    pub(crate) fn decl_of(&self, class: SymbolId) -> Option<DeclId> {
        self.symtab.class(class).and_then(|c| c.decl)
    }

    pub(crate) fn report(&mut self, unit: UnitId, pos: u32, kind: DiagnosticKind, args: Vec<String>) {
        let file = self
            .forest
            .get_unit(unit)
            .map_or("", |u| u.file.as_str());
        self.log.report(file, pos, kind, args);
    }

    pub(crate) fn report_at_env(&mut self, env: EnvId, pos: u32, kind: DiagnosticKind, args: Vec<String>) {
        match self.envs.get(env).map(|e| e.unit) {
            Some(unit) => self.report(unit, pos, kind, args),
            None => {
                self.log.report("", pos, kind, args);
            }
        }
    }

    /// Report an error that reached a point where it cannot be returned.
    /// Completion failures become diagnostics; fatal errors are kept for the
    /// next public entry point to return.
    pub(crate) fn report_enter_error(&mut self, env: EnvId, pos: u32, err: EnterError) {
        match err {
            EnterError::Failure(failure) => self.report_at_env(
                env,
                pos,
                DiagnosticKind::CannotAccess,
                vec![failure.class, failure.reason],
            ),
            EnterError::Fatal(fatal) => {
                self.deferred_fatal.get_or_insert(fatal);
            }
        }
    }

    pub(crate) fn take_deferred_fatal(&mut self) -> Result<(), FatalError> {
        match self.deferred_fatal.take() {
            Some(fatal) => Err(fatal),
            None => Ok(()),
        }
    }
}
