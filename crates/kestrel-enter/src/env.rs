//! Lexical environments.
//!
//! Environments live in an arena owned by the session and are never mutated
//! after creation; a variant is derived by allocating a copy with one field
//! changed.

use kestrel_symbols::{ScopeId, SymbolId};
use kestrel_tree::{DeclId, UnitId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnvId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvKind {
    /// The compilation unit. Its scope holds the unit's top-level classes.
    TopLevel,
    /// The body of a class. Lookups also see the class's member types.
    Class,
    /// Extends/implements clauses and type-parameter bounds of a class. Sees
    /// the class's type parameters but not its members.
    Base,
    /// A method signature. Its scope holds the method's type parameters.
    Method,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Env {
    pub kind: EnvKind,
    pub scope: ScopeId,
    pub enclosing_class: Option<SymbolId>,
    pub unit: UnitId,
    pub outer: Option<EnvId>,
    pub decl: Option<DeclId>,
}

#[derive(Debug, Default)]
pub(crate) struct EnvArena {
    envs: Vec<Env>,
}

impl EnvArena {
    pub(crate) fn alloc(&mut self, env: Env) -> EnvId {
        let id = EnvId(self.envs.len() as u32);
        self.envs.push(env);
        id
    }

    pub(crate) fn get(&self, id: EnvId) -> Option<&Env> {
        self.envs.get(id.0 as usize)
    }

    /// Allocate a copy of `id` with `f` applied.
    pub(crate) fn dup(&mut self, id: EnvId, f: impl FnOnce(&mut Env)) -> Option<EnvId> {
        let mut env = *self.get(id)?;
        f(&mut env);
        Some(self.alloc(env))
    }
}
