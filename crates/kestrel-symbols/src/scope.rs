//! Scopes and the import scopes of a compilation unit.
//!
//! A [`Scope`] maps names to symbols in declaration order. Scopes form chains
//! through `next` (an environment's scope falls through to its parent). Once
//! frozen, a scope rejects writes with [`ScopeError::Frozen`].
//!
//! Scopes only store ids; whether two entries conflict depends on the
//! symbols, so conflict checks live on [`crate::Symtab::declare`].

use crate::symbol::SymbolId;
use indexmap::IndexMap;
use kestrel_common::Atom;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;

/// Index of a scope in the [`ScopeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct ScopeId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    /// A write reached a scope after it was frozen. This is a bug in the
    /// caller, not a user error.
    #[error("write to frozen scope {0:?}")]
    Frozen(ScopeId),
    #[error("{name} conflicts with an existing declaration")]
    DuplicateDeclaration { name: String, existing: SymbolId },
}

/// Symbols with the same name, in declaration order.
pub type Bucket = SmallVec<[SymbolId; 2]>;

#[derive(Clone, Debug, Default)]
pub struct Scope {
    pub owner: Option<SymbolId>,
    /// Enclosing scope searched by recursive lookups.
    pub next: Option<ScopeId>,
    table: IndexMap<Atom, Bucket, FxBuildHasher>,
    order: Vec<SymbolId>,
    frozen: bool,
}

impl Scope {
    #[must_use]
    pub fn new(owner: Option<SymbolId>, next: Option<ScopeId>) -> Self {
        Self {
            owner,
            next,
            ..Self::default()
        }
    }

    /// Entries named `name` in this scope only.
    #[must_use]
    pub fn get(&self, name: Atom) -> &[SymbolId] {
        self.table.get(&name).map_or(&[], |bucket| bucket.as_slice())
    }

    /// All symbols in declaration order.
    #[must_use]
    pub fn symbols(&self) -> &[SymbolId] {
        &self.order
    }

    /// Distinct names in first-declaration order.
    pub fn names(&self) -> impl Iterator<Item = Atom> + '_ {
        self.table.keys().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub(crate) fn insert(&mut self, id: ScopeId, name: Atom, sym: SymbolId) -> Result<(), ScopeError> {
        if self.frozen {
            return Err(ScopeError::Frozen(id));
        }
        self.table.entry(name).or_default().push(sym);
        self.order.push(sym);
        Ok(())
    }

    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
    }
}

/// Arena of all scopes of a session.
#[derive(Debug, Default)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            scopes: Vec::with_capacity(capacity),
        }
    }

    pub fn alloc(&mut self, scope: Scope) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(scope);
        id
    }

    #[must_use]
    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        self.scopes.get_mut(id.0 as usize)
    }
}

// =============================================================================
// Import scopes
// =============================================================================

/// Which members of an on-demand import's origin are visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImportFilter {
    /// `import p.*` / `import p.T.*`: member types only.
    TypesOnly,
    /// `import static p.T.*`: static members accessible from
    /// `importing_package` that are declared in or inherited by the origin.
    StaticMembers { importing_package: SymbolId },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StarImport {
    /// Package or class whose members are imported.
    pub origin: SymbolId,
    pub filter: ImportFilter,
    pub pos: u32,
}

/// The on-demand import scope of a compilation unit.
///
/// Filled once per unit; lookups consult its entries in order. The prelude
/// entry, when present, comes first.
#[derive(Clone, Debug, Default)]
pub struct StarImportScope {
    entries: Vec<StarImport>,
    frozen: bool,
}

impl StarImportScope {
    pub fn push(&mut self, entry: StarImport) -> Result<(), ScopeError> {
        if self.frozen {
            return Err(ScopeError::Frozen(ScopeId(u32::MAX)));
        }
        self.entries.push(entry);
        Ok(())
    }

    #[must_use]
    pub fn entries(&self) -> &[StarImport] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

/// One single-name import.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamedImport {
    /// `import p.T`: the class, resolved eagerly.
    Type { sym: SymbolId, pos: u32 },
    /// `import static p.T.m`: every static member named `m` of `origin`,
    /// looked up on demand.
    Static {
        origin: SymbolId,
        importing_package: SymbolId,
        pos: u32,
    },
}

impl NamedImport {
    #[must_use]
    pub fn pos(&self) -> u32 {
        match self {
            NamedImport::Type { pos, .. } | NamedImport::Static { pos, .. } => *pos,
        }
    }
}

/// The single-name import scope of a compilation unit.
#[derive(Clone, Debug, Default)]
pub struct NamedImportScope {
    table: IndexMap<Atom, SmallVec<[NamedImport; 1]>, FxBuildHasher>,
    frozen: bool,
}

impl NamedImportScope {
    pub fn insert(&mut self, name: Atom, entry: NamedImport) -> Result<(), ScopeError> {
        if self.frozen {
            return Err(ScopeError::Frozen(ScopeId(u32::MAX)));
        }
        let bucket = self.table.entry(name).or_default();
        if !bucket.contains(&entry) {
            bucket.push(entry);
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: Atom) -> &[NamedImport] {
        self.table.get(&name).map_or(&[], |bucket| bucket.as_slice())
    }

    /// All entries, grouped by name in first-import order.
    pub fn iter(&self) -> impl Iterator<Item = (Atom, &NamedImport)> {
        self.table
            .iter()
            .flat_map(|(name, bucket)| bucket.iter().map(move |e| (*name, e)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}
