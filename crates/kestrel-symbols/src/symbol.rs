//! Symbols and the arena that owns them.

use crate::flags::{Flags, KindFilter};
use crate::scope::ScopeId;
use crate::types::Type;
use kestrel_common::Atom;
use kestrel_tree::{DeclId, UnitId};
use serde::Serialize;

/// Index of a symbol in the [`SymbolArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub u32);

/// What advances an incomplete class symbol.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Completer {
    /// Source class: runs the phase engine.
    Source,
    /// Registered library class whose loading fails.
    Unreadable(String),
}

/// Last phase a class symbol has entered. Only ever moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CompletionState {
    Uncompleted,
    Imports,
    Hierarchy,
    Header,
    Members,
    Complete,
}

#[derive(Clone, Debug, Serialize)]
pub struct PackageData {
    pub fullname: Atom,
    pub members: ScopeId,
}

#[derive(Clone, Debug, Serialize)]
pub struct ClassData {
    pub fullname: Atom,
    /// Binary name: `Outer$Inner`, `Outer$1` for anonymous classes.
    pub flatname: Atom,
    pub members: ScopeId,
    pub completer: Option<Completer>,
    pub state: CompletionState,
    pub type_params: Vec<SymbolId>,
    /// `None` until the hierarchy phase runs; `Some(Type::None)` means the
    /// class has no supertype.
    pub supertype: Option<Type>,
    /// Resolved interfaces only.
    pub interfaces: Vec<Type>,
    /// Interfaces including placeholder error types.
    pub all_interfaces: Vec<Type>,
    /// Attributed annotation types of the header.
    pub annotations: Vec<SymbolId>,
    pub decl: Option<DeclId>,
    pub unit: Option<UnitId>,
}

impl ClassData {
    fn new(fullname: Atom, flatname: Atom, members: ScopeId) -> Self {
        Self {
            fullname,
            flatname,
            members,
            completer: None,
            state: CompletionState::Complete,
            type_params: Vec::new(),
            supertype: None,
            interfaces: Vec::new(),
            all_interfaces: Vec::new(),
            annotations: Vec::new(),
            decl: None,
            unit: None,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct MethodData {
    pub type_params: Vec<SymbolId>,
    /// Parameter variable symbols, in order.
    pub params: Vec<SymbolId>,
    pub param_types: Vec<Type>,
    /// `Type::None` for constructors.
    pub return_type: Type,
    pub thrown: Vec<Type>,
}

#[derive(Clone, Debug, Serialize)]
pub enum SymbolData {
    Package(PackageData),
    Class(Box<ClassData>),
    Method(Box<MethodData>),
    Var { ty: Type },
    TypeVar { bounds: Vec<Type> },
}

#[derive(Clone, Debug, Serialize)]
pub struct Symbol {
    pub name: Atom,
    pub owner: Option<SymbolId>,
    pub flags: Flags,
    pub data: SymbolData,
}

impl Symbol {
    #[must_use]
    pub fn is_class(&self) -> bool {
        matches!(self.data, SymbolData::Class(_))
    }

    #[must_use]
    pub fn is_package(&self) -> bool {
        matches!(self.data, SymbolData::Package(_))
    }

    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.flags.contains(Flags::INTERFACE)
    }

    #[must_use]
    pub fn class(&self) -> Option<&ClassData> {
        match &self.data {
            SymbolData::Class(data) => Some(data),
            _ => None,
        }
    }

    pub fn class_mut(&mut self) -> Option<&mut ClassData> {
        match &mut self.data {
            SymbolData::Class(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn method(&self) -> Option<&MethodData> {
        match &self.data {
            SymbolData::Method(data) => Some(data),
            _ => None,
        }
    }

    /// The kind bit a lookup filter must contain to return this symbol.
    #[must_use]
    pub fn kind(&self) -> KindFilter {
        match self.data {
            SymbolData::Package(_) => KindFilter::PACKAGE,
            SymbolData::Class(_) | SymbolData::TypeVar { .. } => KindFilter::TYPE,
            SymbolData::Method(_) => KindFilter::METHOD,
            SymbolData::Var { .. } => KindFilter::VARIABLE,
        }
    }

    /// Member scope of a class or package.
    #[must_use]
    pub fn members(&self) -> Option<ScopeId> {
        match &self.data {
            SymbolData::Package(data) => Some(data.members),
            SymbolData::Class(data) => Some(data.members),
            _ => None,
        }
    }
}

/// Arena of all symbols of a session.
#[derive(Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            symbols: Vec::with_capacity(capacity),
        }
    }

    pub fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    pub(crate) fn alloc_class(
        &mut self,
        name: Atom,
        owner: Option<SymbolId>,
        flags: Flags,
        fullname: Atom,
        flatname: Atom,
        members: ScopeId,
    ) -> SymbolId {
        self.alloc(Symbol {
            name,
            owner,
            flags,
            data: SymbolData::Class(Box::new(ClassData::new(fullname, flatname, members))),
        })
    }

    #[must_use]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.0 as usize)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
