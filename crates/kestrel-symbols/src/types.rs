//! Types attached to symbols.

use crate::symbol::SymbolId;
use kestrel_tree::Primitive;
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Type {
    /// No type: the supertype of `java.lang.Object`, the return type of a
    /// constructor.
    #[default]
    None,
    Class { sym: SymbolId, args: Vec<Type> },
    TypeVar(SymbolId),
    Array(Box<Type>),
    Primitive(Primitive),
    /// A type whose class is a synthesized placeholder. Carries whatever
    /// arguments could be attributed.
    Error { sym: SymbolId, args: Vec<Type> },
}

impl Type {
    #[must_use]
    pub fn class(sym: SymbolId) -> Type {
        Type::Class {
            sym,
            args: Vec::new(),
        }
    }

    /// The class symbol of a class or error type.
    #[must_use]
    pub fn class_sym(&self) -> Option<SymbolId> {
        match self {
            Type::Class { sym, .. } | Type::Error { sym, .. } => Some(*sym),
            _ => None,
        }
    }

    #[must_use]
    pub fn args(&self) -> &[Type] {
        match self {
            Type::Class { args, .. } | Type::Error { args, .. } => args,
            _ => &[],
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error { .. })
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Type::None)
    }

    /// The same type with class type arguments dropped. Type variables are
    /// left alone; see [`crate::Symtab::erasure`] for full erasure.
    #[must_use]
    pub fn strip_args(&self) -> Type {
        match self {
            Type::Class { sym, .. } => Type::class(*sym),
            Type::Error { sym, .. } => Type::Error {
                sym: *sym,
                args: Vec::new(),
            },
            Type::Array(elem) => Type::Array(Box::new(elem.strip_args())),
            other => other.clone(),
        }
    }
}
