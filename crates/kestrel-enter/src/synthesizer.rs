//! Placeholder classes for unresolved base types.
//!
//! When an `extends`/`implements` clause (or a type in a signature) does not
//! resolve, its expression is walked and every missing name becomes a
//! placeholder class: complete, empty, flagged `PLACEHOLDER | SYNTHETIC` and
//! registered by `(owner, name)`. Later references to the same name find the
//! registered placeholder; the miss is reported once per compilation unit.

use crate::env::EnvId;
use crate::error::EnterResult;
use crate::resolve::Qualifier;
use crate::session::CompilationSession;
use kestrel_common::Atom;
use kestrel_symbols::{Flags, SymbolId, Type};
use kestrel_tree::TypeExpr;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Name of the placeholder standing in for types that cannot be modelled by
/// name, such as an array in an `extends` clause.
const ANY_PLACEHOLDER: &str = "<any>";

#[derive(Debug, Default)]
pub(crate) struct PlaceholderRegistry {
    by_name: FxHashMap<(SymbolId, Atom), SymbolId>,
}

impl PlaceholderRegistry {
    pub(crate) fn get(&self, owner: SymbolId, name: Atom) -> Option<SymbolId> {
        self.by_name.get(&(owner, name)).copied()
    }

    fn insert(&mut self, owner: SymbolId, name: Atom, sym: SymbolId) {
        self.by_name.insert((owner, name), sym);
    }

    pub(crate) fn len(&self) -> usize {
        self.by_name.len()
    }
}

impl CompilationSession {
    /// Model an unresolved type expression with placeholder classes. The
    /// outermost placeholder is an interface when `interface_expected`.
    pub(crate) fn model_missing_type(
        &mut self,
        env: EnvId,
        expr: &TypeExpr,
        interface_expected: bool,
    ) -> EnterResult<Type> {
        self.model(env, expr, interface_expected)
    }

    fn model(
        &mut self,
        env: EnvId,
        expr: &TypeExpr,
        interface_expected: bool,
    ) -> EnterResult<Type> {
        match expr {
            TypeExpr::Ident { name, .. } => {
                if let Some(ty) = self.attrib_type(env, expr, false)? {
                    return Ok(ty);
                }
                let owner = self.symtab.unnamed_package();
                Ok(self.synthesize_class(env, owner, name, interface_expected))
            }
            TypeExpr::Select { qualifier, name, .. } => {
                if let Some(ty) = self.attrib_type(env, expr, false)? {
                    return Ok(ty);
                }
                // Qualifiers are never interfaces.
                let owner = match self.resolve_qualifier(env, qualifier, false)? {
                    Some(Qualifier::Package(pkg)) => pkg,
                    Some(Qualifier::Class(class)) => class,
                    None => match self.model(env, qualifier, false)?.class_sym() {
                        Some(sym) => sym,
                        None => return Ok(self.any_placeholder(env)),
                    },
                };
                Ok(self.synthesize_class(env, owner, name, interface_expected))
            }
            TypeExpr::Apply { base, args, .. } => {
                let base = self.model(env, base, interface_expected)?;
                let Some(sym) = base.class_sym() else {
                    return Ok(base);
                };
                self.synthesize_type_params(sym, args.len());
                let mut arg_types = Vec::with_capacity(args.len());
                for arg in args {
                    arg_types.push(self.model(env, arg, false)?);
                }
                Ok(if base.is_error() {
                    Type::Error {
                        sym,
                        args: arg_types,
                    }
                } else {
                    Type::Class {
                        sym,
                        args: arg_types,
                    }
                })
            }
            TypeExpr::Array { .. } | TypeExpr::Primitive { .. } => {
                match self.attrib_type(env, expr, false)? {
                    Some(ty) => Ok(ty),
                    None => Ok(self.any_placeholder(env)),
                }
            }
        }
    }

    /// The placeholder for `owner.name`, created on first use. The name
    /// counts as already reported for the unit of `env`.
    fn synthesize_class(
        &mut self,
        env: EnvId,
        owner: SymbolId,
        name: &str,
        interface: bool,
    ) -> Type {
        let atom = self.symtab.interner.intern(name);
        self.first_miss_in_unit(env, owner, atom);
        let sym = match self.placeholders.get(owner, atom) {
            Some(sym) => sym,
            None => {
                let flags = if interface {
                    Flags::INTERFACE | Flags::ABSTRACT
                } else {
                    Flags::empty()
                };
                let sym = self.symtab.new_error_class(owner, name, flags);
                self.placeholders.insert(owner, atom, sym);
                debug!(placeholder = self.symtab.full_name(sym), interface, "synthesized missing class");
                sym
            }
        };
        Type::Error {
            sym,
            args: Vec::new(),
        }
    }

    /// `T` for a single parameter, `T1..Tn` otherwise. A placeholder keeps
    /// the parameters of the first parameterized use; real classes are left
    /// alone.
    pub(crate) fn synthesize_type_params(&mut self, class: SymbolId, count: usize) {
        let has_params = self.symtab.class(class).is_some_and(|c| !c.type_params.is_empty());
        if has_params || count == 0 || !self.symtab.flags(class).contains(Flags::PLACEHOLDER) {
            return;
        }
        for i in 1..=count {
            let name = if count == 1 {
                "T".to_string()
            } else {
                format!("T{i}")
            };
            let tv = self.symtab.new_type_var(class, &name);
            if let Some(data) = self.symtab.class_mut(class) {
                data.type_params.push(tv);
            }
        }
    }

    fn any_placeholder(&mut self, env: EnvId) -> Type {
        let owner = self.symtab.unnamed_package();
        self.synthesize_class(env, owner, ANY_PLACEHOLDER, false)
    }
}
