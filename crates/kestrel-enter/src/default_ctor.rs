//! Default constructors.
//!
//! A class without a declared constructor gets one synthesized here. Named
//! classes get `()` chaining to `super()`. An anonymous class created with an
//! [`AnonymousContext`] copies the signature of the superclass constructor
//! the creation expression resolved to, with an outer-instance parameter in
//! front when the creation was qualified (`outer.new Inner() { .. }`).
//!
//! The declaration tree is never touched: the constructor symbol goes into
//! the member scope, the super call into [`DefaultConstructor`].

use crate::error::EnterResult;
use crate::session::CompilationSession;
use kestrel_symbols::{Flags, MethodData, SymbolData, SymbolId, Type};
use kestrel_tree::MethodDecl;
use serde::Serialize;
use tracing::trace;

/// What attribution of an anonymous class creation found out about it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnonymousContext {
    /// The superclass constructor the creation resolved to; `None` when it
    /// did not resolve.
    pub super_ctor: Option<SymbolId>,
    /// Type of the explicit outer instance of a qualified creation.
    pub enclosing: Option<Type>,
}

/// `super(..)` or `x0.super(..)` at the start of a synthesized constructor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SuperCall {
    /// Name of the parameter holding the outer instance.
    pub qualifier: Option<String>,
    /// Parameter names passed through, in order.
    pub args: Vec<String>,
    pub type_args: Vec<Type>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DefaultConstructor {
    pub sym: SymbolId,
    /// `None` for `java.lang.Object`.
    pub super_call: Option<SuperCall>,
}

/// Signature a synthesized constructor is built from.
struct CtorShape {
    flags: Flags,
    type_params: Vec<SymbolId>,
    params: Vec<(String, Flags, Type)>,
    thrown: Vec<Type>,
    based: bool,
}

impl CompilationSession {
    /// Synthesize the constructor of `class`, which declares none.
    pub(crate) fn add_default_constructor(&mut self, class: SymbolId) -> EnterResult<()> {
        let context = self
            .decl_of(class)
            .and_then(|decl| self.anonymous_contexts.get(&decl))
            .cloned();
        let anonymous = self.symtab.flags(class).contains(Flags::ANONYMOUS);
        let shape = match context {
            Some(context) if anonymous => match self.anonymous_shape(&context) {
                Some(shape) => shape,
                None => {
                    trace!(class = class.0, "super constructor unresolved, no default constructor");
                    return Ok(());
                }
            },
            _ => CtorShape {
                flags: Flags::empty(),
                type_params: Vec::new(),
                params: Vec::new(),
                thrown: Vec::new(),
                based: false,
            },
        };

        let flags = self.constructor_flags(class, anonymous) | shape.flags;
        let ctor = self.symtab.new_method(
            class,
            MethodDecl::CONSTRUCTOR_NAME,
            flags,
            MethodData {
                type_params: shape.type_params.clone(),
                param_types: shape.params.iter().map(|(_, _, ty)| ty.clone()).collect(),
                return_type: Type::None,
                thrown: shape.thrown,
                ..MethodData::default()
            },
        );
        let params: Vec<SymbolId> = shape
            .params
            .iter()
            .map(|(name, flags, ty)| self.symtab.new_var(ctor, name, *flags, ty.clone()))
            .collect();
        let names: Vec<String> = shape.params.iter().map(|(name, _, _)| name.clone()).collect();
        if let Some(SymbolData::Method(data)) = self.symtab.symbol_mut(ctor).map(|s| &mut s.data) {
            data.params = params;
        }
        if let Some(members) = self.symtab.members_of(class) {
            self.symtab.enter(members, ctor)?;
        }

        let has_super = self
            .supertype_of(class)
            .is_some_and(|ty| !ty.is_none());
        let super_call = has_super.then(|| {
            let (qualifier, args) = if shape.based {
                (names.first().cloned(), names.iter().skip(1).cloned().collect())
            } else {
                (None, names)
            };
            SuperCall {
                qualifier,
                args,
                type_args: shape.type_params.iter().map(|&tv| Type::TypeVar(tv)).collect(),
            }
        });
        trace!(class = self.symtab.full_name(class), ?flags, "default constructor added");
        self.default_ctors.insert(
            class,
            DefaultConstructor {
                sym: ctor,
                super_call,
            },
        );
        Ok(())
    }

    /// Signature copied from the resolved superclass constructor.
    fn anonymous_shape(&self, context: &AnonymousContext) -> Option<CtorShape> {
        let base = self.symtab.symbol(context.super_ctor?)?;
        let data = base.method()?;
        let mut params = Vec::with_capacity(data.param_types.len() + 1);
        if let Some(enclosing) = &context.enclosing {
            params.push(("x0".to_string(), Flags::empty(), enclosing.clone()));
        }
        for (i, ty) in data.param_types.iter().enumerate() {
            let index = params.len();
            let (name, flags) = match data.params.get(i).and_then(|&p| self.symtab.symbol(p)) {
                Some(param) if !param.name.is_none() => {
                    (self.symtab.interner.resolve(param.name).to_string(), param.flags)
                }
                _ => (format!("x{index}"), Flags::empty()),
            };
            params.push((name, flags, ty.clone()));
        }
        Some(CtorShape {
            flags: base.flags & Flags::VARARGS,
            type_params: data.type_params.clone(),
            params,
            thrown: data.thrown.clone(),
            based: context.enclosing.is_some(),
        })
    }

    /// Access of a true enum's constructor is always private; otherwise the
    /// constructor takes the access of its class.
    fn constructor_flags(&self, class: SymbolId, anonymous: bool) -> Flags {
        let class_flags = self.symtab.flags(class);
        let true_enum = self.symtab.well_known.enum_.is_some()
            && self.supertype_of(class).and_then(|ty| ty.class_sym()) == self.symtab.well_known.enum_;
        let mut flags = if true_enum {
            Flags::PRIVATE | Flags::GENERATED_CONSTRUCTOR
        } else {
            class_flags.access() | Flags::GENERATED_CONSTRUCTOR
        };
        if anonymous {
            flags |= Flags::ANONYMOUS_CONSTRUCTOR;
        }
        flags
    }
}
