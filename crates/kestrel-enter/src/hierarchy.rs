//! Supertype and interface attribution.
//!
//! The hierarchy phase attributes base clauses with their type arguments
//! stripped, checks them, and breaks inheritance cycles. The header phase
//! calls back into [`CompilationSession::attrib_super_types`] to attribute
//! the same clauses in full.

use crate::env::{EnvId, EnvKind};
use crate::error::{EnterError, EnterResult};
use crate::session::CompilationSession;
use kestrel_common::DiagnosticKind;
use kestrel_common::limits::MAX_HIERARCHY_WALK;
use kestrel_symbols::{Flags, SymbolId, Type};
use kestrel_tree::{ClassDecl, TypeExpr};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, trace};

/// Which pass is attributing base clauses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BasePass {
    /// Generic classes only; clause checks run.
    Hierarchy,
    /// Full types, arguments included.
    Header,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BaseRole {
    Extends,
    Implements,
    /// The instantiated type of an anonymous class: a class or an interface.
    AnonymousBase,
}

/// One attributed interface clause.
#[derive(Clone, Debug)]
pub(crate) struct BaseClause {
    pub(crate) pos: u32,
    pub(crate) ty: Type,
}

#[derive(Clone, Debug)]
pub(crate) struct SuperTypes {
    pub(crate) supertype: Type,
    /// Interface clauses in source order, placeholder types included.
    pub(crate) interfaces: Vec<BaseClause>,
}

impl CompilationSession {
    /// Environment for base clauses and bounds: sees the type parameters
    /// of the class, not its members.
    pub(crate) fn base_env(&mut self, class_env: EnvId) -> EnvId {
        self.envs
            .dup(class_env, |env| env.kind = EnvKind::Base)
            .unwrap_or(class_env)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(class = class.0))]
    pub(crate) fn hierarchy_phase(&mut self, class: SymbolId, env: EnvId) -> EnterResult<()> {
        let forest = Arc::clone(&self.forest);
        let Some(decl) = self.decl_of(class).and_then(|d| forest.get_decl(d)) else {
            return Ok(());
        };
        let base_env = self.base_env(env);
        let bases = self.attrib_super_types(class, decl, base_env, BasePass::Hierarchy)?;
        self.install_super_types(class, bases);
        self.mark_deprecated(class, decl, base_env)?;
        self.break_cycles(class, base_env, decl.pos);
        Ok(())
    }

    pub(crate) fn attrib_super_types(
        &mut self,
        class: SymbolId,
        decl: &ClassDecl,
        env: EnvId,
        pass: BasePass,
    ) -> EnterResult<SuperTypes> {
        let flags = self.symtab.flags(class);
        let object = self.symtab.object_type();
        let mut interfaces = Vec::new();

        if self.symtab.well_known.object == Some(class) {
            if pass == BasePass::Hierarchy && (decl.extends.is_some() || !decl.implements.is_empty()) {
                let name = self.symtab.full_name(class).to_string();
                self.report_at_env(env, decl.pos, DiagnosticKind::ObjectCannotExtend, vec![name]);
            }
            return Ok(SuperTypes {
                supertype: Type::None,
                interfaces,
            });
        }

        let supertype = if flags.contains(Flags::ANONYMOUS | Flags::ENUM) {
            // Enum constant body.
            self.symtab.owner(class).map_or(object.clone(), Type::class)
        } else if flags.contains(Flags::INTERFACE) {
            object.clone()
        } else if let Some(extends) = &decl.extends {
            let role = if flags.contains(Flags::ANONYMOUS) {
                BaseRole::AnonymousBase
            } else {
                BaseRole::Extends
            };
            match self.attrib_base(env, extends, role, pass)? {
                Some(ty) if role == BaseRole::AnonymousBase && self.is_interface_type(&ty) => {
                    interfaces.push(BaseClause {
                        pos: extends.pos(),
                        ty,
                    });
                    object.clone()
                }
                Some(ty) => ty,
                None => object.clone(),
            }
        } else if flags.contains(Flags::ENUM) {
            self.enum_supertype(class)
        } else {
            object.clone()
        };

        if flags.contains(Flags::ANNOTATION) {
            if let Some(annotation) = self.symtab.well_known.annotation {
                interfaces.push(BaseClause {
                    pos: decl.pos,
                    ty: Type::class(annotation),
                });
            }
        } else {
            let extends_of_interface = decl.extends.iter().filter(|_| flags.contains(Flags::INTERFACE));
            for expr in extends_of_interface.chain(&decl.implements) {
                if let Some(ty) = self.attrib_base(env, expr, BaseRole::Implements, pass)? {
                    interfaces.push(BaseClause { pos: expr.pos(), ty });
                }
            }
        }

        let supertype = match supertype.class_sym() {
            Some(sym) if self.cut_edges.contains(&(class, sym)) => object,
            _ => supertype,
        };
        interfaces.retain(|clause| {
            clause
                .ty
                .class_sym()
                .is_none_or(|sym| !self.cut_edges.contains(&(class, sym)))
        });
        Ok(SuperTypes {
            supertype,
            interfaces,
        })
    }

    /// Attribute one base clause. Unresolved names become placeholders;
    /// types that cannot be inherited from are dropped.
    fn attrib_base(
        &mut self,
        env: EnvId,
        expr: &TypeExpr,
        role: BaseRole,
        pass: BasePass,
    ) -> EnterResult<Option<Type>> {
        let expr = match pass {
            BasePass::Hierarchy => expr.strip_args(),
            BasePass::Header => expr,
        };
        let ty = match self.attrib_type(env, expr, true)? {
            Some(ty) => ty,
            None => self.model_missing_type(env, expr, role == BaseRole::Implements)?,
        };
        let sym = match &ty {
            Type::Class { sym, .. } => *sym,
            Type::Error { .. } => return Ok(Some(ty)),
            other => {
                trace!(ty = ?other, "base clause is not a class type");
                return Ok(None);
            }
        };
        if pass == BasePass::Header {
            return Ok(Some(ty));
        }

        if let Err(err) = self.complete_class(sym) {
            if matches!(err, EnterError::Fatal(_)) {
                return Err(err);
            }
            self.report_enter_error(env, expr.pos(), err);
        }
        let target = self.symtab.flags(sym);
        let is_interface = target.contains(Flags::INTERFACE);
        match role {
            BaseRole::Extends if is_interface => {
                self.report_at_env(env, expr.pos(), DiagnosticKind::NoInterfaceExpectedHere, Vec::new());
            }
            BaseRole::Implements if !is_interface => {
                self.report_at_env(env, expr.pos(), DiagnosticKind::InterfaceExpectedHere, Vec::new());
            }
            _ => {}
        }
        if role != BaseRole::Implements && !is_interface && target.contains(Flags::FINAL) {
            let name = self.symtab.full_name(sym).to_string();
            self.report_at_env(env, expr.pos(), DiagnosticKind::CannotInheritFromFinal, vec![name]);
        }
        Ok(Some(ty))
    }

    fn is_interface_type(&self, ty: &Type) -> bool {
        ty.class_sym().is_some_and(|sym| self.symtab.is_interface(sym))
    }

    /// `java.lang.Enum<Self>`.
    fn enum_supertype(&self, class: SymbolId) -> Type {
        match self.symtab.well_known.enum_ {
            Some(enum_) => Type::Class {
                sym: enum_,
                args: vec![self.symtab.class_type(class)],
            },
            None => self.symtab.object_type(),
        }
    }

    pub(crate) fn install_super_types(&mut self, class: SymbolId, bases: SuperTypes) {
        let all: Vec<Type> = bases.interfaces.into_iter().map(|clause| clause.ty).collect();
        let resolved = all.iter().filter(|ty| !ty.is_error()).cloned().collect();
        if let Some(data) = self.symtab.class_mut(class) {
            data.supertype = Some(bases.supertype);
            data.interfaces = resolved;
            data.all_interfaces = all;
        }
    }

    /// `@Deprecated` without arguments marks the class deprecated.
    fn mark_deprecated(&mut self, class: SymbolId, decl: &ClassDecl, env: EnvId) -> EnterResult<()> {
        let Some(deprecated) = self.symtab.well_known.deprecated else {
            return Ok(());
        };
        for annotation in decl.annotations.iter().filter(|a| a.args.is_empty()) {
            let ty = self.attrib_type(env, &annotation.ty, false)?;
            if ty.and_then(|t| t.class_sym()) == Some(deprecated) {
                self.symtab.add_flags(class, Flags::DEPRECATED);
                break;
            }
        }
        Ok(())
    }

    /// Cut every edge of `class` that leads back to it and report the cycle
    /// once.
    fn break_cycles(&mut self, class: SymbolId, env: EnvId, pos: u32) {
        let mut cut = false;
        for base in self.direct_supertypes(class) {
            if self.reaches(base, class) {
                self.cut_edge(class, base);
                cut = true;
            }
        }
        if cut {
            let name = self.symtab.full_name(class).to_string();
            debug!(class = %name, "inheritance cycle broken");
            self.report_at_env(env, pos, DiagnosticKind::CyclicInheritance, vec![name]);
        }
    }

    /// Whether `target` is reachable from `from` through computed
    /// supertypes and interfaces.
    fn reaches(&self, from: SymbolId, target: SymbolId) -> bool {
        let mut visited = FxHashSet::default();
        let mut stack: SmallVec<[SymbolId; 8]> = SmallVec::new();
        stack.push(from);
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if visited.len() >= MAX_HIERARCHY_WALK || !visited.insert(current) {
                continue;
            }
            stack.extend(self.direct_supertypes(current));
        }
        false
    }

    fn cut_edge(&mut self, class: SymbolId, base: SymbolId) {
        self.cut_edges.insert((class, base));
        let object = self.symtab.object_type();
        if let Some(data) = self.symtab.class_mut(class) {
            if data.supertype.as_ref().and_then(Type::class_sym) == Some(base) {
                data.supertype = Some(object);
            }
            data.interfaces.retain(|ty| ty.class_sym() != Some(base));
            data.all_interfaces.retain(|ty| ty.class_sym() != Some(base));
        }
    }
}
