//! Header phase: type-parameter bounds, fully attributed supertypes, header
//! annotations and the per-class bookkeeping flags.

use crate::annotate::PendingAnnotations;
use crate::env::EnvId;
use crate::error::EnterResult;
use crate::hierarchy::{BasePass, SuperTypes};
use crate::session::CompilationSession;
use kestrel_common::DiagnosticKind;
use kestrel_symbols::{Flags, Symbol, SymbolData, SymbolId, Type};
use kestrel_tree::{ClassDecl, ClassKind, TypeParamDecl};
use rustc_hash::FxHashSet;
use std::sync::Arc;

impl CompilationSession {
    #[tracing::instrument(level = "debug", skip_all, fields(class = class.0))]
    pub(crate) fn header_phase(&mut self, class: SymbolId, env: EnvId) -> EnterResult<()> {
        let forest = Arc::clone(&self.forest);
        let Some(decl) = self.decl_of(class).and_then(|d| forest.get_decl(d)) else {
            return Ok(());
        };
        let base_env = self.base_env(env);

        let type_params = self
            .symtab
            .class(class)
            .map(|c| c.type_params.clone())
            .unwrap_or_default();
        self.attrib_type_var_bounds(base_env, &type_params, &decl.type_params)?;

        let mut bases = self.attrib_super_types(class, decl, base_env, BasePass::Header)?;
        self.check_repeated_interfaces(base_env, &mut bases);
        self.install_super_types(class, bases);

        self.annotate.push(PendingAnnotations {
            target: class,
            env: base_env,
            annotations: decl.annotations.clone(),
        });
        self.check_class_clash(class, decl, base_env);
        self.mark_auxiliary(class);
        Ok(())
    }

    /// Attribute the bounds of `vars`, declared by `decls`, in `env`.
    /// Unresolved bounds become placeholders.
    pub(crate) fn attrib_type_var_bounds(
        &mut self,
        env: EnvId,
        vars: &[SymbolId],
        decls: &[TypeParamDecl],
    ) -> EnterResult<()> {
        for (&tv, param) in vars.iter().zip(decls) {
            let mut bounds = Vec::with_capacity(param.bounds.len());
            for bound in &param.bounds {
                bounds.push(self.attrib_type_or_placeholder(env, bound)?);
            }
            if let Some(Symbol {
                data: SymbolData::TypeVar { bounds: slot },
                ..
            }) = self.symtab.symbol_mut(tv)
            {
                *slot = bounds;
            }
        }
        Ok(())
    }

    /// Report and drop interfaces whose erasure was already listed.
    fn check_repeated_interfaces(&mut self, env: EnvId, bases: &mut SuperTypes) {
        let mut seen = FxHashSet::default();
        let mut kept = Vec::with_capacity(bases.interfaces.len());
        for clause in std::mem::take(&mut bases.interfaces) {
            if matches!(clause.ty, Type::Class { .. }) && !seen.insert(self.symtab.erasure(&clause.ty)) {
                let shown = self.symtab.type_to_string(&clause.ty);
                self.report_at_env(env, clause.pos, DiagnosticKind::RepeatedInterface, vec![shown]);
                continue;
            }
            kept.push(clause);
        }
        bases.interfaces = kept;
    }

    /// A top-level class outside the unnamed package may not share its
    /// fully qualified name with an existing package.
    fn check_class_clash(&mut self, class: SymbolId, decl: &ClassDecl, env: EnvId) {
        if !self.options.check_clash {
            return;
        }
        let Some(owner) = self.symtab.owner(class) else {
            return;
        };
        if self.symtab.is_class(owner) || owner == self.symtab.unnamed_package() {
            return;
        }
        let full = self.symtab.full_name(class).to_string();
        if self.symtab.is_package(&full) {
            let kind = match decl.kind {
                ClassKind::Class => "class",
                ClassKind::Interface | ClassKind::Annotation => "interface",
                ClassKind::Enum => "enum",
            };
            self.report_at_env(
                env,
                decl.pos,
                DiagnosticKind::ClassClashesWithPackage,
                vec![kind.to_string(), full],
            );
        }
    }

    fn mark_auxiliary(&mut self, class: SymbolId) {
        let top_level = self
            .symtab
            .owner(class)
            .is_some_and(|owner| !self.symtab.is_class(owner));
        if !top_level || self.symtab.flags(class).contains(Flags::PUBLIC) {
            return;
        }
        let Some(unit) = self.symtab.class(class).and_then(|c| c.unit) else {
            return;
        };
        let stem_differs = self
            .forest
            .get_unit(unit)
            .is_some_and(|u| u.file_stem() != self.symtab.name(class));
        if stem_differs {
            self.symtab.add_flags(class, Flags::AUXILIARY);
        }
    }
}
