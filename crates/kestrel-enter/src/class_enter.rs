//! Class enter: symbols for every declaration of the forest.
//!
//! Runs once when the session is created. Creates packages, class symbols
//! with their implicit flags, class type variables, the top-level and class
//! environments, and attaches the source completer. Nothing is resolved here.

use crate::default_ctor::AnonymousContext;
use crate::env::{Env, EnvId, EnvKind};
use crate::session::{CompilationSession, UnitState};
use kestrel_common::DiagnosticKind;
use kestrel_symbols::{
    Completer, CompletionState, Flags, KindFilter, NamedImportScope, ScopeError, StarImportScope,
    SymbolId,
};
use kestrel_tree::{ClassDecl, ClassKind, DeclId, MemberDecl, UnitId};
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::trace;

impl CompilationSession {
    pub(crate) fn enter_trees(&mut self) -> Result<(), ScopeError> {
        let forest = Arc::clone(&self.forest);
        for (unit_id, unit) in forest.units() {
            let package = self.symtab.enter_package(unit.package_name());
            self.symtab.mark_package_exists(package);
            let scope = self.symtab.new_scope(Some(package));
            let env = self.envs.alloc(Env {
                kind: EnvKind::TopLevel,
                scope,
                enclosing_class: None,
                unit: unit_id,
                outer: None,
                decl: None,
            });
            self.units.push(UnitState {
                env,
                package,
                star_imports: StarImportScope::default(),
                named_imports: NamedImportScope::default(),
                imports_finished: false,
            });
            for &decl in &unit.classes {
                self.enter_class(decl, package, env, unit_id, Flags::empty())?;
            }
        }
        Ok(())
    }

    /// Enter a local or anonymous class found while attributing code of its
    /// enclosing class. Entering the same declaration twice returns the first
    /// symbol.
    pub fn enter_local_class(
        &mut self,
        decl: DeclId,
        context: Option<AnonymousContext>,
    ) -> Result<Option<SymbolId>, crate::FatalError> {
        if let Some(&sym) = self.decl_symbols.get(&decl) {
            return Ok(Some(sym));
        }
        let forest = Arc::clone(&self.forest);
        let Some(outer) = forest.outer_of(decl) else {
            return Ok(None);
        };
        let Some(owner) = self.symbol_for(outer) else {
            return Ok(None);
        };
        let Some(outer_env) = self.class_env(owner) else {
            return Ok(None);
        };
        if let Some(context) = context {
            self.anonymous_contexts.insert(decl, context);
        }
        let is_anonymous = forest.get_decl(decl).is_some_and(ClassDecl::is_anonymous);
        let extra = if is_anonymous {
            Flags::ANONYMOUS
        } else {
            Flags::LOCAL
        };
        let unit = forest.unit_of(decl);
        let sym = self.enter_class(decl, owner, outer_env, unit, extra)?;
        if let Some(sym) = sym
            && !is_anonymous
            && let Some(scope) = self.envs.get(outer_env).map(|e| e.scope)
        {
            self.symtab.enter(scope, sym)?;
        }
        Ok(sym)
    }

    fn enter_class(
        &mut self,
        decl_id: DeclId,
        owner: SymbolId,
        outer_env: EnvId,
        unit: UnitId,
        extra: Flags,
    ) -> Result<Option<SymbolId>, ScopeError> {
        let forest = Arc::clone(&self.forest);
        let Some(decl) = forest.get_decl(decl_id) else {
            return Ok(None);
        };
        let owner_is_class = self.symtab.is_class(owner);
        let flags = self.implicit_flags(decl, owner) | extra;
        let is_member = owner_is_class && !extra.intersects(Flags::LOCAL | Flags::ANONYMOUS);

        let sym = if decl.is_anonymous() {
            self.symtab.new_class(owner, "", flags)
        } else if let Some(existing) = self.existing_class(decl, owner, is_member) {
            if self.decl_of(existing).is_some() {
                let name = self.qualified_name(owner, &decl.name);
                self.report(unit, decl.pos, DiagnosticKind::DuplicateClass, vec![name]);
                return Ok(None);
            }
            // A library class of the same name yields to the source one.
            trace!(class = %decl.name, "source declaration replaces library class");
            self.symtab.reclaim_class(existing, flags);
            existing
        } else {
            let sym = self.symtab.new_class(owner, &decl.name, flags);
            if let Some(members) = self.symtab.members_of(owner)
                && (is_member || !owner_is_class)
            {
                self.symtab.enter(members, sym)?;
            }
            sym
        };
        if !owner_is_class && let Some(unit_env) = self.unit_env(unit) {
            if let Some(scope) = self.envs.get(unit_env).map(|e| e.scope) {
                self.symtab.enter(scope, sym)?;
            }
        }

        let scope = self.symtab.new_scope(Some(sym));
        let mut type_params = Vec::with_capacity(decl.type_params.len());
        for param in &decl.type_params {
            let tv = self.symtab.new_type_var(sym, &param.name);
            self.symtab.enter(scope, tv)?;
            type_params.push(tv);
        }
        if let Some(class) = self.symtab.class_mut(sym) {
            class.decl = Some(decl_id);
            class.unit = Some(unit);
            class.completer = Some(Completer::Source);
            class.state = CompletionState::Uncompleted;
            class.type_params = type_params;
        }
        self.decl_symbols.insert(decl_id, sym);

        let env = self.envs.alloc(Env {
            kind: EnvKind::Class,
            scope,
            enclosing_class: Some(sym),
            unit,
            outer: Some(outer_env),
            decl: Some(decl_id),
        });
        self.class_envs.insert(sym, env);
        trace!(class = self.symtab.full_name(sym), ?flags, "entered class");

        let constant_bodies: FxHashSet<DeclId> = decl
            .members
            .iter()
            .filter_map(|m| match m {
                MemberDecl::EnumConstant(constant) => constant.body,
                _ => None,
            })
            .collect();
        for nested in decl.nested_classes() {
            let extra = if constant_bodies.contains(&nested) {
                Flags::ANONYMOUS | Flags::ENUM
            } else {
                Flags::empty()
            };
            self.enter_class(nested, sym, env, unit, extra)?;
        }
        Ok(Some(sym))
    }

    fn existing_class(&self, decl: &ClassDecl, owner: SymbolId, is_member: bool) -> Option<SymbolId> {
        if is_member {
            let members = self.symtab.members_of(owner)?;
            self.symtab
                .lookup_str(members, &decl.name, KindFilter::TYPE)
                .first()
                .copied()
        } else if self.symtab.is_class(owner) {
            None
        } else {
            self.symtab
                .lookup_class(&self.qualified_name(owner, &decl.name))
        }
    }

    fn qualified_name(&self, owner: SymbolId, name: &str) -> String {
        let prefix = self.symtab.full_name(owner);
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        }
    }

    fn implicit_flags(&self, decl: &ClassDecl, owner: SymbolId) -> Flags {
        let mut flags = Flags::from_modifiers(decl.modifiers);
        match decl.kind {
            ClassKind::Class => {}
            ClassKind::Interface => flags |= Flags::INTERFACE | Flags::ABSTRACT,
            ClassKind::Annotation => {
                flags |= Flags::INTERFACE | Flags::ABSTRACT | Flags::ANNOTATION;
            }
            ClassKind::Enum => {
                flags |= Flags::ENUM;
                let has_bodies = decl.members.iter().any(|m| {
                    matches!(m, MemberDecl::EnumConstant(constant) if constant.body.is_some())
                });
                if !has_bodies {
                    flags |= Flags::FINAL;
                }
            }
        }
        if self.symtab.is_class(owner) && !decl.is_anonymous() {
            if self.symtab.is_interface(owner) {
                flags |= Flags::PUBLIC | Flags::STATIC;
            }
            if decl.kind != ClassKind::Class {
                flags |= Flags::STATIC;
            }
        }
        flags
    }
}
