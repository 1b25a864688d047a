//! Type name resolution.
//!
//! A simple name is looked up, innermost first, in:
//!
//! 1. each environment's scope, plus the member types (declared and
//!    inherited) of every enclosing class body
//! 2. the top-level classes of the unit (the outermost environment's scope)
//! 3. the unit's single-name imports
//! 4. the unit's own package
//! 5. the unit's on-demand imports, where two different candidates are an
//!    ambiguous reference
//!
//! Placeholders synthesized for earlier failures are consulted before a
//! failure is reported, so each missing name is reported once.

use crate::env::{EnvId, EnvKind};
use crate::error::{EnterError, EnterResult, FatalError};
use crate::session::CompilationSession;
use kestrel_common::limits::MAX_HIERARCHY_WALK;
use kestrel_common::{Atom, DiagnosticKind};
use kestrel_symbols::{Flags, ImportFilter, KindFilter, NamedImport, StarImport, SymbolData, SymbolId, Type};
use kestrel_tree::{TypeExpr, UnitId};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// What the qualifier of a qualified name denotes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Qualifier {
    Package(SymbolId),
    Class(SymbolId),
}

impl CompilationSession {
    /// Resolve a simple type name as seen from `env`.
    pub fn lookup_type(&mut self, env: EnvId, name: &str) -> Result<Option<SymbolId>, FatalError> {
        let atom = self.symtab.interner.intern(name);
        match self.find_type(env, atom, 0) {
            Ok(found) => Ok(found),
            Err(EnterError::Fatal(fatal)) => Err(fatal),
            Err(err) => {
                self.report_enter_error(env, 0, err);
                Ok(None)
            }
        }
    }

    /// Whether `name` is a package that exists.
    #[must_use]
    pub fn is_package(&self, name: &str) -> bool {
        self.symtab.is_package(name)
    }

    pub(crate) fn find_type(&mut self, env: EnvId, name: Atom, pos: u32) -> EnterResult<Option<SymbolId>> {
        let mut current = Some(env);
        let mut unit = None;
        while let Some(id) = current {
            let Some(e) = self.envs.get(id).copied() else {
                break;
            };
            unit = Some(e.unit);
            if let Some(&found) = self
                .symtab
                .lookup(e.scope, name, KindFilter::TYPE, false)
                .first()
            {
                return Ok(Some(found));
            }
            if e.kind == EnvKind::Class
                && let Some(class) = e.enclosing_class
                && let Some(found) = self.find_member_type(class, name)?
            {
                return Ok(Some(found));
            }
            current = e.outer;
        }
        match unit {
            Some(unit) => self.find_global_type(unit, name, pos),
            None => Ok(None),
        }
    }

    fn find_global_type(&mut self, unit: UnitId, name: Atom, pos: u32) -> EnterResult<Option<SymbolId>> {
        let Some(state) = self.units.get(unit.0 as usize) else {
            return Ok(None);
        };
        let named: SmallVec<[NamedImport; 1]> = state.named_imports.get(name).iter().copied().collect();
        let package = state.package;
        let stars: Vec<StarImport> = state.star_imports.entries().to_vec();

        for entry in named {
            match entry {
                NamedImport::Type { sym, .. } => return Ok(Some(sym)),
                NamedImport::Static {
                    origin,
                    importing_package,
                    ..
                } => {
                    let found = self.find_static_members(origin, name, KindFilter::TYPE, importing_package)?;
                    if let Some(&sym) = found.first() {
                        return Ok(Some(sym));
                    }
                }
            }
        }

        if let Some(members) = self.symtab.members_of(package)
            && let Some(&found) = self.symtab.lookup(members, name, KindFilter::TYPE, false).first()
        {
            return Ok(Some(found));
        }

        let mut candidates: SmallVec<[SymbolId; 2]> = SmallVec::new();
        for entry in stars {
            for sym in self.star_candidates(entry, name)? {
                if !candidates.contains(&sym) {
                    candidates.push(sym);
                }
            }
        }
        if candidates.len() > 1 && pos != 0 {
            let args = vec![
                self.symtab.interner.resolve(name).to_string(),
                self.symtab.full_name(candidates[0]).to_string(),
                self.symtab.full_name(candidates[1]).to_string(),
            ];
            self.report(unit, pos, DiagnosticKind::AmbiguousReference, args);
        }
        Ok(candidates.first().copied())
    }

    fn star_candidates(&mut self, entry: StarImport, name: Atom) -> EnterResult<SmallVec<[SymbolId; 2]>> {
        match entry.filter {
            ImportFilter::TypesOnly if self.symtab.is_class(entry.origin) => {
                Ok(self.find_member_type(entry.origin, name)?.into_iter().collect())
            }
            ImportFilter::TypesOnly => Ok(self
                .symtab
                .members_of(entry.origin)
                .map(|members| self.symtab.lookup(members, name, KindFilter::TYPE, false))
                .unwrap_or_default()),
            ImportFilter::StaticMembers { importing_package } => {
                self.find_static_members(entry.origin, name, KindFilter::TYPE, importing_package)
            }
        }
    }

    /// A member type of `class` named `name`, declared or inherited.
    /// Completes the classes whose supertypes it walks.
    pub(crate) fn find_member_type(&mut self, class: SymbolId, name: Atom) -> EnterResult<Option<SymbolId>> {
        let mut visited = FxHashSet::default();
        self.find_member_type_in(class, name, &mut visited)
    }

    fn find_member_type_in(
        &mut self,
        class: SymbolId,
        name: Atom,
        visited: &mut FxHashSet<SymbolId>,
    ) -> EnterResult<Option<SymbolId>> {
        if visited.len() >= MAX_HIERARCHY_WALK || !visited.insert(class) {
            return Ok(None);
        }
        if let Some(members) = self.symtab.members_of(class)
            && let Some(&found) = self.symtab.lookup(members, name, KindFilter::TYPE, false).first()
        {
            return Ok(Some(found));
        }
        self.complete_class(class)?;
        for base in self.direct_supertypes(class) {
            if let Some(found) = self.find_member_type_in(base, name, visited)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Static members of `origin` named `name` (declared or inherited) that
    /// are accessible from `importing_package`.
    pub(crate) fn find_static_members(
        &mut self,
        origin: SymbolId,
        name: Atom,
        filter: KindFilter,
        importing_package: SymbolId,
    ) -> EnterResult<SmallVec<[SymbolId; 2]>> {
        let mut found = SmallVec::new();
        let mut visited = FxHashSet::default();
        let mut stack = vec![origin];
        while let Some(class) = stack.pop() {
            if visited.len() >= MAX_HIERARCHY_WALK || !visited.insert(class) {
                continue;
            }
            self.complete_class(class)?;
            if let Some(members) = self.symtab.members_of(class) {
                for sym in self.symtab.lookup(members, name, filter, false) {
                    if self.is_static_importable(sym, importing_package) && !found.contains(&sym) {
                        found.push(sym);
                    }
                }
            }
            stack.extend(self.direct_supertypes(class).into_iter().rev());
        }
        Ok(found)
    }

    fn is_static_importable(&self, sym: SymbolId, importing_package: SymbolId) -> bool {
        let flags = self.symtab.flags(sym);
        if !flags.contains(Flags::STATIC) || flags.contains(Flags::PRIVATE) {
            return false;
        }
        flags.intersects(Flags::PUBLIC | Flags::PROTECTED)
            || self.symtab.package_of(sym) == importing_package
    }

    /// Classes named by the computed supertype and interfaces of `class`.
    pub(crate) fn direct_supertypes(&self, class: SymbolId) -> SmallVec<[SymbolId; 4]> {
        let Some(data) = self.symtab.class(class) else {
            return SmallVec::new();
        };
        data.supertype
            .iter()
            .chain(data.all_interfaces.iter())
            .filter_map(Type::class_sym)
            .collect()
    }

    fn type_of_found(&self, sym: SymbolId) -> Type {
        match self.symtab.symbol(sym).map(|s| (&s.data, s.flags)) {
            Some((SymbolData::TypeVar { .. }, _)) => Type::TypeVar(sym),
            Some((_, flags)) if flags.contains(Flags::PLACEHOLDER) => Type::Error {
                sym,
                args: Vec::new(),
            },
            _ => Type::class(sym),
        }
    }

    fn placeholder_type(&self, owner: SymbolId, name: Atom) -> Option<Type> {
        self.placeholders.get(owner, name).map(|sym| Type::Error {
            sym,
            args: Vec::new(),
        })
    }

    /// Attribute a type expression. `None` means it did not resolve; the
    /// failure has been reported when `report` is set.
    pub(crate) fn attrib_type(&mut self, env: EnvId, expr: &TypeExpr, report: bool) -> EnterResult<Option<Type>> {
        match expr {
            TypeExpr::Ident { name, pos } => {
                let atom = self.symtab.interner.intern(name);
                if let Some(sym) = self.find_type(env, atom, *pos)? {
                    return Ok(Some(self.type_of_found(sym)));
                }
                let unnamed = self.symtab.unnamed_package();
                if report && self.first_miss_in_unit(env, unnamed, atom) {
                    self.report_at_env(env, *pos, DiagnosticKind::CannotFindSymbol, vec![name.clone()]);
                }
                Ok(self.placeholder_type(unnamed, atom))
            }
            TypeExpr::Select {
                qualifier,
                name,
                pos,
            } => {
                let Some(qualifier) = self.resolve_qualifier(env, qualifier, report)? else {
                    return Ok(None);
                };
                let atom = self.symtab.interner.intern(name);
                let (owner, found) = match qualifier {
                    Qualifier::Class(owner) => (owner, self.find_member_type(owner, atom)?),
                    Qualifier::Package(owner) => (owner, self.package_member_type(owner, atom)),
                };
                if let Some(sym) = found {
                    return Ok(Some(self.type_of_found(sym)));
                }
                if report && self.first_miss_in_unit(env, owner, atom) {
                    self.report_missing_member(env, *pos, qualifier, name);
                }
                Ok(self.placeholder_type(owner, atom))
            }
            TypeExpr::Apply { base, args, .. } => {
                let base = self.attrib_type(env, base, report)?;
                let mut arg_types = Vec::with_capacity(args.len());
                for arg in args {
                    let ty = match self.attrib_type(env, arg, report)? {
                        Some(ty) => ty,
                        None => self.model_missing_type(env, arg, false)?,
                    };
                    arg_types.push(ty);
                }
                Ok(match base {
                    Some(Type::Class { sym, .. }) => Some(Type::Class {
                        sym,
                        args: arg_types,
                    }),
                    Some(Type::Error { sym, .. }) => {
                        self.synthesize_type_params(sym, arg_types.len());
                        Some(Type::Error {
                            sym,
                            args: arg_types,
                        })
                    }
                    _ => None,
                })
            }
            TypeExpr::Array { elem, .. } => Ok(self
                .attrib_type(env, elem, report)?
                .map(|elem| Type::Array(Box::new(elem)))),
            TypeExpr::Primitive { kind, .. } => Ok(Some(Type::Primitive(*kind))),
        }
    }

    /// Attribute a type, standing in a placeholder when it does not resolve.
    pub(crate) fn attrib_type_or_placeholder(&mut self, env: EnvId, expr: &TypeExpr) -> EnterResult<Type> {
        match self.attrib_type(env, expr, true)? {
            Some(ty) => Ok(ty),
            None => self.model_missing_type(env, expr, false),
        }
    }

    /// Resolve the qualifier of a qualified type name: a class if one is
    /// visible under that name, a package otherwise.
    pub(crate) fn resolve_qualifier(
        &mut self,
        env: EnvId,
        expr: &TypeExpr,
        report: bool,
    ) -> EnterResult<Option<Qualifier>> {
        match expr {
            TypeExpr::Ident { name, pos } => {
                let atom = self.symtab.interner.intern(name);
                match self.find_type(env, atom, *pos)? {
                    Some(sym) if self.symtab.is_class(sym) => Ok(Some(Qualifier::Class(sym))),
                    Some(_) => Ok(None),
                    None => Ok(Some(Qualifier::Package(self.symtab.enter_package(name)))),
                }
            }
            TypeExpr::Select {
                qualifier,
                name,
                pos,
            } => {
                let Some(outer) = self.resolve_qualifier(env, qualifier, report)? else {
                    return Ok(None);
                };
                let atom = self.symtab.interner.intern(name);
                match outer {
                    Qualifier::Package(pkg) => {
                        if let Some(class) = self.package_member_type(pkg, atom) {
                            return Ok(Some(Qualifier::Class(class)));
                        }
                        let full = format!("{}.{name}", self.symtab.full_name(pkg));
                        Ok(Some(Qualifier::Package(self.symtab.enter_package(&full))))
                    }
                    Qualifier::Class(class) => {
                        if let Some(member) = self.find_member_type(class, atom)? {
                            return Ok(Some(Qualifier::Class(member)));
                        }
                        if report && self.first_miss_in_unit(env, class, atom) {
                            self.report_missing_member(env, *pos, outer, name);
                        }
                        Ok(self.placeholders.get(class, atom).map(Qualifier::Class))
                    }
                }
            }
            TypeExpr::Apply { base, .. } => self.resolve_qualifier(env, base, report),
            TypeExpr::Array { .. } | TypeExpr::Primitive { .. } => Ok(None),
        }
    }

    /// Resolve a fully qualified name (as written in an import) to a class
    /// or package. Only packages and classes are consulted, never scopes.
    pub(crate) fn resolve_qualified(&mut self, dotted: &str) -> EnterResult<Option<Qualifier>> {
        let mut parts = dotted.split('.');
        let Some(first) = parts.next() else {
            return Ok(None);
        };
        let root = self.symtab.unnamed_package();
        let first_atom = self.symtab.interner.intern(first);
        let mut current = match self.package_member_type(root, first_atom) {
            Some(class) if self.symtab.lookup_package(first).is_none() => Qualifier::Class(class),
            _ => Qualifier::Package(self.symtab.enter_package(first)),
        };
        for part in parts {
            let atom = self.symtab.interner.intern(part);
            current = match current {
                Qualifier::Package(pkg) => match self.package_member_type(pkg, atom) {
                    Some(class) => Qualifier::Class(class),
                    None => {
                        let full = format!("{}.{part}", self.symtab.full_name(pkg));
                        Qualifier::Package(self.symtab.enter_package(&full))
                    }
                },
                Qualifier::Class(class) => match self.find_member_type(class, atom)? {
                    Some(member) => Qualifier::Class(member),
                    None => return Ok(None),
                },
            };
        }
        Ok(Some(current))
    }

    fn package_member_type(&self, pkg: SymbolId, name: Atom) -> Option<SymbolId> {
        let members = self.symtab.members_of(pkg)?;
        self.symtab
            .lookup(members, name, KindFilter::TYPE, false)
            .first()
            .copied()
    }

    /// Marks `owner.name` as gone missing in the unit of `env`. True the
    /// first time, which is when the miss is reported.
    pub(crate) fn first_miss_in_unit(&mut self, env: EnvId, owner: SymbolId, name: Atom) -> bool {
        match self.envs.get(env).map(|e| e.unit) {
            Some(unit) => self.missing_names.insert((unit, owner, name)),
            None => true,
        }
    }

    fn report_missing_member(&mut self, env: EnvId, pos: u32, qualifier: Qualifier, name: &str) {
        match qualifier {
            Qualifier::Package(pkg) if !self.symtab.package_exists(pkg) => {
                let package = self.symtab.full_name(pkg).to_string();
                self.report_at_env(env, pos, DiagnosticKind::PackageDoesNotExist, vec![package]);
            }
            Qualifier::Package(owner) | Qualifier::Class(owner) => {
                let full = format!("{}.{name}", self.symtab.full_name(owner));
                self.report_at_env(env, pos, DiagnosticKind::CannotFindSymbol, vec![full]);
            }
        }
    }
}
