//! Import resolution for compilation units.
//!
//! Fills the star and named import scopes of a unit exactly once. The star
//! scope is never empty after resolution (it holds at least the prelude), so
//! "star scope non-empty" doubles as the resolved marker.

use crate::annotate::PendingAnnotations;
use crate::error::{EnterResult, FatalError};
use crate::resolve::Qualifier;
use crate::session::CompilationSession;
use kestrel_common::DiagnosticKind;
use kestrel_symbols::{Flags, ImportFilter, KindFilter, NamedImport, StarImport, SymbolId};
use kestrel_tree::{ImportDecl, UnitId};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, trace};

impl CompilationSession {
    #[tracing::instrument(level = "debug", skip_all, fields(unit = unit.0))]
    pub(crate) fn resolve_imports(&mut self, unit: UnitId) -> EnterResult<()> {
        let Some(state) = self.units.get(unit.0 as usize) else {
            return Ok(());
        };
        if !state.star_imports.is_empty() {
            return Ok(());
        }
        let package = state.package;
        let env = state.env;
        let forest = Arc::clone(&self.forest);
        let Some(source) = forest.get_unit(unit) else {
            return Ok(());
        };

        let prelude_name = self.options.prelude_package.clone();
        let prelude = self.symtab.enter_package(&prelude_name);
        if !self.symtab.package_exists(prelude) {
            return Err(FatalError::MissingPrelude {
                package: prelude_name,
            }
            .into());
        }
        self.push_star_import(unit, prelude, ImportFilter::TypesOnly, 0)?;

        if let Some(clause) = &source.package {
            self.check_class_package_clash(unit, package, clause.pos);
            self.annotate.push(PendingAnnotations {
                target: package,
                env,
                annotations: clause.annotations.clone(),
            });
        }

        for import in &source.imports {
            self.do_import(unit, package, import)?;
        }
        debug!(
            file = %source.file,
            imports = source.imports.len(),
            "imports resolved"
        );
        Ok(())
    }

    fn push_star_import(
        &mut self,
        unit: UnitId,
        origin: SymbolId,
        filter: ImportFilter,
        pos: u32,
    ) -> Result<(), FatalError> {
        if let Some(state) = self.units.get_mut(unit.0 as usize) {
            state.star_imports.push(StarImport { origin, filter, pos })?;
        }
        Ok(())
    }

    fn push_named_import(&mut self, unit: UnitId, name: &str, entry: NamedImport) -> Result<(), FatalError> {
        let atom = self.symtab.interner.intern(name);
        if let Some(state) = self.units.get_mut(unit.0 as usize) {
            state.named_imports.insert(atom, entry)?;
        }
        Ok(())
    }

    /// The package of a unit, and each enclosing package except the
    /// outermost one, must not share its name with a class.
    fn check_class_package_clash(&mut self, unit: UnitId, package: SymbolId, pos: u32) {
        if !self.options.check_clash {
            return;
        }
        let mut current = package;
        while let Some(owner) = self.symtab.owner(current) {
            let name = self.symtab.full_name(current).to_string();
            if self.symtab.lookup_class(&name).is_some() {
                self.report(unit, pos, DiagnosticKind::PackageClashesWithClass, vec![name]);
            }
            current = owner;
        }
    }

    fn do_import(&mut self, unit: UnitId, package: SymbolId, import: &ImportDecl) -> EnterResult<()> {
        trace!(import = %import.qualified_name, on_demand = import.on_demand, is_static = import.is_static, "import");
        if import.on_demand {
            return self.import_on_demand(unit, package, import);
        }
        let (qualifier, name) = import.split_last();
        if import.is_static {
            let Some(origin) = self.import_static_origin(unit, qualifier, import.pos)? else {
                return Ok(());
            };
            let entry = NamedImport::Static {
                origin,
                importing_package: package,
                pos: import.pos,
            };
            return self.push_named_import(unit, name, entry).map_err(Into::into);
        }

        let resolved = self.with_completion_suppressed(|this| this.resolve_qualified(&import.qualified_name))?;
        match resolved {
            Some(Qualifier::Class(sym)) => {
                if self.options.warn_deprecated_imports()
                    && self.symtab.flags(sym).contains(Flags::DEPRECATED)
                {
                    let class = self.symtab.full_name(sym).to_string();
                    let location = self.symtab.full_name(self.symtab.package_of(sym)).to_string();
                    self.report(unit, import.pos, DiagnosticKind::DeprecatedImport, vec![class, location]);
                }
                let entry = NamedImport::Type {
                    sym,
                    pos: import.pos,
                };
                self.push_named_import(unit, name, entry)?;
            }
            _ => self.report_unresolved_import(unit, import.pos, &import.qualified_name)?,
        }
        Ok(())
    }

    fn import_on_demand(&mut self, unit: UnitId, package: SymbolId, import: &ImportDecl) -> EnterResult<()> {
        if import.is_static {
            if let Some(origin) = self.import_static_origin(unit, &import.qualified_name, import.pos)? {
                let filter = ImportFilter::StaticMembers {
                    importing_package: package,
                };
                self.push_star_import(unit, origin, filter, import.pos)?;
            }
            return Ok(());
        }
        match self.resolve_qualified(&import.qualified_name)? {
            Some(Qualifier::Class(origin)) => {
                self.push_star_import(unit, origin, ImportFilter::TypesOnly, import.pos)?;
            }
            Some(Qualifier::Package(origin)) => {
                if !self.symtab.package_exists(origin) {
                    let name = self.symtab.full_name(origin).to_string();
                    self.report(unit, import.pos, DiagnosticKind::PackageDoesNotExist, vec![name]);
                }
                self.push_star_import(unit, origin, ImportFilter::TypesOnly, import.pos)?;
            }
            None => self.report_unresolved_import(unit, import.pos, &import.qualified_name)?,
        }
        Ok(())
    }

    /// The class a static import draws from. Packages are rejected.
    fn import_static_origin(&mut self, unit: UnitId, qualifier: &str, pos: u32) -> EnterResult<Option<SymbolId>> {
        match self.resolve_qualified(qualifier)? {
            Some(Qualifier::Class(origin)) => Ok(Some(origin)),
            Some(Qualifier::Package(pkg)) if !self.symtab.package_exists(pkg) => {
                self.report_unresolved_import(unit, pos, qualifier)?;
                Ok(None)
            }
            Some(Qualifier::Package(_)) => {
                self.report(unit, pos, DiagnosticKind::StaticImportOnlyClassesAndInterfaces, Vec::new());
                Ok(None)
            }
            None => {
                self.report_unresolved_import(unit, pos, qualifier)?;
                Ok(None)
            }
        }
    }

    /// `package p does not exist` when the qualifier of the missing name is
    /// a package that does not exist, `cannot find symbol` otherwise.
    fn report_unresolved_import(&mut self, unit: UnitId, pos: u32, full: &str) -> EnterResult<()> {
        let missing_package = match full.rsplit_once('.') {
            Some((parent, _)) => match self.resolve_qualified(parent)? {
                Some(Qualifier::Package(pkg)) if !self.symtab.package_exists(pkg) => {
                    Some(parent.to_string())
                }
                _ => None,
            },
            None => None,
        };
        match missing_package {
            Some(package) => self.report(unit, pos, DiagnosticKind::PackageDoesNotExist, vec![package]),
            None => self.report(unit, pos, DiagnosticKind::CannotFindSymbol, vec![full.to_string()]),
        }
        Ok(())
    }

    /// Check the resolved imports of a unit and freeze its import scopes.
    /// Runs at most once per unit.
    pub(crate) fn finish_imports(&mut self, unit: UnitId) -> Result<(), FatalError> {
        let Some(state) = self.units.get_mut(unit.0 as usize) else {
            return Ok(());
        };
        if state.imports_finished {
            return Ok(());
        }
        state.imports_finished = true;
        let _span = tracing::debug_span!("finish_imports", unit = unit.0).entered();
        self.check_imports_unique(unit);
        self.check_imports_resolvable(unit)?;
        if let Some(state) = self.units.get_mut(unit.0 as usize) {
            state.named_imports.freeze();
            state.star_imports.freeze();
        }
        Ok(())
    }

    fn check_imports_unique(&mut self, unit: UnitId) {
        let Some(state) = self.units.get(unit.0 as usize) else {
            return;
        };
        let toplevel = self.envs.get(state.env).map(|e| e.scope);
        let entries: Vec<_> = state
            .named_imports
            .iter()
            .filter_map(|(name, entry)| match *entry {
                NamedImport::Type { sym, pos } => Some((name, sym, pos)),
                NamedImport::Static { .. } => None,
            })
            .collect();

        let mut first_by_name: FxHashMap<_, SymbolId> = FxHashMap::default();
        for (name, sym, pos) in entries {
            let simple = self.symtab.interner.resolve(name).to_string();
            if let Some(scope) = toplevel
                && let Some(&local) = self.symtab.lookup(scope, name, KindFilter::TYPE, false).first()
                && local != sym
            {
                self.report(unit, pos, DiagnosticKind::ImportClashesWithClass, vec![simple]);
                continue;
            }
            match first_by_name.get(&name) {
                Some(&first) if first != sym => {
                    let previous = self.symtab.full_name(first).to_string();
                    self.report(unit, pos, DiagnosticKind::AmbiguousImport, vec![simple, previous]);
                }
                Some(_) => {}
                None => {
                    first_by_name.insert(name, sym);
                }
            }
        }
    }

    fn check_imports_resolvable(&mut self, unit: UnitId) -> Result<(), FatalError> {
        let Some(state) = self.units.get(unit.0 as usize) else {
            return Ok(());
        };
        let env = state.env;
        let statics: Vec<_> = state
            .named_imports
            .iter()
            .filter_map(|(name, entry)| match *entry {
                NamedImport::Static {
                    origin,
                    importing_package,
                    pos,
                } => Some((name, origin, importing_package, pos)),
                NamedImport::Type { .. } => None,
            })
            .collect();
        for (name, origin, importing_package, pos) in statics {
            match self.find_static_members(origin, name, KindFilter::ALL, importing_package) {
                Ok(found) if found.is_empty() => {
                    let member = self.symtab.interner.resolve(name).to_string();
                    let class = self.symtab.full_name(origin).to_string();
                    self.report(unit, pos, DiagnosticKind::UnresolvedImport, vec![member, class]);
                }
                Ok(_) => {}
                Err(crate::EnterError::Fatal(fatal)) => return Err(fatal),
                Err(err) => self.report_enter_error(env, pos, err),
            }
        }
        Ok(())
    }
}
