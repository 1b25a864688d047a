//! The symbol table: symbol and scope arenas, package and class registries,
//! and the prelude classes every compilation relies on.

use crate::flags::{Flags, KindFilter};
use crate::scope::{Bucket, Scope, ScopeArena, ScopeError, ScopeId};
use crate::symbol::{
    ClassData, Completer, CompletionState, MethodData, PackageData, Symbol, SymbolArena,
    SymbolData, SymbolId,
};
use crate::types::Type;
use kestrel_common::limits::{SCOPE_ARENA_CAPACITY, SYMBOL_ARENA_CAPACITY};
use kestrel_common::{Atom, Interner};
use kestrel_tree::Primitive;
use rustc_hash::FxHashMap;
use tracing::trace;

/// Prelude classes, filled in by [`Symtab::install_prelude`].
#[derive(Clone, Copy, Debug, Default)]
pub struct WellKnown {
    pub lang_package: Option<SymbolId>,
    pub object: Option<SymbolId>,
    pub enum_: Option<SymbolId>,
    pub string: Option<SymbolId>,
    pub deprecated: Option<SymbolId>,
    pub annotation: Option<SymbolId>,
}

#[derive(Debug)]
pub struct Symtab {
    pub interner: Interner,
    pub symbols: SymbolArena,
    pub scopes: ScopeArena,
    /// Packages by fully qualified name.
    packages: FxHashMap<Atom, SymbolId>,
    /// Classes by flat name.
    classes: FxHashMap<Atom, SymbolId>,
    unnamed_package: SymbolId,
    pub well_known: WellKnown,
    /// Next anonymous class index per outermost class.
    anonymous_counters: FxHashMap<SymbolId, u32>,
}

impl Default for Symtab {
    fn default() -> Self {
        Self::new()
    }
}

impl Symtab {
    /// An empty table holding only the unnamed package.
    #[must_use]
    pub fn new() -> Self {
        let mut symbols = SymbolArena::with_capacity(SYMBOL_ARENA_CAPACITY);
        let mut scopes = ScopeArena::with_capacity(SCOPE_ARENA_CAPACITY);
        let members = scopes.alloc(Scope::new(None, None));
        let unnamed_package = symbols.alloc(Symbol {
            name: Atom::NONE,
            owner: None,
            flags: Flags::EXISTS,
            data: SymbolData::Package(PackageData {
                fullname: Atom::NONE,
                members,
            }),
        });
        if let Some(scope) = scopes.get_mut(members) {
            scope.owner = Some(unnamed_package);
        }
        let mut packages = FxHashMap::default();
        packages.insert(Atom::NONE, unnamed_package);
        Self {
            interner: Interner::new(),
            symbols,
            scopes,
            packages,
            classes: FxHashMap::default(),
            unnamed_package,
            well_known: WellKnown::default(),
            anonymous_counters: FxHashMap::default(),
        }
    }

    /// A table with the `java.lang` prelude installed.
    #[must_use]
    pub fn with_prelude() -> Self {
        let mut symtab = Self::new();
        symtab.install_prelude();
        symtab
    }

    /// Register `java.lang.Object`, `Enum<E extends Enum<E>>`, `String`,
    /// `Deprecated` and `java.lang.annotation.Annotation` as complete
    /// library classes.
    pub fn install_prelude(&mut self) {
        let public = Flags::PUBLIC;
        let object = self.enter_binary_class("java.lang.Object", public);
        self.well_known.object = Some(object);
        if let Some(data) = self.class_mut(object) {
            data.supertype = Some(Type::None);
        }
        self.add_binary_method(object, "<init>", public, Vec::new(), Type::None);
        self.add_binary_method(object, "toString", public, Vec::new(), Type::None);
        self.well_known.lang_package = self.lookup_package("java.lang");

        let string = self.enter_binary_class("java.lang.String", public | Flags::FINAL);
        self.well_known.string = Some(string);
        self.add_binary_method(string, "<init>", public, Vec::new(), Type::None);

        let annotation = self.enter_binary_class(
            "java.lang.annotation.Annotation",
            public | Flags::INTERFACE | Flags::ABSTRACT,
        );
        self.well_known.annotation = Some(annotation);

        let deprecated = self.enter_binary_class(
            "java.lang.Deprecated",
            public | Flags::INTERFACE | Flags::ABSTRACT | Flags::ANNOTATION,
        );
        self.add_binary_interface(deprecated, Type::class(annotation));
        self.well_known.deprecated = Some(deprecated);

        let enum_ = self.enter_binary_class("java.lang.Enum", public | Flags::ABSTRACT);
        let e = self.add_binary_type_param(enum_, "E");
        let self_type = Type::Class {
            sym: enum_,
            args: vec![Type::TypeVar(e)],
        };
        if let Some(Symbol {
            data: SymbolData::TypeVar { bounds },
            ..
        }) = self.symbols.get_mut(e)
        {
            bounds.push(self_type);
        }
        self.add_binary_method(
            enum_,
            "<init>",
            Flags::PROTECTED,
            vec![Type::class(string), Type::Primitive(Primitive::Int)],
            Type::None,
        );
        self.add_binary_method(enum_, "name", public | Flags::FINAL, Vec::new(), Type::class(string));
        self.add_binary_method(
            enum_,
            "ordinal",
            public | Flags::FINAL,
            Vec::new(),
            Type::Primitive(Primitive::Int),
        );
        self.well_known.enum_ = Some(enum_);
    }

    // =========================================================================
    // Lookup helpers
    // =========================================================================

    #[must_use]
    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id)
    }

    #[must_use]
    pub fn class(&self, id: SymbolId) -> Option<&ClassData> {
        self.symbols.get(id).and_then(Symbol::class)
    }

    pub fn class_mut(&mut self, id: SymbolId) -> Option<&mut ClassData> {
        self.symbols.get_mut(id).and_then(Symbol::class_mut)
    }

    #[must_use]
    pub fn flags(&self, id: SymbolId) -> Flags {
        self.symbols.get(id).map_or(Flags::empty(), |s| s.flags)
    }

    pub fn add_flags(&mut self, id: SymbolId, flags: Flags) {
        if let Some(sym) = self.symbols.get_mut(id) {
            sym.flags |= flags;
        }
    }

    #[must_use]
    pub fn owner(&self, id: SymbolId) -> Option<SymbolId> {
        self.symbols.get(id).and_then(|s| s.owner)
    }

    #[must_use]
    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id)
    }

    /// Member scope of a class or package.
    #[must_use]
    pub fn members_of(&self, id: SymbolId) -> Option<ScopeId> {
        self.symbols.get(id).and_then(Symbol::members)
    }

    #[must_use]
    pub fn unnamed_package(&self) -> SymbolId {
        self.unnamed_package
    }

    #[must_use]
    pub fn is_class(&self, id: SymbolId) -> bool {
        self.symbols.get(id).is_some_and(Symbol::is_class)
    }

    #[must_use]
    pub fn is_interface(&self, id: SymbolId) -> bool {
        self.flags(id).contains(Flags::INTERFACE)
    }

    /// Nearest enclosing package of a symbol (the symbol itself for packages).
    #[must_use]
    pub fn package_of(&self, id: SymbolId) -> SymbolId {
        let mut current = id;
        while let Some(sym) = self.symbols.get(current) {
            if sym.is_package() {
                return current;
            }
            match sym.owner {
                Some(owner) => current = owner,
                None => break,
            }
        }
        self.unnamed_package
    }

    /// Outermost enclosing class of a class symbol.
    #[must_use]
    pub fn outermost_class(&self, id: SymbolId) -> SymbolId {
        let mut current = id;
        while let Some(owner) = self.owner(current) {
            if !self.is_class(owner) {
                break;
            }
            current = owner;
        }
        current
    }

    #[must_use]
    pub fn name(&self, id: SymbolId) -> &str {
        self.symbols
            .get(id)
            .map_or("", |s| self.interner.resolve(s.name))
    }

    /// Fully qualified name of a class or package; the flat name for
    /// anonymous classes; the simple name otherwise.
    #[must_use]
    pub fn full_name(&self, id: SymbolId) -> &str {
        match self.symbols.get(id).map(|s| &s.data) {
            Some(SymbolData::Package(data)) => self.interner.resolve(data.fullname),
            Some(SymbolData::Class(data)) if data.fullname.is_none() => {
                self.interner.resolve(data.flatname)
            }
            Some(SymbolData::Class(data)) => self.interner.resolve(data.fullname),
            _ => self.name(id),
        }
    }

    #[must_use]
    pub fn type_to_string(&self, ty: &Type) -> String {
        match ty {
            Type::None => "none".to_string(),
            Type::Class { sym, args } | Type::Error { sym, args } => {
                let mut out = self.full_name(*sym).to_string();
                if !args.is_empty() {
                    let rendered: Vec<String> = args.iter().map(|a| self.type_to_string(a)).collect();
                    out.push('<');
                    out.push_str(&rendered.join(","));
                    out.push('>');
                }
                out
            }
            Type::TypeVar(sym) => self.name(*sym).to_string(),
            Type::Array(elem) => format!("{}[]", self.type_to_string(elem)),
            Type::Primitive(kind) => kind.keyword().to_string(),
        }
    }

    /// The type of `java.lang.Object`, or `Type::None` without a prelude.
    #[must_use]
    pub fn object_type(&self) -> Type {
        self.well_known.object.map_or(Type::None, Type::class)
    }

    /// Erasure: type arguments dropped, type variables replaced by the erasure
    /// of their first bound (`Object` when unbounded).
    #[must_use]
    pub fn erasure(&self, ty: &Type) -> Type {
        match ty {
            Type::TypeVar(tv) => match self.symbols.get(*tv).map(|s| &s.data) {
                Some(SymbolData::TypeVar { bounds }) if !bounds.is_empty() => {
                    // Bounds may mention the variable itself (`E extends Enum<E>`);
                    // stripping arguments first keeps this from recursing.
                    self.erasure(&bounds[0].strip_args())
                }
                _ => self.object_type(),
            },
            Type::Array(elem) => Type::Array(Box::new(self.erasure(elem))),
            other => other.strip_args(),
        }
    }

    /// Declared class type: the class applied to its own type variables.
    #[must_use]
    pub fn class_type(&self, id: SymbolId) -> Type {
        let args = self
            .class(id)
            .map(|c| c.type_params.iter().map(|tv| Type::TypeVar(*tv)).collect())
            .unwrap_or_default();
        Type::Class { sym: id, args }
    }

    /// Whether `sub` is `base` or inherits from it through already computed
    /// supertypes and interfaces. Never triggers completion.
    #[must_use]
    pub fn is_subclass(&self, sub: SymbolId, base: SymbolId) -> bool {
        let mut stack = vec![sub];
        let mut seen = rustc_hash::FxHashSet::default();
        while let Some(current) = stack.pop() {
            if current == base {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(data) = self.class(current) {
                if let Some(sup) = data.supertype.as_ref().and_then(Type::class_sym) {
                    stack.push(sup);
                }
                stack.extend(data.all_interfaces.iter().filter_map(Type::class_sym));
            }
        }
        false
    }

    // =========================================================================
    // Packages
    // =========================================================================

    #[must_use]
    pub fn lookup_package(&self, fullname: &str) -> Option<SymbolId> {
        let atom = self.interner.get(fullname)?;
        self.packages.get(&atom).copied()
    }

    /// Find or create a package and all of its enclosing packages.
    pub fn enter_package(&mut self, fullname: &str) -> SymbolId {
        if fullname.is_empty() {
            return self.unnamed_package;
        }
        let full = self.interner.intern(fullname);
        if let Some(&pkg) = self.packages.get(&full) {
            return pkg;
        }
        let (owner, simple) = match fullname.rsplit_once('.') {
            Some((parent, simple)) => (Some(self.enter_package(parent)), simple),
            None => (None, fullname),
        };
        let name = self.interner.intern(simple);
        let members = self.scopes.alloc(Scope::new(None, None));
        let pkg = self.symbols.alloc(Symbol {
            name,
            owner,
            flags: Flags::empty(),
            data: SymbolData::Package(PackageData {
                fullname: full,
                members,
            }),
        });
        if let Some(scope) = self.scopes.get_mut(members) {
            scope.owner = Some(pkg);
        }
        self.packages.insert(full, pkg);
        trace!(package = fullname, "entered package");
        pkg
    }

    /// A package exists once a source file declares it or it has members.
    #[must_use]
    pub fn package_exists(&self, pkg: SymbolId) -> bool {
        self.flags(pkg).contains(Flags::EXISTS)
            || self
                .members_of(pkg)
                .and_then(|s| self.scopes.get(s))
                .is_some_and(|s| !s.is_empty())
    }

    #[must_use]
    pub fn is_package(&self, fullname: &str) -> bool {
        self.lookup_package(fullname)
            .is_some_and(|pkg| self.package_exists(pkg))
    }

    // =========================================================================
    // Symbol creation
    // =========================================================================

    /// Create a class symbol owned by a package or class. Anonymous classes
    /// (empty `name`) get a numbered flat name `Outer$N`.
    ///
    /// Classes with a name are registered by flat name; the first one wins.
    pub fn new_class(&mut self, owner: SymbolId, name: &str, flags: Flags) -> SymbolId {
        let name_atom = self.interner.intern(name);
        let owner_is_class = self.is_class(owner);
        let (fullname, flatname) = if owner_is_class {
            let owner_flat = self.class(owner).map_or(Atom::NONE, |c| c.flatname);
            let owner_full = self.class(owner).map_or(Atom::NONE, |c| c.fullname);
            if name.is_empty() {
                let outermost = self.outermost_class(owner);
                let counter = self.anonymous_counters.entry(outermost).or_insert(0);
                *counter += 1;
                let index = *counter;
                let outer_flat = self.class(outermost).map_or(Atom::NONE, |c| c.flatname);
                let flat = format!("{}${index}", self.interner.resolve(outer_flat));
                (Atom::NONE, self.interner.intern(&flat))
            } else {
                let flat = format!("{}${name}", self.interner.resolve(owner_flat));
                let flat = self.interner.intern(&flat);
                let full = if owner_full.is_none() {
                    Atom::NONE
                } else {
                    self.interner.qualify(owner_full, name_atom)
                };
                (full, flat)
            }
        } else {
            let pkg_full = match self.symbols.get(owner).map(|s| &s.data) {
                Some(SymbolData::Package(data)) => data.fullname,
                _ => Atom::NONE,
            };
            let full = self.interner.qualify(pkg_full, name_atom);
            (full, full)
        };
        let members = self.scopes.alloc(Scope::new(None, None));
        let sym = self.symbols.alloc_class(
            name_atom,
            Some(owner),
            flags,
            fullname,
            flatname,
            members,
        );
        if let Some(scope) = self.scopes.get_mut(members) {
            scope.owner = Some(sym);
        }
        if !name.is_empty() {
            self.classes.entry(flatname).or_insert(sym);
        }
        if !owner_is_class {
            self.mark_package_exists(owner);
        }
        sym
    }

    /// Flag a package and all of its enclosing packages as existing.
    pub fn mark_package_exists(&mut self, pkg: SymbolId) {
        let mut current = Some(pkg);
        while let Some(id) = current {
            self.add_flags(id, Flags::EXISTS);
            current = self.owner(id);
        }
    }

    /// Hand a registered library class over to a source declaration of the
    /// same name: fresh flags, an empty member scope, no computed header.
    /// The symbol id stays the same so existing references remain valid.
    pub fn reclaim_class(&mut self, sym: SymbolId, flags: Flags) {
        let members = self.scopes.alloc(Scope::new(Some(sym), None));
        if let Some(symbol) = self.symbols.get_mut(sym) {
            symbol.flags = flags;
        }
        if let Some(data) = self.class_mut(sym) {
            data.members = members;
            data.supertype = None;
            data.interfaces.clear();
            data.all_interfaces.clear();
            data.type_params.clear();
            data.annotations.clear();
        }
    }

    /// Class by flat name (`p.Outer$Inner`).
    #[must_use]
    pub fn lookup_class(&self, flatname: &str) -> Option<SymbolId> {
        let atom = self.interner.get(flatname)?;
        self.classes.get(&atom).copied()
    }

    /// Create a placeholder class standing in for an unresolved name. It is
    /// born complete with an empty frozen member scope and is not registered
    /// by name.
    pub fn new_error_class(&mut self, owner: SymbolId, name: &str, flags: Flags) -> SymbolId {
        let name_atom = self.interner.intern(name);
        let owner_full = match self.symbols.get(owner).map(|s| &s.data) {
            Some(SymbolData::Package(data)) => data.fullname,
            Some(SymbolData::Class(data)) => data.fullname,
            _ => Atom::NONE,
        };
        let full = self.interner.qualify(owner_full, name_atom);
        let members = self.scopes.alloc(Scope::new(None, None));
        let sym = self.symbols.alloc_class(
            name_atom,
            Some(owner),
            flags | Flags::PLACEHOLDER | Flags::SYNTHETIC,
            full,
            full,
            members,
        );
        let supertype = self.object_type();
        if let Some(scope) = self.scopes.get_mut(members) {
            scope.owner = Some(sym);
            scope.freeze();
        }
        if let Some(data) = self.class_mut(sym) {
            data.supertype = Some(supertype);
        }
        sym
    }

    pub fn new_type_var(&mut self, owner: SymbolId, name: &str) -> SymbolId {
        let name = self.interner.intern(name);
        self.symbols.alloc(Symbol {
            name,
            owner: Some(owner),
            flags: Flags::empty(),
            data: SymbolData::TypeVar { bounds: Vec::new() },
        })
    }

    pub fn new_method(
        &mut self,
        owner: SymbolId,
        name: &str,
        flags: Flags,
        data: MethodData,
    ) -> SymbolId {
        let name = self.interner.intern(name);
        self.symbols.alloc(Symbol {
            name,
            owner: Some(owner),
            flags,
            data: SymbolData::Method(Box::new(data)),
        })
    }

    pub fn new_var(&mut self, owner: SymbolId, name: &str, flags: Flags, ty: Type) -> SymbolId {
        let name = self.interner.intern(name);
        self.symbols.alloc(Symbol {
            name,
            owner: Some(owner),
            flags,
            data: SymbolData::Var { ty },
        })
    }

    // =========================================================================
    // Scopes
    // =========================================================================

    pub fn new_scope(&mut self, owner: Option<SymbolId>) -> ScopeId {
        self.scopes.alloc(Scope::new(owner, None))
    }

    /// A nested scope falling through to `parent` on recursive lookups.
    pub fn dup_scope(&mut self, parent: ScopeId, owner: Option<SymbolId>) -> ScopeId {
        self.scopes.alloc(Scope::new(owner, Some(parent)))
    }

    pub fn finalize_scope(&mut self, scope: ScopeId) {
        if let Some(s) = self.scopes.get_mut(scope) {
            s.freeze();
        }
    }

    /// Enter `sym` without a conflict check.
    pub fn enter(&mut self, scope: ScopeId, sym: SymbolId) -> Result<(), ScopeError> {
        let name = self.symbols.get(sym).map_or(Atom::NONE, |s| s.name);
        match self.scopes.get_mut(scope) {
            Some(s) => s.insert(scope, name, sym),
            None => Err(ScopeError::Frozen(scope)),
        }
    }

    /// Enter `sym` unless this scope already holds a conflicting entry: a
    /// type with the same name, a variable with the same name, or a method
    /// with the same name and erased parameter types.
    pub fn declare(&mut self, scope: ScopeId, sym: SymbolId) -> Result<(), ScopeError> {
        if let Some(existing) = self.conflicting_entry(scope, sym) {
            return Err(ScopeError::DuplicateDeclaration {
                name: self.name(sym).to_string(),
                existing,
            });
        }
        self.enter(scope, sym)
    }

    fn conflicting_entry(&self, scope: ScopeId, sym: SymbolId) -> Option<SymbolId> {
        let new = self.symbols.get(sym)?;
        let entries = self.scopes.get(scope)?.get(new.name);
        entries.iter().copied().find(|&other| {
            let Some(old) = self.symbols.get(other) else {
                return false;
            };
            if old.kind() != new.kind() {
                return false;
            }
            match (old.method(), new.method()) {
                (Some(a), Some(b)) => self.same_erased_params(&a.param_types, &b.param_types),
                _ => true,
            }
        })
    }

    fn same_erased_params(&self, a: &[Type], b: &[Type]) -> bool {
        a.len() == b.len()
            && a.iter()
                .zip(b)
                .all(|(x, y)| self.erasure(x) == self.erasure(y))
    }

    /// Entries named `name` whose kind is in `filter`, innermost scope first.
    #[must_use]
    pub fn lookup(&self, scope: ScopeId, name: Atom, filter: KindFilter, recursive: bool) -> Bucket {
        let mut found = Bucket::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            let Some(s) = self.scopes.get(id) else { break };
            found.extend(
                s.get(name)
                    .iter()
                    .copied()
                    .filter(|&sym| self.symbols.get(sym).is_some_and(|x| filter.intersects(x.kind()))),
            );
            if !recursive {
                break;
            }
            current = s.next;
        }
        found
    }

    /// Lookup by string; `None` if the name was never interned.
    #[must_use]
    pub fn lookup_str(&self, scope: ScopeId, name: &str, filter: KindFilter) -> Bucket {
        self.interner
            .get(name)
            .map(|atom| self.lookup(scope, atom, filter, false))
            .unwrap_or_default()
    }

    // =========================================================================
    // Library classes
    // =========================================================================

    /// Register a complete library class. Its package is created and marked
    /// existing; its supertype defaults to `Object`.
    pub fn enter_binary_class(&mut self, fullname: &str, flags: Flags) -> SymbolId {
        let (pkg_name, simple) = fullname.rsplit_once('.').unwrap_or(("", fullname));
        let pkg = self.enter_package(pkg_name);
        let sym = self.new_class(pkg, simple, flags);
        self.register_binary(pkg, sym);
        sym
    }

    /// Register a complete library member class.
    pub fn enter_binary_member_class(&mut self, outer: SymbolId, name: &str, flags: Flags) -> SymbolId {
        let sym = self.new_class(outer, name, flags);
        self.register_binary(outer, sym);
        sym
    }

    fn register_binary(&mut self, owner: SymbolId, sym: SymbolId) {
        let object = self.object_type();
        if let Some(data) = self.class_mut(sym) {
            data.state = CompletionState::Complete;
            data.supertype = Some(object);
        }
        if let Some(scope) = self.members_of(owner) {
            // Library registration happens before completion starts, so the
            // owner's scope is never frozen here.
            let _ = self.enter(scope, sym);
        }
    }

    /// Register a library class whose loading fails with `reason` the first
    /// time it is completed.
    pub fn enter_unreadable_class(&mut self, fullname: &str, reason: &str) -> SymbolId {
        let sym = self.enter_binary_class(fullname, Flags::PUBLIC);
        if let Some(data) = self.class_mut(sym) {
            data.state = CompletionState::Uncompleted;
            data.supertype = None;
            data.completer = Some(Completer::Unreadable(reason.to_string()));
        }
        sym
    }

    pub fn set_binary_supertype(&mut self, class: SymbolId, supertype: Type) {
        if let Some(data) = self.class_mut(class) {
            data.supertype = Some(supertype);
        }
    }

    pub fn add_binary_interface(&mut self, class: SymbolId, iface: Type) {
        if let Some(data) = self.class_mut(class) {
            data.interfaces.push(iface.clone());
            data.all_interfaces.push(iface);
        }
    }

    pub fn add_binary_type_param(&mut self, class: SymbolId, name: &str) -> SymbolId {
        let tv = self.new_type_var(class, name);
        if let Some(data) = self.class_mut(class) {
            data.type_params.push(tv);
        }
        tv
    }

    /// Add a method to a library class. Parameters are named `arg0..`.
    pub fn add_binary_method(
        &mut self,
        class: SymbolId,
        name: &str,
        flags: Flags,
        param_types: Vec<Type>,
        return_type: Type,
    ) -> SymbolId {
        let method = self.new_method(
            class,
            name,
            flags,
            MethodData {
                param_types: param_types.clone(),
                return_type,
                ..MethodData::default()
            },
        );
        let params: Vec<SymbolId> = param_types
            .into_iter()
            .enumerate()
            .map(|(i, ty)| self.new_var(method, &format!("arg{i}"), Flags::empty(), ty))
            .collect();
        if let Some(SymbolData::Method(data)) = self.symbols.get_mut(method).map(|s| &mut s.data) {
            data.params = params;
        }
        if let Some(scope) = self.members_of(class) {
            let _ = self.enter(scope, method);
        }
        method
    }

    pub fn add_binary_field(&mut self, class: SymbolId, name: &str, flags: Flags, ty: Type) -> SymbolId {
        let field = self.new_var(class, name, flags, ty);
        if let Some(scope) = self.members_of(class) {
            let _ = self.enter(scope, field);
        }
        field
    }
}
