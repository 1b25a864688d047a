//! Members phase: fill and freeze a class's member scope.

use crate::env::{Env, EnvId, EnvKind};
use crate::error::EnterResult;
use crate::session::CompilationSession;
use kestrel_common::DiagnosticKind;
use kestrel_symbols::{Flags, MethodData, ScopeError, ScopeId, SymbolData, SymbolId, Type};
use kestrel_tree::{FieldDecl, MemberDecl, MethodDecl, Modifiers};
use std::sync::Arc;
use tracing::trace;

impl CompilationSession {
    #[tracing::instrument(level = "debug", skip_all, fields(class = class.0))]
    pub(crate) fn members_phase(&mut self, class: SymbolId, env: EnvId) -> EnterResult<()> {
        let forest = Arc::clone(&self.forest);
        let Some(decl) = self.decl_of(class).and_then(|d| forest.get_decl(d)) else {
            return Ok(());
        };
        let Some(members) = self.symtab.members_of(class) else {
            return Ok(());
        };
        let flags = self.symtab.flags(class);

        if self.is_enum_root(class) {
            self.add_enum_members(class, members)?;
        }
        if !flags.contains(Flags::INTERFACE) && decl.constructors().next().is_none() {
            self.add_default_constructor(class)?;
        }
        self.enter_this_and_super(class, env)?;

        for member in &decl.members {
            match member {
                MemberDecl::Field(field) => self.enter_field(class, env, members, field)?,
                MemberDecl::Method(method) => self.enter_method(class, env, members, method)?,
                MemberDecl::EnumConstant(constant) => {
                    let flags = Flags::PUBLIC | Flags::STATIC | Flags::FINAL | Flags::ENUM;
                    let sym = self.symtab.new_var(class, &constant.name, flags, Type::class(class));
                    self.declare_member(class, env, members, sym, constant.pos)?;
                }
                MemberDecl::Class(_) => {}
            }
        }
        self.symtab.finalize_scope(members);
        trace!(class = self.symtab.full_name(class), members = decl.members.len(), "members entered");
        Ok(())
    }

    /// An enum whose direct supertype is not itself an enum.
    fn is_enum_root(&self, class: SymbolId) -> bool {
        self.symtab.flags(class).contains(Flags::ENUM)
            && !self
                .supertype_of(class)
                .and_then(|ty| ty.class_sym())
                .is_some_and(|sup| self.symtab.flags(sup).contains(Flags::ENUM))
    }

    /// `public static E[] values()` and `public static E valueOf(String name)`.
    fn add_enum_members(&mut self, class: SymbolId, members: ScopeId) -> EnterResult<()> {
        let public_static = Flags::PUBLIC | Flags::STATIC;
        let class_type = Type::class(class);

        let values = self.symtab.new_method(
            class,
            "values",
            public_static,
            MethodData {
                return_type: Type::Array(Box::new(class_type.clone())),
                ..MethodData::default()
            },
        );
        self.symtab.enter(members, values)?;

        let string = self
            .symtab
            .well_known
            .string
            .map_or_else(|| self.symtab.object_type(), Type::class);
        let value_of = self.symtab.new_method(
            class,
            "valueOf",
            public_static,
            MethodData {
                param_types: vec![string.clone()],
                return_type: class_type,
                ..MethodData::default()
            },
        );
        let name = self.symtab.new_var(value_of, "name", Flags::MANDATED, string);
        if let Some(SymbolData::Method(data)) = self.symtab.symbol_mut(value_of).map(|s| &mut s.data) {
            data.params.push(name);
        }
        self.symtab.enter(members, value_of)?;
        Ok(())
    }

    /// `this` and, for classes with a class supertype, `super` go into the
    /// class's own environment scope.
    fn enter_this_and_super(&mut self, class: SymbolId, env: EnvId) -> EnterResult<()> {
        let Some(scope) = self.envs.get(env).map(|e| e.scope) else {
            return Ok(());
        };
        let this_type = self.symtab.class_type(class);
        let this = self.symtab.new_var(class, "this", Flags::FINAL, this_type);
        self.symtab.enter(scope, this)?;

        if self.symtab.is_interface(class) {
            return Ok(());
        }
        if let Some(supertype @ Type::Class { .. }) = self.supertype_of(class) {
            let sup = self.symtab.new_var(class, "super", Flags::FINAL, supertype);
            self.symtab.enter(scope, sup)?;
        }
        Ok(())
    }

    fn enter_field(&mut self, class: SymbolId, env: EnvId, members: ScopeId, field: &FieldDecl) -> EnterResult<()> {
        let mut flags = Flags::from_modifiers(field.modifiers);
        if self.symtab.is_interface(class) {
            flags |= Flags::PUBLIC | Flags::STATIC | Flags::FINAL;
        }
        let ty = self.attrib_type_or_placeholder(env, &field.ty)?;
        let sym = self.symtab.new_var(class, &field.name, flags, ty);
        self.declare_member(class, env, members, sym, field.pos)
    }

    fn enter_method(
        &mut self,
        class: SymbolId,
        env: EnvId,
        members: ScopeId,
        method: &MethodDecl,
    ) -> EnterResult<()> {
        let mut flags = Flags::from_modifiers(method.modifiers);
        if method.varargs {
            flags |= Flags::VARARGS;
        }
        if self.symtab.is_interface(class) && !method.is_constructor() {
            flags |= Flags::PUBLIC;
            if !method
                .modifiers
                .intersects(Modifiers::DEFAULT | Modifiers::STATIC | Modifiers::PRIVATE)
            {
                flags |= Flags::ABSTRACT;
            }
        }
        let sym = self.symtab.new_method(class, &method.name, flags, MethodData::default());
        let menv = self.method_env(sym, env);

        let mut type_params = Vec::with_capacity(method.type_params.len());
        if let Some(scope) = self.envs.get(menv).map(|e| e.scope) {
            for param in &method.type_params {
                let tv = self.symtab.new_type_var(sym, &param.name);
                self.symtab.enter(scope, tv)?;
                type_params.push(tv);
            }
        }
        self.attrib_type_var_bounds(menv, &type_params, &method.type_params)?;

        let mut param_types = Vec::with_capacity(method.params.len());
        let mut params = Vec::with_capacity(method.params.len());
        for param in &method.params {
            let ty = self.attrib_type_or_placeholder(menv, &param.ty)?;
            params.push(self.symtab.new_var(sym, &param.name, Flags::empty(), ty.clone()));
            param_types.push(ty);
        }
        let return_type = match &method.return_type {
            Some(ty) => self.attrib_type_or_placeholder(menv, ty)?,
            None => Type::None,
        };
        let mut thrown = Vec::with_capacity(method.thrown.len());
        for ty in &method.thrown {
            thrown.push(self.attrib_type_or_placeholder(menv, ty)?);
        }

        if let Some(SymbolData::Method(data)) = self.symtab.symbol_mut(sym).map(|s| &mut s.data) {
            **data = MethodData {
                type_params,
                params,
                param_types,
                return_type,
                thrown,
            };
        }
        self.declare_member(class, env, members, sym, method.pos)
    }

    /// Environment of a method signature: a fresh scope for the method's
    /// type parameters in front of the class environment.
    fn method_env(&mut self, method: SymbolId, class_env: EnvId) -> EnvId {
        let Some(outer) = self.envs.get(class_env).copied() else {
            return class_env;
        };
        let scope = self.symtab.new_scope(Some(method));
        self.envs.alloc(Env {
            kind: EnvKind::Method,
            scope,
            enclosing_class: outer.enclosing_class,
            unit: outer.unit,
            outer: Some(class_env),
            decl: outer.decl,
        })
    }

    /// Enter a member, reporting a conflicting earlier declaration.
    fn declare_member(
        &mut self,
        class: SymbolId,
        env: EnvId,
        members: ScopeId,
        sym: SymbolId,
        pos: u32,
    ) -> EnterResult<()> {
        match self.symtab.declare(members, sym) {
            Ok(()) => Ok(()),
            Err(ScopeError::DuplicateDeclaration { .. }) => {
                let args = vec![
                    self.member_kind(sym).to_string(),
                    self.member_signature(class, sym),
                    self.symtab.full_name(class).to_string(),
                ];
                self.report_at_env(env, pos, DiagnosticKind::AlreadyDefined, args);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn member_kind(&self, sym: SymbolId) -> &'static str {
        match self.symtab.symbol(sym).map(|s| (&s.data, s.name)) {
            Some((SymbolData::Method(_), name))
                if self.symtab.interner.resolve(name) == MethodDecl::CONSTRUCTOR_NAME =>
            {
                "constructor"
            }
            Some((SymbolData::Method(_), _)) => "method",
            _ => "variable",
        }
    }

    /// `name` for variables, `m(int,java.lang.String)` for methods, with
    /// constructors shown under the class's simple name.
    fn member_signature(&self, class: SymbolId, sym: SymbolId) -> String {
        let Some(method) = self.symtab.symbol(sym).and_then(|s| s.method()) else {
            return self.symtab.name(sym).to_string();
        };
        let name = match self.symtab.name(sym) {
            MethodDecl::CONSTRUCTOR_NAME => self.symtab.name(class),
            other => other,
        };
        let params: Vec<String> = method
            .param_types
            .iter()
            .map(|ty| self.symtab.type_to_string(ty))
            .collect();
        format!("{name}({})", params.join(","))
    }
}
