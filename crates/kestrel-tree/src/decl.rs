//! Class, member and annotation declarations.
//!
//! Every node type has a small builder surface (`ClassDecl::class("A")
//! .extends(..)`, `MethodDecl::new("m")..`) so collaborators and tests can
//! assemble trees without a parser.

use crate::forest::DeclId;
use crate::type_expr::TypeExpr;
use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Source-level modifiers as written on a declaration.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct Modifiers: u32 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const ABSTRACT = 1 << 5;
        const NATIVE = 1 << 6;
        const SYNCHRONIZED = 1 << 7;
        const TRANSIENT = 1 << 8;
        const VOLATILE = 1 << 9;
        const STRICTFP = 1 << 10;
        const DEFAULT = 1 << 11;

        const ACCESS = Self::PUBLIC.bits() | Self::PROTECTED.bits() | Self::PRIVATE.bits();
    }
}

/// What sort of type a [`ClassDecl`] declares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

impl ClassKind {
    /// Interfaces and annotation types.
    #[must_use]
    pub fn is_interface(self) -> bool {
        matches!(self, ClassKind::Interface | ClassKind::Annotation)
    }
}

/// `@T` or `@T(args..)` on a declaration. Argument expressions are kept as
/// raw text; only their presence matters here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnnotationExpr {
    pub ty: TypeExpr,
    pub args: Vec<String>,
    pub pos: u32,
}

impl AnnotationExpr {
    #[must_use]
    pub fn new(ty: TypeExpr) -> Self {
        Self {
            ty,
            args: Vec::new(),
            pos: 0,
        }
    }

    #[must_use]
    pub fn arg(mut self, raw: &str) -> Self {
        self.args.push(raw.to_string());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TypeParamDecl {
    pub name: String,
    pub bounds: Vec<TypeExpr>,
    pub pos: u32,
}

impl TypeParamDecl {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            bounds: Vec::new(),
            pos: 0,
        }
    }

    #[must_use]
    pub fn bound(mut self, ty: TypeExpr) -> Self {
        self.bounds.push(ty);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub modifiers: Modifiers,
    pub pos: u32,
}

impl FieldDecl {
    #[must_use]
    pub fn new(name: &str, ty: TypeExpr) -> Self {
        Self {
            name: name.to_string(),
            ty,
            modifiers: Modifiers::empty(),
            pos: 0,
        }
    }

    #[must_use]
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParamDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub pos: u32,
}

/// A method or constructor. Constructors are named `<init>` and have no
/// return type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MethodDecl {
    pub name: String,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParamDecl>,
    pub params: Vec<ParamDecl>,
    pub return_type: Option<TypeExpr>,
    pub thrown: Vec<TypeExpr>,
    pub varargs: bool,
    pub pos: u32,
}

impl MethodDecl {
    pub const CONSTRUCTOR_NAME: &'static str = "<init>";

    /// A method returning `void` until [`MethodDecl::returns`] says otherwise.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            modifiers: Modifiers::empty(),
            type_params: Vec::new(),
            params: Vec::new(),
            return_type: Some(TypeExpr::primitive(crate::Primitive::Void)),
            thrown: Vec::new(),
            varargs: false,
            pos: 0,
        }
    }

    #[must_use]
    pub fn constructor() -> Self {
        Self {
            return_type: None,
            ..Self::new(Self::CONSTRUCTOR_NAME)
        }
    }

    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == Self::CONSTRUCTOR_NAME
    }

    #[must_use]
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn type_param(mut self, param: TypeParamDecl) -> Self {
        self.type_params.push(param);
        self
    }

    #[must_use]
    pub fn param(mut self, name: &str, ty: TypeExpr) -> Self {
        self.params.push(ParamDecl {
            name: name.to_string(),
            ty,
            pos: 0,
        });
        self
    }

    #[must_use]
    pub fn returns(mut self, ty: TypeExpr) -> Self {
        self.return_type = Some(ty);
        self
    }

    #[must_use]
    pub fn throws(mut self, ty: TypeExpr) -> Self {
        self.thrown.push(ty);
        self
    }

    /// Mark the last parameter as variable-arity.
    #[must_use]
    pub fn varargs(mut self) -> Self {
        self.varargs = true;
        self
    }
}

/// An enum constant, optionally with a class body (`A { .. }`), which is an
/// anonymous subclass of the enum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnumConstantDecl {
    pub name: String,
    pub body: Option<DeclId>,
    pub pos: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum MemberDecl {
    Field(FieldDecl),
    Method(MethodDecl),
    EnumConstant(EnumConstantDecl),
    /// A member class, stored in the forest under its own id.
    Class(DeclId),
}

/// One class, interface, enum or annotation type declaration.
///
/// An empty `name` marks an anonymous class. For interfaces, the parser puts
/// the `extends` list into `implements`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassDecl {
    pub name: String,
    pub kind: ClassKind,
    pub modifiers: Modifiers,
    pub annotations: Vec<AnnotationExpr>,
    pub type_params: Vec<TypeParamDecl>,
    pub extends: Option<TypeExpr>,
    pub implements: Vec<TypeExpr>,
    pub members: Vec<MemberDecl>,
    pub pos: u32,
}

impl ClassDecl {
    #[must_use]
    pub fn new(kind: ClassKind, name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            modifiers: Modifiers::empty(),
            annotations: Vec::new(),
            type_params: Vec::new(),
            extends: None,
            implements: Vec::new(),
            members: Vec::new(),
            pos: 0,
        }
    }

    #[must_use]
    pub fn class(name: &str) -> Self {
        Self::new(ClassKind::Class, name)
    }

    #[must_use]
    pub fn interface(name: &str) -> Self {
        Self::new(ClassKind::Interface, name)
    }

    #[must_use]
    pub fn enumeration(name: &str) -> Self {
        Self::new(ClassKind::Enum, name)
    }

    #[must_use]
    pub fn annotation_type(name: &str) -> Self {
        Self::new(ClassKind::Annotation, name)
    }

    /// An anonymous class whose `extends` (or, for an interface, its single
    /// `implements`) clause is the instantiated type.
    #[must_use]
    pub fn anonymous(base: TypeExpr) -> Self {
        Self {
            extends: Some(base),
            ..Self::class("")
        }
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    #[must_use]
    pub fn at(mut self, offset: u32) -> Self {
        self.pos = offset;
        self
    }

    #[must_use]
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn annotate(mut self, annotation: AnnotationExpr) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn type_param(mut self, param: TypeParamDecl) -> Self {
        self.type_params.push(param);
        self
    }

    #[must_use]
    pub fn extends(mut self, ty: TypeExpr) -> Self {
        self.extends = Some(ty);
        self
    }

    #[must_use]
    pub fn implements(mut self, ty: TypeExpr) -> Self {
        self.implements.push(ty);
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldDecl) -> Self {
        self.members.push(MemberDecl::Field(field));
        self
    }

    #[must_use]
    pub fn method(mut self, method: MethodDecl) -> Self {
        self.members.push(MemberDecl::Method(method));
        self
    }

    #[must_use]
    pub fn enum_constant(mut self, name: &str) -> Self {
        self.members.push(MemberDecl::EnumConstant(EnumConstantDecl {
            name: name.to_string(),
            body: None,
            pos: 0,
        }));
        self
    }

    /// Declared constructors, in source order.
    pub fn constructors(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            MemberDecl::Method(method) if method.is_constructor() => Some(method),
            _ => None,
        })
    }

    /// Ids of member classes and enum constant bodies, in source order.
    pub fn nested_classes(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.members.iter().filter_map(|m| match m {
            MemberDecl::Class(id) => Some(*id),
            MemberDecl::EnumConstant(constant) => constant.body,
            _ => None,
        })
    }

    /// Visit every type expression, annotation and member position of this
    /// declaration (nested classes excluded).
    pub(crate) fn for_each_pos_mut(&mut self, f: &mut impl FnMut(&mut u32)) {
        f(&mut self.pos);
        for annotation in &mut self.annotations {
            f(&mut annotation.pos);
            visit_ty(&mut annotation.ty, f);
        }
        for param in &mut self.type_params {
            f(&mut param.pos);
            for bound in &mut param.bounds {
                visit_ty(bound, f);
            }
        }
        if let Some(ty) = &mut self.extends {
            visit_ty(ty, f);
        }
        for ty in &mut self.implements {
            visit_ty(ty, f);
        }
        for member in &mut self.members {
            match member {
                MemberDecl::Field(field) => {
                    f(&mut field.pos);
                    visit_ty(&mut field.ty, f);
                }
                MemberDecl::Method(method) => {
                    f(&mut method.pos);
                    for param in &mut method.type_params {
                        f(&mut param.pos);
                        for bound in &mut param.bounds {
                            visit_ty(bound, f);
                        }
                    }
                    for param in &mut method.params {
                        f(&mut param.pos);
                        visit_ty(&mut param.ty, f);
                    }
                    if let Some(ty) = &mut method.return_type {
                        visit_ty(ty, f);
                    }
                    for ty in &mut method.thrown {
                        visit_ty(ty, f);
                    }
                }
                MemberDecl::EnumConstant(constant) => f(&mut constant.pos),
                MemberDecl::Class(_) => {}
            }
        }
    }
}

fn visit_ty(ty: &mut TypeExpr, f: &mut impl FnMut(&mut u32)) {
    ty.for_each_mut(&mut |node: &mut TypeExpr| f(node.pos_mut()));
}
