//! Type expressions as written in declarations.

use serde::Serialize;

/// Primitive type keywords, `void` included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Primitive {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl Primitive {
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Short => "short",
            Primitive::Char => "char",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Void => "void",
        }
    }
}

/// A type as it appears in an `extends`/`implements` clause, a bound, a
/// field, a parameter or a return type.
///
/// Positions are byte offsets into the unit's file. A position of `0` means
/// "not yet assigned"; [`crate::SourceForest`] numbers those when the
/// declaration is added.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum TypeExpr {
    /// A simple name: `A`.
    Ident { name: String, pos: u32 },
    /// A qualified name: `p.q.A`.
    Select {
        qualifier: Box<TypeExpr>,
        name: String,
        pos: u32,
    },
    /// A parameterized type: `List<String>`.
    Apply {
        base: Box<TypeExpr>,
        args: Vec<TypeExpr>,
        pos: u32,
    },
    /// An array type: `T[]`.
    Array { elem: Box<TypeExpr>, pos: u32 },
    Primitive { kind: Primitive, pos: u32 },
}

impl TypeExpr {
    /// Build an `Ident` or a chain of `Select`s from a dotted name.
    ///
    /// ```
    /// use kestrel_tree::TypeExpr;
    /// let ty = TypeExpr::name("p.q.A");
    /// assert_eq!(ty.qualified_name().as_deref(), Some("p.q.A"));
    /// ```
    #[must_use]
    pub fn name(dotted: &str) -> TypeExpr {
        let mut parts = dotted.split('.');
        let first = parts.next().unwrap_or_default();
        let mut expr = TypeExpr::Ident {
            name: first.to_string(),
            pos: 0,
        };
        for part in parts {
            expr = TypeExpr::Select {
                qualifier: Box::new(expr),
                name: part.to_string(),
                pos: 0,
            };
        }
        expr
    }

    /// `base<args..>`.
    #[must_use]
    pub fn apply(base: TypeExpr, args: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr::Apply {
            base: Box::new(base),
            args,
            pos: 0,
        }
    }

    #[must_use]
    pub fn array(elem: TypeExpr) -> TypeExpr {
        TypeExpr::Array {
            elem: Box::new(elem),
            pos: 0,
        }
    }

    #[must_use]
    pub fn primitive(kind: Primitive) -> TypeExpr {
        TypeExpr::Primitive { kind, pos: 0 }
    }

    /// Set the position of the outermost node.
    #[must_use]
    pub fn at(mut self, offset: u32) -> TypeExpr {
        *self.pos_mut() = offset;
        self
    }

    #[must_use]
    pub fn pos(&self) -> u32 {
        match self {
            TypeExpr::Ident { pos, .. }
            | TypeExpr::Select { pos, .. }
            | TypeExpr::Apply { pos, .. }
            | TypeExpr::Array { pos, .. }
            | TypeExpr::Primitive { pos, .. } => *pos,
        }
    }

    pub(crate) fn pos_mut(&mut self) -> &mut u32 {
        match self {
            TypeExpr::Ident { pos, .. }
            | TypeExpr::Select { pos, .. }
            | TypeExpr::Apply { pos, .. }
            | TypeExpr::Array { pos, .. }
            | TypeExpr::Primitive { pos, .. } => pos,
        }
    }

    /// Visit this node and every nested type expression, outermost first.
    pub(crate) fn for_each_mut(&mut self, f: &mut impl FnMut(&mut TypeExpr)) {
        f(self);
        match self {
            TypeExpr::Select { qualifier, .. } => qualifier.for_each_mut(f),
            TypeExpr::Apply { base, args, .. } => {
                base.for_each_mut(f);
                for arg in args {
                    arg.for_each_mut(f);
                }
            }
            TypeExpr::Array { elem, .. } => elem.for_each_mut(f),
            TypeExpr::Ident { .. } | TypeExpr::Primitive { .. } => {}
        }
    }

    /// The generic class part of a parameterized type, `self` otherwise.
    #[must_use]
    pub fn strip_args(&self) -> &TypeExpr {
        match self {
            TypeExpr::Apply { base, .. } => base.strip_args(),
            other => other,
        }
    }

    /// The dotted name of an `Ident`/`Select` chain.
    #[must_use]
    pub fn qualified_name(&self) -> Option<String> {
        match self {
            TypeExpr::Ident { name, .. } => Some(name.clone()),
            TypeExpr::Select {
                qualifier, name, ..
            } => qualifier
                .qualified_name()
                .map(|q| format!("{q}.{name}")),
            _ => None,
        }
    }

    /// The rightmost simple name, if this is a (possibly parameterized) name.
    #[must_use]
    pub fn simple_name(&self) -> Option<&str> {
        match self.strip_args() {
            TypeExpr::Ident { name, .. } | TypeExpr::Select { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl std::fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeExpr::Ident { name, .. } => write!(f, "{name}"),
            TypeExpr::Select {
                qualifier, name, ..
            } => write!(f, "{qualifier}.{name}"),
            TypeExpr::Apply { base, args, .. } => {
                write!(f, "{base}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ">")
            }
            TypeExpr::Array { elem, .. } => write!(f, "{elem}[]"),
            TypeExpr::Primitive { kind, .. } => write!(f, "{}", kind.keyword()),
        }
    }
}
