//! Compilation units and the arena holding every class declaration.

use crate::decl::{AnnotationExpr, ClassDecl, EnumConstantDecl, MemberDecl};
use crate::type_expr::TypeExpr;
use serde::Serialize;

/// Index of a class declaration in a [`SourceForest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DeclId(pub u32);

/// Index of a compilation unit in a [`SourceForest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UnitId(pub u32);

/// One import clause: `(on_demand, is_static, qualified_name)`.
///
/// For on-demand imports `qualified_name` is the part before `.*`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImportDecl {
    pub qualified_name: String,
    pub on_demand: bool,
    pub is_static: bool,
    pub pos: u32,
}

impl ImportDecl {
    fn new(qualified_name: &str, on_demand: bool, is_static: bool) -> Self {
        Self {
            qualified_name: qualified_name.to_string(),
            on_demand,
            is_static,
            pos: 0,
        }
    }

    /// `import p.T;`
    #[must_use]
    pub fn single(qualified_name: &str) -> Self {
        Self::new(qualified_name, false, false)
    }

    /// `import p.*;` (or `import p.T.*;`)
    #[must_use]
    pub fn on_demand(qualifier: &str) -> Self {
        Self::new(qualifier, true, false)
    }

    /// `import static p.T.m;`
    #[must_use]
    pub fn static_single(qualified_name: &str) -> Self {
        Self::new(qualified_name, false, true)
    }

    /// `import static p.T.*;`
    #[must_use]
    pub fn static_on_demand(qualifier: &str) -> Self {
        Self::new(qualifier, true, true)
    }

    #[must_use]
    pub fn at(mut self, offset: u32) -> Self {
        self.pos = offset;
        self
    }

    /// Split `p.T.m` into (`p.T`, `m`). A bare name has an empty qualifier.
    #[must_use]
    pub fn split_last(&self) -> (&str, &str) {
        match self.qualified_name.rsplit_once('.') {
            Some((qualifier, name)) => (qualifier, name),
            None => ("", &self.qualified_name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PackageDecl {
    pub name: String,
    pub annotations: Vec<AnnotationExpr>,
    pub pos: u32,
}

/// One source file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompilationUnit {
    pub file: String,
    pub package: Option<PackageDecl>,
    pub imports: Vec<ImportDecl>,
    /// Top-level class declarations in source order.
    pub classes: Vec<DeclId>,
}

impl CompilationUnit {
    #[must_use]
    pub fn new(file: &str) -> Self {
        Self {
            file: file.to_string(),
            package: None,
            imports: Vec::new(),
            classes: Vec::new(),
        }
    }

    #[must_use]
    pub fn package(mut self, name: &str) -> Self {
        self.package = Some(PackageDecl {
            name: name.to_string(),
            annotations: Vec::new(),
            pos: 0,
        });
        self
    }

    /// Add an annotation to the package clause. No-op without one.
    #[must_use]
    pub fn package_annotation(mut self, annotation: AnnotationExpr) -> Self {
        if let Some(package) = &mut self.package {
            package.annotations.push(annotation);
        }
        self
    }

    #[must_use]
    pub fn import(mut self, import: ImportDecl) -> Self {
        self.imports.push(import);
        self
    }

    /// The declared package, or `""` for the unnamed package.
    #[must_use]
    pub fn package_name(&self) -> &str {
        self.package.as_ref().map_or("", |p| p.name.as_str())
    }

    /// File name without directories and extension: `src/p/A.java` -> `A`.
    #[must_use]
    pub fn file_stem(&self) -> &str {
        let base = self.file.rsplit(['/', '\\']).next().unwrap_or(&self.file);
        base.split_once('.').map_or(base, |(stem, _)| stem)
    }
}

#[derive(Clone, Debug, Serialize)]
struct DeclEntry {
    decl: ClassDecl,
    unit: UnitId,
    outer: Option<DeclId>,
}

/// All compilation units of a compilation plus the declaration arena.
///
/// Declarations are immutable once added. Nodes added without an explicit
/// offset get a fresh one, so positions within a forest are distinct.
#[derive(Clone, Debug, Serialize)]
pub struct SourceForest {
    units: Vec<CompilationUnit>,
    decls: Vec<DeclEntry>,
    next_pos: u32,
}

impl Default for SourceForest {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceForest {
    #[must_use]
    pub fn new() -> Self {
        Self {
            units: Vec::new(),
            decls: Vec::new(),
            next_pos: 1,
        }
    }

    pub fn add_unit(&mut self, mut unit: CompilationUnit) -> UnitId {
        if let Some(package) = &mut unit.package {
            self.number(&mut package.pos);
            for annotation in &mut package.annotations {
                self.number(&mut annotation.pos);
                let mut next = self.next_pos;
                annotation.ty.for_each_mut(&mut |node: &mut TypeExpr| {
                    let pos = node.pos_mut();
                    if *pos == 0 {
                        *pos = next;
                        next += 1;
                    }
                });
                self.next_pos = next;
            }
        }
        for import in &mut unit.imports {
            self.number(&mut import.pos);
        }
        let id = UnitId(self.units.len() as u32);
        self.units.push(unit);
        id
    }

    /// Add a top-level class to `unit`.
    pub fn add_class(&mut self, unit: UnitId, decl: ClassDecl) -> DeclId {
        let id = self.push(decl, unit, None);
        if let Some(u) = self.units.get_mut(unit.0 as usize) {
            u.classes.push(id);
        }
        id
    }

    /// Add a member class of `outer`.
    pub fn add_member_class(&mut self, outer: DeclId, decl: ClassDecl) -> DeclId {
        let unit = self.unit_of(outer);
        let id = self.push(decl, unit, Some(outer));
        if let Some(entry) = self.decls.get_mut(outer.0 as usize) {
            entry.decl.members.push(MemberDecl::Class(id));
        }
        id
    }

    /// Add an enum constant `name { body }` to the enum `outer`.
    pub fn add_constant_with_body(&mut self, outer: DeclId, name: &str, body: ClassDecl) -> DeclId {
        let unit = self.unit_of(outer);
        let id = self.push(body, unit, Some(outer));
        let mut pos = 0;
        self.number(&mut pos);
        if let Some(entry) = self.decls.get_mut(outer.0 as usize) {
            entry
                .decl
                .members
                .push(MemberDecl::EnumConstant(EnumConstantDecl {
                    name: name.to_string(),
                    body: Some(id),
                    pos,
                }));
        }
        id
    }

    /// Add an anonymous or local class declared in code inside `outer`.
    ///
    /// Unlike member classes it is not listed among `outer`'s members; it is
    /// entered when the code containing it is attributed.
    pub fn add_local_class(&mut self, outer: DeclId, decl: ClassDecl) -> DeclId {
        let unit = self.unit_of(outer);
        self.push(decl, unit, Some(outer))
    }

    fn push(&mut self, mut decl: ClassDecl, unit: UnitId, outer: Option<DeclId>) -> DeclId {
        let mut next = self.next_pos;
        decl.for_each_pos_mut(&mut |pos: &mut u32| {
            if *pos == 0 {
                *pos = next;
                next += 1;
            }
        });
        self.next_pos = next;
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(DeclEntry { decl, unit, outer });
        id
    }

    fn number(&mut self, pos: &mut u32) {
        if *pos == 0 {
            *pos = self.next_pos;
            self.next_pos += 1;
        }
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this forest.
    #[must_use]
    pub fn decl(&self, id: DeclId) -> &ClassDecl {
        &self.decls[id.0 as usize].decl
    }

    #[must_use]
    pub fn get_decl(&self, id: DeclId) -> Option<&ClassDecl> {
        self.decls.get(id.0 as usize).map(|e| &e.decl)
    }

    #[must_use]
    pub fn unit_of(&self, id: DeclId) -> UnitId {
        self.decls.get(id.0 as usize).map_or(UnitId(0), |e| e.unit)
    }

    /// The enclosing declaration of a member, local or anonymous class.
    #[must_use]
    pub fn outer_of(&self, id: DeclId) -> Option<DeclId> {
        self.decls.get(id.0 as usize).and_then(|e| e.outer)
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this forest.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> &CompilationUnit {
        &self.units[id.0 as usize]
    }

    #[must_use]
    pub fn get_unit(&self, id: UnitId) -> Option<&CompilationUnit> {
        self.units.get(id.0 as usize)
    }

    pub fn units(&self) -> impl Iterator<Item = (UnitId, &CompilationUnit)> {
        self.units
            .iter()
            .enumerate()
            .map(|(i, u)| (UnitId(i as u32), u))
    }

    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }
}
