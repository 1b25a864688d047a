//! Class completion throughput.
//!
//! Builds a synthetic program of N classes spread over several packages,
//! each extending the previous one, implementing a generic library
//! interface and declaring a handful of members, then completes it.
//! Completion of one class pulls in its whole superclass chain, so the
//! `single_leaf` case measures the nested-completion path while
//! `complete_all` measures the declaration-order sweep.

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use kestrel::tree::{FieldDecl, ImportDecl, MethodDecl, Modifiers, Primitive, TypeExpr, TypeParamDecl};
use kestrel::{ClassDecl, CompilationSession, CompilationUnit, EnterOptions, Flags, SourceForest, Symtab};
use std::time::Duration;

const PACKAGES: usize = 8;

fn library() -> Symtab {
    let mut symtab = Symtab::with_prelude();
    let list = symtab.enter_binary_class("util.List", Flags::PUBLIC | Flags::INTERFACE | Flags::ABSTRACT);
    symtab.add_binary_type_param(list, "E");
    symtab
}

fn package_of(i: usize) -> String {
    format!("bench.p{}", i % PACKAGES)
}

/// Class `C{i}` extends `C{i-1}` and lives in package `bench.p{i % 8}`.
fn generate_program(class_count: usize) -> SourceForest {
    let mut forest = SourceForest::new();
    for i in 0..class_count {
        let mut unit = CompilationUnit::new(&format!("{}/C{i}.java", package_of(i).replace('.', "/")))
            .package(&package_of(i))
            .import(ImportDecl::on_demand("util"));
        if i > 0 {
            unit = unit.import(ImportDecl::single(&format!("{}.C{}", package_of(i - 1), i - 1)));
        }
        let unit = forest.add_unit(unit);

        let mut class = ClassDecl::class(&format!("C{i}"))
            .modifiers(Modifiers::PUBLIC)
            .type_param(TypeParamDecl::new("T"))
            .implements(TypeExpr::apply(TypeExpr::name("List"), vec![TypeExpr::name("T")]))
            .field(FieldDecl::new("count", TypeExpr::primitive(Primitive::Int)))
            .field(FieldDecl::new("name", TypeExpr::name("String")))
            .method(
                MethodDecl::new("get")
                    .param("index", TypeExpr::primitive(Primitive::Int))
                    .returns(TypeExpr::name("T")),
            )
            .method(MethodDecl::constructor().param("name", TypeExpr::name("String")));
        if i > 0 {
            class = class.extends(TypeExpr::apply(
                TypeExpr::name(&format!("C{}", i - 1)),
                vec![TypeExpr::name("String")],
            ));
        }
        forest.add_class(unit, class);
    }
    forest
}

fn bench_completion(c: &mut Criterion) {
    let mut group = c.benchmark_group("completion");
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(30);

    for class_count in [50, 200, 800] {
        let forest = generate_program(class_count);

        group.bench_with_input(
            BenchmarkId::new("complete_all", class_count),
            &forest,
            |b, forest| {
                b.iter_batched(
                    || CompilationSession::new(library(), forest.clone(), EnterOptions::default()),
                    |mut session| {
                        session.complete_all().ok();
                        criterion::black_box(session.diagnostics().len());
                    },
                    BatchSize::LargeInput,
                );
            },
        );

        let leaf = format!("{}.C{}", package_of(class_count - 1), class_count - 1);
        group.bench_with_input(
            BenchmarkId::new("single_leaf", class_count),
            &forest,
            |b, forest| {
                b.iter_batched(
                    || CompilationSession::new(library(), forest.clone(), EnterOptions::default()),
                    |mut session| {
                        if let Some(class) = session.class_named(&leaf) {
                            session.complete(class).ok();
                        }
                        criterion::black_box(session.diagnostics().len());
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

/// Dependency tracking adds a push/pop per phase body; measure what that costs.
fn bench_dependency_tracking(c: &mut Criterion) {
    let mut group = c.benchmark_group("dependency_tracking");
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(20);

    let forest = generate_program(200);
    for track in [false, true] {
        let options = EnterOptions {
            track_dependencies: track,
            ..EnterOptions::default()
        };
        group.bench_with_input(
            BenchmarkId::new("complete_all", if track { "tracked" } else { "untracked" }),
            &forest,
            |b, forest| {
                b.iter_batched(
                    || CompilationSession::new(library(), forest.clone(), options.clone()),
                    |mut session| {
                        session.complete_all().ok();
                        criterion::black_box(session.dependencies().edges().len());
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_completion, bench_dependency_tracking);
criterion_main!(benches);
