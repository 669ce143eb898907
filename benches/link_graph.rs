//! Benchmarks for cross-file linking and rendering
//!
//! Builds synthetic graphs where every module imports its neighbours and
//! every provider depends on providers of the previous module.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nestscope::export::{export_to_string, ExportFormat};
use nestscope::graph::ModuleGraph;
use nestscope::parser::{ImportRecord, ModuleRecord, ProviderRecord};

/// Create a graph of `modules` modules with `providers` providers each
fn create_graph(modules: usize, providers: usize) -> ModuleGraph {
    let mut graph = ModuleGraph::new();

    for m in 0..modules {
        let mut module = ModuleRecord::new(format!("Module{}", m), Some(format!("m{}.module.ts", m)));
        if m > 0 {
            module.imports.push(ImportRecord::simple(format!("Module{}", m - 1), None));
        }
        if m + 1 < modules {
            module
                .imports
                .push(ImportRecord::call(format!("Module{}", m + 1), None, true));
        }
        for p in 0..providers {
            let deps = if m > 0 {
                vec![format!("Service{}_{}", m - 1, p), format!("External{}", p)]
            } else {
                Vec::new()
            };
            module
                .providers
                .push(ProviderRecord::class(format!("Service{}_{}", m, p), deps, true));
        }
        graph.register(module, vec![]);
    }

    graph
}

/// Benchmark a full link pass over an unlinked graph
fn bench_link(c: &mut Criterion) {
    let mut group = c.benchmark_group("link");

    for size in [10, 100, 500, 1000].iter() {
        let graph = create_graph(*size, 5);

        group.bench_with_input(BenchmarkId::new("modules", size), &graph, |b, graph| {
            b.iter(|| {
                let mut graph = graph.clone();
                black_box(graph.link())
            });
        });
    }

    group.finish();
}

/// Benchmark import cycle detection
fn bench_import_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("import_cycles");

    for size in [100, 500, 1000].iter() {
        let mut graph = create_graph(*size, 2);
        graph.link();

        group.bench_with_input(BenchmarkId::new("modules", size), &graph, |b, graph| {
            b.iter(|| black_box(graph.import_cycles()));
        });
    }

    group.finish();
}

/// Benchmark both renderers on a linked graph
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let mut graph = create_graph(500, 5);
    graph.link();

    for format in [ExportFormat::Json, ExportFormat::Dot] {
        group.bench_with_input(
            BenchmarkId::new("format", format),
            &graph,
            |b, graph| {
                b.iter(|| black_box(export_to_string(format, graph)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_link, bench_import_cycles, bench_render);
criterion_main!(benches);
