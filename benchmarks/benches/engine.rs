//! Benchmarks for snapshot loading and rule dispatch.
//!
//! Run with: cargo bench --bench engine

use collection_lint::semantic::Snapshot;
use collection_lint::{CancellationToken, Config, Engine};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};

const OPERATIONS: &[&str] = &["First", "Count", "Contains", "ToList", "Where", "Select"];

/// A snapshot with `calls` facade invocations over a mix of receiver types.
fn synthetic_snapshot(calls: usize) -> String {
    let receiver_types = [
        json!({ "kind": "named", "name": "System.Collections.Generic.List`1" }),
        json!({ "kind": "named", "name": "Shop.OrderStream" }),
        json!({ "kind": "array", "element": { "kind": "named", "name": "System.Int32" } }),
        json!({ "kind": "type_parameter", "name": "T" }),
    ];

    let mut nodes: Vec<Value> = Vec::with_capacity(calls * 3);
    for i in 0..calls {
        let base = (i * 3 + 1) as u32;
        let operation = OPERATIONS[i % OPERATIONS.len()];
        let line = i + 1;
        nodes.push(json!({
            "id": base, "kind": "identifier", "name": format!("items{i}"),
            "span": { "line": line, "column": 9 },
            "type": receiver_types[i % receiver_types.len()],
        }));
        nodes.push(json!({
            "id": base + 1, "kind": "member_access", "receiver": base, "name": operation,
            "span": { "line": line, "column": 9 },
        }));
        nodes.push(json!({
            "id": base + 2, "kind": "invocation", "callee": base + 1,
            "span": { "line": line, "column": 9 },
            "symbol": {
                "kind": "method", "name": operation,
                "containing_type": "System.Linq.Enumerable",
                "parameter_count": usize::from(operation == "Contains"),
            },
        }));
    }

    json!({
        "file": "src/Generated.cs",
        "types": {
            "System.Collections.Generic.List`1": {
                "interfaces": ["System.Collections.IList", "System.Collections.ICollection",
                               "System.Collections.IEnumerable"]
            },
            "Shop.OrderStream": { "interfaces": ["System.Collections.IEnumerable"] }
        },
        "nodes": nodes,
    })
    .to_string()
}

fn bench_snapshot_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_load");
    for calls in [100, 1_000, 10_000] {
        let content = synthetic_snapshot(calls);
        group.bench_with_input(BenchmarkId::from_parameter(calls), &content, |b, content| {
            b.iter(|| {
                Snapshot::from_json(black_box(content))
                    .map(Snapshot::into_parts)
                    .is_ok()
            })
        });
    }
    group.finish();
}

fn bench_analyze_tree(c: &mut Criterion) {
    let engine = Engine::new(&Config::default()).unwrap();
    let cancel = CancellationToken::new();

    let mut group = c.benchmark_group("analyze_tree");
    for calls in [100, 1_000, 10_000] {
        let (tree, model) = Snapshot::from_json(&synthetic_snapshot(calls))
            .unwrap()
            .into_parts()
            .unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(calls), &tree, |b, tree| {
            b.iter(|| engine.analyze_tree(black_box(tree), &model, &cancel).unwrap().len())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_snapshot_load, bench_analyze_tree);
criterion_main!(benches);
