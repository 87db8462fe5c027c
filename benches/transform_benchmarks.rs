// SPDX-License-Identifier: MIT OR Apache-2.0
//! Benchmarks for the transform engine, flatten projection, and schema
//! inferencer, over a representative nested document and a batch of
//! them.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;

fn sample_document() -> serde_json::Value {
    json!({
        "id": 1,
        "name": "widget",
        "tags": ["a", "b", "c"],
        "meta": {
            "created": "2024-01-01",
            "notes": "",
            "owner": null,
            "nested": {"x": 1, "y": [1, 2, 3, {"z": "deep"}]}
        }
    })
}

fn bench_flatten(c: &mut Criterion) {
    let doc = sample_document();
    c.bench_function("flatten_single_document", |b| {
        b.iter(|| fionn_gron::flatten(black_box(&doc)));
    });
}

fn bench_transform_prune_and_rewrite(c: &mut Criterion) {
    let doc = sample_document();
    let mut opset = fionn_core::OperationSet::new();
    opset.push(fionn_core::Operation::RemoveEmptyStrings);
    opset.push(fionn_core::Operation::RemoveNulls);
    opset.push(fionn_core::Operation::replace_keys("^meta$", "metadata"));
    c.bench_function("transform_prune_and_rewrite", |b| {
        b.iter(|| fionn_ops::apply(black_box(&doc), black_box(&opset)));
    });
}

fn bench_schema_batch(c: &mut Criterion) {
    let docs: Vec<serde_json::Value> = (0..500).map(|i| json!({"id": i, "name": format!("item-{i}")})).collect();
    c.bench_function("schema_batch_sequential", |b| {
        b.iter(|| fionn_tape::analyze_batch(black_box(docs.clone()), false, 0));
    });
    c.bench_function("schema_batch_parallel", |b| {
        b.iter(|| fionn_tape::analyze_batch(black_box(docs.clone()), true, 4));
    });
}

criterion_group!(benches, bench_flatten, bench_transform_prune_and_rewrite, bench_schema_batch);
criterion_main!(benches);
