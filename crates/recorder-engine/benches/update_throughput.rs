use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use recorder_core::Record;
use recorder_engine::{EngineConfig, VersioningEngine};
use recorder_store::MemoryGraph;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::runtime::Runtime;

#[derive(Clone, Serialize, Deserialize)]
struct Counter {
    label: String,
    value: u64,
}

impl Record for Counter {
    const LABEL: &'static str = "Counter";
}

fn engine() -> VersioningEngine<MemoryGraph, Counter> {
    VersioningEngine::new(MemoryGraph::new(), EngineConfig::default())
}

fn bench_create(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let engine = engine();

    c.bench_function("create", |b| {
        b.iter(|| {
            rt.block_on(async {
                engine
                    .create(Counter {
                        label: "bench".to_string(),
                        value: 0,
                    })
                    .await
                    .unwrap()
            })
        })
    });
}

fn bench_update(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let engine = engine();
    let entity = rt.block_on(async {
        engine
            .create(Counter {
                label: "bench".to_string(),
                value: 0,
            })
            .await
            .unwrap()
            .id
    });

    let mut value = 0u64;
    c.bench_function("update", |b| {
        b.iter(|| {
            value += 1;
            rt.block_on(async {
                engine
                    .update(black_box(entity), json!({ "value": value }))
                    .await
                    .unwrap()
            })
        })
    });
}

fn bench_history(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    for length in [10u64, 100, 1000].iter() {
        let engine = engine();
        let entity = rt.block_on(async {
            let id = engine
                .create(Counter {
                    label: "bench".to_string(),
                    value: 0,
                })
                .await
                .unwrap()
                .id;
            for value in 1..*length {
                engine.update(id, json!({ "value": value })).await.unwrap();
            }
            id
        });

        c.bench_with_input(BenchmarkId::new("history", length), length, |b, _| {
            b.iter(|| rt.block_on(async { engine.history(black_box(entity)).await.unwrap() }))
        });
    }
}

criterion_group!(benches, bench_create, bench_update, bench_history);
criterion_main!(benches);
