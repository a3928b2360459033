//! Benchmarks for row-scope and dataset-scope derivations.

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use datafusion::datasource::MemTable;
use datafusion::prelude::*;
use serde_json::json;
use std::collections::HashMap;
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;
use term_dq::core::Dependencies;
use term_dq::logging::setup::{init_logging, LoggingConfig};
use term_dq::prelude::*;
use tokio::runtime::Runtime;

const PARTITIONS: usize = 4;

fn customers(ctx: &SessionContext, rows: usize) -> DataFrame {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, true),
        Field::new("status", DataType::Utf8, false),
    ]));
    let per_partition = rows.div_ceil(PARTITIONS);
    let partitions = (0..PARTITIONS)
        .map(|p| {
            let start = (p * per_partition).min(rows);
            let end = ((p + 1) * per_partition).min(rows);
            let ids: ArrayRef = Arc::new(Int64Array::from_iter_values(
                (start..end).map(|i| i as i64),
            ));
            let names: ArrayRef = Arc::new(StringArray::from_iter(
                (start..end).map(|i| (i % 17 != 0).then(|| format!("Customer{i}"))),
            ));
            let statuses: ArrayRef = Arc::new(StringArray::from_iter_values(
                (start..end).map(|i| if i % 3 == 0 { "closed" } else { "active" }),
            ));
            vec![RecordBatch::try_new(schema.clone(), vec![ids, names, statuses]).unwrap()]
        })
        .collect();
    let table = MemTable::try_new(schema, partitions).unwrap();
    ctx.read_table(Arc::new(table)).unwrap()
}

fn row_rules() -> serde_json::Value {
    json!({
        "scope": "row",
        "rules": {
            "name_present": {"type": "checknulls", "fields": ["name"]},
            "name_format": {"type": "regex", "fields": ["name"], "regex": "Customer\\d+"},
            "valid_id": {"type": "range", "fields": ["id"], "range": [0, 1000000]},
            "known_status": {"type": "enum", "fields": ["status"], "values": ["active", "closed"]}
        }
    })
}

fn bench_row_scope(c: &mut Criterion) {
    // Already installed when both groups run in one process.
    let _ = init_logging(LoggingConfig::production());
    let rt = Runtime::new().unwrap();
    let deriver = DataQualityDeriver::configure(&row_rules()).unwrap();

    let mut group = c.benchmark_group("row_scope");
    group.measurement_time(Duration::from_secs(8));

    for rows in [1_000usize, 10_000, 100_000] {
        let ctx = SessionContext::new();
        let deps: Dependencies = HashMap::from([("customers".to_string(), customers(&ctx, rows))]);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("four_rules", rows), &deps, |b, deps| {
            b.iter(|| {
                rt.block_on(async {
                    let result = deriver.derive(black_box(&ctx), black_box(deps)).await.unwrap();
                    result.collect_partitioned().await.unwrap()
                })
            });
        });
    }

    group.finish();
}

fn bench_dataset_scope(c: &mut Criterion) {
    let _ = init_logging(LoggingConfig::production());
    let rt = Runtime::new().unwrap();
    let deriver = DataQualityDeriver::configure(&json!({
        "scope": "dataset",
        "rules": {
            "rowcount": {"type": "count", "min": 1},
            "schema": {
                "type": "checkschema",
                "fields": [{"name": "id", "type": "long"}, {"name": "name", "type": "string"}]
            },
            "names_present": {"type": "checknulls", "fields": ["name"]}
        }
    }))
    .unwrap();

    let mut group = c.benchmark_group("dataset_scope");

    for rows in [1_000usize, 100_000] {
        let ctx = SessionContext::new();
        let deps: Dependencies = HashMap::from([("customers".to_string(), customers(&ctx, rows))]);
        group.bench_with_input(BenchmarkId::new("three_rules", rows), &deps, |b, deps| {
            b.iter(|| {
                rt.block_on(async {
                    let result = deriver.derive(black_box(&ctx), black_box(deps)).await.unwrap();
                    result.collect().await.unwrap()
                })
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_row_scope, bench_dataset_scope);
criterion_main!(benches);
