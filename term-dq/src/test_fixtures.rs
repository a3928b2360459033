//! In-memory datasets and result readers for tests.

use crate::core::{Dependencies, RULE_NAME_FIELD, RULE_RESULT_FIELD};
use crate::prelude::*;
use arrow::array::{Array, ArrayRef, AsArray, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use datafusion::datasource::MemTable;
use datafusion::prelude::*;
use std::sync::Arc;

/// Registers `partitions` as an in-memory table and returns it as a frame.
pub fn create_dataset(
    ctx: &SessionContext,
    schema: SchemaRef,
    partitions: Vec<Vec<RecordBatch>>,
) -> Result<DataFrame> {
    let table = MemTable::try_new(schema, partitions)?;
    Ok(ctx.read_table(Arc::new(table))?)
}

/// A single-partition dataset with one nullable `name` column.
pub fn create_names_dataset(ctx: &SessionContext, names: &[&str]) -> Result<DataFrame> {
    let schema = Arc::new(Schema::new(vec![Field::new("name", DataType::Utf8, true)]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![Arc::new(StringArray::from(names.to_vec())) as ArrayRef],
    )?;
    create_dataset(ctx, schema, vec![vec![batch]])
}

/// A customer-like dataset with nulls in `name` and `age`, split over two
/// partitions of two records each.
///
/// | id | name    | age    | score | status  |
/// |----|---------|--------|-------|---------|
/// | 1  | Alice   | 34     | 0.9   | active  |
/// | 2  | (null)  | 29     | 0.4   | ACTIVE  |
/// | 3  | Charlie | (null) | 1.5   | closed  |
/// | 4  | dave    | 151    | 0.7   | unknown |
pub fn create_customers_dataset(ctx: &SessionContext) -> Result<DataFrame> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, true),
        Field::new("age", DataType::Int64, true),
        Field::new("score", DataType::Float64, true),
        Field::new("status", DataType::Utf8, true),
    ]));
    let first = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(vec![1, 2])),
            Arc::new(StringArray::from(vec![Some("Alice"), None])),
            Arc::new(Int64Array::from(vec![Some(34), Some(29)])),
            Arc::new(Float64Array::from(vec![Some(0.9), Some(0.4)])),
            Arc::new(StringArray::from(vec![Some("active"), Some("ACTIVE")])),
        ],
    )?;
    let second = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(vec![3, 4])),
            Arc::new(StringArray::from(vec![Some("Charlie"), Some("dave")])),
            Arc::new(Int64Array::from(vec![None, Some(151)])),
            Arc::new(Float64Array::from(vec![Some(1.5), Some(0.7)])),
            Arc::new(StringArray::from(vec![Some("closed"), Some("unknown")])),
        ],
    )?;
    create_dataset(ctx, schema, vec![vec![first], vec![second]])
}

/// A dataset of `rows` sequential ids split across `partitions` partitions.
pub fn create_partitioned_ids(
    ctx: &SessionContext,
    rows: usize,
    partitions: usize,
) -> Result<DataFrame> {
    let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
    let partitions = partitions.max(1);
    let per_partition = rows.div_ceil(partitions);
    let mut data = Vec::with_capacity(partitions);
    for p in 0..partitions {
        let start = (p * per_partition).min(rows) as i64;
        let end = ((p + 1) * per_partition).min(rows) as i64;
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(Int64Array::from_iter_values(start..end)) as ArrayRef],
        )?;
        data.push(vec![batch]);
    }
    create_dataset(ctx, schema, data)
}

/// Builds a dependency map from `(name, dataset)` pairs.
pub fn dependencies<I, S>(datasets: I) -> Dependencies
where
    I: IntoIterator<Item = (S, DataFrame)>,
    S: Into<String>,
{
    datasets
        .into_iter()
        .map(|(name, dataset)| (name.into(), dataset))
        .collect()
}

/// Collects partitions in order and flattens them.
pub async fn collect_ordered(frame: DataFrame) -> Result<Vec<RecordBatch>> {
    Ok(frame.collect_partitioned().await?.into_iter().flatten().collect())
}

/// Reads dataset-scope results as `(rule, result)` pairs.
pub async fn dataset_outcomes(frame: DataFrame) -> Result<Vec<(String, bool)>> {
    let mut outcomes = Vec::new();
    for batch in collect_ordered(frame).await? {
        let names = column(&batch, RULE_NAME_FIELD)?.as_string::<i32>();
        let results = column(&batch, RULE_RESULT_FIELD)?.as_boolean();
        for row in 0..batch.num_rows() {
            outcomes.push((names.value(row).to_string(), results.value(row)));
        }
    }
    Ok(outcomes)
}

/// Reads a row-scope results column as one `(rule, outcome)` list per record.
pub async fn row_outcomes(frame: DataFrame, field: &str) -> Result<Vec<Vec<(String, bool)>>> {
    let mut outcomes = Vec::new();
    for batch in collect_ordered(frame).await? {
        let map = column(&batch, field)?.as_map();
        for row in 0..batch.num_rows() {
            let entries = map.value(row);
            let keys = entries.column(0).as_string::<i32>();
            let values = entries.column(1).as_boolean();
            outcomes.push(
                (0..entries.len())
                    .map(|i| (keys.value(i).to_string(), values.value(i)))
                    .collect(),
            );
        }
    }
    Ok(outcomes)
}

/// Reads a string column, preserving nulls.
pub async fn string_values(frame: DataFrame, field: &str) -> Result<Vec<Option<String>>> {
    let mut values = Vec::new();
    for batch in collect_ordered(frame).await? {
        let array = column(&batch, field)?.as_string::<i32>();
        values.extend(array.iter().map(|v| v.map(str::to_string)));
    }
    Ok(values)
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| TermError::ColumnNotFound {
            column: name.to_string(),
        })
}
