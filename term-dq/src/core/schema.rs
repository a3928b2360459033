//! Result schemas and builders shared by both evaluation scopes.

use crate::prelude::*;
use arrow::array::{
    Array, ArrayRef, BooleanArray, BooleanBuilder, MapBuilder, StringArray, StringBuilder,
};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use datafusion::prelude::*;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Column holding the rule name in dataset-scope results.
pub const RULE_NAME_FIELD: &str = "rule";
/// Column holding the rule outcome in dataset-scope results.
pub const RULE_RESULT_FIELD: &str = "result";

static DATASET_RESULTS_SCHEMA: Lazy<SchemaRef> = Lazy::new(|| {
    Arc::new(Schema::new(vec![
        Field::new(RULE_NAME_FIELD, DataType::Utf8, false),
        Field::new(RULE_RESULT_FIELD, DataType::Boolean, false),
    ]))
});

static OUTCOME_MAP_TYPE: Lazy<DataType> =
    Lazy::new(|| new_outcome_builder(0).finish().data_type().clone());

/// Schema of dataset-scope results: `(rule: Utf8, result: Boolean)`.
pub fn dataset_results_schema() -> SchemaRef {
    Arc::clone(&DATASET_RESULTS_SCHEMA)
}

/// The `Map<Utf8, Boolean>` type of row-scope outcome values.
pub fn outcome_map_type() -> DataType {
    OUTCOME_MAP_TYPE.clone()
}

/// The non-nullable field appended by row-scope evaluation.
pub fn results_field(name: &str) -> Field {
    Field::new(name, outcome_map_type(), false)
}

/// Returns `schema` with `fields` appended after its existing fields.
pub fn append_fields(schema: &Schema, fields: impl IntoIterator<Item = Field>) -> SchemaRef {
    let mut all: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    all.extend(fields);
    Arc::new(Schema::new_with_metadata(all, schema.metadata().clone()))
}

/// Creates a builder producing arrays of [`outcome_map_type`].
pub(crate) fn new_outcome_builder(capacity: usize) -> MapBuilder<StringBuilder, BooleanBuilder> {
    MapBuilder::with_capacity(
        None,
        StringBuilder::new(),
        BooleanBuilder::new(),
        capacity,
    )
}

/// Builds a dataset-scope result batch from `(rule, outcome)` pairs.
pub fn outcome_batch<I, S>(outcomes: I) -> Result<RecordBatch>
where
    I: IntoIterator<Item = (S, bool)>,
    S: AsRef<str>,
{
    let (names, results): (Vec<S>, Vec<bool>) = outcomes.into_iter().unzip();
    let names: Vec<&str> = names.iter().map(|name| name.as_ref()).collect();
    let names: ArrayRef = Arc::new(StringArray::from(names));
    let results: ArrayRef = Arc::new(BooleanArray::from(results));
    Ok(RecordBatch::try_new(
        dataset_results_schema(),
        vec![names, results],
    )?)
}

/// Builds a dataset-scope result frame from `(rule, outcome)` pairs.
///
/// Intended for [`DatasetRule`](crate::core::DatasetRule) implementations.
pub fn outcome_frame<I, S>(outcomes: I) -> Result<DataFrame>
where
    I: IntoIterator<Item = (S, bool)>,
    S: AsRef<str>,
{
    let batch = outcome_batch(outcomes)?;
    Ok(SessionContext::new().read_batch(batch)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::AsArray;

    #[test]
    fn test_outcome_map_type_is_string_to_boolean() {
        match outcome_map_type() {
            DataType::Map(entries, sorted) => {
                assert!(!sorted);
                match entries.data_type() {
                    DataType::Struct(fields) => {
                        assert_eq!(fields.len(), 2);
                        assert_eq!(fields[0].data_type(), &DataType::Utf8);
                        assert_eq!(fields[1].data_type(), &DataType::Boolean);
                    }
                    other => panic!("unexpected entries type {other}"),
                }
            }
            other => panic!("unexpected map type {other}"),
        }
    }

    #[test]
    fn test_append_fields() {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("name", DataType::Utf8, true),
        ]);
        let appended = append_fields(&schema, [results_field("results")]);

        assert_eq!(appended.fields().len(), 3);
        assert_eq!(appended.field(0).name(), "id");
        assert_eq!(appended.field(1).name(), "name");
        let last = appended.field(2);
        assert_eq!(last.name(), "results");
        assert!(!last.is_nullable());
        assert_eq!(last.data_type(), &outcome_map_type());
    }

    #[test]
    fn test_outcome_batch() {
        let batch = outcome_batch([("a", true), ("b", false)]).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.schema(), dataset_results_schema());
        let names = batch.column(0).as_string::<i32>();
        let results = batch.column(1).as_boolean();
        assert_eq!(names.value(1), "b");
        assert!(results.value(0));
        assert!(!results.value(1));
    }

    #[tokio::test]
    async fn test_outcome_frame() {
        let frame = outcome_frame(Vec::<(String, bool)>::new()).unwrap();
        assert_eq!(frame.count().await.unwrap(), 0);

        let frame = outcome_frame([("rowcount".to_string(), true)]).unwrap();
        assert_eq!(frame.schema().fields().len(), 2);
        assert_eq!(frame.count().await.unwrap(), 1);
    }
}
