//! Borrowed view over a single record of a record batch.

use crate::prelude::*;
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float64Type, SchemaRef};
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;

/// One immutable record, addressed as a row of a [`RecordBatch`].
///
/// Row rules receive a `Record` and read fields by name. Lookups of absent
/// fields fail with [`TermError::ColumnNotFound`].
///
/// # Examples
///
/// ```rust
/// use arrow::array::StringArray;
/// use arrow::datatypes::{DataType, Field, Schema};
/// use arrow::record_batch::RecordBatch;
/// use std::sync::Arc;
/// use term_dq::core::Record;
///
/// let schema = Arc::new(Schema::new(vec![Field::new("name", DataType::Utf8, true)]));
/// let batch = RecordBatch::try_new(
///     schema,
///     vec![Arc::new(StringArray::from(vec![Some("a"), None]))],
/// )
/// .unwrap();
///
/// let first = Record::new(&batch, 0);
/// assert_eq!(first.str_value("name").unwrap(), Some("a"));
/// assert!(Record::new(&batch, 1).is_null("name").unwrap());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    batch: &'a RecordBatch,
    row: usize,
}

impl<'a> Record<'a> {
    /// Creates a view over row `row` of `batch`.
    pub fn new(batch: &'a RecordBatch, row: usize) -> Self {
        debug_assert!(row < batch.num_rows(), "row index out of bounds");
        Self { batch, row }
    }

    /// Returns the row index within the underlying batch.
    pub fn index(&self) -> usize {
        self.row
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Returns the number of fields in the record.
    pub fn num_fields(&self) -> usize {
        self.batch.num_columns()
    }

    /// Returns true if the record has a field named `name`.
    pub fn has_field(&self, name: &str) -> bool {
        self.batch.schema().index_of(name).is_ok()
    }

    /// Returns the whole column backing field `name`.
    pub fn column(&self, name: &str) -> Result<&'a ArrayRef> {
        self.batch
            .column_by_name(name)
            .ok_or_else(|| TermError::ColumnNotFound {
                column: name.to_string(),
            })
    }

    pub fn data_type(&self, name: &str) -> Result<&'a DataType> {
        Ok(self.column(name)?.data_type())
    }

    pub fn is_null(&self, name: &str) -> Result<bool> {
        Ok(self.column(name)?.is_null(self.row))
    }

    /// Returns a string field's value without copying.
    ///
    /// Fails with [`TermError::TypeMismatch`] for non-string columns.
    pub fn str_value(&self, name: &str) -> Result<Option<&'a str>> {
        let column = self.column(name)?;
        let value = if let Some(array) = column.as_string_opt::<i32>() {
            (!array.is_null(self.row)).then(|| array.value(self.row))
        } else if let Some(array) = column.as_string_opt::<i64>() {
            (!array.is_null(self.row)).then(|| array.value(self.row))
        } else if let Some(array) = column.as_string_view_opt() {
            (!array.is_null(self.row)).then(|| array.value(self.row))
        } else {
            return Err(TermError::TypeMismatch {
                expected: "string".to_string(),
                found: column.data_type().to_string(),
            });
        };
        Ok(value)
    }

    /// Returns any field's value rendered with Arrow's display formatting.
    pub fn value_as_string(&self, name: &str) -> Result<Option<String>> {
        let column = self.column(name)?;
        if column.is_null(self.row) {
            return Ok(None);
        }
        Ok(Some(array_value_to_string(column.as_ref(), self.row)?))
    }

    /// Returns a numeric field's value widened to `f64`.
    pub fn value_as_f64(&self, name: &str) -> Result<Option<f64>> {
        let column = self.column(name)?;
        if !column.data_type().is_numeric() {
            return Err(TermError::TypeMismatch {
                expected: "numeric".to_string(),
                found: column.data_type().to_string(),
            });
        }
        if column.is_null(self.row) {
            return Ok(None);
        }
        let value = arrow::compute::cast(&column.slice(self.row, 1), &DataType::Float64)?;
        let value = value.as_primitive::<Float64Type>();
        Ok((!value.is_null(0)).then(|| value.value(0)))
    }

    pub fn value_as_bool(&self, name: &str) -> Result<Option<bool>> {
        let column = self.column(name)?;
        let array = column
            .as_boolean_opt()
            .ok_or_else(|| TermError::TypeMismatch {
                expected: "Boolean".to_string(),
                found: column.data_type().to_string(),
            })?;
        Ok((!array.is_null(self.row)).then(|| array.value(self.row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{BooleanArray, Int32Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use std::sync::Arc;

    fn batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("name", DataType::Utf8, true),
            Field::new("age", DataType::Int32, true),
            Field::new("active", DataType::Boolean, false),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec![Some("ann"), None])),
                Arc::new(Int32Array::from(vec![None, Some(42)])),
                Arc::new(BooleanArray::from(vec![true, false])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_typed_access() {
        let batch = batch();
        let first = Record::new(&batch, 0);
        let second = Record::new(&batch, 1);

        assert_eq!(first.num_fields(), 3);
        assert_eq!(first.str_value("name").unwrap(), Some("ann"));
        assert_eq!(second.str_value("name").unwrap(), None);
        assert_eq!(first.value_as_f64("age").unwrap(), None);
        assert_eq!(second.value_as_f64("age").unwrap(), Some(42.0));
        assert_eq!(second.value_as_string("age").unwrap().as_deref(), Some("42"));
        assert_eq!(first.value_as_bool("active").unwrap(), Some(true));
        assert_eq!(second.index(), 1);
    }

    #[test]
    fn test_missing_column() {
        let batch = batch();
        let record = Record::new(&batch, 0);
        assert!(!record.has_field("email"));
        assert!(matches!(
            record.is_null("email"),
            Err(TermError::ColumnNotFound { column }) if column == "email"
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let batch = batch();
        let record = Record::new(&batch, 0);
        assert!(matches!(
            record.str_value("age"),
            Err(TermError::TypeMismatch { .. })
        ));
        assert!(matches!(
            Record::new(&batch, 1).str_value("age"),
            Err(TermError::TypeMismatch { .. })
        ));
        assert!(matches!(
            record.value_as_f64("name"),
            Err(TermError::TypeMismatch { .. })
        ));
    }
}
