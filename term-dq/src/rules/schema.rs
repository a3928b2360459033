//! Schema rule for checking field presence and types.

use crate::config::RuleSettings;
use crate::core::{outcome_frame, DatasetRule, Dependencies};
use crate::prelude::*;
use arrow::datatypes::{DataType, Schema};
use async_trait::async_trait;
use datafusion::prelude::*;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Logical field types accepted by the `checkschema` rule.
///
/// Each logical type matches a family of Arrow types, so `string` accepts
/// `Utf8`, `LargeUtf8` and `Utf8View` alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Date,
    Timestamp,
    Decimal,
}

impl FieldType {
    /// Returns true if `data_type` is an Arrow representation of this type.
    pub fn matches(&self, data_type: &DataType) -> bool {
        match self {
            FieldType::String => matches!(
                data_type,
                DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
            ),
            FieldType::Boolean => data_type == &DataType::Boolean,
            FieldType::Byte => data_type == &DataType::Int8,
            FieldType::Short => data_type == &DataType::Int16,
            FieldType::Int => data_type == &DataType::Int32,
            FieldType::Long => data_type == &DataType::Int64,
            FieldType::Float => data_type == &DataType::Float32,
            FieldType::Double => data_type == &DataType::Float64,
            FieldType::Date => matches!(data_type, DataType::Date32 | DataType::Date64),
            FieldType::Timestamp => matches!(data_type, DataType::Timestamp(_, _)),
            FieldType::Decimal => matches!(
                data_type,
                DataType::Decimal128(_, _) | DataType::Decimal256(_, _)
            ),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
            FieldType::Byte => "byte",
            FieldType::Short => "short",
            FieldType::Int => "int",
            FieldType::Long => "long",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::Date => "date",
            FieldType::Timestamp => "timestamp",
            FieldType::Decimal => "decimal",
        };
        f.write_str(name)
    }
}

/// An expected field of the checked dataset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectedField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct SchemaOptions {
    fields: Vec<ExpectedField>,
    #[serde(default)]
    exactmatch: bool,
}

/// A dataset rule checking that fields exist with the expected types.
///
/// With `exactmatch` the dataset must contain no other fields.
///
/// ```json
/// {
///   "type": "checkschema",
///   "fields": [{"name": "id", "type": "long"}, {"name": "name", "type": "string"}],
///   "exactmatch": true
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SchemaRule {
    name: String,
    fields: Vec<ExpectedField>,
    exact_match: bool,
}

impl SchemaRule {
    pub const TYPE: &'static str = "checkschema";

    pub fn new(name: impl Into<String>, fields: Vec<ExpectedField>, exact_match: bool) -> Self {
        Self {
            name: name.into(),
            fields,
            exact_match,
        }
    }

    pub fn create(name: &str, settings: &RuleSettings) -> Result<Arc<dyn DatasetRule>> {
        let options: SchemaOptions = settings.options()?;
        if options.fields.is_empty() {
            return Err(TermError::invalid_rule_config(
                name,
                "'fields' must list at least one field",
            ));
        }
        Ok(Arc::new(SchemaRule::new(
            name,
            options.fields,
            options.exactmatch,
        )))
    }

    /// Returns true if `schema` satisfies the expected fields.
    pub fn conforms(&self, schema: &Schema) -> bool {
        let all_present = self.fields.iter().all(|expected| {
            match schema.field_with_name(&expected.name) {
                Ok(field) => {
                    let matched = expected.field_type.matches(field.data_type());
                    if !matched {
                        debug!(
                            rule.name = %self.name,
                            field.name = %expected.name,
                            field.expected = %expected.field_type,
                            field.actual = %field.data_type(),
                            "Field type mismatch"
                        );
                    }
                    matched
                }
                Err(_) => {
                    debug!(rule.name = %self.name, field.name = %expected.name, "Field missing");
                    false
                }
            }
        });

        if !all_present || !self.exact_match {
            return all_present;
        }
        let expected: HashSet<&str> = self.fields.iter().map(|f| f.name.as_str()).collect();
        schema.fields().iter().all(|field| {
            let known = expected.contains(field.name().as_str());
            if !known {
                debug!(rule.name = %self.name, field.name = %field.name(), "Unexpected field");
            }
            known
        })
    }
}

#[async_trait]
impl DatasetRule for SchemaRule {
    async fn check(&self, dataset: &DataFrame, _dependencies: &Dependencies) -> Result<DataFrame> {
        let passed = self.conforms(dataset.schema().as_arrow());
        outcome_frame([(self.name.as_str(), passed)])
    }

    fn rule_type(&self) -> &str {
        Self::TYPE
    }
}
