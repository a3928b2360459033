//! Allowed values rule.

use crate::config::RuleSettings;
use crate::core::{Record, RowRule};
use crate::prelude::*;
use crate::rules::{require_fields, Assertion};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

fn default_case_sensitive() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct EnumOptions {
    fields: Vec<String>,
    values: Vec<Value>,
    #[serde(default = "default_case_sensitive")]
    case_sensitive: bool,
}

/// A row rule passing when every field takes one of a fixed set of values.
///
/// Numeric fields (integers, floats and decimals) are compared by value, so
/// `1` matches an integer 1, a float 1.0 and a decimal 1.00. Other fields are
/// compared by their display form. Null values fail.
///
/// ```json
/// { "type": "enum", "fields": ["status"], "values": ["open", "closed"], "case-sensitive": false }
/// ```
#[derive(Debug, Clone)]
pub struct EnumRule {
    fields: Vec<String>,
    values: HashSet<String>,
    numbers: Vec<Assertion>,
    case_sensitive: bool,
}

impl EnumRule {
    pub const TYPE: &'static str = "enum";

    pub fn new<I, S, V, T>(fields: I, values: V, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        V: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        let numbers = values
            .iter()
            .filter_map(|value| value.trim().parse::<f64>().ok())
            .filter(|number| number.is_finite())
            .map(Assertion::Equals)
            .collect();
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            values: values
                .into_iter()
                .map(|value| fold_case(value, case_sensitive))
                .collect(),
            numbers,
            case_sensitive,
        }
    }

    pub fn create(name: &str, settings: &RuleSettings) -> Result<Arc<dyn RowRule>> {
        let options: EnumOptions = settings.options()?;
        require_fields(name, &options.fields)?;
        if options.values.is_empty() {
            return Err(TermError::invalid_rule_config(
                name,
                "'values' must list at least one value",
            ));
        }
        let values = options
            .values
            .iter()
            .map(|value| match value {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                Value::Bool(b) => Ok(b.to_string()),
                other => Err(TermError::invalid_rule_config(
                    name,
                    format!("'values' must hold strings, numbers or booleans, found {other}"),
                )),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Arc::new(EnumRule::new(
            options.fields,
            values,
            options.case_sensitive,
        )))
    }
}

fn fold_case(value: String, case_sensitive: bool) -> String {
    if case_sensitive {
        value
    } else {
        value.to_lowercase()
    }
}

impl RowRule for EnumRule {
    fn check(&self, record: &Record<'_>) -> Result<bool> {
        for field in &self.fields {
            let allowed = if record.data_type(field)?.is_numeric() {
                record
                    .value_as_f64(field)?
                    .is_some_and(|v| self.numbers.iter().any(|n| n.evaluate(v)))
            } else {
                record
                    .value_as_string(field)?
                    .map(|v| fold_case(v, self.case_sensitive))
                    .is_some_and(|v| self.values.contains(&v))
            };
            if !allowed {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn rule_type(&self) -> &str {
        Self::TYPE
    }
}
