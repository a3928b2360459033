//! Numeric range rule.

use crate::config::RuleSettings;
use crate::core::{Record, RowRule};
use crate::prelude::*;
use crate::rules::{require_fields, Assertion};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct RangeOptions {
    fields: Vec<String>,
    range: [f64; 2],
    #[serde(default)]
    ignore_nulls: bool,
}

/// A row rule passing when every field's numeric value lies in an inclusive range.
///
/// Null values fail unless `ignore-nulls` is set.
///
/// ```json
/// { "type": "range", "fields": ["age"], "range": [0, 150], "ignore-nulls": true }
/// ```
#[derive(Debug, Clone)]
pub struct RangeRule {
    fields: Vec<String>,
    assertion: Assertion,
    ignore_nulls: bool,
}

impl RangeRule {
    pub const TYPE: &'static str = "range";

    pub fn new<I, S>(fields: I, min: f64, max: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            assertion: Assertion::Between(min, max),
            ignore_nulls: false,
        }
    }

    pub fn ignore_nulls(mut self, ignore_nulls: bool) -> Self {
        self.ignore_nulls = ignore_nulls;
        self
    }

    pub fn create(name: &str, settings: &RuleSettings) -> Result<Arc<dyn RowRule>> {
        let options: RangeOptions = settings.options()?;
        require_fields(name, &options.fields)?;
        let [min, max] = options.range;
        if min.is_nan() || max.is_nan() || min > max {
            return Err(TermError::invalid_rule_config(
                name,
                format!("'range' must be [min, max] with min <= max, got [{min}, {max}]"),
            ));
        }
        Ok(Arc::new(
            RangeRule::new(options.fields, min, max).ignore_nulls(options.ignore_nulls),
        ))
    }
}

impl RowRule for RangeRule {
    fn check(&self, record: &Record<'_>) -> Result<bool> {
        for field in &self.fields {
            let passed = match record.value_as_f64(field)? {
                Some(value) => self.assertion.evaluate(value),
                None => self.ignore_nulls,
            };
            if !passed {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn rule_type(&self) -> &str {
        Self::TYPE
    }
}
