//! Regular expression rule.

use crate::config::RuleSettings;
use crate::core::{Record, RowRule};
use crate::prelude::*;
use crate::rules::require_fields;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PatternOptions {
    fields: Vec<String>,
    regex: String,
}

/// A row rule passing when every field is a string fully matching a pattern.
///
/// Null values fail the rule.
///
/// ```json
/// { "type": "regex", "fields": ["code"], "regex": "[A-Z]{3}-\\d+" }
/// ```
#[derive(Debug, Clone)]
pub struct PatternRule {
    fields: Vec<String>,
    pattern: String,
    regex: Regex,
}

impl PatternRule {
    pub const TYPE: &'static str = "regex";

    /// Creates the rule, anchoring `pattern` so that it must match whole values.
    pub fn new<I, S>(fields: I, pattern: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let regex = Regex::new(&format!("^(?:{pattern})$"))
            .map_err(|e| TermError::Configuration(format!("Invalid regex '{pattern}': {e}")))?;
        Ok(Self {
            fields: fields.into_iter().map(Into::into).collect(),
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn create(name: &str, settings: &RuleSettings) -> Result<Arc<dyn RowRule>> {
        let options: PatternOptions = settings.options()?;
        require_fields(name, &options.fields)?;
        let rule = PatternRule::new(options.fields, &options.regex)
            .map_err(|e| TermError::invalid_rule_config(name, e.to_string()))?;
        Ok(Arc::new(rule))
    }
}

impl RowRule for PatternRule {
    fn check(&self, record: &Record<'_>) -> Result<bool> {
        for field in &self.fields {
            match record.str_value(field)? {
                Some(value) if self.regex.is_match(value) => {}
                _ => return Ok(false),
            }
        }
        Ok(true)
    }

    fn rule_type(&self) -> &str {
        Self::TYPE
    }
}
