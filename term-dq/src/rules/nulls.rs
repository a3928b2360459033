//! Null check rule.

use crate::config::RuleSettings;
use crate::core::{Record, RowRule};
use crate::prelude::*;
use crate::rules::require_fields;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct NullsOptions {
    fields: Vec<String>,
}

/// A row rule passing when none of its fields is null.
///
/// ```json
/// { "type": "checknulls", "fields": ["id", "name"] }
/// ```
#[derive(Debug, Clone)]
pub struct NullsRule {
    fields: Vec<String>,
}

impl NullsRule {
    pub const TYPE: &'static str = "checknulls";

    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn create(name: &str, settings: &RuleSettings) -> Result<Arc<dyn RowRule>> {
        let options: NullsOptions = settings.options()?;
        require_fields(name, &options.fields)?;
        Ok(Arc::new(NullsRule::new(options.fields)))
    }
}

impl RowRule for NullsRule {
    fn check(&self, record: &Record<'_>) -> Result<bool> {
        for field in &self.fields {
            if record.is_null(field)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn rule_type(&self) -> &str {
        Self::TYPE
    }
}
