//! Engine configuration read from a JSON configuration object.
//!
//! ```json
//! {
//!   "scope": "row",
//!   "dataset": "customers",
//!   "resultsfield": "dq_results",
//!   "rules": {
//!     "name_present": { "type": "checknulls", "fields": ["name"] },
//!     "valid_age":    { "type": "range", "fields": ["age"], "range": [0, 150] }
//!   }
//! }
//! ```
//!
//! Keys are case-sensitive; the value of `scope` is not. Rule order follows
//! the order of the `rules` object.

use crate::core::Scope;
use crate::prelude::*;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Key selecting the evaluation scope.
pub const SCOPE_CONFIG: &str = "scope";
/// Key holding the rule definitions.
pub const RULES_CONFIG: &str = "rules";
/// Key naming the dependency to evaluate.
pub const DATASET_CONFIG: &str = "dataset";
/// Key naming the row-scope output field.
pub const RESULTS_FIELD_CONFIG: &str = "resultsfield";
/// Key inside a rule definition selecting its rule type.
pub const RULE_TYPE_CONFIG: &str = "type";

/// Default name of the row-scope output field.
pub const DEFAULT_RESULTS_FIELD: &str = "results";

/// The configuration fragment of a single named rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSettings {
    rule: String,
    values: Map<String, Value>,
}

impl RuleSettings {
    pub fn new(rule: impl Into<String>, values: Map<String, Value>) -> Self {
        Self {
            rule: rule.into(),
            values,
        }
    }

    /// Creates settings from a JSON value, which must be an object.
    pub fn from_value(rule: impl Into<String>, value: &Value) -> Result<Self> {
        let rule = rule.into();
        match value {
            Value::Object(values) => Ok(Self::new(rule, values.clone())),
            _ => Err(TermError::invalid_rule_config(
                rule,
                "rule configuration must be an object",
            )),
        }
    }

    /// The configured rule name.
    pub fn rule_name(&self) -> &str {
        &self.rule
    }

    /// The rule type, read from the `type` key.
    pub fn rule_type(&self) -> Result<&str> {
        match self.values.get(RULE_TYPE_CONFIG) {
            Some(Value::String(rule_type)) => Ok(rule_type),
            Some(_) => Err(TermError::invalid_rule_config(
                &self.rule,
                format!("'{RULE_TYPE_CONFIG}' must be a string"),
            )),
            None => Err(TermError::invalid_rule_config(
                &self.rule,
                format!("missing required option '{RULE_TYPE_CONFIG}'"),
            )),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Deserializes the rule-specific options, i.e. every key except `type`.
    ///
    /// Deserialization failures are reported as [`TermError::InvalidRuleConfig`].
    pub fn options<T: DeserializeOwned>(&self) -> Result<T> {
        let mut options = self.values.clone();
        options.remove(RULE_TYPE_CONFIG);
        serde_json::from_value(Value::Object(options))
            .map_err(|e| TermError::invalid_rule_config(&self.rule, e.to_string()))
    }
}

/// Parsed configuration of a data quality derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct DataQualityConfig {
    pub scope: Scope,
    /// Rule definitions in configuration order
    pub rules: Vec<RuleSettings>,
    /// Dependency to evaluate when more than one is supplied
    pub dataset: Option<String>,
    /// Row-scope output field name
    pub results_field: String,
}

impl DataQualityConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::try_from(&value)
    }
}

impl TryFrom<&Value> for DataQualityConfig {
    type Error = TermError;

    fn try_from(value: &Value) -> Result<Self> {
        let config = value.as_object().ok_or_else(|| {
            TermError::Configuration("data quality configuration must be an object".to_string())
        })?;

        let scope = config
            .get(SCOPE_CONFIG)
            .ok_or_else(|| TermError::missing_config(SCOPE_CONFIG))?;
        let rules = config
            .get(RULES_CONFIG)
            .ok_or_else(|| TermError::missing_config(RULES_CONFIG))?;

        let scope: Scope = match scope {
            Value::String(scope) => scope.parse()?,
            other => {
                return Err(TermError::InvalidScope {
                    value: other.to_string(),
                })
            }
        };

        let dataset = match config.get(DATASET_CONFIG) {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) if name.is_empty() => None,
            Some(Value::String(name)) => Some(name.clone()),
            Some(_) => {
                return Err(TermError::Configuration(format!(
                    "'{DATASET_CONFIG}' must be a string"
                )))
            }
        };

        let rules = rules
            .as_object()
            .ok_or_else(|| TermError::Configuration(format!("'{RULES_CONFIG}' must be an object")))?
            .iter()
            .map(|(name, rule)| RuleSettings::from_value(name, rule))
            .collect::<Result<Vec<_>>>()?;

        let results_field = match (scope, config.get(RESULTS_FIELD_CONFIG)) {
            (Scope::Row, Some(Value::String(field))) if !field.is_empty() => field.clone(),
            (_, None | Some(Value::Null)) | (Scope::Dataset, _) => {
                DEFAULT_RESULTS_FIELD.to_string()
            }
            (Scope::Row, Some(_)) => {
                return Err(TermError::Configuration(format!(
                    "'{RESULTS_FIELD_CONFIG}' must be a non-empty string"
                )))
            }
        };

        Ok(Self {
            scope,
            rules,
            dataset,
            results_field,
        })
    }
}
