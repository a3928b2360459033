//! Evaluation scope and scope resolution from configuration.

use crate::config::DataQualityConfig;
use crate::core::{DatasetRule, RowRule, RuleRegistries, RuleSet};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Which rule variant and evaluator a derivation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Each rule inspects the dataset as a whole
    Dataset,
    /// Each rule inspects one record at a time
    Row,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Dataset => "dataset",
            Scope::Row => "row",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = TermError;

    /// Parses a scope name, ignoring case.
    fn from_str(value: &str) -> Result<Self> {
        match value.to_uppercase().as_str() {
            "DATASET" => Ok(Scope::Dataset),
            "ROW" => Ok(Scope::Row),
            _ => Err(TermError::InvalidScope {
                value: value.to_string(),
            }),
        }
    }
}

/// The instantiated rules of one scope.
#[derive(Debug, Clone)]
pub enum ScopedRules {
    /// Dataset rules, evaluated against the whole target
    Dataset(RuleSet<dyn DatasetRule>),
    /// Row rules plus the name of the field their outcomes are written to
    Row {
        rules: RuleSet<dyn RowRule>,
        results_field: String,
    },
}

impl ScopedRules {
    /// Instantiates every configured rule through the registry of the configured scope.
    pub fn resolve(config: &DataQualityConfig, registries: &RuleRegistries) -> Result<Self> {
        match config.scope {
            Scope::Dataset => {
                let mut rules = RuleSet::new();
                for settings in &config.rules {
                    let rule = registries.create_dataset_rule(settings)?;
                    debug!(
                        rule.name = %settings.rule_name(),
                        rule.kind = %rule.rule_type(),
                        "Configured dataset rule"
                    );
                    rules.insert(settings.rule_name(), rule)?;
                }
                Ok(ScopedRules::Dataset(rules))
            }
            Scope::Row => {
                let mut rules = RuleSet::new();
                for settings in &config.rules {
                    let rule = registries.create_row_rule(settings)?;
                    debug!(
                        rule.name = %settings.rule_name(),
                        rule.kind = %rule.rule_type(),
                        "Configured row rule"
                    );
                    rules.insert(settings.rule_name(), rule)?;
                }
                Ok(ScopedRules::Row {
                    rules,
                    results_field: config.results_field.clone(),
                })
            }
        }
    }

    pub fn scope(&self) -> Scope {
        match self {
            ScopedRules::Dataset(_) => Scope::Dataset,
            ScopedRules::Row { .. } => Scope::Row,
        }
    }

    /// Returns the configured rule names in configuration order.
    pub fn rule_names(&self) -> Vec<&str> {
        match self {
            ScopedRules::Dataset(rules) => rules.names(),
            ScopedRules::Row { rules, .. } => rules.names(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ScopedRules::Dataset(rules) => rules.len(),
            ScopedRules::Row { rules, .. } => rules.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scope_parsing_ignores_case() {
        assert_eq!("dataset".parse::<Scope>().unwrap(), Scope::Dataset);
        assert_eq!("DataSet".parse::<Scope>().unwrap(), Scope::Dataset);
        assert_eq!("ROW".parse::<Scope>().unwrap(), Scope::Row);
        assert_eq!("row".parse::<Scope>().unwrap(), Scope::Row);
    }

    #[test]
    fn test_scope_parsing_rejects_other_values() {
        for value in ["", "rows", "table", "data set"] {
            assert!(matches!(
                value.parse::<Scope>(),
                Err(TermError::InvalidScope { value: v }) if v == value
            ));
        }
    }

    #[test]
    fn test_resolve_row_rules() {
        let config = DataQualityConfig::try_from(&json!({
            "scope": "row",
            "resultsfield": "dq",
            "rules": {
                "has_name": {"type": "checknulls", "fields": ["name"]},
                "short_code": {"type": "regex", "fields": ["code"], "regex": "[A-Z]{3}"}
            }
        }))
        .unwrap();

        let rules = ScopedRules::resolve(&config, RuleRegistries::builtin()).unwrap();
        assert_eq!(rules.scope(), Scope::Row);
        assert_eq!(rules.rule_names(), vec!["has_name", "short_code"]);
        match rules {
            ScopedRules::Row { results_field, .. } => assert_eq!(results_field, "dq"),
            ScopedRules::Dataset(_) => panic!("expected row rules"),
        }
    }

    #[test]
    fn test_resolve_dataset_rules() {
        let config = DataQualityConfig::try_from(&json!({
            "scope": "DATASET",
            "rules": {"rowcount": {"type": "count", "expected": 2}}
        }))
        .unwrap();

        let rules = ScopedRules::resolve(&config, RuleRegistries::builtin()).unwrap();
        assert_eq!(rules.scope(), Scope::Dataset);
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_resolve_unknown_type() {
        let config = DataQualityConfig::try_from(&json!({
            "scope": "row",
            "rules": {"r": {"type": "count", "expected": 2}}
        }))
        .unwrap();

        let err = ScopedRules::resolve(&config, RuleRegistries::builtin()).unwrap_err();
        assert!(matches!(
            err,
            TermError::UnknownRuleType { ref scope, ref rule_type, ref rule }
                if scope == "row" && rule_type == "count" && rule == "r"
        ));
    }
}
