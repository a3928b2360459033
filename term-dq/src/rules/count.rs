//! Count rule for checking record counts.

use crate::config::RuleSettings;
use crate::core::{outcome_frame, DatasetRule, Dependencies};
use crate::prelude::*;
use crate::rules::Assertion;
use async_trait::async_trait;
use datafusion::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct CountOptions {
    expected: Option<u64>,
    min: Option<u64>,
    max: Option<u64>,
    dataset: Option<String>,
}

/// A dataset rule asserting the number of records.
///
/// Configured with either `expected` or at least one of `min` and `max`. By
/// default the target dataset is counted; `dataset` names another dependency
/// to count instead.
///
/// ```json
/// { "type": "count", "min": 1, "max": 1000 }
/// ```
#[derive(Debug, Clone)]
pub struct CountRule {
    name: String,
    assertion: Assertion,
    dataset: Option<String>,
}

impl CountRule {
    pub const TYPE: &'static str = "count";

    pub fn new(name: impl Into<String>, assertion: Assertion) -> Self {
        Self {
            name: name.into(),
            assertion,
            dataset: None,
        }
    }

    /// Counts the named dependency instead of the target.
    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = Some(dataset.into());
        self
    }

    pub fn assertion(&self) -> Assertion {
        self.assertion
    }

    pub fn create(name: &str, settings: &RuleSettings) -> Result<Arc<dyn DatasetRule>> {
        let options: CountOptions = settings.options()?;
        let assertion = match (options.expected, options.min, options.max) {
            (Some(expected), None, None) => Assertion::Equals(expected as f64),
            (Some(_), _, _) => {
                return Err(TermError::invalid_rule_config(
                    name,
                    "'expected' cannot be combined with 'min' or 'max'",
                ))
            }
            (None, Some(min), Some(max)) if min > max => {
                return Err(TermError::invalid_rule_config(
                    name,
                    format!("'min' ({min}) is greater than 'max' ({max})"),
                ))
            }
            (None, min, max) => {
                Assertion::from_bounds(min.map(|v| v as f64), max.map(|v| v as f64)).ok_or_else(
                    || {
                        TermError::invalid_rule_config(
                            name,
                            "one of 'expected', 'min' or 'max' is required",
                        )
                    },
                )?
            }
        };

        let rule = CountRule::new(name, assertion);
        Ok(Arc::new(match options.dataset {
            Some(dataset) => rule.with_dataset(dataset),
            None => rule,
        }))
    }
}

#[async_trait]
impl DatasetRule for CountRule {
    #[instrument(skip_all, fields(rule.name = %self.name, rule.assertion = %self.assertion))]
    async fn check(&self, dataset: &DataFrame, dependencies: &Dependencies) -> Result<DataFrame> {
        let subject = match &self.dataset {
            Some(name) => dependencies.get(name).ok_or_else(|| {
                let mut available: Vec<_> = dependencies.keys().map(String::as_str).collect();
                available.sort_unstable();
                TermError::UnknownDataset {
                    name: name.clone(),
                    available: available.join(", "),
                }
            })?,
            None => dataset,
        };

        let count = subject.clone().count().await?;
        let passed = self.assertion.evaluate(count as f64);
        debug!(
            result.row_count = count,
            result.passed = passed,
            "Count rule evaluated"
        );
        outcome_frame([(self.name.as_str(), passed)])
    }

    fn rule_type(&self) -> &str {
        Self::TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{create_names_dataset, dataset_outcomes, dependencies};
    use serde_json::json;

    fn settings(value: serde_json::Value) -> RuleSettings {
        RuleSettings::from_value("rowcount", &value).unwrap()
    }

    async fn run(rule: Arc<dyn DatasetRule>, dataset: &DataFrame, deps: &Dependencies) -> bool {
        let frame = rule.check(dataset, deps).await.unwrap();
        let outcomes = dataset_outcomes(frame).await.unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].0, "rowcount");
        outcomes[0].1
    }

    #[tokio::test]
    async fn test_expected_count() {
        let ctx = SessionContext::new();
        let dataset = create_names_dataset(&ctx, &["a", "b"]).unwrap();
        let deps = Dependencies::new();

        let rule = CountRule::create("rowcount", &settings(json!({"type": "count", "expected": 2})))
            .unwrap();
        assert!(run(rule, &dataset, &deps).await);

        let rule = CountRule::create("rowcount", &settings(json!({"type": "count", "expected": 3})))
            .unwrap();
        assert!(!run(rule, &dataset, &deps).await);
    }

    #[tokio::test]
    async fn test_bounds() {
        let ctx = SessionContext::new();
        let dataset = create_names_dataset(&ctx, &["a", "b", "c"]).unwrap();
        let deps = Dependencies::new();

        let rule =
            CountRule::create("rowcount", &settings(json!({"type": "count", "min": 1, "max": 3})))
                .unwrap();
        assert!(run(rule, &dataset, &deps).await);

        let rule =
            CountRule::create("rowcount", &settings(json!({"type": "count", "max": 2}))).unwrap();
        assert!(!run(rule, &dataset, &deps).await);
    }

    #[tokio::test]
    async fn test_counts_named_dependency() {
        let ctx = SessionContext::new();
        let target = create_names_dataset(&ctx, &["a"]).unwrap();
        let deps = dependencies([
            ("target", target.clone()),
            ("lookup", create_names_dataset(&ctx, &["x", "y", "z"]).unwrap()),
        ]);

        let rule = CountRule::create(
            "rowcount",
            &settings(json!({"type": "count", "expected": 3, "dataset": "lookup"})),
        )
        .unwrap();
        assert!(run(rule, &target, &deps).await);

        let rule = CountRule::new("rowcount", Assertion::Equals(1.0)).with_dataset("missing");
        let err = rule.check(&target, &deps).await.unwrap_err();
        assert!(matches!(err, TermError::UnknownDataset { ref name, .. } if name == "missing"));
    }

    #[test]
    fn test_invalid_options() {
        for options in [
            json!({"type": "count"}),
            json!({"type": "count", "expected": 1, "min": 0}),
            json!({"type": "count", "min": 5, "max": 1}),
            json!({"type": "count", "expected": -1}),
            json!({"type": "count", "expected": 1, "tolerance": 2}),
        ] {
            let err = CountRule::create("rowcount", &settings(options.clone())).unwrap_err();
            assert!(
                matches!(err, TermError::InvalidRuleConfig { ref rule, .. } if rule == "rowcount"),
                "unexpected error for {options}: {err}"
            );
        }
    }
}
