//! Dataset-scope adapter for row rules.

use crate::core::{outcome_frame, DatasetRule, Dependencies, Record, RowRule};
use crate::prelude::*;
use async_trait::async_trait;
use datafusion::prelude::*;
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// A dataset rule passing when a row rule passes on every record.
///
/// Evaluation stops at the first failing record.
#[derive(Debug, Clone)]
pub struct AllRowsRule {
    name: String,
    rule: Arc<dyn RowRule>,
}

impl AllRowsRule {
    pub const TYPE: &'static str = "allrows";

    pub fn new(name: impl Into<String>, rule: Arc<dyn RowRule>) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }

    /// The wrapped row rule.
    pub fn row_rule(&self) -> &Arc<dyn RowRule> {
        &self.rule
    }

    async fn all_pass(&self, dataset: &DataFrame) -> Result<bool> {
        let mut stream = dataset.clone().execute_stream().await?;
        let mut checked = 0usize;
        while let Some(batch) = stream.next().await {
            let batch = batch?;
            for row in 0..batch.num_rows() {
                if !self.rule.check(&Record::new(&batch, row))? {
                    debug!(records.checked = checked + row + 1, "Record failed row rule");
                    return Ok(false);
                }
            }
            checked += batch.num_rows();
        }
        debug!(records.checked = checked, "All records passed row rule");
        Ok(true)
    }
}

#[async_trait]
impl DatasetRule for AllRowsRule {
    #[instrument(skip_all, fields(rule.name = %self.name, rule.kind = %self.rule.rule_type()))]
    async fn check(&self, dataset: &DataFrame, _dependencies: &Dependencies) -> Result<DataFrame> {
        let passed = self.all_pass(dataset).await?;
        outcome_frame([(self.name.as_str(), passed)])
    }

    fn rule_type(&self) -> &str {
        Self::TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::NullsRule;
    use crate::test_fixtures::{create_customers_dataset, dataset_outcomes};

    async fn outcome(rule: AllRowsRule, dataset: &DataFrame) -> Vec<(String, bool)> {
        let frame = rule.check(dataset, &Dependencies::new()).await.unwrap();
        dataset_outcomes(frame).await.unwrap()
    }

    #[tokio::test]
    async fn test_all_rows_pass() {
        let ctx = SessionContext::new();
        let dataset = create_customers_dataset(&ctx).unwrap();
        let rule = AllRowsRule::new("ids", Arc::new(NullsRule::new(["id"])));
        assert_eq!(
            outcome(rule, &dataset).await,
            vec![("ids".to_string(), true)]
        );
    }

    #[tokio::test]
    async fn test_one_failing_row_fails() {
        let ctx = SessionContext::new();
        let dataset = create_customers_dataset(&ctx).unwrap();
        let rule = AllRowsRule::new("names", Arc::new(NullsRule::new(["name"])));
        assert_eq!(
            outcome(rule, &dataset).await,
            vec![("names".to_string(), false)]
        );
    }

    #[tokio::test]
    async fn test_empty_dataset_passes() {
        let ctx = SessionContext::new();
        let dataset = create_customers_dataset(&ctx)
            .unwrap()
            .filter(col("id").gt(lit(100i64)))
            .unwrap();
        let rule = AllRowsRule::new("names", Arc::new(NullsRule::new(["name"])));
        assert_eq!(
            outcome(rule, &dataset).await,
            vec![("names".to_string(), true)]
        );
    }
}
