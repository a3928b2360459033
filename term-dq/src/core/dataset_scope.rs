//! Dataset-scope evaluation: every rule checks the whole target dataset.

use crate::core::{dataset_results_schema, DatasetRule, Dependencies, RuleSet};
use crate::logging::{truncate_field, LogConfig};
use crate::prelude::*;
use crate::{log_data_op, log_rule};
use arrow::array::ArrayRef;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use datafusion::datasource::MemTable;
use datafusion::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument};

/// Runs dataset rules and unions their `(rule, result)` rows.
///
/// Rule results are materialised in rule order, so a failing rule aborts the
/// evaluation before any result is returned.
#[derive(Debug, Clone, Default)]
pub struct DatasetScopeEvaluator {
    log_config: LogConfig,
}

impl DatasetScopeEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    /// Evaluates `rules` against `dataset`.
    ///
    /// The result has one row per reported outcome, in rule order, with no
    /// deduplication. An empty rule set yields an empty result.
    #[instrument(skip_all, fields(rules = rules.len()))]
    pub async fn evaluate(
        &self,
        ctx: &SessionContext,
        dataset: &DataFrame,
        dependencies: &Dependencies,
        rules: &RuleSet<dyn DatasetRule>,
    ) -> Result<DataFrame> {
        let start = Instant::now();
        let mut batches = Vec::new();

        for (name, rule) in rules.iter() {
            let result = rule.check(dataset, dependencies).await?;
            let rule_batches = conform_results(name, result).await?;
            log_rule!(
                self.log_config,
                rule.name = %truncate_field(name, self.log_config.max_field_length),
                rule.kind = %rule.rule_type(),
                result.rows = rule_batches.iter().map(RecordBatch::num_rows).sum::<usize>(),
                "Dataset rule evaluated"
            );
            batches.extend(rule_batches);
        }

        log_data_op!(
            self.log_config,
            rules = rules.len(),
            result.rows = batches.iter().map(RecordBatch::num_rows).sum::<usize>(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Dataset scope evaluation complete"
        );

        let table = MemTable::try_new(dataset_results_schema(), vec![batches])?;
        Ok(ctx.read_table(Arc::new(table))?)
    }
}

/// Collects a rule's result frame and recasts it to the dataset results schema.
async fn conform_results(rule: &str, result: DataFrame) -> Result<Vec<RecordBatch>> {
    let fields = result.schema().fields();
    if fields.len() != 2 {
        return Err(TermError::rule_evaluation(
            rule,
            format!("expected 2 result columns (rule, result), found {}", fields.len()),
        ));
    }
    let name_type = fields[0].data_type().clone();
    if !matches!(
        name_type,
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
    ) {
        return Err(TermError::rule_evaluation(
            rule,
            format!("rule name column must be a string, found {name_type}"),
        ));
    }
    if fields[1].data_type() != &DataType::Boolean {
        return Err(TermError::rule_evaluation(
            rule,
            format!(
                "result column must be Boolean, found {}",
                fields[1].data_type()
            ),
        ));
    }

    let schema = dataset_results_schema();
    let mut batches = Vec::new();
    for batch in result.collect_partitioned().await?.into_iter().flatten() {
        if batch.num_rows() == 0 {
            continue;
        }
        let names: ArrayRef = arrow::compute::cast(batch.column(0), &DataType::Utf8)?;
        let columns = vec![names, Arc::clone(batch.column(1))];
        let batch = RecordBatch::try_new(Arc::clone(&schema), columns).map_err(|e| {
            TermError::rule_evaluation(rule, format!("invalid result rows: {e}"))
        })?;
        batches.push(batch);
    }
    debug!(rule.name = %rule, batches = batches.len(), "Collected rule results");
    Ok(batches)
}
