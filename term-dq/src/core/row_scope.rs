//! Row-scope evaluation: every rule checks every record.
//!
//! The outcomes of all rules for one record are stored as a
//! `Map<Utf8, Boolean>` value in a field appended to the record. The per-record
//! transform lives in [`RowChecker`], which holds only immutable state and is
//! cloned into every partition stream.

use crate::core::schema::new_outcome_builder;
use crate::core::{append_fields, results_field, Record, RowRule, RuleSet};
use crate::logging::{truncate_field, LogConfig};
use crate::prelude::*;
use crate::{log_data_op, log_rule};
use arrow::datatypes::{Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use datafusion::datasource::MemTable;
use datafusion::prelude::*;
use futures::future::{self, try_join_all};
use futures::{StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument};

/// Appends the rule outcomes of each record to the record.
#[derive(Debug, Clone)]
pub struct RowChecker {
    rules: Arc<RuleSet<dyn RowRule>>,
    schema: SchemaRef,
    log_config: LogConfig,
}

impl RowChecker {
    /// Creates a checker producing batches of `output_schema`.
    ///
    /// `output_schema` must be the input schema with the results field appended.
    pub fn new(rules: RuleSet<dyn RowRule>, output_schema: SchemaRef) -> Self {
        Self {
            rules: Arc::new(rules),
            schema: output_schema,
            log_config: LogConfig::default(),
        }
    }

    pub fn with_log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    pub fn output_schema(&self) -> SchemaRef {
        Arc::clone(&self.schema)
    }

    /// Evaluates every rule against one record, in rule order.
    pub fn check_record(&self, record: &Record<'_>) -> Result<Vec<(&str, bool)>> {
        self.rules
            .iter()
            .map(|(name, rule)| rule.check(record).map(|outcome| (name, outcome)))
            .collect()
    }

    /// Returns `batch` with the outcome column appended.
    ///
    /// Original columns are reused untouched.
    pub fn check_batch(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mut outcomes = new_outcome_builder(batch.num_rows());
        for row in 0..batch.num_rows() {
            let record = Record::new(batch, row);
            for (name, rule) in self.rules.iter() {
                let outcome = rule.check(&record)?;
                log_rule!(
                    self.log_config,
                    rule.name = %truncate_field(name, self.log_config.max_field_length),
                    record.index = row,
                    rule.outcome = outcome,
                    "Row rule evaluated"
                );
                outcomes.keys().append_value(name);
                outcomes.values().append_value(outcome);
            }
            outcomes
                .append(true)
                .with_context(|| format!("Failed to append outcomes of record {row}"))?;
        }

        let mut columns = batch.columns().to_vec();
        columns.push(Arc::new(outcomes.finish()));
        Ok(RecordBatch::try_new(Arc::clone(&self.schema), columns)?)
    }
}

/// Runs row rules over every record of the target dataset.
#[derive(Debug, Clone, Default)]
pub struct RowScopeEvaluator {
    log_config: LogConfig,
}

impl RowScopeEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    /// Returns the schema produced for `input`, failing if `field` already exists.
    pub fn output_schema(input: &Schema, field: &str) -> Result<SchemaRef> {
        if input.field_with_name(field).is_ok() {
            return Err(TermError::DuplicateField {
                field: field.to_string(),
            });
        }
        Ok(append_fields(input, [results_field(field)]))
    }

    /// Evaluates `rules` for every record of `dataset`.
    ///
    /// The output keeps the input partitioning. Any rule error aborts the
    /// whole evaluation.
    #[instrument(skip_all, fields(rules = rules.len(), results_field = %field))]
    pub async fn evaluate(
        &self,
        ctx: &SessionContext,
        dataset: &DataFrame,
        rules: &RuleSet<dyn RowRule>,
        field: &str,
    ) -> Result<DataFrame> {
        let start = Instant::now();
        let output_schema = Self::output_schema(dataset.schema().as_arrow(), field)?;
        let checker = RowChecker::new(rules.clone(), Arc::clone(&output_schema))
            .with_log_config(self.log_config.clone());

        let streams = dataset.clone().execute_stream_partitioned().await?;
        debug!(partitions = streams.len(), "Checking partitions");

        let mut partitions = try_join_all(streams.into_iter().map(|stream| {
            let checker = checker.clone();
            async move {
                stream
                    .map(|batch| batch.map_err(TermError::from))
                    .and_then(|batch| future::ready(checker.check_batch(&batch)))
                    .try_collect::<Vec<_>>()
                    .await
            }
        }))
        .await?;
        if partitions.is_empty() {
            partitions.push(Vec::new());
        }

        log_data_op!(
            self.log_config,
            rules = rules.len(),
            partitions = partitions.len(),
            records = partitions.iter().flatten().map(RecordBatch::num_rows).sum::<usize>(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Row scope evaluation complete"
        );

        let table = MemTable::try_new(output_schema, partitions)?;
        Ok(ctx.read_table(Arc::new(table))?)
    }
}
