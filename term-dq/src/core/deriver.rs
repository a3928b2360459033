//! The data quality derivation: configured rules applied to a dependency.

use crate::config::DataQualityConfig;
use crate::core::{
    resolve_target, DatasetScopeEvaluator, Dependencies, RowScopeEvaluator, RuleRegistries, Scope,
    ScopedRules,
};
use crate::logging::LogConfig;
use crate::prelude::*;
use async_trait::async_trait;
use datafusion::prelude::*;
use serde_json::Value;
use std::fmt::Debug;
use tracing::{info, instrument};

/// Produces a derived dataset from named input datasets.
#[async_trait]
pub trait Deriver: Debug + Send + Sync {
    /// The name this deriver is configured under.
    fn alias(&self) -> &str;

    /// Computes the derived dataset.
    async fn derive(&self, ctx: &SessionContext, dependencies: &Dependencies) -> Result<DataFrame>;
}

/// Evaluates data quality rules against one of its dependencies.
///
/// In dataset scope the result holds one `(rule, result)` row per reported
/// outcome. In row scope the result is the target dataset with a
/// `Map<Utf8, Boolean>` field of rule outcomes appended to every record.
///
/// # Examples
///
/// ```rust,no_run
/// use datafusion::prelude::*;
/// use serde_json::json;
/// use std::collections::HashMap;
/// use term_dq::prelude::*;
///
/// # async fn example() -> Result<()> {
/// let deriver = DataQualityDeriver::configure(&json!({
///     "scope": "dataset",
///     "rules": {
///         "rowcount": {"type": "count", "expected": 2}
///     }
/// }))?;
///
/// let ctx = SessionContext::new();
/// let customers = ctx.read_csv("customers.csv", CsvReadOptions::new()).await?;
/// let dependencies = HashMap::from([("customers".to_string(), customers)]);
///
/// let results = deriver.derive(&ctx, &dependencies).await?;
/// results.show().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DataQualityDeriver {
    rules: ScopedRules,
    dataset: Option<String>,
    log_config: LogConfig,
}

impl DataQualityDeriver {
    /// The alias data quality derivations are registered under.
    pub const ALIAS: &'static str = "dq";

    /// Configures a deriver using the built-in rule types.
    pub fn configure(config: &Value) -> Result<Self> {
        Self::configure_with(config, RuleRegistries::builtin())
    }

    /// Configures a deriver resolving rule types through `registries`.
    pub fn configure_with(config: &Value, registries: &RuleRegistries) -> Result<Self> {
        let config = DataQualityConfig::try_from(config)?;
        Self::from_config(&config, registries)
    }

    /// Creates a deriver from parsed configuration.
    ///
    /// Every rule is instantiated here, so configuration errors surface before
    /// any data is read.
    #[instrument(skip_all, fields(scope = %config.scope, rules = config.rules.len()))]
    pub fn from_config(config: &DataQualityConfig, registries: &RuleRegistries) -> Result<Self> {
        let rules = ScopedRules::resolve(config, registries)?;
        info!(rules = rules.len(), "Configured data quality rules");
        Ok(Self {
            rules,
            dataset: config.dataset.clone(),
            log_config: LogConfig::default(),
        })
    }

    pub fn with_log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    pub fn scope(&self) -> Scope {
        self.rules.scope()
    }

    /// The configured dependency name, if any.
    pub fn dataset(&self) -> Option<&str> {
        self.dataset.as_deref()
    }

    /// Rule names in configuration order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.rule_names()
    }

    pub fn rules(&self) -> &ScopedRules {
        &self.rules
    }
}

#[async_trait]
impl Deriver for DataQualityDeriver {
    fn alias(&self) -> &str {
        Self::ALIAS
    }

    #[instrument(skip_all, fields(scope = %self.scope(), dependencies = dependencies.len()))]
    async fn derive(&self, ctx: &SessionContext, dependencies: &Dependencies) -> Result<DataFrame> {
        let (target, dataset) = resolve_target(dependencies, self.dataset.as_deref())?;
        info!(dataset = %target, rules = self.rules.len(), "Evaluating data quality rules");

        match &self.rules {
            ScopedRules::Dataset(rules) => {
                DatasetScopeEvaluator::new()
                    .with_log_config(self.log_config.clone())
                    .evaluate(ctx, dataset, dependencies, rules)
                    .await
            }
            ScopedRules::Row {
                rules,
                results_field,
            } => {
                RowScopeEvaluator::new()
                    .with_log_config(self.log_config.clone())
                    .evaluate(ctx, dataset, rules, results_field)
                    .await
            }
        }
    }
}
