//! Core types of the data quality engine.
//!
//! ## Overview
//!
//! - **[`DatasetRule`]** / **[`RowRule`]**: the two rule variants
//! - **[`RuleRegistries`]**: rule-type name to factory lookup, one registry per variant
//! - **[`ScopedRules`]**: the rules of one configured scope, instantiated and ordered
//! - **[`DatasetScopeEvaluator`]** / **[`RowScopeEvaluator`]**: run rules against a dataset
//! - **[`DataQualityDeriver`]**: ties configuration, target selection and evaluation together
//!
//! ## Architecture
//!
//! ```text
//! JSON config ──> DataQualityConfig ──> ScopedRules (via RuleRegistries)
//!                                           │
//! Dependencies ──> resolve_target ──────────┤
//!                                           ├── Dataset: DatasetScopeEvaluator ──> (rule, result) rows
//!                                           └── Row:     RowScopeEvaluator ──> records + outcome map
//! ```
//!
//! ## Example
//!
//! ```rust
//! use arrow::array::{ArrayRef, StringArray};
//! use arrow::record_batch::RecordBatch;
//! use datafusion::prelude::*;
//! use serde_json::json;
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use term_dq::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let deriver = DataQualityDeriver::configure(&json!({
//!     "scope": "row",
//!     "resultsfield": "dq",
//!     "rules": {
//!         "name_present": {"type": "checknulls", "fields": ["name"]}
//!     }
//! }))?;
//!
//! let ctx = SessionContext::new();
//! let names: ArrayRef = Arc::new(StringArray::from(vec![Some("a"), None]));
//! let names = ctx.read_batch(RecordBatch::try_from_iter(vec![("name", names)])?)?;
//!
//! let checked = deriver
//!     .derive(&ctx, &HashMap::from([("names".to_string(), names)]))
//!     .await?;
//! assert_eq!(checked.schema().fields().len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod dataset_scope;
pub mod deriver;
pub mod record;
pub mod registry;
pub mod row_scope;
pub mod rule;
pub mod schema;
pub mod scope;
pub mod target;

pub use dataset_scope::DatasetScopeEvaluator;
pub use deriver::{DataQualityDeriver, Deriver};
pub use record::Record;
pub use registry::{RuleFactory, RuleRegistries, RuleRegistry};
pub use row_scope::{RowChecker, RowScopeEvaluator};
pub use rule::{DatasetRule, Dependencies, RowRule, Rule, RuleSet};
pub use schema::{
    append_fields, dataset_results_schema, outcome_batch, outcome_frame, outcome_map_type,
    results_field, RULE_NAME_FIELD, RULE_RESULT_FIELD,
};
pub use scope::{Scope, ScopedRules};
pub use target::resolve_target;
