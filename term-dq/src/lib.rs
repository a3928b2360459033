//! # Term DQ - Configurable Data Quality Rules for DataFusion
//!
//! Term DQ evaluates named, configured data quality rules against a
//! DataFusion dataset and returns the outcomes as a new dataset.
//!
//! ## Overview
//!
//! A derivation is configured with a JSON object selecting a scope and a set
//! of named rules. Each rule names a rule type, which is looked up in a
//! registry and instantiated from the remaining keys of its definition.
//!
//! - **Dataset scope**: every rule checks the dataset as a whole and reports
//!   `(rule, result)` rows. The output is the union of all rules' rows.
//! - **Row scope**: every rule checks every record. The output is the input
//!   dataset with one extra `Map<Utf8, Boolean>` field holding, per record,
//!   the outcome of each rule.
//!
//! ## Quick Start
//!
//! ```rust
//! use datafusion::prelude::*;
//! use serde_json::json;
//! use std::collections::HashMap;
//! use term_dq::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let deriver = DataQualityDeriver::configure(&json!({
//!     "scope": "dataset",
//!     "rules": {
//!         "rowcount": {"type": "count", "min": 1},
//!         "columns": {
//!             "type": "checkschema",
//!             "fields": [{"name": "id", "type": "long"}]
//!         }
//!     }
//! }))?;
//!
//! let ctx = SessionContext::new();
//! let orders = ctx.sql("SELECT CAST(1 AS BIGINT) AS id").await?;
//! let dependencies = HashMap::from([("orders".to_string(), orders)]);
//!
//! let results = deriver.derive(&ctx, &dependencies).await?;
//! results.show().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Built-in Rule Types
//!
//! | Scope   | Type          | Checks                                           |
//! |---------|---------------|--------------------------------------------------|
//! | dataset | `count`       | record count against an exact value or a range   |
//! | dataset | `checkschema` | presence and type of fields                      |
//! | row     | `checknulls`  | fields are not null                              |
//! | row     | `regex`       | string fields fully match a pattern              |
//! | row     | `range`       | numeric fields lie in an inclusive range         |
//! | row     | `enum`        | fields take one of a set of values               |
//!
//! Row rule types configured in dataset scope pass when every record passes.
//! Custom rule types are added through [`core::RuleRegistries`].
//!
//! ## Architecture
//!
//! - **`config`**: configuration parsing and per-rule settings
//! - **`core`**: rule traits, registries, scope resolution and evaluators
//! - **`rules`**: built-in rule implementations
//! - **`logging`**: logging configuration and subscriber setup
//! - **`error`**: the crate error type

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod rules;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;
