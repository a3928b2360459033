//! Prelude for commonly used types and traits in term-dq.

pub use crate::config::{DataQualityConfig, RuleSettings};
pub use crate::core::{
    DataQualityDeriver, DatasetRule, Dependencies, Deriver, Record, RowRule, RuleRegistries,
    Scope,
};
pub use crate::error::{ErrorContext, Result, TermError};
pub use crate::logging::LogConfig;
