//! Error types for the term-dq rule engine.
//!
//! All errors raised while configuring or running data quality rules are
//! represented by the [`TermError`] enum. Configuration errors surface before
//! any data is touched; evaluation errors abort the whole derivation.

use thiserror::Error;

/// The main error type for term-dq.
#[derive(Error, Debug)]
pub enum TermError {
    /// A required configuration key is absent.
    #[error("Missing required configuration '{key}'")]
    MissingConfig {
        /// The configuration key that was expected
        key: String,
    },

    /// The configured scope is neither `dataset` nor `row`.
    #[error("Invalid data quality scope '{value}', expected 'dataset' or 'row'")]
    InvalidScope {
        /// The raw configured value
        value: String,
    },

    /// No factory is registered for a rule type.
    #[error("Unknown {scope} rule type '{rule_type}' for rule '{rule}'")]
    UnknownRuleType {
        /// The scope whose registry was consulted
        scope: String,
        /// The requested rule type
        rule_type: String,
        /// The configured rule name
        rule: String,
    },

    /// A rule's configuration fragment is invalid for its type.
    #[error("Invalid configuration for rule '{rule}': {message}")]
    InvalidRuleConfig {
        /// The configured rule name
        rule: String,
        /// Detailed error message
        message: String,
    },

    /// More than one dependency and no target dataset configured.
    #[error(
        "Must specify dataset on which to conduct data quality tests when more than one dependency ({count} given)"
    )]
    AmbiguousTarget {
        /// Number of dependencies supplied
        count: usize,
    },

    /// The configured target dataset is not among the dependencies.
    #[error("Target dataset '{name}' not found among dependencies [{available}]")]
    UnknownDataset {
        /// The configured target name
        name: String,
        /// Comma-separated list of available dependency names
        available: String,
    },

    /// Derivation was invoked with an empty dependency map.
    #[error("No dependency datasets supplied to data quality derivation")]
    NoDependencies,

    /// The results field collides with an existing field of the target schema.
    #[error(
        "The field [{field}] already exists in the dataset schema. Use the resultsfield configuration parameter to customize the data quality check field name"
    )]
    DuplicateField {
        /// The colliding field name
        field: String,
    },

    /// A rule produced output that does not fit the evaluation protocol.
    #[error("Rule evaluation failed for '{rule}': {message}")]
    RuleEvaluation {
        /// Name of the rule that failed
        rule: String,
        /// Detailed error message
        message: String,
    },

    /// Error from DataFusion operations.
    #[error("DataFusion error: {0}")]
    DataFusion(#[from] datafusion::error::DataFusionError),

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error related to configuration that is not tied to a single key.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error when a required column is not found in a record.
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    /// Error when data types don't match expected types.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, TermError>`.
pub type Result<T> = std::result::Result<T, TermError>;

impl TermError {
    /// Creates a missing configuration error for the given key.
    pub fn missing_config(key: impl Into<String>) -> Self {
        Self::MissingConfig { key: key.into() }
    }

    /// Creates an invalid rule configuration error.
    pub fn invalid_rule_config(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRuleConfig {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Creates a rule evaluation error.
    pub fn rule_evaluation(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RuleEvaluation {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Returns true if this error was raised while reading configuration.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MissingConfig { .. }
                | Self::InvalidScope { .. }
                | Self::UnknownRuleType { .. }
                | Self::InvalidRuleConfig { .. }
                | Self::Configuration(_)
        )
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<TermError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.with_context(|| msg.to_string())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| match e.into() {
            TermError::Internal(inner) => TermError::Internal(format!("{}: {}", f(), inner)),
            other => TermError::Internal(format!("{}: {}", f(), other)),
        })
    }
}
