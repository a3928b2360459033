//! Numeric assertions shared by the count and range rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An assertion that can be evaluated against a numeric value.
///
/// # Examples
///
/// ```rust
/// use term_dq::rules::Assertion;
///
/// let assertion = Assertion::Equals(100.0);
/// assert!(assertion.evaluate(100.0));
///
/// let assertion = Assertion::from_bounds(Some(10.0), None).unwrap();
/// assert_eq!(assertion, Assertion::AtLeast(10.0));
///
/// let assertion = Assertion::Between(10.0, 20.0);
/// assert!(assertion.evaluate(20.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Assertion {
    /// Value must equal the specified value (with epsilon tolerance)
    Equals(f64),
    /// Value must be greater than or equal to the specified value
    AtLeast(f64),
    /// Value must be less than or equal to the specified value
    AtMost(f64),
    /// Value must be between the specified bounds (inclusive)
    Between(f64, f64),
}

impl Assertion {
    /// Builds the assertion for optional inclusive bounds.
    ///
    /// Returns `None` when neither bound is given.
    pub fn from_bounds(min: Option<f64>, max: Option<f64>) -> Option<Self> {
        match (min, max) {
            (Some(min), Some(max)) => Some(Assertion::Between(min, max)),
            (Some(min), None) => Some(Assertion::AtLeast(min)),
            (None, Some(max)) => Some(Assertion::AtMost(max)),
            (None, None) => None,
        }
    }

    /// Evaluates the assertion against a value.
    pub fn evaluate(&self, value: f64) -> bool {
        const EPSILON: f64 = 1e-10;

        match self {
            Assertion::Equals(expected) => (value - expected).abs() < EPSILON,
            Assertion::AtLeast(min) => value >= *min,
            Assertion::AtMost(max) => value <= *max,
            Assertion::Between(min, max) => value >= *min && value <= *max,
        }
    }

    /// Returns a human-readable description of the assertion.
    pub fn description(&self) -> String {
        match self {
            Assertion::Equals(v) => format!("equals {v}"),
            Assertion::AtLeast(v) => format!("at least {v}"),
            Assertion::AtMost(v) => format!("at most {v}"),
            Assertion::Between(min, max) => format!("between {min} and {max}"),
        }
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
