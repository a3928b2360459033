//! Rule capability traits and the ordered rule set that holds them.

use crate::core::{Record, Scope};
use crate::prelude::*;
use async_trait::async_trait;
use datafusion::prelude::*;
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Named input datasets available to a derivation.
pub type Dependencies = HashMap<String, DataFrame>;

/// A rule evaluated once against a whole dataset.
///
/// The returned frame holds `(rule: Utf8, result: Boolean)` rows. A rule may
/// report several rows (for example one per sub-check); the engine unions all
/// rules' rows in configuration order.
///
/// Implementations must be pure functions of their inputs: the frame may be
/// scanned more than once and the rule may be re-run on retry.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use datafusion::prelude::DataFrame;
/// use term_dq::core::{outcome_frame, DatasetRule, Dependencies};
/// use term_dq::prelude::*;
///
/// #[derive(Debug)]
/// struct NotEmpty {
///     name: String,
/// }
///
/// #[async_trait]
/// impl DatasetRule for NotEmpty {
///     async fn check(&self, dataset: &DataFrame, _deps: &Dependencies) -> Result<DataFrame> {
///         let rows = dataset.clone().count().await?;
///         outcome_frame([(self.name.as_str(), rows > 0)])
///     }
///
///     fn rule_type(&self) -> &str {
///         "notempty"
///     }
/// }
/// ```
#[async_trait]
pub trait DatasetRule: Debug + Send + Sync {
    /// Checks `dataset`, with every dependency available for cross-dataset rules.
    async fn check(&self, dataset: &DataFrame, dependencies: &Dependencies) -> Result<DataFrame>;

    /// Returns the registered type name of this rule.
    fn rule_type(&self) -> &str;
}

/// A rule evaluated independently for every record.
///
/// A single instance is shared by every partition being checked, so
/// implementations must not hold mutable state.
pub trait RowRule: Debug + Send + Sync {
    /// Returns the rule outcome for one record.
    fn check(&self, record: &Record<'_>) -> Result<bool>;

    /// Returns the registered type name of this rule.
    fn rule_type(&self) -> &str;
}

/// A constructed rule of either variant.
#[derive(Debug, Clone)]
pub enum Rule {
    /// A rule checking a whole dataset
    Dataset(Arc<dyn DatasetRule>),
    /// A rule checking single records
    Row(Arc<dyn RowRule>),
}

impl Rule {
    /// Returns the scope this rule can be evaluated in.
    pub fn scope(&self) -> Scope {
        match self {
            Rule::Dataset(_) => Scope::Dataset,
            Rule::Row(_) => Scope::Row,
        }
    }

    /// Returns the registered type name of the wrapped rule.
    pub fn rule_type(&self) -> &str {
        match self {
            Rule::Dataset(rule) => rule.rule_type(),
            Rule::Row(rule) => rule.rule_type(),
        }
    }
}

/// Rules keyed by unique rule name, kept in configuration order.
pub struct RuleSet<R: ?Sized> {
    rules: Vec<(String, Arc<R>)>,
}

impl<R: ?Sized> RuleSet<R> {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Adds a rule under `name`.
    ///
    /// Fails if a rule with the same name is already present.
    pub fn insert(&mut self, name: impl Into<String>, rule: Arc<R>) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(TermError::Configuration(format!(
                "Rule '{name}' is defined more than once"
            )));
        }
        self.rules.push((name, rule));
        Ok(())
    }

    /// Builder-style variant of [`RuleSet::insert`].
    pub fn with_rule(mut self, name: impl Into<String>, rule: Arc<R>) -> Result<Self> {
        self.insert(name, rule)?;
        Ok(self)
    }

    /// Returns true if a rule named `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.rules.iter().any(|(existing, _)| existing == name)
    }

    /// Returns the rule registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Arc<R>> {
        self.rules
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, rule)| rule)
    }

    /// Iterates over `(name, rule)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<R>)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Returns the rule names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<R: ?Sized> Default for RuleSet<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ?Sized> Clone for RuleSet<R> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<R: ?Sized + Debug> Debug for RuleSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.rules.iter().map(|(name, rule)| (name, rule)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Always(bool);

    impl RowRule for Always {
        fn check(&self, _record: &Record<'_>) -> Result<bool> {
            Ok(self.0)
        }

        fn rule_type(&self) -> &str {
            "always"
        }
    }

    #[test]
    fn test_rule_set_keeps_insertion_order() {
        let rules = RuleSet::<dyn RowRule>::new()
            .with_rule("zeta", Arc::new(Always(true)))
            .unwrap()
            .with_rule("alpha", Arc::new(Always(false)))
            .unwrap();

        assert_eq!(rules.names(), vec!["zeta", "alpha"]);
        assert_eq!(rules.len(), 2);
        assert!(rules.get("alpha").is_some());
        assert!(rules.get("beta").is_none());
    }

    #[test]
    fn test_rule_set_rejects_duplicate_names() {
        let mut rules = RuleSet::<dyn RowRule>::new();
        rules.insert("r", Arc::new(Always(true))).unwrap();
        let err = rules.insert("r", Arc::new(Always(false))).unwrap_err();
        assert!(err.to_string().contains("more than once"));
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_rule_scope() {
        let rule = Rule::Row(Arc::new(Always(true)));
        assert_eq!(rule.scope(), Scope::Row);
        assert_eq!(rule.rule_type(), "always");
    }
}
