//! Rule-type registries for dataset and row rules.
//!
//! Each registry maps a rule-type name to a factory building a rule from its
//! configuration fragment. Dataset and row rules live in separate registries,
//! so the same type name may be registered in both.

use crate::config::RuleSettings;
use crate::core::{DatasetRule, RowRule, Rule, Scope};
use crate::prelude::*;
use crate::rules::AllRowsRule;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Builds a rule from its configured name and settings.
pub type RuleFactory<R> = fn(&str, &RuleSettings) -> Result<Arc<R>>;

/// Maps rule-type names to factories for one rule variant.
pub struct RuleRegistry<R: ?Sized> {
    scope: Scope,
    factories: HashMap<String, RuleFactory<R>>,
}

impl<R: ?Sized> RuleRegistry<R> {
    /// Creates an empty registry for rules of `scope`.
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            factories: HashMap::new(),
        }
    }

    /// Registers `factory` under `rule_type`, replacing any previous registration.
    pub fn register(&mut self, rule_type: impl Into<String>, factory: RuleFactory<R>) {
        let rule_type = rule_type.into();
        if self.factories.insert(rule_type.clone(), factory).is_some() {
            warn!(
                registry.scope = %self.scope,
                rule.kind = %rule_type,
                "Replacing previously registered rule type"
            );
        } else {
            debug!(
                registry.scope = %self.scope,
                rule.kind = %rule_type,
                "Registered rule type"
            );
        }
    }

    pub fn contains(&self, rule_type: &str) -> bool {
        self.factories.contains_key(rule_type)
    }

    /// Returns the registered type names, sorted.
    pub fn rule_types(&self) -> Vec<&str> {
        let mut types: Vec<_> = self.factories.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Builds the rule described by `settings`.
    ///
    /// Fails with [`TermError::UnknownRuleType`] if the type is not registered,
    /// or with whatever the factory reports for invalid settings.
    pub fn create(&self, settings: &RuleSettings) -> Result<Arc<R>> {
        let rule_type = settings.rule_type()?;
        let factory = self
            .factories
            .get(rule_type)
            .ok_or_else(|| TermError::UnknownRuleType {
                scope: self.scope.to_string(),
                rule_type: rule_type.to_string(),
                rule: settings.rule_name().to_string(),
            })?;
        factory(settings.rule_name(), settings)
    }
}

impl<R: ?Sized> Clone for RuleRegistry<R> {
    fn clone(&self) -> Self {
        Self {
            scope: self.scope,
            factories: self.factories.clone(),
        }
    }
}

impl<R: ?Sized> fmt::Debug for RuleRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("scope", &self.scope)
            .field("rule_types", &self.rule_types())
            .finish()
    }
}

static BUILTIN: Lazy<RuleRegistries> = Lazy::new(RuleRegistries::with_builtins);

/// The dataset and row rule registries used to instantiate configured rules.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use term_dq::config::RuleSettings;
/// use term_dq::core::{Record, RowRule, RuleRegistries};
/// use term_dq::prelude::*;
///
/// #[derive(Debug)]
/// struct NonEmpty {
///     field: String,
/// }
///
/// impl RowRule for NonEmpty {
///     fn check(&self, record: &Record<'_>) -> Result<bool> {
///         Ok(record.str_value(&self.field)?.is_some_and(|v| !v.is_empty()))
///     }
///
///     fn rule_type(&self) -> &str {
///         "nonempty"
///     }
/// }
///
/// fn nonempty(_name: &str, settings: &RuleSettings) -> Result<Arc<dyn RowRule>> {
///     let field = settings
///         .get("field")
///         .and_then(|v| v.as_str())
///         .unwrap_or("name")
///         .to_string();
///     Ok(Arc::new(NonEmpty { field }))
/// }
///
/// let mut registries = RuleRegistries::with_builtins();
/// registries.row_mut().register("nonempty", nonempty);
/// assert!(registries.row().contains("nonempty"));
/// assert!(!registries.dataset().contains("nonempty"));
/// ```
#[derive(Debug, Clone)]
pub struct RuleRegistries {
    dataset: RuleRegistry<dyn DatasetRule>,
    row: RuleRegistry<dyn RowRule>,
}

impl RuleRegistries {
    /// Creates registries with no rule types.
    pub fn new() -> Self {
        Self {
            dataset: RuleRegistry::new(Scope::Dataset),
            row: RuleRegistry::new(Scope::Row),
        }
    }

    /// Creates registries holding the built-in rule types.
    pub fn with_builtins() -> Self {
        let mut registries = Self::new();
        crate::rules::register_builtins(&mut registries);
        registries
    }

    /// Shared, lazily initialised registries holding the built-in rule types.
    pub fn builtin() -> &'static RuleRegistries {
        &BUILTIN
    }

    pub fn dataset(&self) -> &RuleRegistry<dyn DatasetRule> {
        &self.dataset
    }

    pub fn dataset_mut(&mut self) -> &mut RuleRegistry<dyn DatasetRule> {
        &mut self.dataset
    }

    pub fn row(&self) -> &RuleRegistry<dyn RowRule> {
        &self.row
    }

    pub fn row_mut(&mut self) -> &mut RuleRegistry<dyn RowRule> {
        &mut self.row
    }

    /// Builds a rule of the given scope.
    pub fn create(&self, scope: Scope, settings: &RuleSettings) -> Result<Rule> {
        match scope {
            Scope::Dataset => self.create_dataset_rule(settings).map(Rule::Dataset),
            Scope::Row => self.create_row_rule(settings).map(Rule::Row),
        }
    }

    /// Builds a dataset rule.
    ///
    /// A type registered only as a row rule is wrapped in an [`AllRowsRule`],
    /// which passes when every record passes.
    pub fn create_dataset_rule(&self, settings: &RuleSettings) -> Result<Arc<dyn DatasetRule>> {
        let rule_type = settings.rule_type()?;
        if !self.dataset.contains(rule_type) && self.row.contains(rule_type) {
            debug!(
                rule.name = %settings.rule_name(),
                rule.kind = %rule_type,
                "Wrapping row rule for dataset scope"
            );
            let row_rule = self.row.create(settings)?;
            return Ok(Arc::new(AllRowsRule::new(settings.rule_name(), row_rule)));
        }
        self.dataset.create(settings)
    }

    pub fn create_row_rule(&self, settings: &RuleSettings) -> Result<Arc<dyn RowRule>> {
        self.row.create(settings)
    }
}

impl Default for RuleRegistries {
    fn default() -> Self {
        Self::new()
    }
}
