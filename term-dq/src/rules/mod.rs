//! Built-in rule types.
//!
//! Dataset rules: [`CountRule`] (`count`) and [`SchemaRule`] (`checkschema`).
//! Row rules: [`NullsRule`] (`checknulls`), [`PatternRule`] (`regex`),
//! [`RangeRule`] (`range`) and [`EnumRule`] (`enum`).
//!
//! Built-ins are registered through the same [`RuleRegistry`] API as custom
//! rule types, see [`register_builtins`].
//!
//! [`RuleRegistry`]: crate::core::RuleRegistry

pub mod all_rows;
pub mod assertion;
pub mod count;
pub mod enumeration;
pub mod nulls;
pub mod pattern;
pub mod range;
pub mod schema;

pub use all_rows::AllRowsRule;
pub use assertion::Assertion;
pub use count::CountRule;
pub use enumeration::EnumRule;
pub use nulls::NullsRule;
pub use pattern::PatternRule;
pub use range::RangeRule;
pub use schema::{ExpectedField, FieldType, SchemaRule};

use crate::core::RuleRegistries;
use crate::prelude::*;

/// Registers every built-in rule type.
pub fn register_builtins(registries: &mut RuleRegistries) {
    let dataset = registries.dataset_mut();
    dataset.register(CountRule::TYPE, CountRule::create);
    dataset.register(SchemaRule::TYPE, SchemaRule::create);

    let row = registries.row_mut();
    row.register(NullsRule::TYPE, NullsRule::create);
    row.register(PatternRule::TYPE, PatternRule::create);
    row.register(RangeRule::TYPE, RangeRule::create);
    row.register(EnumRule::TYPE, EnumRule::create);
}

/// Rejects an empty `fields` list.
pub(crate) fn require_fields(rule: &str, fields: &[String]) -> Result<()> {
    if fields.is_empty() {
        return Err(TermError::invalid_rule_config(
            rule,
            "'fields' must list at least one field",
        ));
    }
    Ok(())
}
