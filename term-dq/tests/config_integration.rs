//! Configuration parsing and rule resolution.

use serde_json::json;
use term_dq::config::{DataQualityConfig, DEFAULT_RESULTS_FIELD};
use term_dq::prelude::*;

#[test]
fn test_scope_is_case_insensitive() {
    for scope in ["dataset", "DATASET", "DataSet"] {
        let deriver =
            DataQualityDeriver::configure(&json!({"scope": scope, "rules": {}})).unwrap();
        assert_eq!(deriver.scope(), Scope::Dataset);
    }
    for scope in ["row", "ROW", "Row"] {
        let deriver =
            DataQualityDeriver::configure(&json!({"scope": scope, "rules": {}})).unwrap();
        assert_eq!(deriver.scope(), Scope::Row);
    }
}

#[test]
fn test_invalid_scope() {
    for scope in [json!("rows"), json!(""), json!(1)] {
        let err = DataQualityDeriver::configure(&json!({"scope": scope, "rules": {}})).unwrap_err();
        assert!(matches!(err, TermError::InvalidScope { .. }), "{err}");
    }
}

#[test]
fn test_missing_keys() {
    let err = DataQualityDeriver::configure(&json!({"rules": {}})).unwrap_err();
    assert!(matches!(err, TermError::MissingConfig { ref key } if key == "scope"));

    let err = DataQualityDeriver::configure(&json!({"scope": "row"})).unwrap_err();
    assert!(matches!(err, TermError::MissingConfig { ref key } if key == "rules"));
}

#[test]
fn test_unknown_rule_type_per_scope() {
    let err = DataQualityDeriver::configure(&json!({
        "scope": "row",
        "rules": {"size": {"type": "count", "expected": 1}}
    }))
    .unwrap_err();
    assert!(matches!(
        err,
        TermError::UnknownRuleType { ref scope, ref rule_type, ref rule }
            if scope == "row" && rule_type == "count" && rule == "size"
    ));

    let err = DataQualityDeriver::configure(&json!({
        "scope": "dataset",
        "rules": {"custom": {"type": "nosuchrule"}}
    }))
    .unwrap_err();
    assert!(matches!(err, TermError::UnknownRuleType { .. }));
}

#[test]
fn test_invalid_rule_options() {
    for rule in [
        json!({"type": "checknulls"}),
        json!({"type": "checknulls", "fields": ["a"], "extra": 1}),
        json!({"type": "range", "fields": ["a"], "range": [2, 1]}),
        json!({"type": "regex", "fields": ["a"], "regex": "(unclosed"}),
        json!({"fields": ["a"]}),
        json!("checknulls"),
    ] {
        let err = DataQualityDeriver::configure(&json!({
            "scope": "row",
            "rules": {"bad": rule}
        }))
        .unwrap_err();
        assert!(
            matches!(err, TermError::InvalidRuleConfig { ref rule, .. } if rule == "bad"),
            "unexpected error: {err}"
        );
        assert!(err.is_configuration_error());
    }
}

#[test]
fn test_config_from_json_text() {
    let config = DataQualityConfig::from_json_str(
        r#"{
            "scope": "row",
            "dataset": "customers",
            "rules": {
                "z_last_alphabetically": {"type": "checknulls", "fields": ["id"]},
                "a_first_alphabetically": {"type": "checknulls", "fields": ["name"]}
            }
        }"#,
    )
    .unwrap();

    assert_eq!(config.scope, Scope::Row);
    assert_eq!(config.dataset.as_deref(), Some("customers"));
    assert_eq!(config.results_field, DEFAULT_RESULTS_FIELD);

    let deriver = DataQualityDeriver::from_config(&config, RuleRegistries::builtin()).unwrap();
    assert_eq!(
        deriver.rule_names(),
        vec!["z_last_alphabetically", "a_first_alphabetically"]
    );
}

#[test]
fn test_malformed_json_text() {
    let err = DataQualityConfig::from_json_str("{\"scope\": ").unwrap_err();
    assert!(matches!(err, TermError::Serialization(_)));
}
