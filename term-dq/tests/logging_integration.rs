//! Global subscriber setup.
//!
//! Kept in its own test binary: the subscriber is process-wide, so these
//! assertions depend on nothing else having installed one first.

use serde_json::json;
use term_dq::logging::setup::{init_logging, LoggingConfig};
use term_dq::prelude::*;

#[test]
fn test_init_logging_installs_subscriber_once() {
    let config = LoggingConfig::development().with_env_filter("term_dq=trace");
    assert!(init_logging(config).is_ok());

    // Registry and configuration events go through the installed subscriber.
    let deriver =
        DataQualityDeriver::configure(&json!({"scope": "row", "rules": {}})).unwrap();
    assert_eq!(deriver.scope(), Scope::Row);

    let err = init_logging(LoggingConfig::production().with_json_format(true));
    assert!(err.is_err());
}
