//! Tests for config loading, validation and token persistence

use std::io::Write;

use tempfile::NamedTempFile;

use crate::config::{persist_refresh_token, validate_commission, Config, Settings};
use crate::error::SyncError;
use crate::models::MatchStrategy;

const FULL_CONFIG: &str = r#"{
    "mercadolibre": {
        "client_id": 1234567890,
        "client_secret": "secret",
        "refresh_token": "TG-old",
        "user_id": "98765"
    },
    "tiendanube": {
        "api_key": "tn_key",
        "user_id": 4321
    },
    "settings": {
        "ml_commission": 15.5,
        "match_by_sku": false,
        "min_price_diff": 0.5
    }
}"#;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn loads_credentials_and_merges_settings_with_defaults() {
    let file = write_config(FULL_CONFIG);
    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.mercadolibre.client_id, "1234567890");
    assert_eq!(config.mercadolibre.refresh_token, "TG-old");
    assert_eq!(config.tiendanube.user_id, "4321");
    assert_eq!(config.settings.ml_commission, 15.5);
    assert_eq!(config.settings.min_price_diff, 0.5);
    // defaults for everything not in the file
    assert_eq!(config.settings.price_round_digits, 2);
    assert_eq!(config.settings.ml_api_rate_limit, 0.5);
    assert_eq!(config.settings.name_locale, "es");
}

#[test]
fn settings_section_is_optional() {
    let json = r#"{
        "mercadolibre": {"client_id": "a", "client_secret": "b", "refresh_token": "c", "user_id": "d"},
        "tiendanube": {"api_key": "e", "user_id": "f"}
    }"#;
    let config = Config::from_json_str(json).unwrap();
    assert_eq!(config.settings, Settings::default());
    assert_eq!(config.settings.match_strategy(), MatchStrategy::BySku);
}

#[test]
fn sync_settings_carry_configured_values() {
    let config = Config::from_json_str(FULL_CONFIG).unwrap();
    let settings = config.sync_settings(true);

    assert_eq!(settings.commission_rate_percent, 15.5);
    assert_eq!(settings.match_strategy, MatchStrategy::ByName);
    assert_eq!(settings.min_price_diff_tolerance, 0.5);
    assert_eq!(settings.price_round_digits, 2);
    assert!(settings.dry_run);
}

#[test]
fn reports_every_missing_credential() {
    let json = r#"{
        "mercadolibre": {"client_id": "a", "refresh_token": ""},
        "tiendanube": {"user_id": "f"}
    }"#;
    let err = Config::from_json_str(json).unwrap_err();

    let SyncError::Configuration(msg) = err else {
        panic!("expected configuration error, got {err:?}");
    };
    assert!(msg.contains("client_secret"), "{msg}");
    assert!(msg.contains("refresh_token"), "{msg}");
    assert!(msg.contains("user_id"), "{msg}");
    assert!(msg.contains("api_key"), "{msg}");
    assert!(!msg.contains("client_id"), "{msg}");
}

#[test]
fn rejects_invalid_settings() {
    let json = r#"{
        "mercadolibre": {"client_id": "a", "client_secret": "b", "refresh_token": "c", "user_id": "d"},
        "tiendanube": {"api_key": "e", "user_id": "f"},
        "settings": {"min_price_diff": -1}
    }"#;
    assert!(matches!(
        Config::from_json_str(json),
        Err(SyncError::Configuration(_))
    ));
}

#[test]
fn commission_override_uses_config_rule() {
    assert!(validate_commission(13.0).is_ok());
    assert!(validate_commission(0.0).is_ok());
    assert!(validate_commission(-99.5).is_ok());
    for rate in [-100.0, -150.0, f64::NAN, f64::INFINITY] {
        assert!(
            matches!(validate_commission(rate), Err(SyncError::Configuration(_))),
            "rate {rate} must be rejected"
        );
    }
}

#[test]
fn missing_file_is_configuration_error() {
    let err = Config::load("/definitely/not/here/credentials.json").unwrap_err();
    assert!(matches!(err, SyncError::Configuration(_)));
}

#[test]
fn malformed_json_is_configuration_error() {
    let file = write_config("{ not json");
    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, SyncError::Configuration(ref m) if m.contains("Invalid JSON")));
}

#[test]
fn persists_rotated_refresh_token_and_keeps_other_fields() {
    let file = write_config(FULL_CONFIG);

    persist_refresh_token(file.path(), "TG-new").unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.mercadolibre.refresh_token, "TG-new");
    assert_eq!(config.mercadolibre.client_secret, "secret");
    assert_eq!(config.tiendanube.api_key, "tn_key");
    assert_eq!(config.settings.ml_commission, 15.5);
}

#[test]
fn persist_refuses_non_object_file() {
    let file = write_config("[1, 2, 3]");
    assert!(persist_refresh_token(file.path(), "TG-new").is_err());
}
