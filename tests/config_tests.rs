//! Configuration loading from TOML files and environment variables

use pretty_assertions::assert_eq;
use serial_test::serial;
use std::io::Write;
use std::time::Duration;
use tuya_hap_bridge::{Accessory, BridgeConfig, CharacteristicKind, RemoteDeviceClient};

mod common;
use common::MockRemote;

const SAMPLE: &str = r#"
[tuya]
base_url = "https://px1.tuyaus.com"
access_token = "USheu1590000000abcdef"
timeout = "5s"

[logging]
level = "debug"

[[devices]]
id = "bf8c1a2d3e4f5a6b7c8d"
name = "Bedroom Fan"
dev_type = "fan"
capabilities = { speed_level = 4, speed = "1", state = "true" }

[[devices]]
id = "bf0a9b8c7d6e5f4a3b2c"
name = "Desk Plug"
dev_type = "switch"
capabilities = { state = false }
"#;

fn write_sample() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn test_load_from_file() {
    let file = write_sample();
    let config = BridgeConfig::from_file(file.path()).unwrap();

    assert_eq!(config.tuya.base_url.as_str(), "https://px1.tuyaus.com/");
    assert_eq!(config.tuya.timeout, Duration::from_secs(5));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.devices.len(), 2);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_configured_devices_expose_supported_characteristics() {
    let file = write_sample();
    let config = BridgeConfig::from_file(file.path()).unwrap();
    let client: std::sync::Arc<dyn RemoteDeviceClient> = std::sync::Arc::new(MockRemote::new());

    let fan = Accessory::new(
        config.device("bf8c1a2d3e4f5a6b7c8d").unwrap().descriptor(),
        std::sync::Arc::clone(&client),
    )
    .unwrap();
    let kinds: Vec<_> = fan.characteristics().map(|(kind, _)| kind).collect();
    assert_eq!(kinds, vec![CharacteristicKind::On, CharacteristicKind::RotationSpeed]);

    let plug = Accessory::new(
        config.device("bf0a9b8c7d6e5f4a3b2c").unwrap().descriptor(),
        client,
    )
    .unwrap();
    assert!(plug.adapter(CharacteristicKind::RotationSpeed).is_none());
}

#[test]
#[serial]
fn test_env_overrides_file() {
    let file = write_sample();
    temp_env::with_vars(
        [
            ("TUYA_ACCESS_TOKEN", Some("EUheu0000")),
            ("TUYA_TIMEOUT", Some("3")),
            ("TUYA_BASE_URL", None),
            ("RUST_LOG", None),
        ],
        || {
            let mut config = BridgeConfig::from_file(file.path()).unwrap();
            config.apply_env().unwrap();

            assert_eq!(config.tuya.access_token, "EUheu0000");
            assert_eq!(config.tuya.timeout, Duration::from_secs(3));
            assert_eq!(config.logging.level, "debug");
        },
    );
}

#[test]
#[serial]
fn test_invalid_env_timeout_rejected() {
    temp_env::with_vars([("TUYA_TIMEOUT", Some("soon"))], || {
        let err = BridgeConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("TUYA_TIMEOUT"));
    });
}

#[test]
#[serial]
fn test_missing_token_fails_validation() {
    temp_env::with_vars([("TUYA_ACCESS_TOKEN", None::<&str>)], || {
        let config = BridgeConfig::from_env().unwrap();
        assert!(config.validate().is_err());
    });
}

#[test]
fn test_broken_toml_is_a_config_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"[tuya\nbase_url = ").unwrap();

    let err = BridgeConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, tuya_hap_bridge::BridgeError::Config(_)));
}
