use super::{load_settings_with, Settings};

use std::{
    collections::HashMap,
    env, fs,
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn write_config(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("assistant_console_test_{suffix}.toml"));
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn defaults_match_backend_dev_server() {
    let settings = Settings::default();
    assert_eq!(settings.base_url, "http://127.0.0.1:5000");
    assert_eq!(settings.request_timeout(), Duration::from_secs(30));
    assert_eq!(settings.banner_ttl(), Duration::from_secs(3));
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn file_values_override_defaults() {
    let path = write_config("base_url = \"http://10.0.0.2:8080\"\nbanner_secs = 5\n");
    let settings = load_settings_with(Some(&path), env_from(&[])).expect("settings");
    fs::remove_file(&path).expect("cleanup");

    assert_eq!(settings.base_url, "http://10.0.0.2:8080");
    assert_eq!(settings.banner_secs, 5);
    assert_eq!(settings.request_timeout_secs, 30);
}

#[test]
fn env_overrides_file_and_ignores_bad_numbers() {
    let path = write_config("request_timeout_secs = 10\n");
    let settings = load_settings_with(
        Some(&path),
        env_from(&[
            ("ASSISTANT_BASE_URL", "http://a"),
            ("APP__BASE_URL", "http://b"),
            ("APP__REQUEST_TIMEOUT_SECS", "soon"),
            ("APP__COMMAND_QUEUE_CAPACITY", "0"),
            ("APP__LOG_FILTER", "debug"),
        ]),
    )
    .expect("settings");
    fs::remove_file(&path).expect("cleanup");

    assert_eq!(settings.base_url, "http://b");
    assert_eq!(settings.request_timeout_secs, 10);
    assert_eq!(settings.command_queue_capacity, 1);
    assert_eq!(settings.log_filter, "debug");
}

#[test]
fn malformed_file_is_an_error() {
    let path = write_config("banner_secs = \"three\"\n");
    let result = load_settings_with(Some(&path), env_from(&[]));
    fs::remove_file(&path).expect("cleanup");
    assert!(result.is_err());
}

#[test]
fn explicit_missing_file_is_an_error() {
    let path = env::temp_dir().join("assistant_console_missing.toml");
    assert!(load_settings_with(Some(&path), env_from(&[])).is_err());
}

#[test]
fn zero_timeouts_are_raised_to_one_second() {
    let path = write_config("request_timeout_secs = 0\n");
    let settings = load_settings_with(Some(&path), env_from(&[("APP__BANNER_SECS", "0")]))
        .expect("settings");
    fs::remove_file(&path).expect("cleanup");

    assert_eq!(settings.request_timeout(), Duration::from_secs(1));
    assert_eq!(settings.banner_ttl(), Duration::from_secs(1));

    let mut overridden = Settings {
        request_timeout_secs: 0,
        ..Settings::default()
    };
    overridden.clamp_limits();
    assert_eq!(overridden.request_timeout_secs, 1);
}
