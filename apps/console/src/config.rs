use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "console.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub banner_secs: u64,
    pub command_queue_capacity: usize,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".into(),
            request_timeout_secs: 30,
            banner_secs: 3,
            command_queue_capacity: 64,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    /// Raises zero durations and capacities to their smallest usable value.
    pub fn clamp_limits(&mut self) {
        self.request_timeout_secs = self.request_timeout_secs.max(1);
        self.banner_secs = self.banner_secs.max(1);
        self.command_queue_capacity = self.command_queue_capacity.max(1);
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn banner_ttl(&self) -> Duration {
        Duration::from_secs(self.banner_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    banner_secs: Option<u64>,
    command_queue_capacity: Option<usize>,
    log_filter: Option<String>,
}

/// Defaults, then the config file, then environment overrides.
///
/// An explicit `path` must exist; the default `console.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_with(path, |key| std::env::var(key).ok())
}

fn load_settings_with(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let raw = match path {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?,
        ),
        None => fs::read_to_string(DEFAULT_CONFIG_FILE).ok(),
    };
    if let Some(raw) = raw {
        let file_cfg: FileConfig = toml::from_str(&raw).context("invalid config file")?;
        apply_file(&mut settings, file_cfg);
    }

    if let Some(v) = env("ASSISTANT_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = env("APP__BASE_URL") {
        settings.base_url = v;
    }
    if let Some(parsed) = env("APP__REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
        settings.request_timeout_secs = parsed;
    }
    if let Some(parsed) = env("APP__BANNER_SECS").and_then(|v| v.parse().ok()) {
        settings.banner_secs = parsed;
    }
    if let Some(parsed) = env("APP__COMMAND_QUEUE_CAPACITY").and_then(|v| v.parse().ok()) {
        settings.command_queue_capacity = parsed;
    }
    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    settings.clamp_limits();
    Ok(settings)
}

fn apply_file(settings: &mut Settings, file_cfg: FileConfig) {
    if let Some(v) = file_cfg.base_url {
        settings.base_url = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file_cfg.banner_secs {
        settings.banner_secs = v;
    }
    if let Some(v) = file_cfg.command_queue_capacity {
        settings.command_queue_capacity = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
