// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use ledgerdesk_api::Client;
use ledgerdesk_app::{FallbackPolicy, ScreenKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub const APP_NAME: &str = "ledgerdesk";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT: &str = "5s";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api: Api::default(),
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub base_url: Option<String>,
    pub timeout: Option<String>,
    #[serde(default)]
    pub paths: BTreeMap<String, String>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
            paths: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub start_screen: Option<String>,
    pub fallback: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("LEDGERDESK_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!(
                "cannot resolve config directory; set LEDGERDESK_CONFIG_PATH to the config file"
            )
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version. Add `version = 1` at the top and put settings under [api], [ui], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(timeout) = &self.api.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed.is_zero() {
                bail!(
                    "api.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        for (key, value) in &self.api.paths {
            if ScreenKind::parse(key).is_none() {
                bail!(
                    "unknown screen {key:?} under [api.paths] in {}; expected one of: {}",
                    path.display(),
                    screen_names()
                );
            }
            if !value.starts_with('/') {
                bail!(
                    "api.paths.{key} in {} must start with '/', got {value:?}",
                    path.display()
                );
            }
        }

        if let Some(start) = &self.ui.start_screen
            && ScreenKind::parse(start).is_none()
        {
            bail!(
                "ui.start_screen in {} must be one of: {}; got {start:?}",
                path.display(),
                screen_names()
            );
        }

        if let Some(policy) = &self.ui.fallback
            && FallbackPolicy::parse(policy).is_none()
        {
            bail!(
                "ui.fallback in {} must be \"substitute\" or \"surface\", got {policy:?}",
                path.display()
            );
        }

        if let Some(level) = &self.log.level
            && let Err(error) = EnvFilter::try_new(level)
        {
            bail!(
                "log.level in {} is not a valid filter ({error}); try \"info\" or \"ledgerdesk_api=debug\"",
                path.display()
            );
        }

        Ok(())
    }

    /// `LEDGERDESK_API_URL` wins over the file when set.
    pub fn api_base_url(&self) -> String {
        if let Ok(url) = env::var("LEDGERDESK_API_URL")
            && !url.trim().is_empty()
        {
            return url.trim().trim_end_matches('/').to_owned();
        }
        self.api
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_owned()
    }

    pub fn api_timeout(&self) -> Result<Duration> {
        parse_duration(self.api.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn build_client(&self) -> Result<Client> {
        let mut client = Client::new(&self.api_base_url(), self.api_timeout()?)?;
        for (key, path) in &self.api.paths {
            let screen = ScreenKind::parse(key)
                .ok_or_else(|| anyhow!("unknown screen {key:?} under [api.paths]"))?;
            client = client.with_path(screen, path)?;
        }
        Ok(client)
    }

    pub fn start_screen(&self) -> Result<ScreenKind> {
        match &self.ui.start_screen {
            Some(raw) => ScreenKind::parse(raw)
                .ok_or_else(|| anyhow!("ui.start_screen must be one of: {}", screen_names())),
            None => Ok(ScreenKind::AmlCases),
        }
    }

    pub fn fallback_policy(&self) -> Result<FallbackPolicy> {
        match &self.ui.fallback {
            Some(raw) => FallbackPolicy::parse(raw)
                .ok_or_else(|| anyhow!("ui.fallback must be \"substitute\" or \"surface\"")),
            None => Ok(FallbackPolicy::default()),
        }
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        if let Some(file) = &self.log.file {
            return Ok(PathBuf::from(file));
        }
        let data_root = dirs::data_local_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [log].file to an explicit path")
        })?;
        Ok(data_root.join(APP_NAME).join(format!("{APP_NAME}.log")))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# ledgerdesk config\n# Place this file at: {}\n\nversion = 1\n\n[api]\nbase_url = \"{}\"\n# <N>ms, <N>s or <N>m\ntimeout = \"{}\"\n\n# Optional per-screen path overrides.\n# [api.paths]\n# aml_cases = \"/api/aml/cases\"\n# quality_reviews = \"/api/quality/reviews/search\"\n\n[ui]\n# one of: {}\nstart_screen = \"aml_cases\"\n# \"substitute\" shows sample data when the API is down, \"surface\" shows the error\nfallback = \"substitute\"\n\n[log]\nlevel = \"{}\"\n# Optional. Default is the platform data dir (for example ~/.local/share/ledgerdesk/ledgerdesk.log)\n# file = \"/absolute/path/to/ledgerdesk.log\"\n",
            path.display(),
            DEFAULT_BASE_URL,
            DEFAULT_TIMEOUT,
            screen_names(),
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn screen_names() -> String {
    ScreenKind::ALL
        .iter()
        .map(|screen| screen.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `<N>ms`, `<N>s` or `<N>m`.
fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    let split = raw
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let value: u64 = digits.parse().with_context(|| {
        format!("invalid duration {raw:?}; expected a whole number followed by ms, s or m")
    })?;
    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => value
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| anyhow!("duration {raw:?} is too large")),
        _ => bail!(
            "invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)"
        ),
    }
}

/// Serializes tests that touch process environment variables.
#[cfg(test)]
pub(crate) fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, env_lock, parse_duration};
    use anyhow::Result;
    use ledgerdesk_app::{FallbackPolicy, ScreenKind};
    use ledgerdesk_testkit::temp_config_path;
    use std::path::PathBuf;
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let (temp, path) = temp_config_path()?;
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.api_timeout()?, Duration::from_secs(5));
        assert_eq!(config.start_screen()?, ScreenKind::AmlCases);
        assert_eq!(config.fallback_policy()?, FallbackPolicy::Substitute);
        assert_eq!(config.log_level(), "info");
        assert!(config.log_file()?.ends_with("ledgerdesk/ledgerdesk.log"));
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[api]\nbase_url = \"http://localhost:9000\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[api], [ui], and [log]"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 3\n")?;
        let error = Config::load(&path).expect_err("v3 config should fail");
        assert!(error.to_string().contains("unsupported config version 3"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn full_config_parses() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("LEDGERDESK_API_URL");
        }
        let (_temp, path) = write_config(
            "version = 1\n[api]\nbase_url = \"https://practice.example.co.uk/\"\ntimeout = \"750ms\"\n[api.paths]\ntasks = \"/v2/tasks\"\n[ui]\nstart_screen = \"invoices\"\nfallback = \"surface\"\n[log]\nlevel = \"ledgerdesk_api=debug\"\nfile = \"/var/log/ledgerdesk.log\"\n",
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.api_base_url(), "https://practice.example.co.uk");
        assert_eq!(config.api_timeout()?, Duration::from_millis(750));
        assert_eq!(config.start_screen()?, ScreenKind::Invoices);
        assert_eq!(config.fallback_policy()?, FallbackPolicy::Surface);
        assert_eq!(config.log_level(), "ledgerdesk_api=debug");
        assert_eq!(config.log_file()?, PathBuf::from("/var/log/ledgerdesk.log"));

        let client = config.build_client()?;
        assert_eq!(
            client.url_for(&client.endpoint(ScreenKind::Tasks)),
            "https://practice.example.co.uk/v2/tasks"
        );
        assert_eq!(client.timeout(), Duration::from_millis(750));
        Ok(())
    }

    #[test]
    fn unknown_path_screen_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[api.paths]\npayroll = \"/api/payroll\"\n")?;
        let error = Config::load(&path).expect_err("unknown screen should fail");
        let message = error.to_string();
        assert!(message.contains("unknown screen \"payroll\""));
        assert!(message.contains("aml_cases, clients"));
        Ok(())
    }

    #[test]
    fn relative_path_override_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[api.paths]\nclients = \"api/crm\"\n")?;
        let error = Config::load(&path).expect_err("relative path should fail");
        assert!(error.to_string().contains("api.paths.clients"));
        Ok(())
    }

    #[test]
    fn bad_ui_values_are_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nstart_screen = \"payroll\"\n")?;
        let error = Config::load(&path).expect_err("bad start screen should fail");
        assert!(error.to_string().contains("ui.start_screen"));

        let (_temp, path) = write_config("version = 1\n[ui]\nfallback = \"retry\"\n")?;
        let error = Config::load(&path).expect_err("bad fallback should fail");
        assert!(error.to_string().contains("\"substitute\" or \"surface\""));
        Ok(())
    }

    #[test]
    fn bad_log_level_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[log]\nlevel = \"ledgerdesk=loudest\"\n")?;
        let error = Config::load(&path).expect_err("bad filter should fail");
        assert!(error.to_string().contains("log.level"));
        Ok(())
    }

    #[test]
    fn zero_timeout_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[api]\ntimeout = \"0s\"\n")?;
        let error = Config::load(&path).expect_err("zero timeout should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn timeout_parses_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        Ok(())
    }

    #[test]
    fn timeout_rejects_invalid_duration() {
        let error = parse_duration("soon").expect_err("invalid duration should fail");
        let message = error.to_string();
        assert!(
            message.contains("invalid duration") || message.contains("invalid timeout duration"),
            "unexpected message: {message}"
        );
    }

    #[test]
    fn api_url_env_override_wins() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) =
            write_config("version = 1\n[api]\nbase_url = \"http://from-config:8080\"\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("LEDGERDESK_API_URL", "http://from-env:9090/");
        }
        let config = Config::load(&path)?;
        let resolved = config.api_base_url();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("LEDGERDESK_API_URL");
        }
        assert_eq!(resolved, "http://from-env:9090");
        assert_eq!(config.api_base_url(), "http://from-config:8080");
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("LEDGERDESK_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("LEDGERDESK_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_load() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = temp_config_path()?;
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[api]"));
        assert!(example.contains("[ui]"));
        assert!(example.contains("[log]"));

        std::fs::write(&path, example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.start_screen()?, ScreenKind::AmlCases);
        Ok(())
    }
}
