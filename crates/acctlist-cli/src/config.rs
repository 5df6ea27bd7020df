// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use acctlist_app::{AccountType, DEFAULT_SCRIPT_NAME, StatusFilter};
use acctlist_bridge::{DEFAULT_URL_SCHEME, FallbackTarget};
use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "acctlist";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_HOST_TIMEOUT: &str = "5s";
const DEFAULT_ADD_GUARD_DELAY: &str = "1000ms";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub host: Host,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            host: Host::default(),
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Host {
    pub script_name: Option<String>,
    pub endpoint: Option<String>,
    pub timeout: Option<String>,
    pub url_scheme: Option<String>,
    pub url_file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub default_type: Option<String>,
    pub default_filter: Option<String>,
    pub add_guard_delay: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("ACCTLIST_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set ACCTLIST_CONFIG_PATH to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
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
                    "config file {} is not versioned. Add `version = 1` and put values under [host], [ui], and [log]",
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
        if let Some(name) = &self.host.script_name
            && name.trim().is_empty()
        {
            bail!("host.script_name in {} must not be empty", path.display());
        }

        if let Some(scheme) = &self.host.url_scheme
            && scheme.trim().is_empty()
        {
            bail!("host.url_scheme in {} must not be empty", path.display());
        }

        let timeout = self.host_timeout()?;
        if timeout.is_zero() {
            bail!(
                "host.timeout in {} must be positive, got {:?}",
                path.display(),
                self.host.timeout.as_deref().unwrap_or_default()
            );
        }

        self.default_type()
            .with_context(|| format!("invalid [ui] config in {}", path.display()))?;
        self.default_filter()
            .with_context(|| format!("invalid [ui] config in {}", path.display()))?;
        self.add_guard_delay()
            .with_context(|| format!("invalid [ui] config in {}", path.display()))?;
        Ok(())
    }

    pub fn script_name(&self) -> &str {
        self.host
            .script_name
            .as_deref()
            .map(str::trim)
            .unwrap_or(DEFAULT_SCRIPT_NAME)
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.host
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
    }

    pub fn host_timeout(&self) -> Result<Duration> {
        parse_duration(self.host.timeout.as_deref().unwrap_or(DEFAULT_HOST_TIMEOUT))
    }

    pub fn fallback_target(&self) -> FallbackTarget {
        FallbackTarget {
            scheme: self
                .host
                .url_scheme
                .as_deref()
                .map(str::trim)
                .unwrap_or(DEFAULT_URL_SCHEME)
                .to_owned(),
            file: self
                .host
                .url_file
                .as_deref()
                .map(str::trim)
                .filter(|file| !file.is_empty())
                .map(str::to_owned),
        }
    }

    pub fn default_type(&self) -> Result<AccountType> {
        match self.ui.default_type.as_deref() {
            None => Ok(AccountType::Individual),
            Some(raw) => AccountType::parse(raw).ok_or_else(|| {
                anyhow!("ui.default_type {raw:?} is not one of: Individual, Group")
            }),
        }
    }

    pub fn default_filter(&self) -> Result<StatusFilter> {
        match self.ui.default_filter.as_deref() {
            None => Ok(StatusFilter::All),
            Some(raw) => StatusFilter::parse(raw).ok_or_else(|| {
                anyhow!("ui.default_filter {raw:?} is not one of: all, active, inactive")
            }),
        }
    }

    pub fn add_guard_delay(&self) -> Result<Duration> {
        parse_duration(
            self.ui
                .add_guard_delay
                .as_deref()
                .unwrap_or(DEFAULT_ADD_GUARD_DELAY),
        )
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        if let Some(file) = &self.log.file {
            return Ok(PathBuf::from(file));
        }
        let root = dirs::state_dir()
            .or_else(dirs::cache_dir)
            .ok_or_else(|| anyhow!("cannot resolve a log directory; set [log].file"))?;
        Ok(root.join(APP_NAME).join("acctlist.log"))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# acctlist config\n# Place this file at: {}\n\nversion = 1\n\n[host]\nscript_name = \"{}\"\n# Optional. POST {{\"script\", \"parameter\"}} here instead of opening a script URL.\n# endpoint = \"http://localhost:8080/script\"\ntimeout = \"{}\"\nurl_scheme = \"{}\"\n# Optional. Defaults to the script name.\n# url_file = \"Accounts\"\n\n[ui]\ndefault_type = \"Individual\"\ndefault_filter = \"all\"\nadd_guard_delay = \"{}\"\n\n[log]\nlevel = \"{}\"\n# file = \"/absolute/path/to/acctlist.log\"\n",
            path.display(),
            DEFAULT_SCRIPT_NAME,
            DEFAULT_HOST_TIMEOUT,
            DEFAULT_URL_SCHEME,
            DEFAULT_ADD_GUARD_DELAY,
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}
