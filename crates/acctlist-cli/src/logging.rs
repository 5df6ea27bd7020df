// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::config::Config;
use anyhow::{Context, Result, anyhow};
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "ACCTLIST_LOG";

/// `ACCTLIST_LOG` wins over `[log].level`.
pub fn env_filter(config: &Config) -> Result<EnvFilter> {
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(config.log_level())
            .with_context(|| format!("invalid log.level {:?}", config.log_level())),
    }
}

/// Sends logs to the configured file; the terminal belongs to the UI. Keep
/// the returned guard alive until exit so buffered lines get flushed.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    let path = config.log_file()?;
    let dir = path
        .parent()
        .ok_or_else(|| anyhow!("log file {} has no parent directory", path.display()))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("log file {} has no file name", path.display()))?;
    fs::create_dir_all(dir).with_context(|| format!("create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .with(env_filter(config)?)
        .try_init()
        .context("install log subscriber")?;

    tracing::info!(file = %path.display(), "logging initialized");
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::env_filter;
    use crate::config::Config;

    #[test]
    fn configured_level_builds_a_filter() {
        let mut config = Config::default();
        config.log.level = Some("acctlist_app=debug,warn".to_owned());
        let filter = env_filter(&config).expect("filter");
        assert!(filter.to_string().contains("acctlist_app=debug"));
    }
}
