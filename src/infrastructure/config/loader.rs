use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("trial count must be at least 1")]
    InvalidTrialCount,

    #[error("check prefix cannot be empty")]
    EmptyCheckPrefix,

    #[error("probe path cannot be empty")]
    EmptyProbePath,

    #[error("hosting.{0} is required")]
    MissingHostingField(&'static str),

    #[error("poll interval must be positive")]
    InvalidPollInterval,

    #[error("global timeout ({timeout_secs}s) must exceed the poll interval ({poll_secs}s)")]
    InvalidTimeout { timeout_secs: u64, poll_secs: u64 },

    #[error("retry max_attempts cannot be 0")]
    InvalidMaxAttempts,

    #[error("initial backoff ({0}s) must not exceed max backoff ({1}s)")]
    InvalidBackoff(u64, u64),

    #[error("invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("invalid schedule time {hour:02}:{minute:02}")]
    InvalidScheduleTime { hour: u32, minute: u32 },

    #[error("notifications enabled but no webhook_url configured")]
    MissingWebhookUrl,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. pulsecheck.yaml (project config)
    /// 3. pulsecheck.local.yaml (local overrides, optional)
    /// 4. Environment variables (PULSECHECK_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("pulsecheck.yaml"))
            .merge(Yaml::file("pulsecheck.local.yaml"))
            .merge(Env::prefixed("PULSECHECK_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring env overrides.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("PULSECHECK_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.trial.count == 0 {
            return Err(ConfigError::InvalidTrialCount);
        }
        if config.trial.check_prefix.is_empty() {
            return Err(ConfigError::EmptyCheckPrefix);
        }
        if config.trial.probe_path.is_empty() {
            return Err(ConfigError::EmptyProbePath);
        }
        if config.trial.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidPollInterval);
        }
        if config.trial.timeout_secs <= config.trial.poll_interval_secs {
            return Err(ConfigError::InvalidTimeout {
                timeout_secs: config.trial.timeout_secs,
                poll_secs: config.trial.poll_interval_secs,
            });
        }

        for (field, value) in [
            ("owner", &config.hosting.owner),
            ("repo", &config.hosting.repo),
            ("fork_owner", &config.hosting.fork_owner),
            ("token", &config.hosting.token),
        ] {
            if value.is_empty() {
                return Err(ConfigError::MissingHostingField(field));
            }
        }

        if config.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts);
        }
        if config.retry.initial_backoff_secs > config.retry.max_backoff_secs {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_secs,
                config.retry.max_backoff_secs,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }
        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if config.schedule.hour > 23 || config.schedule.minute > 59 {
            return Err(ConfigError::InvalidScheduleTime {
                hour: config.schedule.hour,
                minute: config.schedule.minute,
            });
        }

        if config.notify.enabled && config.notify.webhook_url.is_none() {
            return Err(ConfigError::MissingWebhookUrl);
        }

        Ok(())
    }
}
