//! Configuration for dirhash commands

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CoreError, CoreResult};

/// Default polling interval of the watch loop
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;

pub const ENV_POLL_INTERVAL_MS: &str = "DIRHASH_POLL_INTERVAL_MS";
pub const ENV_COLOR: &str = "DIRHASH_COLOR";
pub const ENV_LOG: &str = "RUST_LOG";

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirhashConfig {
    /// Delay between two watch polls
    pub poll_interval: Duration,

    /// Colored terminal output
    pub color: bool,

    /// Log filter directive
    pub log_level: String,
}

impl DirhashConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let poll_interval = match lookup(ENV_POLL_INTERVAL_MS) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(e) => {
                    warn!(value = %raw, error = %e, "Ignoring invalid {}", ENV_POLL_INTERVAL_MS);
                    defaults.poll_interval
                }
            },
            None => defaults.poll_interval,
        };

        let color = match lookup(ENV_COLOR) {
            Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "Ignoring invalid {}", ENV_COLOR);
                defaults.color
            }),
            None => defaults.color,
        };

        let log_level = lookup(ENV_LOG).unwrap_or(defaults.log_level);

        Self {
            poll_interval,
            color,
            log_level,
        }
    }

    /// Override the polling interval (e.g. from a command-line flag).
    pub fn with_poll_interval_ms(mut self, ms: Option<u64>) -> Self {
        if let Some(ms) = ms {
            self.poll_interval = Duration::from_millis(ms);
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.poll_interval.is_zero() {
            return Err(CoreError::Config(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if self.log_level.trim().is_empty() {
            return Err(CoreError::Config("log level must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for DirhashConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            color: true,
            log_level: "info".to_string(),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
