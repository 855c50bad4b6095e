use std::{env, time::Duration};

use crate::error::ConfigError;

// ============================================================================
// Timing
// ============================================================================

pub const DEFAULT_GRAVITY_MS: u64 = 1000;
pub const DEFAULT_POLL_MS: u64 = 50;

pub const GRAVITY_ENV: &str = "TERMTRIS_GRAVITY_MS";
pub const POLL_ENV: &str = "TERMTRIS_POLL_MS";

/// Runtime cadence. Grid size and key bindings are fixed and live elsewhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Period between gravity ticks.
    pub gravity: Duration,
    /// Upper bound on how long the input listener waits before checking the stop signal.
    pub poll: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gravity: Duration::from_millis(DEFAULT_GRAVITY_MS),
            poll: Duration::from_millis(DEFAULT_POLL_MS),
        }
    }
}

impl Config {
    /// Defaults, overridden by `TERMTRIS_GRAVITY_MS` / `TERMTRIS_POLL_MS` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(gravity) = millis_from_env(GRAVITY_ENV)? {
            config.gravity = gravity;
        }
        if let Some(poll) = millis_from_env(POLL_ENV)? {
            config.poll = poll;
        }
        Ok(config)
    }
}

fn millis_from_env(var: &'static str) -> Result<Option<Duration>, ConfigError> {
    match env::var(var) {
        Ok(value) => parse_millis(var, &value).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_millis(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let millis: u64 = value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidMillis {
            var,
            value: value.to_string(),
        })?;
    if millis == 0 {
        return Err(ConfigError::ZeroDuration { var });
    }
    Ok(Duration::from_millis(millis))
}
