//! Configuration module - environment variable parsing

use std::env;

/// Application configuration loaded from environment variables. Every
/// variable is optional; defaults give a playable lenient-mode match.
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Surface unknown player ids as errors instead of silent no-ops
    pub strict_refs: bool,
    /// How long the demo driver keeps the match alive (seconds)
    pub match_duration_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let strict_refs = match env::var("STRICT_REFS") {
            Ok(value) => parse_bool(&value).ok_or(ConfigError::Invalid("STRICT_REFS"))?,
            Err(_) => false,
        };

        let match_duration_secs = match env::var("MATCH_DURATION_SECS") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid("MATCH_DURATION_SECS"))?,
            Err(_) => 10,
        };

        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            strict_refs,
            match_duration_secs,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
