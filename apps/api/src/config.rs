use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub profile_source_url: String,
    pub profile_source_token: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub turn_timeout: Duration,
    /// Completed turns shown to the intent classifier (clamped to 1..=8 there).
    pub classifier_history_turns: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            profile_source_url: require_env("PROFILE_SOURCE_URL")?,
            profile_source_token: std::env::var("PROFILE_SOURCE_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            turn_timeout: Duration::from_secs(
                parse_env("TURN_TIMEOUT_SECS", 90)
                    .context("TURN_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            classifier_history_turns: parse_env("CLASSIFIER_HISTORY_TURNS", 4)
                .context("CLASSIFIER_HISTORY_TURNS must be a positive integer")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => Ok(value.trim().parse::<T>()?),
        Err(_) => Ok(default),
    }
}
