//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use star_talks_core::{CallPolicy, HistoryWindow};
use tracing::Level;

/// Gemini's OpenAI-compatible endpoint.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub chart_model: String,
    pub chat_model: String,
    pub chat_temperature: f32,
    pub request_timeout: Option<Duration>,
    pub retry_backoff: Option<Duration>,
    pub history_window: Option<usize>,
    pub cors_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Load Server Settings ---
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:5173".to_string());

        // --- Load API Key (as optional) ---
        let gemini_api_key = lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty());
        let gemini_api_base =
            lookup("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string());

        // --- Load Adapter-specific Settings ---
        let chart_model = lookup("CHART_MODEL").unwrap_or_else(|| "gemini-2.5-flash".to_string());
        let chat_model = lookup("CHAT_MODEL").unwrap_or_else(|| "gemini-2.5-pro".to_string());
        let chat_temperature = match lookup("CHAT_TEMPERATURE") {
            Some(raw) => parse_var("CHAT_TEMPERATURE", &raw)?,
            None => star_talks_core::conversation::DEFAULT_TEMPERATURE,
        };

        // --- Load Call Policy Settings ---
        let request_timeout = lookup("REQUEST_TIMEOUT_SECS")
            .map(|raw| parse_var::<u64>("REQUEST_TIMEOUT_SECS", &raw))
            .transpose()?
            .map(Duration::from_secs);
        let retry_backoff = lookup("RETRY_BACKOFF_MS")
            .map(|raw| parse_var::<u64>("RETRY_BACKOFF_MS", &raw))
            .transpose()?
            .map(Duration::from_millis);
        let history_window = lookup("HISTORY_WINDOW")
            .map(|raw| parse_var::<usize>("HISTORY_WINDOW", &raw))
            .transpose()?;
        if history_window == Some(0) {
            return Err(ConfigError::InvalidValue(
                "HISTORY_WINDOW".to_string(),
                "must keep at least one turn".to_string(),
            ));
        }

        Ok(Self {
            bind_address,
            log_level,
            gemini_api_key,
            gemini_api_base,
            chart_model,
            chat_model,
            chat_temperature,
            request_timeout,
            retry_backoff,
            history_window,
            cors_origin,
        })
    }

    /// The failure policy handed to both orchestration components.
    pub fn call_policy(&self) -> CallPolicy {
        let mut policy = CallPolicy::one_shot();
        if let Some(timeout) = self.request_timeout {
            policy = policy.with_timeout(timeout);
        }
        if let Some(backoff) = self.retry_backoff {
            policy = policy.with_retry(backoff);
        }
        policy
    }

    pub fn history_window(&self) -> HistoryWindow {
        self.history_window
            .map(HistoryWindow::Recent)
            .unwrap_or_default()
    }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
}
