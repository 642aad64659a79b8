//! Environment configuration.

use std::{env, fmt::Display, str::FromStr, time::Duration};

use log::{info, warn};

pub const DEFAULT_DB_NAME: &str = "w1ne";
pub const DEFAULT_CHAT_ENDPOINT: &str = "https://w1ne-ai-claude.shawn-815.workers.dev";
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_SEARCH_MODEL: &str = "claude-sonnet-4-20250514";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_name: String,
    pub chat_endpoint: String,
    pub search_endpoint: String,
    pub search_model: String,
    pub search_api_key: Option<String>,
    /// `None` keeps the HTTP transport default.
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_name: DEFAULT_DB_NAME.to_string(),
            chat_endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            search_model: DEFAULT_SEARCH_MODEL.to_string(),
            search_api_key: None,
            request_timeout: None,
        }
    }
}

impl Config {
    /// Reads `W1NE_*` variables, after loading a `.env` file if present.
    pub fn load() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            info!("No .env file loaded: {e}");
        }

        Self {
            db_name: try_load("W1NE_DB_NAME", DEFAULT_DB_NAME),
            chat_endpoint: try_load("W1NE_CHAT_ENDPOINT", DEFAULT_CHAT_ENDPOINT),
            search_endpoint: try_load("W1NE_SEARCH_ENDPOINT", DEFAULT_SEARCH_ENDPOINT),
            search_model: try_load("W1NE_SEARCH_MODEL", DEFAULT_SEARCH_MODEL),
            search_api_key: env::var("W1NE_SEARCH_API_KEY").ok(),
            request_timeout: try_load_optional::<u64>("W1NE_REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs),
        }
    }
}

fn try_load(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn try_load_optional<T>(key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = env::var(key).ok()?;
    raw.parse()
        .map_err(|e| warn!("Invalid {key} value: {e}, ignoring"))
        .ok()
}
