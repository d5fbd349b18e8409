use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub youtube_api_key: String,
    pub youtube_api_url: String,
    pub web_search_url: String,
    pub web_search_lang: String,
    /// Minimum gap between two web-search lookups.
    pub search_pause_ms: u64,
    pub session_ttl_secs: i64,
    pub llm_max_retries: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            anthropic_api_key: require("ANTHROPIC_API_KEY")?,
            youtube_api_key: require("YOUTUBE_API_KEY")?,
            youtube_api_url: or_default("YOUTUBE_API_URL", "https://www.googleapis.com/youtube/v3"),
            web_search_url: or_default("WEB_SEARCH_URL", "https://www.google.com/search"),
            web_search_lang: or_default("WEB_SEARCH_LANG", "en"),
            search_pause_ms: parse_or_default(&lookup, "SEARCH_PAUSE_MS", 2000)?,
            session_ttl_secs: parse_or_default(&lookup, "SESSION_TTL_SECS", 3600)?,
            llm_max_retries: parse_or_default(&lookup, "LLM_MAX_RETRIES", 3)?,
            port: parse_or_default(&lookup, "PORT", 8080)
                .context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
        })
    }
}

fn parse_or_default<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}
