use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the assistant service, e.g. `https://assist.example.com`.
    pub assist_base_url: String,
    pub assist_api_key: String,
    /// Location of the file-backed state store. `None` keeps state in memory.
    pub storage_path: Option<String>,
    pub assist_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            assist_base_url: require_env("ASSIST_BASE_URL")?,
            assist_api_key: require_env("ASSIST_API_KEY")?,
            storage_path: std::env::var("STORAGE_PATH").ok(),
            assist_timeout_secs: std::env::var("ASSIST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse::<u64>()
                .context("ASSIST_TIMEOUT_SECS must be a number of seconds")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
