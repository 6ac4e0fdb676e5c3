use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

const URL_VARS: &[&str] = &["SUPABASE_URL", "VITE_SUPABASE_URL"];
const KEY_VARS: &[&str] = &["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"];

/// Application configuration loaded from environment variables.
///
/// The backend settings are optional: without them the service still starts
/// and serves the read-only degraded mode.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: Option<BackendConfig>,
    pub port: u16,
    pub rust_log: String,
}

/// Where the hosted store lives and the public key used to reach it.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: Url,
    pub anon_key: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_secs = std::env::var("BACKEND_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".to_string())
            .parse::<u64>()
            .context("BACKEND_TIMEOUT_SECS must be a whole number of seconds")?;

        let backend = match (optional_env(URL_VARS), optional_env(KEY_VARS)) {
            (Some(url), Some(anon_key)) => Some(BackendConfig {
                url: Url::parse(&url)
                    .with_context(|| format!("SUPABASE_URL '{url}' is not a valid URL"))?,
                anon_key,
                timeout: Duration::from_secs(timeout_secs),
            }),
            _ => None,
        };

        Ok(Config {
            backend,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn is_backend_configured(&self) -> bool {
        self.backend.is_some()
    }
}

/// First non-blank value among `keys`.
fn optional_env(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
