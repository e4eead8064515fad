//! Console configuration

use std::path::PathBuf;

use rayan_client::ClientConfig;
use rayan_client::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

use crate::cli::GlobalArgs;

/// Console configuration, read from the environment after `.env` is loaded
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// API host (env: RAYAN_API_URL)
    pub api_url: String,
    /// Response language, "en" or "ar" (env: RAYAN_LOCALE)
    pub locale: Option<String>,
    /// Request timeout in seconds (env: RAYAN_TIMEOUT_SECS)
    pub timeout_secs: u64,
    /// Directory holding the saved token (env: RAYAN_TOKEN_DIR)
    pub token_dir: PathBuf,
    /// Log filter used when RUST_LOG is unset (env: LOG_LEVEL)
    pub log_level: String,
    /// JSON log lines (env: LOG_JSON)
    pub log_json: bool,
}

impl ConsoleConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            api_url: var("RAYAN_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            locale: var("RAYAN_LOCALE"),
            timeout_secs: var("RAYAN_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            token_dir: var("RAYAN_TOKEN_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".rayan")),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "rayan_client=info,rayan=info".into()),
            log_json: var("LOG_JSON").is_some_and(|v| matches!(v.as_str(), "1" | "true" | "yes")),
        }
    }

    /// Command-line flags take precedence over the environment
    pub fn apply(mut self, args: &GlobalArgs) -> Self {
        if let Some(url) = &args.api_url {
            self.api_url = url.clone();
        }
        if let Some(locale) = &args.locale {
            self.locale = Some(locale.clone());
        }
        if let Some(dir) = &args.token_dir {
            self.token_dir = dir.clone();
        }
        if args.verbose {
            self.log_level = "rayan_client=debug,rayan=debug".into();
        }
        if args.json_logs {
            self.log_json = true;
        }
        self
    }

    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(&self.api_url).with_timeout(self.timeout_secs);
        match &self.locale {
            Some(locale) => config.with_locale(locale),
            None => config,
        }
    }
}
