//! Client configuration

use crate::auth::AuthSession;
use crate::error::ClientResult;
use crate::http::RestClient;

/// Production API host
pub const DEFAULT_BASE_URL: &str = "https://api.elrayan.acwad.tech";

/// Path prefix shared by every resource
pub const API_PREFIX: &str = "api/v1";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration for connecting to the Rayan API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "https://api.elrayan.acwad.tech")
    pub base_url: String,

    /// Preferred response language, sent as `Accept-Language`
    pub locale: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            locale: None,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the preferred response language ("en" or "ar")
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create a REST client from this configuration
    pub fn build_client(&self, session: AuthSession) -> ClientResult<RestClient> {
        RestClient::new(self, session)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("http://localhost:3800")
            .with_locale("ar")
            .with_timeout(5);
        assert_eq!(config.base_url, "http://localhost:3800");
        assert_eq!(config.locale.as_deref(), Some("ar"));
        assert_eq!(config.timeout, 5);
        assert_eq!(ClientConfig::default().base_url, DEFAULT_BASE_URL);
    }
}
