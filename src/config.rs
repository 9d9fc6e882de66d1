//! Client configuration.

use std::time::Duration;

/// Environment variable overriding the server base URL.
pub const BASE_URL_ENV: &str = "CLAWSHARE_URL";

/// Server used when neither an explicit URL nor the environment names one.
pub const DEFAULT_BASE_URL: &str = "https://clawshare.io";

/// Timeout for metadata calls (download lookup, list, info, revoke).
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for calls carrying file bytes (upload, download fetch).
pub const DEFAULT_TRANSFER_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings resolved once when a [`ShareClient`](crate::ShareClient) is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_timeout: Duration,
    pub transfer_timeout: Duration,
}

impl ClientConfig {
    /// Configuration for a fixed base URL with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            api_timeout: DEFAULT_API_TIMEOUT,
            transfer_timeout: DEFAULT_TRANSFER_TIMEOUT,
        }
    }

    /// Resolve the base URL: `explicit`, else `$CLAWSHARE_URL`, else the
    /// built-in default.
    pub fn resolve(explicit: Option<String>) -> Self {
        let from_env = std::env::var(BASE_URL_ENV).ok();
        Self::new(resolve_base_url(explicit, from_env))
    }

    pub fn with_api_timeout(mut self, timeout: Duration) -> Self {
        self.api_timeout = timeout;
        self
    }

    pub fn with_transfer_timeout(mut self, timeout: Duration) -> Self {
        self.transfer_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Pick the first non-blank candidate, falling back to [`DEFAULT_BASE_URL`].
pub fn resolve_base_url(explicit: Option<String>, from_env: Option<String>) -> String {
    explicit
        .into_iter()
        .chain(from_env)
        .find(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_wins() {
        let url = resolve_base_url(
            Some("http://explicit".to_string()),
            Some("http://env".to_string()),
        );
        assert_eq!(url, "http://explicit");
    }

    #[test]
    fn test_env_fallback() {
        let url = resolve_base_url(None, Some("http://env".to_string()));
        assert_eq!(url, "http://env");
    }

    #[test]
    fn test_default_fallback() {
        assert_eq!(resolve_base_url(None, None), DEFAULT_BASE_URL);
        assert_eq!(
            resolve_base_url(Some("  ".to_string()), Some(String::new())),
            DEFAULT_BASE_URL
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig::new("http://localhost:3000/");
        assert_eq!(config.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_timeouts() {
        let config = ClientConfig::default()
            .with_api_timeout(Duration::from_secs(1))
            .with_transfer_timeout(Duration::from_secs(2));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_timeout, Duration::from_secs(1));
        assert_eq!(config.transfer_timeout, Duration::from_secs(2));
    }
}
