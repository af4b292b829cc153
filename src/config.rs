//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Base URL used when `REALIT_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Path of the refresh endpoint relative to the base URL.
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";

pub const ENV_API_URL: &str = "REALIT_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "REALIT_TIMEOUT_SECS";
pub const ENV_CREDENTIALS_PATH: &str = "REALIT_CREDENTIALS_PATH";

/// Configuration for [`ApiClient`](crate::api::ApiClient).
///
/// # Example
///
/// ```ignore
/// use realit::config::ClientConfig;
///
/// let config = ClientConfig::from_env()
///     .with_timeout(Duration::from_secs(10))
///     .with_user_agent("realit-sync/1.0");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Credentials file; `None` means `~/.realit/credentials.json`
    pub credentials_path: Option<PathBuf>,
    /// `User-Agent` sent with every request
    pub user_agent: String,
    /// Refresh endpoint path (default: /auth/refresh)
    pub refresh_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            credentials_path: None,
            user_agent: format!("realit/{}", env!("CARGO_PKG_VERSION")),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// Absolute URL of the refresh endpoint.
    pub fn refresh_url(&self) -> String {
        format!("{}{}", self.base_url, self.refresh_path)
    }

    /// Create config from `REALIT_API_URL`, `REALIT_TIMEOUT_SECS` and
    /// `REALIT_CREDENTIALS_PATH`. Unset or empty variables keep the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_API_URL) {
            config = config.with_base_url(url.trim());
        }

        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config = config.with_timeout(Duration::from_secs(secs)),
                _ => warn!("Ignoring invalid {}={:?}", ENV_TIMEOUT_SECS, raw),
            }
        }

        if let Some(path) = get(ENV_CREDENTIALS_PATH) {
            config = config.with_credentials_path(path);
        }

        config
    }
}
