//! Client configuration loaded from code or environment variables

use crate::error::{ClientError, Result};
use reqwest::Url;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the dashboard client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base address, e.g. `https://api.example.com/v1`.
    /// Also the key the session is stored under.
    pub api_base: String,

    /// JSON file the session is persisted to. In-memory only when unset.
    pub session_path: Option<PathBuf>,

    /// Per-request timeout. Requests wait indefinitely when unset.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Build a config for a base URL, trimming any trailing slash.
    pub fn new(api_base: impl Into<String>) -> Result<Self> {
        let api_base = api_base.into();
        let trimmed = api_base.trim().trim_end_matches('/').to_string();

        let url = Url::parse(&trimmed)
            .map_err(|e| ClientError::Configuration(format!("Invalid api base '{api_base}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Configuration(format!(
                "Unsupported scheme '{}' in api base",
                url.scheme()
            )));
        }

        Ok(Self {
            api_base: trimmed,
            session_path: None,
            request_timeout: None,
        })
    }

    pub fn with_session_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_path = Some(path.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// - `DASHBOARD_API_BASE` (required)
    /// - `DASHBOARD_SESSION_PATH` (optional)
    /// - `DASHBOARD_REQUEST_TIMEOUT_SECS` (optional)
    ///
    /// A `.env` file in the working directory is honored.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_base = env::var("DASHBOARD_API_BASE")
            .map_err(|_| ClientError::Configuration("DASHBOARD_API_BASE is not set".to_string()))?;
        let mut config = Self::new(api_base)?;

        if let Ok(path) = env::var("DASHBOARD_SESSION_PATH") {
            if !path.trim().is_empty() {
                config.session_path = Some(PathBuf::from(path));
            }
        }

        if let Ok(secs) = env::var("DASHBOARD_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ClientError::Configuration(format!(
                    "DASHBOARD_REQUEST_TIMEOUT_SECS must be a whole number, got '{secs}'"
                ))
            })?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Absolute URL for a backend path. `units/` and `/units/` are the same path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}
