//! Runtime settings with defaults matching the hosted backend setup.

use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::client::DEFAULT_TIMEOUT;
use crate::error::{Result, VidgrabError};
use crate::history::DEFAULT_HISTORY_LIMIT;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";
pub const HISTORY_FILE_NAME: &str = "download_history.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub backend_url: String,
    pub history_limit: usize,
    pub request_timeout: Duration,
    pub history_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            request_timeout: DEFAULT_TIMEOUT,
            history_path: default_history_path(),
        }
    }
}

/// `<data dir>/download_history.json`, or the working directory when no home is known
pub fn default_history_path() -> PathBuf {
    ProjectDirs::from("com", "vidgrab", "vidgrab")
        .map(|dirs| dirs.data_dir().join(HISTORY_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(HISTORY_FILE_NAME))
}

impl Config {
    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into();
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = path.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.backend_url).map_err(|e| {
            VidgrabError::InvalidConfig(format!("backend URL {}: {}", self.backend_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(VidgrabError::InvalidConfig(format!(
                "backend URL must use http or https: {}",
                self.backend_url
            )));
        }
        if self.history_limit == 0 {
            return Err(VidgrabError::InvalidConfig(
                "history limit must be at least 1".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(VidgrabError::InvalidConfig(
                "request timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend_url, "http://localhost:8001");
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert!(config.history_path.ends_with(HISTORY_FILE_NAME));
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = Config::default();
        assert!(base.clone().with_backend_url("localhost:8001").validate().is_err());
        assert!(base.clone().with_backend_url("ftp://host").validate().is_err());
        assert!(base.clone().with_history_limit(0).validate().is_err());
        assert!(
            base.clone()
                .with_request_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
        base.with_backend_url("https://api.example.org/")
            .with_history_limit(20)
            .validate()
            .unwrap();
    }
}
