use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::core::{Extraction, SubtitleInfo};
use crate::error::{ExtractionFailure, Result, ValidationError};

pub mod api;
pub mod types;

pub use api::HttpBackend;
pub use types::HealthStatus;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Service that resolves a video URL into metadata and formats
#[async_trait]
pub trait Backend: Send + Sync {
    async fn extract(&self, url: &str) -> Result<Extraction>;

    async fn subtitles(&self, url: &str) -> Result<SubtitleInfo>;
}

/// Trim and check user input; returns the URL to send
pub fn validate_url(input: &str) -> std::result::Result<String, ValidationError> {
    let url = input.trim();
    if url.is_empty() {
        return Err(ValidationError::Empty);
    }
    Url::parse(url).map_err(|_| ValidationError::Malformed(url.to_string()))?;
    Ok(url.to_string())
}

/// Validating, time-bounded front for a [`Backend`]
pub struct ExtractionClient<B> {
    backend: B,
    timeout: Duration,
}

impl<B: Backend> ExtractionClient<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Extract metadata for `input`.
    ///
    /// Invalid input fails before the backend is contacted.
    pub async fn extract(&self, input: &str) -> Result<Extraction> {
        let url = validate_url(input)?;
        info!(url = %url, "starting extraction");

        let extraction = tokio::time::timeout(self.timeout, self.backend.extract(&url))
            .await
            .map_err(|_| ExtractionFailure::Timeout)??;

        info!(
            method = %extraction.method,
            formats = extraction.result.formats.len(),
            "extraction succeeded"
        );
        Ok(extraction)
    }

    /// Subtitle tracks for `url`, if the backend reports any.
    ///
    /// Every failure is swallowed: subtitles are optional.
    pub async fn fetch_subtitles(&self, url: &str) -> Option<SubtitleInfo> {
        match tokio::time::timeout(self.timeout, self.backend.subtitles(url)).await {
            Ok(Ok(info)) if info.available => Some(info),
            Ok(Ok(_)) => {
                debug!(url, "no subtitles available");
                None
            }
            Ok(Err(e)) => {
                debug!(url, error = %e, "subtitles not available");
                None
            }
            Err(_) => {
                debug!(url, "subtitle request timed out");
                None
            }
        }
    }
}
