use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::client::types::{ExtractResponse, HealthStatus, SubtitlesResponse, UrlRequest};
use crate::client::{Backend, DEFAULT_TIMEOUT};
use crate::core::{Extraction, SubtitleInfo};
use crate::error::{ExtractionFailure, Result, VidgrabError};
use crate::http::{build_client, get_json, post_json};

const EXTRACT_PATH: &str = "/api/extract";
const SUBTITLES_PATH: &str = "/api/subtitles";
const HEALTH_PATH: &str = "/api/health";

/// Backend reached over HTTP at a base URL such as `http://localhost:8001`
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| VidgrabError::InvalidConfig(format!("backend URL {base_url}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(VidgrabError::InvalidConfig(format!(
                "backend URL {base_url} cannot be a base"
            )));
        }

        Ok(Self {
            client: build_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Per-request bound used by the transport itself
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Query the backend health endpoint
    pub async fn health(&self) -> Result<HealthStatus> {
        get_json(&self.client, &self.endpoint(HEALTH_PATH), self.timeout).await
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn extract(&self, url: &str) -> Result<Extraction> {
        let endpoint = self.endpoint(EXTRACT_PATH);
        let response: ExtractResponse =
            post_json(&self.client, &endpoint, &UrlRequest { url }, self.timeout).await?;

        match response {
            ExtractResponse {
                success: true,
                method,
                data: Some(result),
            } => Ok(Extraction {
                method: method.unwrap_or_else(|| "unknown".to_string()),
                result,
            }),
            _ => {
                debug!(url, "backend reported an unsuccessful extraction");
                Err(ExtractionFailure::Unknown("backend reported success: false".to_string()).into())
            }
        }
    }

    async fn subtitles(&self, url: &str) -> Result<SubtitleInfo> {
        let endpoint = self.endpoint(SUBTITLES_PATH);
        let response: SubtitlesResponse =
            post_json(&self.client, &endpoint, &UrlRequest { url }, self.timeout).await?;

        match response {
            SubtitlesResponse {
                success: true,
                data: Some(info),
            } => Ok(info),
            _ => Err(ExtractionFailure::Unknown("no subtitle data".to_string()).into()),
        }
    }
}
