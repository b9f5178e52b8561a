use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;

use crate::error::{ExtractionFailure, Result, VidgrabError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_USER_AGENT: &str = concat!("vidgrab/", env!("CARGO_PKG_VERSION"));

/// Error body sent by the backend on failure
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Build the shared HTTP client.
///
/// Only the connect phase is bounded here; the overall request bound is
/// applied per call.
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .default_headers(default_headers())
        .build()
        .map_err(|e| VidgrabError::InvalidConfig(format!("Failed to create HTTP client: {e}")))
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Classify a transport error
fn transport_failure(url: &str, e: reqwest::Error) -> ExtractionFailure {
    debug!(url, error = %e, "request failed");
    if e.is_timeout() {
        ExtractionFailure::Timeout
    } else if e.is_connect() || e.is_request() {
        ExtractionFailure::Network(e.to_string())
    } else {
        ExtractionFailure::Unknown(e.to_string())
    }
}

/// Map a non-success response to a failure, preferring the backend's `detail`
async fn status_failure(
    url: &str,
    status: StatusCode,
    response: reqwest::Response,
) -> ExtractionFailure {
    debug!(url, status = status.as_u16(), "backend returned an error");
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            debug!(url, error = %e, "unreadable error body");
            String::new()
        }
    };
    server_detail(&body)
        .map(ExtractionFailure::Server)
        .unwrap_or_else(|| ExtractionFailure::Unknown(format!("HTTP {status} for URL: {url}")))
}

/// `detail` of an error body when it is a plain string
fn server_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

async fn read_json<T: DeserializeOwned>(url: &str, response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(status_failure(url, status, response).await.into());
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| transport_failure(url, e))?;
    serde_json::from_slice(&bytes).map_err(|e| {
        debug!(url, error = %e, "undecodable response body");
        ExtractionFailure::Unknown(format!("Invalid response format: {e}")).into()
    })
}

/// POST a JSON body and decode the JSON response
pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
    timeout: Duration,
) -> Result<T> {
    let response = client
        .post(url)
        .timeout(timeout)
        .json(body)
        .send()
        .await
        .map_err(|e| transport_failure(url, e))?;
    read_json(url, response).await
}

/// GET and decode the JSON response
pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<T> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| transport_failure(url, e))?;
    read_json(url, response).await
}
