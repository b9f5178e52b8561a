use serde::{Deserialize, Serialize};

use crate::core::{ExtractionResult, SubtitleInfo};

/// Request body shared by the extract and subtitles endpoints
#[derive(Debug, Serialize)]
pub struct UrlRequest<'a> {
    pub url: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ExtractResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub data: Option<ExtractionResult>,
}

#[derive(Debug, Deserialize)]
pub struct SubtitlesResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<SubtitleInfo>,
}

/// Answer of the backend health endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}
