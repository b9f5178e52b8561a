use serde::{Deserialize, Deserializer, Serialize};

/// Stream content of a format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum FormatKind {
    /// Video with an audio track
    Video,
    VideoOnly,
    Audio,
}

impl FormatKind {
    /// Classify by stream flags; `None` when neither stream is present
    pub fn from_streams(has_video: bool, has_audio: bool) -> Option<Self> {
        match (has_video, has_audio) {
            (true, true) => Some(Self::Video),
            (true, false) => Some(Self::VideoOnly),
            (false, true) => Some(Self::Audio),
            (false, false) => None,
        }
    }
}

/// One downloadable variant as reported by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Format {
    #[serde(default, deserialize_with = "null_as_default")]
    pub format_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filesize_readable: Option<String>,
    #[serde(default)]
    pub has_video: bool,
    #[serde(default)]
    pub has_audio: bool,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_kind",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<FormatKind>,
    /// Direct media URL; empty when the backend sent none
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

impl Format {
    /// Category derived from the stream flags.
    ///
    /// The backend's own `type` label is informational only.
    pub fn category(&self) -> Option<FormatKind> {
        FormatKind::from_streams(self.has_video, self.has_audio)
    }

    pub fn quality_label(&self) -> &str {
        self.quality.as_deref().unwrap_or("Unknown")
    }
}

/// Metadata and formats for one extracted video
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ExtractionResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub platform: String,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub duration: Option<u64>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webpage_url: Option<String>,
    #[serde(default)]
    pub formats: Vec<Format>,
}

/// A successful extraction together with the backend strategy that produced it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Extraction {
    pub method: String,
    pub result: ExtractionResult,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleKind {
    Manual,
    Automatic,
}

impl SubtitleKind {
    pub fn label(&self) -> &'static str {
        match self {
            SubtitleKind::Manual => "Manual",
            SubtitleKind::Automatic => "Auto-generated",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubtitleTrack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub language_name: String,
    #[serde(rename = "type")]
    pub kind: SubtitleKind,
    pub format: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SubtitleInfo {
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub subtitle_data: Vec<SubtitleTrack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Read `null` as the type's default value
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept integer or fractional seconds, or null
fn lenient_seconds<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.filter(|s| s.is_finite() && *s >= 0.0).map(|s| s.round() as u64))
}

/// Unrecognized `type` labels are treated as absent
fn lenient_kind<'de, D>(deserializer: D) -> std::result::Result<Option<FormatKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|s| match s.as_str() {
        "video" => Some(FormatKind::Video),
        "video-only" => Some(FormatKind::VideoOnly),
        "audio" => Some(FormatKind::Audio),
        _ => None,
    }))
}
