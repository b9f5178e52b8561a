use thiserror::Error;

/// Rejected user input, detected before any request is sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid video URL")]
    Empty,

    #[error("Please enter a valid URL")]
    Malformed(String),
}

/// Why an extraction request did not produce a result.
///
/// All variants surface as [`VidgrabError::ExtractionFailed`]; the display
/// string is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionFailure {
    /// `detail` field of a backend error body, passed through verbatim
    #[error("{0}")]
    Server(String),

    #[error("Request timed out. Please try again.")]
    Timeout,

    #[error("Network error. Please check your connection.")]
    Network(String),

    #[error("Failed to extract video. Please check the URL and try again.")]
    Unknown(String),
}

#[derive(Error, Debug)]
pub enum VidgrabError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    ExtractionFailed(#[from] ExtractionFailure),

    #[error("Failed to parse stored history: {0}")]
    HistoryParse(String),

    #[error("Format not found: {0}")]
    FormatNotFound(String),

    #[error("Subtitle track not found: {0}")]
    SubtitleNotFound(usize),

    #[error("No extraction result available")]
    NoResult,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl VidgrabError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ExtractionFailed(ExtractionFailure::Timeout))
    }
}

pub type Result<T> = std::result::Result<T, VidgrabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_detail_is_shown_verbatim() {
        let err = VidgrabError::from(ExtractionFailure::Server("Private video".to_string()));
        assert_eq!(err.to_string(), "Private video");
    }

    #[test]
    fn failures_keep_distinct_messages() {
        let messages = [
            ExtractionFailure::Timeout.to_string(),
            ExtractionFailure::Network("refused".into()).to_string(),
            ExtractionFailure::Unknown("HTTP 500".into()).to_string(),
        ];
        assert_eq!(messages[0], "Request timed out. Please try again.");
        assert_eq!(messages[1], "Network error. Please check your connection.");
        assert_eq!(
            messages[2],
            "Failed to extract video. Please check the URL and try again."
        );
    }

    #[test]
    fn validation_messages() {
        assert_eq!(
            ValidationError::Empty.to_string(),
            "Please enter a valid video URL"
        );
        assert_eq!(
            ValidationError::Malformed("not a url".into()).to_string(),
            "Please enter a valid URL"
        );
    }
}
