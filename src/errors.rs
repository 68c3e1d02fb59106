use serde::Serialize;
use thiserror::Error;

/// Failures reported by a caption provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("captions are disabled")]
    CaptionsDisabled,
    #[error("video is not playable: {0}")]
    Unplayable(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("decode error: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    Disabled,
    NotFound,
    Empty,
    FetchFailed,
}

impl UnavailableReason {
    pub fn as_str(self) -> &'static str {
        match self {
            UnavailableReason::Disabled => "disabled",
            UnavailableReason::NotFound => "not_found",
            UnavailableReason::Empty => "empty",
            UnavailableReason::FetchFailed => "fetch_failed",
        }
    }
}

#[derive(Debug, Error)]
pub enum TranscriptUnavailable {
    #[error("Transcripts are disabled for this video.")]
    Disabled,
    #[error("No transcript found for this video.")]
    NotFound,
    #[error("Transcript is empty.")]
    Empty,
    // The provider error stays on the source chain for logs only.
    #[error("Failed to fetch transcript.")]
    FetchFailed(#[source] ProviderError),
}

impl TranscriptUnavailable {
    pub fn reason(&self) -> UnavailableReason {
        match self {
            TranscriptUnavailable::Disabled => UnavailableReason::Disabled,
            TranscriptUnavailable::NotFound => UnavailableReason::NotFound,
            TranscriptUnavailable::Empty => UnavailableReason::Empty,
            TranscriptUnavailable::FetchFailed(_) => UnavailableReason::FetchFailed,
        }
    }
}

impl From<ProviderError> for TranscriptUnavailable {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::CaptionsDisabled => TranscriptUnavailable::Disabled,
            other => TranscriptUnavailable::FetchFailed(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    TranscriptUnavailable,
    Internal,
}

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Transcript(#[from] TranscriptUnavailable),
    #[error("internal: {0}")]
    Internal(String),
}

impl SummarizeError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SummarizeError::Validation(_) => ErrorKind::Validation,
            SummarizeError::Transcript(_) => ErrorKind::TranscriptUnavailable,
            SummarizeError::Internal(_) => ErrorKind::Internal,
        }
    }
}
