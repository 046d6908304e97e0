//! Error taxonomy for the insight engine.
//!
//! Only [`InsightError::InvalidRange`] aborts a request. Missing sources are a
//! normal "nothing to show" state and upstream failures are carried per source
//! so that whatever succeeded can still be rendered.

use crate::models::SourceRef;
use crate::providers::FetchError;

/// Result type for insight computations.
pub type InsightResult<T> = Result<T, InsightError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InsightError {
    /// `start`/`end` are not calendar dates, or `end < start`.
    #[error("Invalid date range: {reason}")]
    InvalidRange { reason: String },

    /// No keyword or metric source was selected.
    #[error("No {kind} source selected")]
    MissingSource { kind: &'static str },

    /// A collaborator failed to deliver rows for one source.
    #[error("Upstream fetch failed for {source_ref} ({window} window): {cause}")]
    UpstreamFetch {
        source_ref: SourceRef,
        window: Window,
        cause: FetchError,
    },
}

impl InsightError {
    pub fn invalid_range(reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            reason: reason.into(),
        }
    }

    pub fn upstream(source_ref: SourceRef, window: Window, cause: FetchError) -> Self {
        Self::UpstreamFetch {
            source_ref,
            window,
            cause,
        }
    }

    /// Whether the request should be rejected outright (400) rather than degraded.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRange { .. })
    }
}

/// Which of the two comparison windows a fetch belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    Current,
    Previous,
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Window::Current => write!(f, "current"),
            Window::Previous => write!(f, "previous"),
        }
    }
}

/// Per-source failure as reported to the caller alongside partial results.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFailure {
    pub source: SourceRef,
    pub window: Window,
    pub message: String,
}

impl InsightError {
    /// The per-source failure record, when this error came from a collaborator.
    pub fn as_source_failure(&self) -> Option<SourceFailure> {
        match self {
            InsightError::UpstreamFetch {
                source_ref,
                window,
                cause,
            } => Some(SourceFailure {
                source: source_ref.clone(),
                window: *window,
                message: cause.to_string(),
            }),
            _ => None,
        }
    }
}
