use thiserror::Error;

/// Failure outcomes of the summary pipeline.
///
/// Every variant carries only owned strings so a single outcome can be cloned
/// out to every caller waiting on the same in-flight invocation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SummaryError {
    #[error("No notes found for claim {0}")]
    NotFound(String),

    #[error("Backing store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Model invocation failed: {0}")]
    ModelInvocationFailed(String),

    #[error("Model output is not valid JSON: {0}")]
    MalformedModelOutput(String),

    #[error("Model output is missing required fields: {}", missing.join(", "))]
    IncompleteSummary { missing: Vec<String> },

    #[error("Summary task terminated abnormally: {0}")]
    Internal(String),
}

/// Field-less discriminant of [`SummaryError`], for callers that branch on the
/// failure kind without caring about the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    StoreUnavailable,
    ModelInvocationFailed,
    MalformedModelOutput,
    IncompleteSummary,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::StoreUnavailable => "StoreUnavailable",
            Self::ModelInvocationFailed => "ModelInvocationFailed",
            Self::MalformedModelOutput => "MalformedModelOutput",
            Self::IncompleteSummary => "IncompleteSummary",
            Self::Internal => "Internal",
        }
    }
}

impl SummaryError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            Self::ModelInvocationFailed(_) => ErrorKind::ModelInvocationFailed,
            Self::MalformedModelOutput(_) => ErrorKind::MalformedModelOutput,
            Self::IncompleteSummary { .. } => ErrorKind::IncompleteSummary,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether issuing a fresh `summarize` call may succeed where this one failed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable(_) | Self::ModelInvocationFailed(_)
        )
    }

    /// HTTP-style status used when the error is returned from the Lambda entry point.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::StoreUnavailable(_) => 503,
            Self::ModelInvocationFailed(_)
            | Self::MalformedModelOutput(_)
            | Self::IncompleteSummary { .. } => 502,
            Self::Internal(_) => 500,
        }
    }
}

impl From<tokio::task::JoinError> for SummaryError {
    fn from(error: tokio::task::JoinError) -> Self {
        SummaryError::Internal(error.to_string())
    }
}
