//! Error types for the ParkingBoss client.
//!
//! Two failure kinds cross this layer: the upstream call did not complete
//! (transport), or it completed but the body lacked what we needed (parse).
//! The boundary turns either one into an `{"error": ...}` body through
//! [`error_mapping`]; upstream detail is only ever logged.

use serde::{Deserialize, Serialize};

/// Status used when nothing more specific is known.
pub const DEFAULT_STATUS: u16 = 500;

const TRANSPORT_MESSAGE: &str = "Error with external API";
const PARSE_MESSAGE: &str = "Error parsing API response";

const TRANSPORT_SUMMARY: &str = "Error communicating with external service";
const FALLBACK_SUMMARY: &str = "Encountered an unexpected error";

/// Client errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent, or upstream answered non-2xx.
    #[error("{message}")]
    Transport {
        message: String,
        status: u16,
        /// Upstream detail, for logs only.
        detail: String,
    },

    /// A successful response did not contain the expected fields.
    #[error("{message}")]
    Parse {
        message: String,
        status: u16,
        /// Which traversal step failed, for logs only.
        detail: String,
    },
}

/// Discriminant of [`ApiError`], used as the key of the boundary mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    Parse,
}

impl ApiError {
    pub fn transport(detail: impl Into<String>) -> Self {
        Self::Transport {
            message: TRANSPORT_MESSAGE.to_string(),
            status: DEFAULT_STATUS,
            detail: detail.into(),
        }
    }

    pub fn parse(detail: impl Into<String>) -> Self {
        Self::Parse {
            message: PARSE_MESSAGE.to_string(),
            status: DEFAULT_STATUS,
            detail: detail.into(),
        }
    }

    /// Override the carried status code.
    pub fn with_status(mut self, code: u16) -> Self {
        match &mut self {
            Self::Transport { status, .. } | Self::Parse { status, .. } => *status = code,
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Parse { .. } => ErrorKind::Parse,
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Transport { status, .. } | Self::Parse { status, .. } => *status,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            Self::Transport { detail, .. } | Self::Parse { detail, .. } => detail,
        }
    }

    /// Status and JSON body the boundary should answer with.
    pub fn to_response(&self) -> (u16, ErrorBody) {
        let (status, summary) = error_mapping(self.kind());
        (
            status,
            ErrorBody {
                error: summary.to_string(),
            },
        )
    }
}

/// Map a failure kind to the status and summary shown to end users.
///
/// Only transport failures have a dedicated entry; everything else gets the
/// generic fallback.
pub fn error_mapping(kind: ErrorKind) -> (u16, &'static str) {
    match kind {
        ErrorKind::Transport => (DEFAULT_STATUS, TRANSPORT_SUMMARY),
        _ => (DEFAULT_STATUS, FALLBACK_SUMMARY),
    }
}

/// JSON error body rendered at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Result type for client operations.
pub type ApiResult<T> = Result<T, ApiError>;
