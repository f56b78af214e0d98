//! Error types for the booking API gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors a gateway call can end with
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a response (connection, timeout, body read)
    #[error("{operation}: request failed: {source}")]
    Transport {
        /// Operation that was attempted
        operation: &'static str,
        /// Underlying HTTP client error
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-2xx status
    #[error("{operation}: API answered {status}{}", detail_suffix(.body))]
    Rejected {
        /// Operation that was attempted
        operation: &'static str,
        /// HTTP status code
        status: u16,
        /// Response body text, possibly empty
        body: String,
    },

    /// A list response could not be decoded
    #[error("{operation}: unexpected response body: {source}")]
    Decode {
        /// Operation that was attempted
        operation: &'static str,
        /// JSON error
        #[source]
        source: serde_json::Error,
    },
}

fn detail_suffix(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(" ({})", roomdesk_core::utils::truncate_chars(body, 200))
    }
}

impl ClientError {
    /// Create a rejection error
    pub fn rejected(operation: &'static str, status: u16, body: impl Into<String>) -> Self {
        Self::Rejected {
            operation,
            status,
            body: body.into(),
        }
    }

    /// HTTP status of a rejection
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Operation that failed
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Transport { operation, .. }
            | Self::Rejected { operation, .. }
            | Self::Decode { operation, .. } => operation,
        }
    }

    /// Whether the request never reached a response
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
