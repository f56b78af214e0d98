//! Error types for the administration front-end

use roomdesk_client::ClientError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type alias for front-end operations
pub type AppResult<T> = Result<T, AppError>;

/// Errors an event can end with
#[derive(Error, Debug)]
pub enum AppError {
    /// Operator input was rejected before any network call
    #[error(transparent)]
    Input(#[from] roomdesk_core::Error),

    /// The gateway call failed
    #[error(transparent)]
    Gateway(#[from] ClientError),

    /// The operator declined a confirmation
    #[error("Operation cancelled")]
    Cancelled,

    /// The event names a record that is not in the loaded collections
    #[error("No {kind} with id {id} is loaded")]
    UnknownRecord {
        /// `room` or `booking`
        kind: &'static str,
        /// Requested identifier
        id: i64,
    },
}

/// Coarse classification of an [`AppError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// No response was received
    Transport,
    /// The API answered with a non-2xx status
    Rejected,
    /// Operator input was invalid
    InvalidInput,
    /// A response body could not be decoded
    Decode,
    /// Configuration is missing or inconsistent
    Configuration,
    /// The operator backed out
    Cancelled,
}

impl ErrorClass {
    /// Process exit code used by the `roomdesk` binary
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::InvalidInput => 2,
            Self::Configuration => 3,
            Self::Transport => 4,
            Self::Rejected => 5,
            Self::Decode => 6,
            Self::Cancelled => 130,
        }
    }

    /// Short label
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Rejected => "rejected",
            Self::InvalidInput => "invalid input",
            Self::Decode => "decode",
            Self::Configuration => "configuration",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AppError {
    /// Create an unknown room error
    pub const fn unknown_room(id: i64) -> Self {
        Self::UnknownRecord { kind: "room", id }
    }

    /// Create an unknown booking error
    pub const fn unknown_booking(id: i64) -> Self {
        Self::UnknownRecord {
            kind: "booking",
            id,
        }
    }

    /// Classify the error
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Input(roomdesk_core::Error::Configuration { .. }) => ErrorClass::Configuration,
            Self::Input(roomdesk_core::Error::Serialization(_))
            | Self::Gateway(ClientError::Decode { .. }) => ErrorClass::Decode,
            Self::Input(_) | Self::UnknownRecord { .. } => ErrorClass::InvalidInput,
            Self::Gateway(ClientError::Transport { .. }) => ErrorClass::Transport,
            Self::Gateway(ClientError::Rejected { .. }) => ErrorClass::Rejected,
            Self::Cancelled => ErrorClass::Cancelled,
        }
    }
}

/// Exit code for an error that ended the binary
///
/// The first [`AppError`] in the chain decides; anything else exits with 1.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<AppError>())
        .map_or(1, |e| e.class().exit_code())
}

/// Error as kept in the application state for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Classification
    pub class: ErrorClass,
    /// Human readable message
    pub message: String,
}

impl From<&AppError> for Notice {
    fn from(error: &AppError) -> Self {
        Self {
            class: error.class(),
            message: error.to_string(),
        }
    }
}
