//! Core types and utilities for the `roomdesk` booking administration client
//!
//! Holds the data model shared with the booking API, the list pipeline
//! (filter, sort, paginate) applied to rooms and bookings, and the form state
//! machines that turn operator input into validated requests.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)
)]

pub mod config;
pub mod error;
pub mod forms;
pub mod pipeline;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use forms::{BookingForm, FormMode, RoomForm};
pub use pipeline::{ListQuery, Listable, Page, SortDirection, paginate};
pub use types::{
    Booking, BookingId, BookingRequest, BookingStatus, Room, RoomId, RoomRequest, StatusHistory,
    StatusRequest, Timestamp,
};

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over `level`. Output goes to stderr so that
/// tables printed on stdout are not interleaved with log lines.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(level: &str, format: config::LogFormat) -> Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        config::LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        config::LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    installed.map_err(|e| Error::Configuration {
        message: format!("failed to install log subscriber: {e}"),
    })
}
