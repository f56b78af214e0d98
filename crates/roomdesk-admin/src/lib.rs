//! Administration front-end for the room booking API
//!
//! The front-end is one [`AppState`] value changed only through
//! [`update`]. Each [`Event`] that writes goes through a
//! [`Gateway`](roomdesk_client::Gateway) and is followed by a reload of both
//! collections; [`views`] and [`render`] turn the state into what the
//! operator sees.

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

pub mod error;
pub mod event;
pub mod render;
pub mod state;
pub mod views;

pub use error::{AppError, AppResult, ErrorClass, Notice, exit_code};
pub use event::{Event, update};
pub use render::OutputFormat;
pub use state::{AppState, DeleteTarget, Settings, Tab};
