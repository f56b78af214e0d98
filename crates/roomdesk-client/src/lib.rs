//! Gateway to the room booking REST API
//!
//! [`Gateway`] is the only way the rest of `roomdesk` talks to the booking
//! service. [`HttpGateway`] speaks to the real API; [`InMemoryGateway`] keeps
//! the same contract in process for tests and demos.

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
pub mod gateway;
pub mod http;
pub mod memory;

pub use error::{ClientError, ClientResult};
pub use gateway::{Gateway, Snapshot};
pub use http::HttpGateway;
pub use memory::InMemoryGateway;
