//! Port interfaces for the application layer
//!
//! Ports are implemented by `sf-infra` (or by test doubles) and consumed by the
//! use cases in `sf-app`. Nothing in here performs I/O.

mod api_transport;
mod client_storage;
mod clock;

pub use api_transport::{ApiTransportExt, ApiTransportPort, HttpMethod};
pub use client_storage::ClientStoragePort;
pub use clock::ClockPort;
