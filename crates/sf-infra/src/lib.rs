//! # sf-infra
//!
//! Infrastructure adapters for the ports declared in `sf-core`: the REST
//! client, the JSON file backing client storage and the system clock.

pub mod http;
pub mod storage;
pub mod time;

pub use http::ReqwestApiClient;
pub use storage::FileClientStorage;
pub use time::SystemClock;
