//! Model of the backend REST API as seen by this client.

pub mod endpoints;
mod error;
mod response;

pub use error::ApiError;
pub use response::ApiResponse;
