mod api_client;

pub use api_client::{ReqwestApiClient, DEFAULT_API_BASE_URL};
