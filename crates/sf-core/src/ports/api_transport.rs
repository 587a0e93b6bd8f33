//! REST transport port
//!
//! One JSON round trip per call. Adapters attach the base URL and the bearer
//! token; callers only pass the path relative to the API root.

use async_trait::async_trait;
use serde::Serialize;

use crate::api::{ApiError, ApiResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait ApiTransportPort: Send + Sync {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse, ApiError>;
}

/// Verb helpers over [`ApiTransportPort`].
#[async_trait]
pub trait ApiTransportExt: ApiTransportPort {
    async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.request(HttpMethod::Get, path, None).await
    }

    async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.request(HttpMethod::Delete, path, None).await
    }

    async fn post<B>(&self, path: &str, body: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let body = encode(body)?;
        self.request(HttpMethod::Post, path, Some(body)).await
    }

    async fn put<B>(&self, path: &str, body: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let body = encode(body)?;
        self.request(HttpMethod::Put, path, Some(body)).await
    }

    async fn patch<B>(&self, path: &str, body: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let body = encode(body)?;
        self.request(HttpMethod::Patch, path, Some(body)).await
    }
}

impl<T: ApiTransportPort + ?Sized> ApiTransportExt for T {}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))
}
