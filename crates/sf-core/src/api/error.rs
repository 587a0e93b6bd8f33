use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Non-2xx response. `message` is the server's own text when it sent one.
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("invalid request body: {0}")]
    Encode(String),
}

impl ApiError {
    /// Build the error for a non-2xx response.
    ///
    /// Looks at `detail`, then `message`, then `error`. A validation `detail`
    /// list contributes the `msg` of its first entry.
    pub fn from_status(status: u16, body: &Value) -> Self {
        let message = ["detail", "message", "error"]
            .iter()
            .find_map(|key| body.get(key).and_then(server_message))
            .unwrap_or_else(|| format!("HTTP error! status: {status}"));
        ApiError::Http { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

fn server_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}
