//! Hand-written port doubles shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use sf_core::api::{ApiError, ApiResponse};
use sf_core::ports::{ApiTransportPort, ClientStoragePort, ClockPort, HttpMethod};

/// 2026-10-16T12:00:00Z
pub const FIXED_NOW_MS: i64 = 1_792_152_000_000;

pub struct FixedClock;

impl ClockPort for FixedClock {
    fn now_ms(&self) -> i64 {
        FIXED_NOW_MS
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
}

/// Replies are matched by `(method, path)`; each reply is used once, in order.
#[derive(Default)]
pub struct ScriptedApi {
    replies: Mutex<HashMap<(HttpMethod, String), VecDeque<Result<ApiResponse, ApiError>>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, method: HttpMethod, path: &str, reply: Result<ApiResponse, ApiError>) {
        self.replies
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn ok(&self, method: HttpMethod, path: &str, body: Value) {
        self.reply(method, path, Ok(ApiResponse::ok(body)));
    }

    pub fn fail(&self, method: HttpMethod, path: &str, status: u16, body: Value) {
        self.reply(method, path, Err(ApiError::from_status(status, &body)));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls().iter().filter(|call| call.path == path).count()
    }
}

#[async_trait]
impl ApiTransportPort for ScriptedApi {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, ApiError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            body,
        });
        self.replies
            .lock()
            .unwrap()
            .get_mut(&(method, path.to_string()))
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(ApiError::Network(format!("no reply scripted for {method} {path}"))))
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn peek(&self, key: &str) -> Option<Value> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn put(&self, key: &str, value: Value) {
        self.entries.lock().unwrap().insert(key.to_string(), value);
    }
}

#[async_trait]
impl ClientStoragePort for MemoryStorage {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>> {
        Ok(self.peek(key))
    }

    async fn set(&self, key: &str, value: Value) -> anyhow::Result<()> {
        self.put(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
