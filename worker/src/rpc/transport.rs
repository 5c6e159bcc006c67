//! JSON-RPC 2.0 transport boundary. Production calls go over `reqwest`; tests
//! substitute an in-memory fake so pipelines can be exercised without a live
//! node, mirroring the way the teacher isolates its provider behind an enum.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use derive_more::{Display, Error};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Display, Error, Clone, PartialEq)]
pub enum RpcError {
    #[display(fmt = "timed out")]
    Timeout,
    #[display(fmt = "transport error: {_0}")]
    Transport(String),
    #[display(fmt = "protocol error {code}: {message}")]
    Protocol { code: i64, message: String },
    #[display(fmt = "unknown error: {_0}")]
    Unknown(String),
}

#[async_trait]
pub trait JsonRpcTransport: Send + Sync {
    async fn call(&self, method: &str, params: Value, timeout: Duration) -> Result<Value, RpcError>;
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponseBody {
    result: Option<Value>,
    error: Option<JsonRpcErrorBody>,
}

/// Wraps a shared `reqwest::Client`; assigns a monotonically increasing id
/// to every call.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self {
            client,
            url,
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl JsonRpcTransport for HttpTransport {
    async fn call(&self, method: &str, params: Value, timeout: Duration) -> Result<Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response = tokio::time::timeout(timeout, self.client.post(&self.url).json(&body).send())
            .await
            .map_err(|_| RpcError::Timeout)?
            .map_err(|err| RpcError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(RpcError::Transport(format!("http {}", response.status())));
        }

        let parsed: JsonRpcResponseBody = response
            .json()
            .await
            .map_err(|err| RpcError::Unknown(err.to_string()))?;

        if let Some(err) = parsed.error {
            return Err(RpcError::Protocol {
                code: err.code,
                message: err.message,
            });
        }

        parsed
            .result
            .ok_or_else(|| RpcError::Unknown("response carried neither result nor error".to_string()))
    }
}

#[cfg(test)]
pub mod fake {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use super::*;

    /// Canned per-method response queue, consumed FIFO. Calling a method with
    /// an empty queue returns an `Unknown` error rather than panicking, so a
    /// missing stub surfaces as a pipeline-level failure instead of a test crash.
    #[derive(Default)]
    pub struct FakeTransport {
        responses: Mutex<HashMap<String, VecDeque<Result<Value, RpcError>>>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push(&self, method: &str, result: Result<Value, RpcError>) {
            self.responses
                .lock()
                .unwrap()
                .entry(method.to_string())
                .or_default()
                .push_back(result);
        }
    }

    #[async_trait]
    impl JsonRpcTransport for FakeTransport {
        async fn call(&self, method: &str, _params: Value, _timeout: Duration) -> Result<Value, RpcError> {
            self.responses
                .lock()
                .unwrap()
                .get_mut(method)
                .and_then(|queue| queue.pop_front())
                .unwrap_or_else(|| Err(RpcError::Unknown(format!("no canned response for {method}"))))
        }
    }
}
