//! JSON-RPC client for a ledger node.
//!
//! The [`RpcClient`] posts JSON-RPC 2.0 requests to a single node endpoint
//! and implements [`SubmissionChannel`] for signed bookkeeper records.
//!
//! Only connection failures are retried. Any answer from the node, including
//! an HTTP error status or a JSON-RPC error object, is final.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::rpc::error::{RpcError, RpcResult};
use crate::rpc::types::{JsonRpcRequest, JsonRpcResponse, SendRawTransactionParams, SEND_RAW_TRANSACTION};
use crate::rpc::SubmissionChannel;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Backoff step between connection attempts.
const RETRY_STEP_MS: u64 = 250;

// ============================================================================
// Connection retry
// ============================================================================

/// Retries an operation while the node cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ConnectRetry {
    max_retries: u32,
    step: Duration,
}

impl ConnectRetry {
    fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            step: Duration::from_millis(RETRY_STEP_MS),
        }
    }

    /// Linear backoff: attempt `n` waits `(n + 1) * step`.
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.step.saturating_mul(attempt.saturating_add(1))
    }

    /// Run `send` until it succeeds, fails with an error `unreachable`
    /// rejects, or the retry budget is spent.
    async fn run<T, E, F, Fut>(&self, mut send: F, unreachable: impl Fn(&E) -> bool) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let mut attempt = 0;
        loop {
            match send().await {
                Err(e) if attempt < self.max_retries && unreachable(&e) => {
                    let delay = self.delay_for_attempt(attempt);
                    tracing::debug!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Node unreachable, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Builder for configuring [`RpcClient`].
#[derive(Debug, Clone)]
pub struct RpcClientBuilder {
    url: String,
    timeout: Duration,
    max_retries: u32,
}

impl RpcClientBuilder {
    /// Create a new builder for the given node URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: 0,
        }
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Retry up to `max_retries` times when the node cannot be reached.
    pub fn retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Build the client.
    pub fn build(self) -> RpcResult<RpcClient> {
        let http_client = Client::builder().timeout(self.timeout).build()?;

        Ok(RpcClient {
            http_client,
            url: self.url,
            retry: ConnectRetry::new(self.max_retries),
        })
    }
}

/// JSON-RPC 2.0 client bound to one node endpoint.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http_client: Client,
    url: String,
    retry: ConnectRetry,
}

impl RpcClient {
    /// Create a client with a 30 s timeout and no retries.
    pub fn new(url: impl Into<String>) -> RpcResult<Self> {
        RpcClientBuilder::new(url).build()
    }

    /// Create a new client builder for custom configuration.
    pub fn builder(url: impl Into<String>) -> RpcClientBuilder {
        RpcClientBuilder::new(url)
    }

    /// Get the node URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Invoke `method` with `params` and return the full response body.
    pub async fn call<P: Serialize>(&self, method: &str, params: P) -> RpcResult<serde_json::Value> {
        let request = JsonRpcRequest::new(method, params);
        tracing::debug!(url = %self.url, method, "Sending JSON-RPC request");

        let response = self
            .retry
            .run(
                || self.http_client.post(&self.url).json(&request).send(),
                reqwest::Error::is_connect,
            )
            .await?;

        let status = response.status();
        let body = response.text().await?;
        parse_response(status, &body)
    }
}

impl SubmissionChannel for RpcClient {
    async fn send_raw_transaction(&self, tx_hex: &str) -> RpcResult<serde_json::Value> {
        self.call(SEND_RAW_TRANSACTION, SendRawTransactionParams::new(tx_hex))
            .await
    }
}

/// Interpret a node answer.
///
/// A JSON-RPC error object wins over the HTTP status, so a rejection sent
/// with a 5xx status still surfaces as [`RpcError::Rejected`].
fn parse_response(status: StatusCode, body: &str) -> RpcResult<serde_json::Value> {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) if !status.is_success() => {
            return Err(RpcError::UnexpectedStatus(status.as_u16(), body.to_string()))
        }
        Err(e) => {
            return Err(RpcError::Deserialize(format!("Malformed JSON-RPC response: {}", e)))
        }
    };

    let envelope: JsonRpcResponse = serde_json::from_value(value.clone())
        .map_err(|e| RpcError::Deserialize(format!("Not a JSON-RPC response: {}", e)))?;
    if let Some(error) = envelope.error {
        return Err(error.into());
    }
    if !status.is_success() {
        return Err(RpcError::UnexpectedStatus(status.as_u16(), body.to_string()));
    }

    Ok(value)
}
