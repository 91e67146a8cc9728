//! Error types for the JSON-RPC submission channel.

use thiserror::Error;

/// Transport error source. Uninhabited without the `rpc` feature.
#[cfg(feature = "rpc")]
pub type HttpError = reqwest::Error;
#[cfg(not(feature = "rpc"))]
pub type HttpError = std::convert::Infallible;

/// Transport-layer error for the JSON-RPC client.
#[derive(Debug, Error)]
pub enum RpcError {
    /// HTTP/network error from reqwest
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// The node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rejected { code: i64, message: String },

    /// JSON deserialization error
    #[error("Deserialization error: {0}")]
    Deserialize(String),

    /// Unexpected HTTP status code
    #[error("Unexpected status {0}: {1}")]
    UnexpectedStatus(u16, String),
}

/// Result type alias for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;

/// JSON-RPC error object as returned by the node.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ErrorObject {
    /// Node-specific error code
    #[serde(default)]
    pub code: i64,
    /// Human-readable error message
    #[serde(default, alias = "error")]
    pub message: Option<String>,
}

impl ErrorObject {
    /// Get the error message.
    pub fn get_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

impl From<ErrorObject> for RpcError {
    fn from(error: ErrorObject) -> Self {
        RpcError::Rejected {
            code: error.code,
            message: error.get_message(),
        }
    }
}
