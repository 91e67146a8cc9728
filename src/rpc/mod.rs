//! Submission channel for signed bookkeeper records.
//!
//! The [`SubmissionChannel`] trait is the seam between the record pipeline
//! and a ledger node. [`RpcClient`] implements it over JSON-RPC 2.0 using the
//! node's `sendrawtransaction` method.
//!
//! # Client Configuration
//!
//! ```rust,ignore
//! use bookkeeper_sdk::rpc::RpcClient;
//! use std::time::Duration;
//!
//! // Retry up to three times while the node refuses connections
//! let client = RpcClient::builder("http://localhost:30003")
//!     .timeout(Duration::from_secs(60))
//!     .retries(3)
//!     .build()?;
//!
//! let response = client.send_raw_transaction(&tx_hex).await?;
//! ```

pub mod error;
pub mod types;

#[cfg(feature = "rpc")]
pub mod client;

pub use error::{ErrorObject, RpcError, RpcResult};
pub use types::{JsonRpcRequest, JsonRpcResponse, SendRawTransactionParams, SEND_RAW_TRANSACTION};

#[cfg(feature = "rpc")]
pub use client::{RpcClient, RpcClientBuilder, DEFAULT_TIMEOUT_SECS};

/// Hands a serialized record to a ledger node.
///
/// The response is returned as received; callers decide how to present it.
#[allow(async_fn_in_trait)]
pub trait SubmissionChannel {
    /// Submit a hex-encoded signed record.
    async fn send_raw_transaction(&self, tx_hex: &str) -> RpcResult<serde_json::Value>;
}

impl<T: SubmissionChannel + ?Sized> SubmissionChannel for &T {
    async fn send_raw_transaction(&self, tx_hex: &str) -> RpcResult<serde_json::Value> {
        (**self).send_raw_transaction(tx_hex).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoChannel {
        calls: AtomicUsize,
    }

    impl SubmissionChannel for EchoChannel {
        async fn send_raw_transaction(&self, tx_hex: &str) -> RpcResult<serde_json::Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::json!({ "result": tx_hex }))
        }
    }

    async fn submit<C: SubmissionChannel>(channel: C, tx_hex: &str) -> RpcResult<serde_json::Value> {
        channel.send_raw_transaction(tx_hex).await
    }

    #[test]
    fn test_channel_by_reference() {
        let channel = EchoChannel {
            calls: AtomicUsize::new(0),
        };

        let response = tokio_test::block_on(submit(&channel, "0200")).unwrap();

        assert_eq!(response["result"], "0200");
        assert_eq!(channel.calls.load(Ordering::SeqCst), 1);
    }
}
