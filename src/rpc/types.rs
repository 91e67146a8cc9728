//! JSON-RPC 2.0 envelope types.

use serde::{Deserialize, Serialize};

use crate::rpc::error::ErrorObject;

/// Node method that accepts a raw signed transaction.
pub const SEND_RAW_TRANSACTION: &str = "sendrawtransaction";

/// JSON-RPC request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<P> {
    pub jsonrpc: &'static str,
    pub method: String,
    pub params: P,
    pub id: u64,
}

impl<P: Serialize> JsonRpcRequest<P> {
    /// Create a request with id 0.
    pub fn new(method: impl Into<String>, params: P) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params,
            id: 0,
        }
    }
}

/// Parameters for [`SEND_RAW_TRANSACTION`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRawTransactionParams {
    pub tx: String,
}

impl SendRawTransactionParams {
    pub fn new(tx_hex: impl Into<String>) -> Self {
        Self { tx: tx_hex.into() }
    }
}

/// JSON-RPC response envelope.
///
/// Only used to detect a node-side error; the caller receives the full
/// response body.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<ErrorObject>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_envelope() {
        let request = JsonRpcRequest::new(SEND_RAW_TRANSACTION, SendRawTransactionParams::new("0200"));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["method"], "sendrawtransaction");
        assert_eq!(json["params"]["tx"], "0200");
        assert_eq!(json["id"], 0);
    }

    #[test]
    fn test_response_with_error() {
        let response: JsonRpcResponse =
            serde_json::from_str(r#"{"id":0,"error":{"code":-1,"message":"bad tx"}}"#).unwrap();
        assert!(response.result.is_none());
        assert_eq!(response.error.unwrap().get_message(), "bad tx");
    }

    #[test]
    fn test_response_null_error() {
        let response: JsonRpcResponse =
            serde_json::from_str(r#"{"id":0,"result":"abcd","error":null}"#).unwrap();
        assert!(response.error.is_none());
        assert_eq!(response.result.unwrap(), "abcd");
    }
}
