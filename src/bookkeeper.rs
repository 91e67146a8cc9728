//! Bookkeeper workflow: parse the requested change, build and authorize the
//! record, then hand the encoded record to a submission channel.
//!
//! # Example
//!
//! ```rust,ignore
//! use bookkeeper_sdk::prelude::*;
//!
//! let request = BookkeeperRequest::from_flags(Some(target_hex), None, Some("cert"))?;
//! let client = RpcClient::new(DEFAULT_RPC_URL)?;
//! let response = send_bookkeeper_transaction(
//!     &request,
//!     &account,
//!     RandomNonce::thread_local(),
//!     &client,
//! )
//! .await?;
//! ```

use crate::program::{
    BookkeeperAction, BookkeeperBuilder, Identity, NonceSource, PublicKey, SdkError, SdkResult,
};
use crate::rpc::SubmissionChannel;

/// A validated request to change one key's bookkeeper status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookkeeperRequest {
    pub target_key: PublicKey,
    pub action: BookkeeperAction,
    pub certificate: Vec<u8>,
}

impl BookkeeperRequest {
    pub fn new(target_key: PublicKey, action: BookkeeperAction, certificate: impl Into<Vec<u8>>) -> Self {
        Self {
            target_key,
            action,
            certificate: certificate.into(),
        }
    }

    /// Parse the optional add/sub/cert selectors.
    ///
    /// Empty strings count as absent. Exactly one of `add` and `sub` must be
    /// present; the certificate is taken as raw UTF-8 bytes.
    ///
    /// # Errors
    ///
    /// [`SdkError::InvalidInput`] for both or neither selector,
    /// [`SdkError::InvalidKey`] when the selected key does not decode.
    pub fn from_flags(add: Option<&str>, sub: Option<&str>, cert: Option<&str>) -> SdkResult<Self> {
        let add = add.filter(|s| !s.is_empty());
        let sub = sub.filter(|s| !s.is_empty());

        let (action, key_hex) = match (add, sub) {
            (Some(key), None) => (BookkeeperAction::Add, key),
            (None, Some(key)) => (BookkeeperAction::Sub, key),
            (Some(_), Some(_)) => {
                return Err(SdkError::InvalidInput(
                    "use either --add or --sub, not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(SdkError::InvalidInput("missing --add or --sub".to_string()))
            }
        };

        let target_key = PublicKey::from_hex(key_hex)?;
        let certificate = cert.unwrap_or_default().as_bytes().to_vec();
        Ok(Self::new(target_key, action, certificate))
    }
}

/// Build, authorize and hex-encode a bookkeeper record.
///
/// The issuer key in the payload is the signer's own key.
pub fn make_bookkeeper_transaction<I: Identity + ?Sized>(
    request: &BookkeeperRequest,
    issuer: &I,
    nonces: impl NonceSource,
) -> SdkResult<String> {
    let signed = BookkeeperBuilder::new()
        .action(request.action, request.target_key.clone())
        .certificate(request.certificate.clone())
        .issuer(issuer.public_key())
        .build_and_authorize(nonces, issuer)?;

    let tx_hex = signed.to_hex()?;
    tracing::info!(
        hash = %signed.hash_hex()?,
        action = %request.action,
        target = %request.target_key,
        "Built bookkeeper transaction"
    );
    Ok(tx_hex)
}

/// Build a bookkeeper record and submit it through `channel`.
///
/// The channel is called at most once and only after the record has been
/// fully built. Its response is returned as received; a channel failure is
/// returned as [`SdkError::Submission`].
pub async fn send_bookkeeper_transaction<I, C>(
    request: &BookkeeperRequest,
    issuer: &I,
    nonces: impl NonceSource,
    channel: &C,
) -> SdkResult<serde_json::Value>
where
    I: Identity + ?Sized,
    C: SubmissionChannel + ?Sized,
{
    let tx_hex = make_bookkeeper_transaction(request, issuer, nonces)?;
    let response = channel.send_raw_transaction(&tx_hex).await?;
    tracing::debug!(response = %response, "Bookkeeper transaction submitted");
    Ok(response)
}
