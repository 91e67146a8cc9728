//! Fluent builder for creating and authorizing bookkeeper records.

use crate::program::error::{SdkError, SdkResult};
use crate::program::keys::PublicKey;
use crate::program::nonce::NonceSource;
use crate::program::signer::Identity;
use crate::program::transaction::{BookkeeperPayload, SignedRecord, UnsignedRecord};
use crate::program::types::BookkeeperAction;

/// Builder for bookkeeper records with a fluent API.
///
/// Exactly one of [`add`](Self::add) or [`sub`](Self::sub) must be set.
///
/// # Example
///
/// ```rust,ignore
/// use bookkeeper_sdk::prelude::*;
///
/// let hex = BookkeeperBuilder::new()
///     .add(target_key)
///     .certificate(b"cert".to_vec())
///     .issuer(account.public_key())
///     .build_and_authorize(RandomNonce::thread_local(), &account)?
///     .to_hex()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct BookkeeperBuilder {
    add: Option<PublicKey>,
    sub: Option<PublicKey>,
    certificate: Vec<u8>,
    issuer: Option<PublicKey>,
}

impl BookkeeperBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant bookkeeper status to `target`.
    pub fn add(mut self, target: PublicKey) -> Self {
        self.add = Some(target);
        self
    }

    /// Revoke bookkeeper status from `target`.
    pub fn sub(mut self, target: PublicKey) -> Self {
        self.sub = Some(target);
        self
    }

    /// Set the target and action directly.
    pub fn action(self, action: BookkeeperAction, target: PublicKey) -> Self {
        match action {
            BookkeeperAction::Add => self.add(target),
            BookkeeperAction::Sub => self.sub(target),
        }
    }

    /// Attach a certificate (empty means none).
    pub fn certificate(mut self, certificate: impl Into<Vec<u8>>) -> Self {
        self.certificate = certificate.into();
        self
    }

    /// Set the issuer key (required for [`build`](Self::build)).
    pub fn issuer(mut self, issuer: PublicKey) -> Self {
        self.issuer = Some(issuer);
        self
    }

    /// Build the unsigned record.
    ///
    /// # Errors
    ///
    /// [`SdkError::InvalidInput`] if both or neither of add/sub are set, or
    /// the issuer is missing.
    pub fn build(self, nonces: impl NonceSource) -> SdkResult<UnsignedRecord> {
        let (action, target) = match (self.add, self.sub) {
            (Some(target), None) => (BookkeeperAction::Add, target),
            (None, Some(target)) => (BookkeeperAction::Sub, target),
            (Some(_), Some(_)) => {
                return Err(SdkError::InvalidInput(
                    "add and sub are mutually exclusive".to_string(),
                ))
            }
            (None, None) => {
                return Err(SdkError::InvalidInput(
                    "one of add or sub is required".to_string(),
                ))
            }
        };
        let issuer = self
            .issuer
            .ok_or_else(|| SdkError::InvalidInput("issuer is required".to_string()))?;

        let payload = BookkeeperPayload::new(target, action, self.certificate, issuer);
        Ok(UnsignedRecord::new(payload, nonces))
    }

    /// Build and authorize with `signer` in one step.
    ///
    /// The issuer defaults to the signer's key. An explicit issuer that is
    /// not the signer fails with [`SdkError::InvalidInput`].
    pub fn build_and_authorize<I: Identity + ?Sized>(
        mut self,
        nonces: impl NonceSource,
        signer: &I,
    ) -> SdkResult<SignedRecord> {
        if self.issuer.is_none() {
            self.issuer = Some(signer.public_key());
        }
        self.build(nonces)?.authorize(signer)
    }
}
