//! Error types for the bookkeeper program module.

use thiserror::Error;

use crate::rpc::RpcError;

/// SDK-specific errors
#[derive(Debug, Error)]
pub enum SdkError {
    /// Caller supplied both or neither of the add/sub selectors, or a missing field
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Public key failed hex or curve point decoding
    #[error("Invalid public key: {0}")]
    InvalidKey(String),

    /// Signing primitive or key material failure
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Verification script could not be built or parsed
    #[error("Contract error: {0}")]
    Contract(String),

    /// A program for this public key is already registered in the context
    #[error("Program already registered for public key {public_key}")]
    Attach { public_key: String },

    /// Record could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Submission channel failure
    #[error("Submission failed: {0}")]
    Submission(#[from] RpcError),

    /// Invalid data length
    #[error("Invalid data length: expected {expected}, got {actual}")]
    InvalidDataLength {
        expected: usize,
        actual: usize,
    },

    /// Unknown transaction type tag
    #[error("Invalid transaction type: {0:#04x}")]
    InvalidTransactionType(u8),

    /// Unknown payload version
    #[error("Invalid payload version: {0}")]
    InvalidPayloadVersion(u8),

    /// Unknown bookkeeper action tag
    #[error("Invalid action value: {0} (must be 0 or 1)")]
    InvalidAction(u8),

    /// Unknown attribute usage tag
    #[error("Invalid attribute usage: {0:#04x}")]
    InvalidAttributeUsage(u8),

    /// Signed record carries no authorization programs
    #[error("Record has no authorization programs")]
    MissingPrograms,

    /// Signature does not verify against the program's public key
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// No program is bound to the payload's issuer key
    #[error("Record is not signed by its issuer {issuer}")]
    MissingIssuerSignature { issuer: String },
}

impl SdkError {
    /// Whether the error was caused by caller input and should be reported
    /// at the boundary rather than treated as a pipeline failure.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::InvalidKey(_))
    }
}

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;
