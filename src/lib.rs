//! # Bookkeeper SDK
//!
//! A Rust SDK for granting and revoking bookkeeper status on a ledger with a
//! single-signer authorized record.
//!
//! ## Modules
//!
//! - [`program`]: Record construction, signing and the wire codec
//! - [`bookkeeper`]: End-to-end workflow from request to submission
//! - [`rpc`]: Submission channel and JSON-RPC client
//! - [`keystore`]: Wallet loading for the issuing account
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bookkeeper_sdk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let account = FileKeyStore::new("wallet.json").load_account()?;
//!     let request = BookkeeperRequest::from_flags(Some("02b4..."), None, None)?;
//!
//!     let client = RpcClient::new(DEFAULT_RPC_URL)?;
//!     let response = send_bookkeeper_transaction(
//!         &request,
//!         &account,
//!         RandomNonce::thread_local(),
//!         &client,
//!     )
//!     .await?;
//!     println!("{}", response);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Offline Signing
//!
//! ```rust,ignore
//! use bookkeeper_sdk::prelude::*;
//!
//! let signed = BookkeeperBuilder::new()
//!     .sub(target_key)
//!     .issuer(account.public_key())
//!     .build_and_authorize(RandomNonce::thread_local(), &account)?;
//! let tx_hex = signed.to_hex()?;
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// Record construction, authorization and encoding.
pub mod program;

/// Bookkeeper workflow from parsed request to submission.
pub mod bookkeeper;

/// Submission channel. The HTTP client requires the `rpc` feature.
pub mod rpc;

/// Wallet loading for the issuing account.
pub mod keystore;

/// Network constants.
pub mod network;

// ============================================================================
// PRELUDE
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use bookkeeper_sdk::prelude::*;
/// ```
pub mod prelude {
    // Program module exports
    pub use crate::program::{
        // Records
        build, BookkeeperPayload, SignedRecord, TxAttribute, UnsignedRecord,
        // Builder and authorization
        authorize, BookkeeperBuilder, AuthorizationContext, Contract, Program,
        create_signature_contract,
        // Keys and signers
        Account, Identity, PublicKey,
        // Nonces
        NonceSource, RandomNonce,
        // Types
        AttributeUsage, BookkeeperAction,
        // Errors
        SdkError, SdkResult,
    };

    // Workflow
    pub use crate::bookkeeper::{
        make_bookkeeper_transaction, send_bookkeeper_transaction, BookkeeperRequest,
    };

    // Submission
    pub use crate::rpc::{RpcError, RpcResult, SubmissionChannel};
    #[cfg(feature = "rpc")]
    pub use crate::rpc::{RpcClient, RpcClientBuilder};

    // Key store
    pub use crate::keystore::{FileKeyStore, KeyStore, KeyStoreError};

    // Network constants
    pub use crate::network::DEFAULT_RPC_URL;
}
