//! Bookkeeper record construction and authorization.
//!
//! This module builds bookkeeper records, signs them, attaches
//! single-signature authorization programs, and encodes them for
//! submission.

pub mod authorizer;
pub mod builder;
pub mod constants;
pub mod contract;
pub mod error;
pub mod keys;
pub mod nonce;
pub mod signer;
pub mod transaction;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use authorizer::authorize;
pub use builder::BookkeeperBuilder;
pub use constants::*;
pub use contract::{create_signature_contract, AuthorizationContext, Contract, Program};
pub use error::{SdkError, SdkResult};
pub use keys::PublicKey;
pub use nonce::{NonceSource, RandomNonce};
pub use signer::{Account, Identity};
pub use transaction::{build, BookkeeperPayload, SignedRecord, TxAttribute, UnsignedRecord};
pub use types::{AttributeUsage, BookkeeperAction};
