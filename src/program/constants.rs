//! Constants for the bookkeeper transaction format.
//!
//! Type tags, opcodes, and size constants matching what ledger nodes
//! expect in a `sendrawtransaction` payload.

// ============================================================================
// Transaction Tags
// ============================================================================

/// Transaction type tag for bookkeeper changes.
pub const BOOKKEEPER_TX_TYPE: u8 = 0x02;

/// Payload version written after the type tag.
pub const PAYLOAD_VERSION: u8 = 0x00;

/// Bookkeeper action tags.
pub mod action {
    pub const ADD: u8 = 0x00;
    pub const SUB: u8 = 0x01;
}

/// Transaction attribute usage tags.
pub mod attribute {
    pub const NONCE: u8 = 0x00;
}

// ============================================================================
// Script Opcodes
// ============================================================================

/// Script opcodes used by single-signature contracts.
pub mod opcode {
    /// Push the next 33 bytes (compressed public key).
    pub const PUSHBYTES33: u8 = 0x21;
    /// Push the next 64 bytes (signature).
    pub const PUSHBYTES64: u8 = 0x40;
    /// Verify the pushed signature against the pushed key.
    pub const CHECKSIG: u8 = 0xAC;
}

// ============================================================================
// Sizes
// ============================================================================

/// Compressed SEC1 point size (tag byte + 32-byte x coordinate).
pub const COMPRESSED_PUBKEY_SIZE: usize = 33;

/// Uncompressed SEC1 point size (tag byte + x + y).
pub const UNCOMPRESSED_PUBKEY_SIZE: usize = 65;

/// ECDSA signature size (r || s).
pub const SIGNATURE_SIZE: usize = 64;

/// Single-signature contract script size: PUSHBYTES33 + key + CHECKSIG.
pub const SIGNATURE_CONTRACT_SIZE: usize = COMPRESSED_PUBKEY_SIZE + 2;

/// Signature program parameter size: PUSHBYTES64 + signature.
pub const SIGNATURE_PARAMETER_SIZE: usize = SIGNATURE_SIZE + 1;

/// Record hash size (double SHA-256).
pub const HASH_SIZE: usize = 32;
