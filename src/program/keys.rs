//! Public-key codec.
//!
//! Bookkeeper keys are NIST P-256 points. They are accepted as SEC1
//! compressed (33 bytes) or uncompressed (65 bytes) encodings and are always
//! written compressed.

use std::fmt;
use std::str::FromStr;

use p256::elliptic_curve::sec1::ToEncodedPoint;

use crate::program::constants::{COMPRESSED_PUBKEY_SIZE, UNCOMPRESSED_PUBKEY_SIZE};
use crate::program::error::{SdkError, SdkResult};

/// A validated P-256 public key.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey(p256::PublicKey);

impl PublicKey {
    /// Decode a hex-encoded SEC1 point.
    pub fn from_hex(value: &str) -> SdkResult<Self> {
        let bytes = hex::decode(value.trim())
            .map_err(|e| SdkError::InvalidKey(format!("not valid hex: {}", e)))?;
        Self::decode_point(&bytes)
    }

    /// Decode a SEC1 point (compressed or uncompressed).
    ///
    /// Only the `0x02`/`0x03` compressed and `0x04` uncompressed tags are
    /// accepted.
    pub fn decode_point(bytes: &[u8]) -> SdkResult<Self> {
        let tag_ok = match (bytes.len(), bytes.first().copied()) {
            (COMPRESSED_PUBKEY_SIZE, Some(0x02 | 0x03)) => true,
            (UNCOMPRESSED_PUBKEY_SIZE, Some(0x04)) => true,
            (COMPRESSED_PUBKEY_SIZE | UNCOMPRESSED_PUBKEY_SIZE, _) => false,
            _ => {
                return Err(SdkError::InvalidKey(format!(
                    "expected {} or {} bytes, got {}",
                    COMPRESSED_PUBKEY_SIZE,
                    UNCOMPRESSED_PUBKEY_SIZE,
                    bytes.len()
                )))
            }
        };
        if !tag_ok {
            return Err(SdkError::InvalidKey(format!(
                "unsupported point tag {:#04x} for a {}-byte key",
                bytes[0],
                bytes.len()
            )));
        }
        p256::PublicKey::from_sec1_bytes(bytes)
            .map(Self)
            .map_err(|_| SdkError::InvalidKey("not a point on the P-256 curve".to_string()))
    }

    /// Compressed SEC1 encoding (33 bytes).
    pub fn encode_point(&self) -> [u8; COMPRESSED_PUBKEY_SIZE] {
        let encoded = self.0.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_PUBKEY_SIZE];
        out.copy_from_slice(encoded.as_bytes());
        out
    }

    /// Compressed encoding as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.encode_point())
    }
}

impl From<p256::PublicKey> for PublicKey {
    fn from(key: p256::PublicKey) -> Self {
        Self(key)
    }
}

impl FromStr for PublicKey {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}
