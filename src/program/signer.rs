//! Signing identities.
//!
//! [`Identity`] is what the authorizer needs from a signer: its public key
//! and a signing operation. [`Account`] is the in-memory P-256 identity
//! produced by the key store.

use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey};
use rand::rngs::OsRng;

use crate::program::constants::SIGNATURE_SIZE;
use crate::program::error::{SdkError, SdkResult};
use crate::program::keys::PublicKey;

/// A signer that can authorize records.
pub trait Identity {
    /// Verification key bound into the authorization program.
    fn public_key(&self) -> PublicKey;

    /// Sign `message`, returning the 64-byte `r || s` signature.
    fn sign(&self, message: &[u8]) -> SdkResult<[u8; SIGNATURE_SIZE]>;
}

/// A P-256 signing account.
#[derive(Clone)]
pub struct Account {
    signing_key: SigningKey,
    public_key: PublicKey,
}

impl Account {
    /// Generate a fresh random account.
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::random(&mut OsRng))
    }

    /// Load an account from a 32-byte private scalar.
    pub fn from_private_key_bytes(bytes: &[u8]) -> SdkResult<Self> {
        let signing_key = SigningKey::from_slice(bytes)
            .map_err(|_| SdkError::Signing("invalid private key scalar".to_string()))?;
        Ok(Self::from_signing_key(signing_key))
    }

    /// Load an account from a hex-encoded private scalar.
    pub fn from_private_key_hex(value: &str) -> SdkResult<Self> {
        let bytes = hex::decode(value.trim())
            .map_err(|e| SdkError::Signing(format!("private key is not valid hex: {}", e)))?;
        Self::from_private_key_bytes(&bytes)
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let public_key = PublicKey::from(p256::PublicKey::from(signing_key.verifying_key()));
        Self {
            signing_key,
            public_key,
        }
    }

    /// Private scalar as hex, for writing key files.
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }
}

impl Identity for Account {
    fn public_key(&self) -> PublicKey {
        self.public_key.clone()
    }

    fn sign(&self, message: &[u8]) -> SdkResult<[u8; SIGNATURE_SIZE]> {
        let signature: Signature = self
            .signing_key
            .try_sign(message)
            .map_err(|e| SdkError::Signing(e.to_string()))?;

        let mut out = [0u8; SIGNATURE_SIZE];
        out.copy_from_slice(&signature.to_bytes());
        Ok(out)
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_key_roundtrip() {
        let account = Account::generate();
        let restored = Account::from_private_key_hex(&account.private_key_hex()).unwrap();
        assert_eq!(restored.public_key(), account.public_key());
    }

    #[test]
    fn test_zero_scalar_rejected() {
        let err = Account::from_private_key_bytes(&[0u8; 32]).unwrap_err();
        assert!(matches!(err, SdkError::Signing(_)));
    }

    #[test]
    fn test_bad_hex_rejected() {
        assert!(matches!(
            Account::from_private_key_hex("not-hex"),
            Err(SdkError::Signing(_))
        ));
    }

    #[test]
    fn test_sign_is_deterministic() {
        let account = Account::from_private_key_bytes(&[7u8; 32]).unwrap();
        let a = account.sign(b"payload").unwrap();
        let b = account.sign(b"payload").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, [0u8; SIGNATURE_SIZE]);
    }

    #[test]
    fn test_debug_hides_private_key() {
        let account = Account::from_private_key_bytes(&[7u8; 32]).unwrap();
        let debug = format!("{:?}", account);
        assert!(debug.contains("public_key"));
        assert!(!debug.contains(&account.private_key_hex()));
    }
}
