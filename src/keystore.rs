//! Key store for the issuing account.
//!
//! A wallet is a JSON file holding the hex-encoded P-256 private scalar:
//!
//! ```json
//! { "private_key": "<64 hex chars>" }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::program::{Account, Identity, SdkError};

/// Default wallet file name, resolved against the working directory.
pub const DEFAULT_WALLET_FILE: &str = "wallet.json";

/// Errors raised while loading the issuing account.
#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("Failed to read wallet {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed wallet file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Wallet key is unusable: {0}")]
    InvalidKey(#[source] SdkError),
}

/// Result type alias for key store operations.
pub type KeyStoreResult<T> = Result<T, KeyStoreError>;

/// Source of the account that signs bookkeeper records.
pub trait KeyStore {
    fn load_account(&self) -> KeyStoreResult<Account>;
}

#[derive(Debug, Serialize, Deserialize)]
struct WalletFile {
    private_key: String,
}

/// JSON wallet file on disk.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    path: PathBuf,
}

impl FileKeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `account` to the wallet file, replacing any existing file.
    pub fn store_account(&self, account: &Account) -> KeyStoreResult<()> {
        let wallet = WalletFile {
            private_key: account.private_key_hex(),
        };
        let json = serde_json::to_string_pretty(&wallet)?;
        fs::write(&self.path, json).map_err(|source| KeyStoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl Default for FileKeyStore {
    fn default() -> Self {
        Self::new(DEFAULT_WALLET_FILE)
    }
}

impl KeyStore for FileKeyStore {
    fn load_account(&self) -> KeyStoreResult<Account> {
        let contents = fs::read_to_string(&self.path).map_err(|source| KeyStoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let wallet: WalletFile = serde_json::from_str(&contents)?;
        let account =
            Account::from_private_key_hex(&wallet.private_key).map_err(KeyStoreError::InvalidKey)?;

        tracing::debug!(path = %self.path.display(), public_key = %account.public_key(), "Loaded wallet");
        Ok(account)
    }
}
