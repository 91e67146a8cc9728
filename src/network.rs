//! Network constants for the bookkeeper SDK.

/// Default JSON-RPC endpoint of a local ledger node.
pub const DEFAULT_RPC_URL: &str = "http://localhost:30003";

/// Environment variable overriding the RPC endpoint.
pub const RPC_URL_ENV: &str = "BOOKKEEPER_RPC_URL";

/// Environment variable overriding the wallet file path.
pub const WALLET_ENV: &str = "BOOKKEEPER_WALLET";
