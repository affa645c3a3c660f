use solana_sdk::pubkey::Pubkey;

use crate::decode::DecodeError;

/// Error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Decode error.
    #[error("decode: {0}")]
    Decode(#[from] DecodeError),
    /// Solana utils error.
    #[error("solana-utils: {0}")]
    SolanaUtils(#[from] dual_solana_utils::Error),
    /// Anchor error.
    #[error("anchor: {0}")]
    Anchor(#[from] anchor_lang::error::Error),
    /// Not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Reqwest error.
    #[cfg(feature = "reqwest")]
    #[error("reqwest: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Custom error.
    #[error("custom: {0}")]
    Custom(String),
}

impl Error {
    /// Create a custom error.
    pub fn custom(msg: impl ToString) -> Self {
        Self::Custom(msg.to_string())
    }

    /// Create a "not found" error for an account.
    pub fn account_not_found(kind: &str, address: &Pubkey) -> Self {
        Self::NotFound(format!("{kind} account `{address}`"))
    }
}
