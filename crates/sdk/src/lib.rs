#![deny(missing_docs)]

//! # Dual SDK
//!
//! Read-only client for Dual Finance staking options: account decoders,
//! balance reconciliation and the list of lockups open for staking.

/// Error type.
pub mod error;

/// Constants.
pub mod constants;

/// Account decoders.
pub mod decode;

/// Program capabilities.
pub mod programs;

/// Client.
pub mod client;

/// Positions.
pub mod position;

/// Lockups open for staking.
pub mod offering;

/// Display formatting.
pub mod format;

/// Token metadata.
#[cfg(metadata)]
pub mod metadata;

/// Serialization helpers.
#[cfg(serde)]
pub mod serde;

/// Utils.
pub mod utils;

pub use crate::{
    client::{Client, ClientOptions},
    error::Error,
};

/// Result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Client operations.
pub mod ops {
    pub use crate::client::ops::*;
}

pub use dual_solana_utils as solana_utils;
pub use solana_sdk;
