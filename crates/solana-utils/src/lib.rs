#![deny(missing_docs)]
#![deny(unreachable_pub)]

//! # Dual Solana Utils

/// Error type.
pub mod error;

/// Cluster.
pub mod cluster;

/// Client traits.
#[cfg(client_traits)]
pub mod client_traits;

/// Utils.
pub mod utils;

pub use crate::{cluster::Cluster, error::Error};

/// Result type.
pub type Result<T> = std::result::Result<T, Error>;

pub use solana_sdk;

#[cfg(feature = "solana-rpc-client-api")]
pub use solana_rpc_client_api;

#[cfg(feature = "solana-account-decoder-client-types")]
pub use solana_account_decoder_client_types;
