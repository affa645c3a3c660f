/// Batched account reads.
pub mod batch;

/// In-memory query cache.
pub mod cache;

/// Mint utils.
pub mod mint;

/// Token account utils.
pub mod token;

pub use self::{
    batch::get_multiple_accounts_batched,
    cache::QueryCache,
    mint::MintDecimals,
    token::token_amount,
};
