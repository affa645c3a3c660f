use solana_sdk::pubkey::Pubkey;

#[cfg(metadata)]
use crate::metadata::TokenMetadata;

/// A lockup open for staking.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(serde, derive(serde::Serialize, serde::Deserialize))]
pub struct Offering {
    /// Name of the lockup, without the `GSO` prefix.
    pub so_name: String,
    /// Address of the GSO state.
    #[cfg_attr(serde, serde(with = "crate::serde::pubkey"))]
    pub gso_state: Pubkey,
    /// Address of the backing staking options state.
    #[cfg_attr(serde, serde(with = "crate::serde::pubkey"))]
    pub so_state: Pubkey,
    /// Base mint.
    #[cfg_attr(serde, serde(with = "crate::serde::pubkey"))]
    pub base_mint: Pubkey,
    /// Quote mint.
    #[cfg_attr(serde, serde(with = "crate::serde::pubkey"))]
    pub quote_mint: Pubkey,
    /// Option mint received when staking.
    #[cfg_attr(serde, serde(with = "crate::serde::pubkey"))]
    pub option_mint: Pubkey,
    /// Base decimals.
    pub base_decimals: u8,
    /// Lot size.
    pub lot_size: u64,
    /// Options received per staked base token.
    pub lockup_ratio: f64,
    /// End of the subscription period as a unix timestamp.
    pub subscription_period_end: i64,
    /// Time left until the subscription period ends.
    pub subscription: String,
    /// Option expiration as a unix timestamp.
    pub expiration: i64,
    /// Formatted option expiration date.
    pub expiration_date: String,
    /// Strike in atomic quote units per lot.
    pub strike: u64,
    /// Strike in USD per base token.
    pub strike_in_usd: f64,
    /// Symbol of the base token, if known.
    pub symbol: Option<String>,
    /// Metadata of the base token.
    #[cfg(metadata)]
    #[cfg_attr(serde, serde(default, skip_serializing_if = "Option::is_none"))]
    pub metadata: Option<TokenMetadata>,
}

