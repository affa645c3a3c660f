use solana_sdk::pubkey::Pubkey;

use crate::constants::{GSO_STATE_SIZE, STAKING_OPTIONS_STATE_SIZE};

#[cfg(metadata)]
use crate::metadata::TokenMetadata;

/// Kind of a position.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(serde, derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(serde, serde(rename_all = "kebab-case"))]
pub enum PositionKind {
    /// Tokens staked into a lockup (GSO).
    Lockup,
    /// Staking options held directly.
    StakingOption,
}

impl PositionKind {
    /// Size of the state accounts enumerated for this kind.
    pub fn state_size(&self) -> usize {
        match self {
            Self::Lockup => GSO_STATE_SIZE,
            Self::StakingOption => STAKING_OPTIONS_STATE_SIZE,
        }
    }
}

/// Returns whether `name` marks a test or trial deployment.
pub fn is_test_name(name: &str) -> bool {
    let name = name.to_lowercase();
    name.contains("test") || name.contains("trial")
}

/// A position held by an owner.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(serde, derive(serde::Serialize, serde::Deserialize))]
pub struct PositionRecord {
    /// Kind.
    pub kind: PositionKind,
    /// Name of the lockup or staking options.
    pub so_name: String,
    /// Address of the state account.
    #[cfg_attr(serde, serde(with = "crate::serde::pubkey"))]
    pub state: Pubkey,
    /// Base mint.
    #[cfg_attr(serde, serde(with = "crate::serde::pubkey"))]
    pub base_mint: Pubkey,
    /// Quote mint.
    #[cfg_attr(serde, serde(with = "crate::serde::pubkey"))]
    pub quote_mint: Pubkey,
    /// Option mint.
    #[cfg_attr(serde, serde(with = "crate::serde::pubkey"))]
    pub option_mint: Pubkey,
    /// Mint of the held token.
    #[cfg_attr(serde, serde(with = "crate::serde::pubkey"))]
    pub token_mint: Pubkey,
    /// Base decimals.
    pub base_decimals: u8,
    /// Quote decimals.
    pub quote_decimals: u8,
    /// Lot size.
    pub lot_size: u64,
    /// Strike in atomic quote units per lot.
    pub strike: u64,
    /// Strike in USD per base token.
    pub strike_in_usd: f64,
    /// Expiration as a unix timestamp.
    pub expiration: i64,
    /// Formatted expiration date.
    pub expiration_date: String,
    /// Time left until expiration.
    pub time_left: String,
    /// Raw balance of the held token.
    pub amount: u64,
    /// Balance of the held token in base units.
    pub ui_amount: f64,
    /// Raw balance of the option token. Always zero for staking options.
    pub option_amount: u64,
    /// Symbol of the base token, if known.
    pub symbol: Option<String>,
    /// Metadata of the base token.
    #[cfg(metadata)]
    #[cfg_attr(serde, serde(default, skip_serializing_if = "Option::is_none"))]
    pub metadata: Option<TokenMetadata>,
    /// Metadata of the option token.
    #[cfg(metadata)]
    #[cfg_attr(serde, serde(default, skip_serializing_if = "Option::is_none"))]
    pub option_metadata: Option<TokenMetadata>,
}
