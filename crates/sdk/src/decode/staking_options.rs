use anchor_lang::prelude::{borsh, AnchorDeserialize, AnchorSerialize};
use solana_sdk::{hash::hash, pubkey::Pubkey};

use crate::constants::STAKING_OPTIONS_STATE_SIZE;

use super::{read_array, DecodeError};

const DISCRIMINATOR_LEN: usize = 8;

/// Decoded staking options state account.
#[derive(Debug, Clone, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
#[cfg_attr(serde, derive(serde::Serialize, serde::Deserialize))]
pub struct SoState {
    /// Staking options name.
    pub so_name: String,
    /// Authority.
    #[cfg_attr(serde, serde(with = "crate::serde::pubkey"))]
    pub authority: Pubkey,
    /// Number of options still available.
    pub options_available: u64,
    /// Option expiration (unix seconds).
    pub option_expiration: u64,
    /// End of the subscription period (unix seconds).
    pub subscription_period_end: u64,
    /// Decimals of the base token.
    pub base_decimals: u8,
    /// Decimals of the quote token.
    pub quote_decimals: u8,
    /// Base mint.
    #[cfg_attr(serde, serde(with = "crate::serde::pubkey"))]
    pub base_mint: Pubkey,
    /// Quote mint.
    #[cfg_attr(serde, serde(with = "crate::serde::pubkey"))]
    pub quote_mint: Pubkey,
    /// Quote account receiving exercise payments.
    #[cfg_attr(serde, serde(with = "crate::serde::pubkey"))]
    pub quote_account: Pubkey,
    /// Lot size in base atoms.
    pub lot_size: u64,
    /// Bump of the state.
    pub state_bump: u8,
    /// Bump of the vault.
    pub vault_bump: u8,
    /// Strikes in quote atoms per lot.
    pub strikes: Vec<u64>,
}

impl SoState {
    /// Anchor account discriminator.
    pub fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        let hash = hash(b"account:State");
        let mut discriminator = [0u8; DISCRIMINATOR_LEN];
        discriminator.copy_from_slice(&hash.to_bytes()[..DISCRIMINATOR_LEN]);
        discriminator
    }

    /// Decode a staking options state account, checking its discriminator.
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let discriminator = read_array::<DISCRIMINATOR_LEN>(buf, 0)?;
        if discriminator != Self::discriminator() {
            return Err(DecodeError::InvalidDiscriminator);
        }
        Self::decode_unchecked(buf)
    }

    /// Decode without checking the discriminator.
    pub fn decode_unchecked(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut data = buf.get(DISCRIMINATOR_LEN..).ok_or(DecodeError::OutOfBounds {
            offset: 0,
            len: DISCRIMINATOR_LEN,
            buf_len: buf.len(),
        })?;
        // Trailing zero padding of the account is ignored.
        Self::deserialize(&mut data).map_err(|err| DecodeError::Borsh(err.to_string()))
    }

    /// Encode into account data, padded to [`STAKING_OPTIONS_STATE_SIZE`] bytes.
    pub fn to_account_data(&self) -> crate::Result<Vec<u8>> {
        let mut data = Self::discriminator().to_vec();
        self.serialize(&mut data)
            .map_err(|err| crate::Error::custom(format!("borsh: {err}")))?;
        if data.len() > STAKING_OPTIONS_STATE_SIZE {
            return Err(crate::Error::custom("staking options state is too large"));
        }
        data.resize(STAKING_OPTIONS_STATE_SIZE, 0);
        Ok(data)
    }

    /// Whether the options have expired before the unix timestamp `now`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        i128::from(self.option_expiration) < i128::from(now)
    }

    /// Get the first strike.
    pub fn first_strike(&self) -> Option<u64> {
        self.strikes.first().copied()
    }
}
