use solana_sdk::pubkey::Pubkey;

use crate::constants::{BONK_MINT_MAINNET, GSO_STATE_SIZE, LOCKUP_RATIO_UNIT};

use super::{read_array, read_bytes, read_u64_le, read_u8, DecodeError};

const PERIOD_NUM_OFFSET: usize = 8;
const SUBSCRIPTION_PERIOD_END_OFFSET: usize = 16;
const LOCKUP_RATIO_OFFSET: usize = 24;
const GSO_STATE_BUMP_OFFSET: usize = 32;
const SO_AUTHORITY_BUMP_OFFSET: usize = 33;
const X_BASE_MINT_BUMP_OFFSET: usize = 34;
const BASE_VAULT_BUMP_OFFSET: usize = 35;
const STRIKE_OFFSET: usize = 36;
const SO_NAME_LEN_OFFSET: usize = 44;
const SO_NAME_OFFSET: usize = 48;

const PUBKEY_LEN: usize = 32;
const LOCKUP_PERIOD_END_LEN: usize = 32;

/// Decoded GSO (lockup) state account.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(serde, derive(serde::Serialize, serde::Deserialize))]
pub struct GsoState {
    /// Period number.
    pub period_num: u64,
    /// End of the subscription period (unix seconds).
    pub subscription_period_end: u64,
    /// Lockup ratio scaled by 1e6.
    pub lockup_ratio_tokens_per_million: u64,
    /// Bump of the GSO state.
    pub gso_state_bump: u8,
    /// Bump of the staking options authority.
    pub so_authority_bump: u8,
    /// Bump of the xBase mint.
    pub x_base_mint_bump: u8,
    /// Bump of the base vault.
    pub base_vault_bump: u8,
    /// Strike in quote atoms per lot.
    pub strike: u64,
    /// Staking options name (without the `GSO` prefix).
    pub so_name: String,
    /// Staking options state.
    #[cfg_attr(serde, serde(with = "crate::serde::pubkey"))]
    pub staking_options_state: Pubkey,
    /// Authority.
    #[cfg_attr(serde, serde(with = "crate::serde::pubkey"))]
    pub authority: Pubkey,
    /// Base mint.
    #[cfg_attr(serde, serde(with = "crate::serde::pubkey"))]
    pub base_mint: Pubkey,
    /// End of the lockup period (unix seconds).
    pub lockup_period_end: u64,
}

impl GsoState {
    /// Decode a GSO state account.
    ///
    /// The buffer must be exactly [`GSO_STATE_SIZE`] bytes long.
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        if buf.len() != GSO_STATE_SIZE {
            return Err(DecodeError::InvalidLength {
                expected: GSO_STATE_SIZE,
                actual: buf.len(),
            });
        }
        Self::decode_unchecked(buf)
    }

    /// Decode without checking the buffer size. Every read is still
    /// bounds-checked.
    pub fn decode_unchecked(buf: &[u8]) -> Result<Self, DecodeError> {
        let period_num = read_u64_le(buf, PERIOD_NUM_OFFSET)?;
        let subscription_period_end = read_u64_le(buf, SUBSCRIPTION_PERIOD_END_OFFSET)?;
        let lockup_ratio_tokens_per_million = read_u64_le(buf, LOCKUP_RATIO_OFFSET)?;
        let gso_state_bump = read_u8(buf, GSO_STATE_BUMP_OFFSET)?;
        let so_authority_bump = read_u8(buf, SO_AUTHORITY_BUMP_OFFSET)?;
        let x_base_mint_bump = read_u8(buf, X_BASE_MINT_BUMP_OFFSET)?;
        let base_vault_bump = read_u8(buf, BASE_VAULT_BUMP_OFFSET)?;
        let strike = read_u64_le(buf, STRIKE_OFFSET)?;

        let name_len = usize::from(read_u8(buf, SO_NAME_LEN_OFFSET)?);
        // One char per byte, so any name decodes.
        let so_name = read_bytes(buf, SO_NAME_OFFSET, name_len)?
            .iter()
            .copied()
            .map(char::from)
            .collect::<String>();

        let so_state_offset = SO_NAME_OFFSET + name_len;
        // The whole trailing block must be in bounds before any field is read.
        read_bytes(buf, so_state_offset, 3 * PUBKEY_LEN + LOCKUP_PERIOD_END_LEN)?;

        let staking_options_state =
            Pubkey::new_from_array(read_array(buf, so_state_offset)?);
        let authority = Pubkey::new_from_array(read_array(buf, so_state_offset + PUBKEY_LEN)?);
        let mut base_mint =
            Pubkey::new_from_array(read_array(buf, so_state_offset + 2 * PUBKEY_LEN)?);
        if base_mint == Pubkey::default() {
            // Backwards compatibility: early lockups were created before the
            // base mint was stored and are all BONK lockups.
            base_mint = BONK_MINT_MAINNET;
        }

        // Only the first 8 bytes of the 32-byte slot are used.
        let mut lockup_period_end = read_u64_le(buf, so_state_offset + 3 * PUBKEY_LEN)?;
        if lockup_period_end == 0 {
            // Backwards compatibility: the lockup used to end with the
            // subscription period.
            lockup_period_end = subscription_period_end;
        }

        Ok(Self {
            period_num,
            subscription_period_end,
            lockup_ratio_tokens_per_million,
            gso_state_bump,
            so_authority_bump,
            x_base_mint_bump,
            base_vault_bump,
            strike,
            so_name,
            staking_options_state,
            authority,
            base_mint,
            lockup_period_end,
        })
    }

    /// Encode into the account layout, [`GSO_STATE_SIZE`] bytes long.
    ///
    /// The account discriminator is left zeroed.
    pub fn to_bytes(&self) -> crate::Result<Vec<u8>> {
        let name = self
            .so_name
            .chars()
            .map(|c| u8::try_from(c).map_err(crate::Error::custom))
            .collect::<crate::Result<Vec<u8>>>()?;
        let name = name.as_slice();
        let name_len = u8::try_from(name.len())
            .map_err(|_| crate::Error::custom("staking options name is too long"))?;

        let mut buf = vec![0u8; GSO_STATE_SIZE];
        let mut put = |offset: usize, bytes: &[u8]| {
            buf[offset..offset + bytes.len()].copy_from_slice(bytes);
        };
        put(PERIOD_NUM_OFFSET, &self.period_num.to_le_bytes());
        put(
            SUBSCRIPTION_PERIOD_END_OFFSET,
            &self.subscription_period_end.to_le_bytes(),
        );
        put(
            LOCKUP_RATIO_OFFSET,
            &self.lockup_ratio_tokens_per_million.to_le_bytes(),
        );
        put(GSO_STATE_BUMP_OFFSET, &[self.gso_state_bump]);
        put(SO_AUTHORITY_BUMP_OFFSET, &[self.so_authority_bump]);
        put(X_BASE_MINT_BUMP_OFFSET, &[self.x_base_mint_bump]);
        put(BASE_VAULT_BUMP_OFFSET, &[self.base_vault_bump]);
        put(STRIKE_OFFSET, &self.strike.to_le_bytes());
        put(SO_NAME_LEN_OFFSET, &u32::from(name_len).to_le_bytes());
        put(SO_NAME_OFFSET, name);

        let so_state_offset = SO_NAME_OFFSET + name.len();
        put(so_state_offset, self.staking_options_state.as_ref());
        put(so_state_offset + PUBKEY_LEN, self.authority.as_ref());
        put(so_state_offset + 2 * PUBKEY_LEN, self.base_mint.as_ref());
        put(
            so_state_offset + 3 * PUBKEY_LEN,
            &self.lockup_period_end.to_le_bytes(),
        );
        Ok(buf)
    }

    /// Lockup ratio, in tokens locked per token staked.
    pub fn lockup_ratio(&self) -> f64 {
        self.lockup_ratio_tokens_per_million as f64 / LOCKUP_RATIO_UNIT as f64
    }

    /// Whether the subscription period is still open at the unix timestamp `now`.
    pub fn is_open_at(&self, now: i64) -> bool {
        i128::from(self.subscription_period_end) > i128::from(now)
    }
}
