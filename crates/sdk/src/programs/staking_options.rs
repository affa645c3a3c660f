use std::future::Future;

use solana_sdk::pubkey::Pubkey;

use crate::{client::program_ids, decode::SoState};

use super::{find_program_address, AccountReader};

/// Seed of the staking options state.
pub const STATE_SEED: &[u8] = b"so-config";

/// Seed of the option mint.
pub const OPTION_MINT_SEED: &[u8] = b"so";

/// Capabilities of the option program.
pub trait OptionProgram {
    /// Program ID.
    fn program_id(&self) -> &Pubkey;

    /// Find the state address of the staking options named `so_name`.
    fn state_address(&self, so_name: &str, base_mint: &Pubkey) -> crate::Result<Pubkey>;

    /// Find the option mint for `strike`.
    fn option_mint(&self, strike: u64, so_name: &str, base_mint: &Pubkey)
        -> crate::Result<Pubkey>;

    /// Fetch and decode the state of the staking options named `so_name`.
    fn get_state<R: AccountReader>(
        &self,
        reader: &R,
        so_name: &str,
        base_mint: &Pubkey,
    ) -> impl Future<Output = crate::Result<SoState>> {
        async move {
            let address = self.state_address(so_name, base_mint)?;
            let account = reader
                .get_multiple_accounts(&[address])
                .await?
                .into_iter()
                .next()
                .flatten()
                .ok_or_else(|| crate::Error::account_not_found("staking options state", &address))?;
            Ok(SoState::decode(&account.data)?)
        }
    }
}

impl<P: OptionProgram + ?Sized> OptionProgram for &P {
    fn program_id(&self) -> &Pubkey {
        (**self).program_id()
    }

    fn state_address(&self, so_name: &str, base_mint: &Pubkey) -> crate::Result<Pubkey> {
        (**self).state_address(so_name, base_mint)
    }

    fn option_mint(
        &self,
        strike: u64,
        so_name: &str,
        base_mint: &Pubkey,
    ) -> crate::Result<Pubkey> {
        (**self).option_mint(strike, so_name, base_mint)
    }
}

/// The staking options program.
#[derive(Debug, Clone)]
pub struct StakingOptions {
    program_id: Pubkey,
}

impl StakingOptions {
    /// Create with a custom program ID.
    pub fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }
}

impl Default for StakingOptions {
    fn default() -> Self {
        Self::new(program_ids::STAKING_OPTIONS)
    }
}

impl OptionProgram for StakingOptions {
    fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    fn state_address(&self, so_name: &str, base_mint: &Pubkey) -> crate::Result<Pubkey> {
        find_program_address(
            &[STATE_SEED, so_name.as_bytes(), base_mint.as_ref()],
            &self.program_id,
        )
    }

    fn option_mint(
        &self,
        strike: u64,
        so_name: &str,
        base_mint: &Pubkey,
    ) -> crate::Result<Pubkey> {
        let state = self.state_address(so_name, base_mint)?;
        find_program_address(
            &[OPTION_MINT_SEED, state.as_ref(), &strike.to_le_bytes()],
            &self.program_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_mint_depends_on_every_input() -> crate::Result<()> {
        let so = StakingOptions::default();
        let base = Pubkey::new_unique();
        let mint = so.option_mint(100, "GSOBONK", &base)?;
        assert_eq!(mint, so.option_mint(100, "GSOBONK", &base)?);
        assert_ne!(mint, so.option_mint(101, "GSOBONK", &base)?);
        assert_ne!(mint, so.option_mint(100, "GSODUAL", &base)?);
        assert_ne!(mint, so.option_mint(100, "GSOBONK", &Pubkey::new_unique())?);
        Ok(())
    }

    #[test]
    fn overlong_name_is_an_error() {
        let so = StakingOptions::default();
        let name = "N".repeat(64);
        assert!(so.state_address(&name, &Pubkey::new_unique()).is_err());
    }
}
