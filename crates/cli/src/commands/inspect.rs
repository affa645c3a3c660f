use dual_sdk::{
    constants::{GSO_STATE_SIZE, STAKING_OPTIONS_STATE_SIZE},
    decode::{GsoState, SoState},
    serde::StringPubkey,
    ClientOptions,
};

use crate::config::DisplayOptions;

/// Decode a lockup or staking options state account.
#[derive(Debug, clap::Args)]
pub struct Inspect {
    /// Address of the state account.
    address: StringPubkey,
}

#[derive(Debug)]
enum State {
    Lockup(GsoState),
    StakingOptions(SoState),
}

impl State {
    fn decode(data: &[u8]) -> eyre::Result<Self> {
        let state = match data.len() {
            GSO_STATE_SIZE => Self::Lockup(GsoState::decode(data)?),
            STAKING_OPTIONS_STATE_SIZE => Self::StakingOptions(SoState::decode(data)?),
            len => {
                tracing::warn!(len, "unexpected account size");
                match SoState::decode(data) {
                    Ok(state) => Self::StakingOptions(state),
                    Err(_) => Self::Lockup(GsoState::decode_unchecked(data)?),
                }
            }
        };
        Ok(state)
    }
}

impl super::Command for Inspect {
    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let client = ctx.client().client(ClientOptions::default());
        let account = client.account(&self.address.0).await?;
        let output = ctx.config().output();
        let out = match State::decode(&account.data)? {
            State::Lockup(state) => output.display_one(
                &state,
                DisplayOptions::table_projection([
                    ("so_name", "Name"),
                    ("period_num", "Period"),
                    ("subscription_period_end", "Subscription End"),
                    ("lockup_period_end", "Lockup End"),
                    ("lockup_ratio_tokens_per_million", "Ratio (per million)"),
                    ("strike", "Strike"),
                    ("base_mint", "Base Mint"),
                    ("staking_options_state", "Staking Options"),
                    ("authority", "Authority"),
                ]),
            )?,
            State::StakingOptions(state) => output.display_one(
                &state,
                DisplayOptions::table_projection([
                    ("so_name", "Name"),
                    ("options_available", "Available"),
                    ("option_expiration", "Expiration"),
                    ("subscription_period_end", "Subscription End"),
                    ("base_mint", "Base Mint"),
                    ("base_decimals", "Base Decimals"),
                    ("quote_mint", "Quote Mint"),
                    ("quote_decimals", "Quote Decimals"),
                    ("lot_size", "Lot Size"),
                    ("strikes", "Strikes"),
                    ("authority", "Authority"),
                ]),
            )?,
        };
        println!("{out}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use dual_sdk::solana_sdk::pubkey::Pubkey;

    use super::*;

    #[test]
    fn decode_by_size() -> eyre::Result<()> {
        let so = SoState {
            so_name: "GSOBONK".into(),
            authority: Pubkey::new_unique(),
            options_available: 1,
            option_expiration: 2,
            subscription_period_end: 3,
            base_decimals: 5,
            quote_decimals: 6,
            base_mint: Pubkey::new_unique(),
            quote_mint: Pubkey::new_unique(),
            quote_account: Pubkey::new_unique(),
            lot_size: 1_000_000,
            state_bump: 1,
            vault_bump: 2,
            strikes: vec![25],
        };
        let data = so.to_account_data()?;
        assert!(matches!(State::decode(&data)?, State::StakingOptions(decoded) if decoded == so));

        // Trimmed accounts are still decoded by their discriminator.
        assert!(matches!(
            State::decode(&data[..200])?,
            State::StakingOptions(_)
        ));
        assert!(State::decode(&[0u8; 10]).is_err());
        Ok(())
    }
}
