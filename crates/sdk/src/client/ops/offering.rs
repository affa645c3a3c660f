use std::future::Future;

use futures_util::future::join_all;
use solana_sdk::pubkey::Pubkey;

use crate::{
    constants::GSO_NAME_PREFIX,
    decode::GsoState,
    format,
    offering::Offering,
    programs::{AccountReader, LockupProgram, OptionProgram},
    Client,
};

use super::balance::{current_timestamp, timestamp};

/// Operations for listing lockups open for staking.
pub trait OfferingOps {
    /// List the lockups open for staking at the current time.
    fn offerings(&self) -> impl Future<Output = crate::Result<Vec<Offering>>>;

    /// List the lockups open for staking as of the unix timestamp `now`.
    fn offerings_at(&self, now: i64) -> impl Future<Output = crate::Result<Vec<Offering>>>;

    /// Find the offering named `so_name`.
    fn offering_details(
        &self,
        so_name: &str,
    ) -> impl Future<Output = crate::Result<Option<Offering>>>;
}

impl<R, L, O> Client<R, L, O>
where
    R: AccountReader,
    L: LockupProgram,
    O: OptionProgram,
{
    async fn offering(&self, address: Pubkey, gso: GsoState, now: i64) -> crate::Result<Offering> {
        let so_name = format!("{GSO_NAME_PREFIX}{}", gso.so_name);
        let so = self
            .option_program()
            .get_state(self.reader(), &so_name, &gso.base_mint)
            .await?;
        let (base_decimals, quote_decimals) =
            self.decimals_pair(&gso.base_mint, &so.quote_mint).await?;
        let option_mint = self
            .option_program()
            .option_mint(gso.strike, &so_name, &gso.base_mint)?;
        let so_state = self
            .option_program()
            .state_address(&so_name, &gso.base_mint)?;
        let subscription_period_end = timestamp(gso.subscription_period_end)?;
        let expiration = timestamp(so.option_expiration)?;

        Ok(Offering {
            lockup_ratio: gso.lockup_ratio(),
            strike_in_usd: format::strike_in_usd(
                gso.strike,
                so.lot_size,
                quote_decimals,
                base_decimals,
            ),
            symbol: crate::constants::known_token(&gso.base_mint)
                .map(|token| token.symbol.to_string()),
            so_name: gso.so_name,
            gso_state: address,
            so_state,
            base_mint: gso.base_mint,
            quote_mint: so.quote_mint,
            option_mint,
            base_decimals,
            lot_size: so.lot_size,
            subscription_period_end,
            subscription: format::time_left(subscription_period_end - now),
            expiration,
            expiration_date: format::expiration_date(expiration)?,
            strike: gso.strike,
            #[cfg(metadata)]
            metadata: None,
        })
    }
}

impl<R, L, O> OfferingOps for Client<R, L, O>
where
    R: AccountReader,
    L: LockupProgram,
    O: OptionProgram,
{
    async fn offerings(&self) -> crate::Result<Vec<Offering>> {
        self.offerings_at(current_timestamp()?).await
    }

    async fn offerings_at(&self, now: i64) -> crate::Result<Vec<Offering>> {
        let program = *self.lockup_program().program_id();
        let accounts = self.reader().get_program_accounts(&program).await?;

        let states = accounts
            .into_iter()
            .filter(|(_, account)| account.data.len() == crate::constants::GSO_STATE_SIZE)
            .filter_map(|(address, account)| match GsoState::decode(&account.data) {
                Ok(state) => Some((address, state)),
                Err(err) => {
                    tracing::warn!(%err, %address, "skipped undecodable state");
                    None
                }
            })
            .filter(|(_, state)| !self.is_excluded_name(&state.so_name))
            .filter(|(_, state)| self.options().include_closed || state.is_open_at(now))
            .collect::<Vec<_>>();
        tracing::debug!(open = states.len(), "enumerated lockups");

        let offerings = join_all(states.into_iter().map(|(address, state)| async move {
            let so_name = state.so_name.clone();
            match self.offering(address, state, now).await {
                Ok(offering) => Some(offering),
                Err(err) => {
                    tracing::warn!(%err, %so_name, "skipped offering");
                    None
                }
            }
        }))
        .await;

        Ok(offerings.into_iter().flatten().collect())
    }

    async fn offering_details(&self, so_name: &str) -> crate::Result<Option<Offering>> {
        Ok(self
            .offerings()
            .await?
            .into_iter()
            .find(|offering| offering.so_name == so_name))
    }
}
