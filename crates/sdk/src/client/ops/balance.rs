use std::future::Future;

use anchor_spl::associated_token::get_associated_token_address;
use futures_util::future::join_all;
use solana_sdk::pubkey::Pubkey;

use crate::{
    constants::GSO_NAME_PREFIX,
    decode::{GsoState, SoState},
    format,
    position::{PositionKind, PositionRecord},
    programs::{AccountReader, LockupProgram, OptionProgram},
    utils::{get_multiple_accounts_batched, token_amount},
    Client,
};

/// Operations for reconciling the positions held by an owner.
pub trait BalanceOps {
    /// Reconcile the positions of `kind` held by `owner`, at the current time.
    fn reconcile(
        &self,
        kind: PositionKind,
        owner: &Pubkey,
    ) -> impl Future<Output = crate::Result<Vec<PositionRecord>>>;

    /// Reconcile the positions of `kind` held by `owner`, as of the unix timestamp `now`.
    ///
    /// Failing to enumerate the program accounts or to fetch the balances
    /// fails the call. Failing to resolve a single position only drops that
    /// position.
    fn reconcile_at(
        &self,
        kind: PositionKind,
        owner: &Pubkey,
        now: i64,
    ) -> impl Future<Output = crate::Result<Vec<PositionRecord>>>;

    /// Reconcile the positions of every kind, lockups first.
    fn reconcile_all(
        &self,
        owner: &Pubkey,
    ) -> impl Future<Output = crate::Result<Vec<PositionRecord>>>;

    /// Find the position named `so_name`.
    fn details(
        &self,
        kind: PositionKind,
        owner: &Pubkey,
        so_name: &str,
    ) -> impl Future<Output = crate::Result<Option<PositionRecord>>>;
}

/// A state account whose token the owner may hold.
#[derive(Debug)]
enum Candidate {
    Lockup {
        address: Pubkey,
        state: GsoState,
        token_mint: Pubkey,
    },
    StakingOption {
        address: Pubkey,
        state: SoState,
        token_mint: Pubkey,
        strike: u64,
    },
}

impl Candidate {
    fn so_name(&self) -> &str {
        match self {
            Self::Lockup { state, .. } => &state.so_name,
            Self::StakingOption { state, .. } => &state.so_name,
        }
    }

    fn token_mint(&self) -> &Pubkey {
        match self {
            Self::Lockup { token_mint, .. } | Self::StakingOption { token_mint, .. } => token_mint,
        }
    }
}

pub(crate) fn current_timestamp() -> crate::Result<i64> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_err(crate::Error::custom)?;
    i64::try_from(now.as_secs()).map_err(crate::Error::custom)
}

pub(crate) fn timestamp(value: u64) -> crate::Result<i64> {
    i64::try_from(value).map_err(crate::Error::custom)
}

impl<R, L, O> Client<R, L, O>
where
    R: AccountReader,
    L: LockupProgram,
    O: OptionProgram,
{
    fn state_program(&self, kind: PositionKind) -> Pubkey {
        match kind {
            PositionKind::Lockup => *self.lockup_program().program_id(),
            PositionKind::StakingOption => *self.option_program().program_id(),
        }
    }

    fn candidate(
        &self,
        kind: PositionKind,
        address: Pubkey,
        data: &[u8],
        now: i64,
    ) -> crate::Result<Option<Candidate>> {
        let candidate = match kind {
            PositionKind::Lockup => {
                let state = GsoState::decode(data)?;
                if self.is_excluded_name(&state.so_name) {
                    return Ok(None);
                }
                Candidate::Lockup {
                    token_mint: self.lockup_program().x_base_mint(&address)?,
                    address,
                    state,
                }
            }
            PositionKind::StakingOption => {
                let state = SoState::decode(data)?;
                if self.is_excluded_name(&state.so_name) {
                    return Ok(None);
                }
                // Only the first strike of the ladder is tracked.
                let Some(strike) = state.first_strike() else {
                    tracing::debug!(%address, "no strikes");
                    return Ok(None);
                };
                if !self.options().include_expired && state.is_expired_at(now) {
                    return Ok(None);
                }
                let token_mint =
                    self.option_program()
                        .option_mint(strike, &state.so_name, &state.base_mint)?;
                Candidate::StakingOption {
                    address,
                    state,
                    token_mint,
                    strike,
                }
            }
        };
        Ok(Some(candidate))
    }

    async fn token_balance(&self, token_account: &Pubkey) -> crate::Result<u64> {
        let account = self
            .reader()
            .get_multiple_accounts(&[*token_account])
            .await?
            .into_iter()
            .next()
            .flatten();
        Ok(account.as_ref().and_then(token_amount).unwrap_or(0))
    }

    async fn resolve(
        &self,
        owner: &Pubkey,
        candidate: Candidate,
        amount: u64,
        now: i64,
    ) -> crate::Result<Option<PositionRecord>> {
        let record = match candidate {
            Candidate::Lockup {
                address,
                state,
                token_mint,
            } => {
                let so_name = format!("{GSO_NAME_PREFIX}{}", state.so_name);
                let so = self
                    .option_program()
                    .get_state(self.reader(), &so_name, &state.base_mint)
                    .await?;
                let option_mint =
                    self.option_program()
                        .option_mint(state.strike, &so_name, &state.base_mint)?;
                let option_account = get_associated_token_address(owner, &option_mint);
                let ((base_decimals, quote_decimals), token_decimals, option_amount) = futures_util::try_join!(
                    self.decimals_pair(&state.base_mint, &so.quote_mint),
                    self.decimals(&token_mint),
                    self.token_balance(&option_account),
                )?;
                let expiration = timestamp(state.lockup_period_end)?;
                PositionRecord {
                    kind: PositionKind::Lockup,
                    strike_in_usd: format::strike_in_usd(
                        state.strike,
                        so.lot_size,
                        quote_decimals,
                        base_decimals,
                    ),
                    so_name: state.so_name,
                    state: address,
                    base_mint: state.base_mint,
                    quote_mint: so.quote_mint,
                    option_mint,
                    token_mint,
                    base_decimals,
                    quote_decimals,
                    lot_size: so.lot_size,
                    strike: state.strike,
                    expiration,
                    expiration_date: format::expiration_date(expiration)?,
                    time_left: format::time_left(expiration - now),
                    amount,
                    ui_amount: format::ui_amount(amount, token_decimals),
                    option_amount,
                    symbol: symbol(&state.base_mint),
                    #[cfg(metadata)]
                    metadata: None,
                    #[cfg(metadata)]
                    option_metadata: None,
                }
            }
            Candidate::StakingOption {
                address,
                state,
                token_mint,
                strike,
            } => {
                let token_decimals = self.decimals(&token_mint).await?;
                let expiration = timestamp(state.option_expiration)?;
                PositionRecord {
                    kind: PositionKind::StakingOption,
                    strike_in_usd: format::strike_in_usd(
                        strike,
                        state.lot_size,
                        state.quote_decimals,
                        state.base_decimals,
                    ),
                    state: address,
                    base_mint: state.base_mint,
                    quote_mint: state.quote_mint,
                    option_mint: token_mint,
                    token_mint,
                    base_decimals: state.base_decimals,
                    quote_decimals: state.quote_decimals,
                    lot_size: state.lot_size,
                    strike,
                    expiration,
                    expiration_date: format::expiration_date(expiration)?,
                    time_left: format::time_left(expiration - now),
                    amount,
                    ui_amount: format::ui_amount(amount, token_decimals),
                    option_amount: 0,
                    symbol: symbol(&state.base_mint),
                    #[cfg(metadata)]
                    metadata: None,
                    #[cfg(metadata)]
                    option_metadata: None,
                    so_name: state.so_name,
                }
            }
        };

        if !(record.strike_in_usd.is_finite() && record.strike_in_usd > 0.0) {
            tracing::debug!(so_name = %record.so_name, strike = record.strike, "invalid strike");
            return Ok(None);
        }
        Ok(Some(record))
    }
}

fn symbol(mint: &Pubkey) -> Option<String> {
    crate::constants::known_token(mint).map(|token| token.symbol.to_string())
}

impl<R, L, O> BalanceOps for Client<R, L, O>
where
    R: AccountReader,
    L: LockupProgram,
    O: OptionProgram,
{
    async fn reconcile(
        &self,
        kind: PositionKind,
        owner: &Pubkey,
    ) -> crate::Result<Vec<PositionRecord>> {
        self.reconcile_at(kind, owner, current_timestamp()?).await
    }

    async fn reconcile_at(
        &self,
        kind: PositionKind,
        owner: &Pubkey,
        now: i64,
    ) -> crate::Result<Vec<PositionRecord>> {
        let program = self.state_program(kind);
        let accounts = self.reader().get_program_accounts(&program).await?;
        let total = accounts.len();

        let candidates = accounts
            .into_iter()
            .filter(|(_, account)| account.data.len() == kind.state_size())
            .filter_map(
                |(address, account)| match self.candidate(kind, address, &account.data, now) {
                    Ok(candidate) => candidate,
                    Err(err) => {
                        tracing::warn!(%err, %address, "skipped undecodable state");
                        None
                    }
                },
            )
            .collect::<Vec<_>>();
        tracing::debug!(%kind, total, candidates = candidates.len(), "enumerated states");

        let token_accounts = candidates
            .iter()
            .map(|candidate| get_associated_token_address(owner, candidate.token_mint()))
            .collect::<Vec<_>>();
        let balances = get_multiple_accounts_batched(self.reader(), &token_accounts).await?;

        let held = candidates
            .into_iter()
            .zip(balances)
            .filter_map(|(candidate, account)| {
                let amount = account.as_ref().and_then(token_amount).unwrap_or(0);
                (amount != 0).then_some((candidate, amount))
            })
            .collect::<Vec<_>>();
        tracing::debug!(%kind, held = held.len(), "fetched balances");

        let records = join_all(held.into_iter().map(|(candidate, amount)| async move {
            let so_name = candidate.so_name().to_string();
            match self.resolve(owner, candidate, amount, now).await {
                Ok(record) => record,
                Err(err) => {
                    tracing::warn!(%err, %so_name, "skipped position");
                    None
                }
            }
        }))
        .await;

        Ok(records.into_iter().flatten().collect())
    }

    async fn reconcile_all(&self, owner: &Pubkey) -> crate::Result<Vec<PositionRecord>> {
        let now = current_timestamp()?;
        let (mut lockups, options) = futures_util::try_join!(
            self.reconcile_at(PositionKind::Lockup, owner, now),
            self.reconcile_at(PositionKind::StakingOption, owner, now),
        )?;
        lockups.extend(options);
        Ok(lockups)
    }

    async fn details(
        &self,
        kind: PositionKind,
        owner: &Pubkey,
        so_name: &str,
    ) -> crate::Result<Option<PositionRecord>> {
        Ok(self
            .reconcile(kind, owner)
            .await?
            .into_iter()
            .find(|record| record.so_name == so_name))
    }
}
