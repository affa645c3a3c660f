use std::future::Future;

use dual_solana_utils::client_traits::{RpcClient, RpcClientExt};
use solana_sdk::{account::Account, pubkey::Pubkey};

/// GSO (lockup) program.
pub mod gso;

/// Staking options program.
pub mod staking_options;

pub use self::{
    gso::{Gso, LockupProgram},
    staking_options::{OptionProgram, StakingOptions},
};

/// Read-only access to chain accounts.
///
/// Implemented for every [`RpcClient`].
pub trait AccountReader {
    /// Get all accounts owned by `program`.
    fn get_program_accounts(
        &self,
        program: &Pubkey,
    ) -> impl Future<Output = crate::Result<Vec<(Pubkey, Account)>>>;

    /// Get multiple accounts in one request, `None` for missing accounts.
    ///
    /// Callers must not pass more than
    /// [`MAX_MULTIPLE_ACCOUNTS`](crate::constants::MAX_MULTIPLE_ACCOUNTS)
    /// addresses; see [`get_multiple_accounts_batched`](crate::utils::batch::get_multiple_accounts_batched).
    fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> impl Future<Output = crate::Result<Vec<Option<Account>>>>;
}

impl<C: RpcClient> AccountReader for C {
    async fn get_program_accounts(&self, program: &Pubkey) -> crate::Result<Vec<(Pubkey, Account)>> {
        let accounts = self
            .get_program_accounts_with_slot(program, Default::default())
            .await?;
        tracing::debug!(%program, slot = accounts.slot(), "fetched program accounts");
        Ok(accounts.into_value())
    }

    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> crate::Result<Vec<Option<Account>>> {
        Ok(self
            .get_multiple_accounts_with_slot(addresses, Default::default())
            .await?
            .into_value())
    }
}

pub(crate) fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> crate::Result<Pubkey> {
    Pubkey::try_find_program_address(seeds, program_id)
        .map(|(address, _)| address)
        .ok_or_else(|| crate::Error::custom("unable to find a viable program address"))
}
