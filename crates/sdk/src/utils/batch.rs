use futures_util::future::try_join_all;
use solana_sdk::{account::Account, pubkey::Pubkey};

use crate::{constants::MAX_MULTIPLE_ACCOUNTS, programs::AccountReader};

/// Get multiple accounts, splitting `addresses` into batches of at most
/// [`MAX_MULTIPLE_ACCOUNTS`].
///
/// Batches are requested concurrently and the results are returned in the
/// order of `addresses`. Any failed batch fails the whole call.
pub async fn get_multiple_accounts_batched<R: AccountReader + ?Sized>(
    reader: &R,
    addresses: &[Pubkey],
) -> crate::Result<Vec<Option<Account>>> {
    if addresses.is_empty() {
        return Ok(vec![]);
    }
    let batches = addresses.chunks(MAX_MULTIPLE_ACCOUNTS);
    tracing::debug!(
        total = addresses.len(),
        batches = batches.len(),
        "fetching accounts in batches"
    );
    let results = try_join_all(batches.map(|batch| async move {
        let accounts = reader.get_multiple_accounts(batch).await?;
        if accounts.len() != batch.len() {
            return Err(crate::Error::custom(format!(
                "expected {} accounts, got {}",
                batch.len(),
                accounts.len()
            )));
        }
        Ok(accounts)
    }))
    .await?;
    Ok(results.into_iter().flatten().collect())
}
