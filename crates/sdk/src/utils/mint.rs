use anchor_lang::AccountDeserialize;
use anchor_spl::token_interface::Mint;
use solana_sdk::pubkey::Pubkey;

use crate::{constants::KNOWN_TOKENS, programs::AccountReader};

use super::QueryCache;

/// Fetch the decimals of `mint`. Supports both SPL Token and Token-2022 mints.
pub async fn fetch_mint_decimals<R: AccountReader + ?Sized>(
    reader: &R,
    mint: &Pubkey,
) -> crate::Result<u8> {
    let account = reader
        .get_multiple_accounts(&[*mint])
        .await?
        .into_iter()
        .next()
        .flatten()
        .ok_or_else(|| crate::Error::account_not_found("mint", mint))?;
    let decoded = Mint::try_deserialize(&mut account.data.as_slice())?;
    Ok(decoded.decimals)
}

/// Mint decimals memoised by mint address.
///
/// Decimals never change for a given mint, so entries are kept for the
/// lifetime of the cache.
#[derive(Debug)]
pub struct MintDecimals {
    cache: QueryCache<Pubkey, u8>,
}

impl Default for MintDecimals {
    fn default() -> Self {
        Self {
            cache: QueryCache::with_entries(
                KNOWN_TOKENS
                    .iter()
                    .map(|token| (token.mint, token.decimals)),
            ),
        }
    }
}

impl MintDecimals {
    /// Create an empty cache, without the well-known tokens.
    pub fn empty() -> Self {
        Self {
            cache: QueryCache::default(),
        }
    }

    /// Get the decimals of `mint`, fetching them on a cache miss.
    pub async fn decimals<R: AccountReader + ?Sized>(
        &self,
        reader: &R,
        mint: &Pubkey,
    ) -> crate::Result<u8> {
        self.cache
            .get_or_try_insert_with(*mint, || fetch_mint_decimals(reader, mint))
            .await
    }

    /// Get the underlying cache.
    pub fn cache(&self) -> &QueryCache<Pubkey, u8> {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use solana_sdk::account::Account;

    use crate::{constants::USDC_MINT_MAINNET, utils::test::setup_fmt_tracing};

    use super::*;

    const MINT_LEN: usize = 82;
    const MINT_DECIMALS_OFFSET: usize = 44;
    const MINT_IS_INITIALIZED_OFFSET: usize = 45;

    struct MintReader {
        decimals: u8,
        calls: AtomicUsize,
    }

    impl AccountReader for MintReader {
        async fn get_program_accounts(
            &self,
            _program: &Pubkey,
        ) -> crate::Result<Vec<(Pubkey, Account)>> {
            Ok(vec![])
        }

        async fn get_multiple_accounts(
            &self,
            addresses: &[Pubkey],
        ) -> crate::Result<Vec<Option<Account>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut data = vec![0u8; MINT_LEN];
            data[MINT_DECIMALS_OFFSET] = self.decimals;
            data[MINT_IS_INITIALIZED_OFFSET] = 1;
            Ok(addresses
                .iter()
                .map(|_| {
                    Some(Account {
                        data: data.clone(),
                        ..Default::default()
                    })
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn decimals_are_fetched_once() -> crate::Result<()> {
        setup_fmt_tracing("info");
        let reader = MintReader {
            decimals: 8,
            calls: AtomicUsize::new(0),
        };
        let mints = MintDecimals::default();
        let mint = Pubkey::new_unique();

        assert_eq!(mints.decimals(&reader, &mint).await?, 8);
        assert_eq!(mints.decimals(&reader, &mint).await?, 8);
        assert_eq!(reader.calls.load(Ordering::SeqCst), 1);

        // Well-known tokens never hit the reader.
        assert_eq!(mints.decimals(&reader, &USDC_MINT_MAINNET).await?, 6);
        assert_eq!(reader.calls.load(Ordering::SeqCst), 1);
        assert!(MintDecimals::empty().cache().is_empty());
        Ok(())
    }
}
