use solana_sdk::pubkey::Pubkey;
use typed_builder::TypedBuilder;

use crate::{
    programs::{AccountReader, Gso, LockupProgram, OptionProgram, StakingOptions},
    utils::MintDecimals,
};

/// Program IDs.
pub mod program_ids;

/// Client operations.
pub mod ops;

/// Options for [`Client`].
#[derive(Debug, Clone, TypedBuilder)]
#[cfg_attr(serde, derive(serde::Serialize, serde::Deserialize))]
pub struct ClientOptions {
    /// Whether to keep staking options that have already expired.
    #[builder(default)]
    pub include_expired: bool,
    /// Whether to drop entries whose name contains `test` or `trial`.
    #[builder(default = true)]
    pub skip_test_names: bool,
    /// Whether to keep lockups whose subscription period has ended.
    #[builder(default)]
    pub include_closed: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Read-only client for the lockup and option programs.
pub struct Client<R, L = Gso, O = StakingOptions> {
    reader: R,
    lockup: L,
    options_program: O,
    mints: MintDecimals,
    options: ClientOptions,
}

impl<R: AccountReader> Client<R> {
    /// Create a client for the mainnet programs.
    pub fn new(reader: R) -> Self {
        Self::with_programs(reader, Gso::default(), StakingOptions::default())
    }
}

impl<R, L, O> Client<R, L, O>
where
    R: AccountReader,
    L: LockupProgram,
    O: OptionProgram,
{
    /// Create a client with the given programs.
    pub fn with_programs(reader: R, lockup: L, options_program: O) -> Self {
        Self {
            reader,
            lockup,
            options_program,
            mints: MintDecimals::default(),
            options: ClientOptions::default(),
        }
    }

    /// Replace the client options.
    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Get the account reader.
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Get the lockup program.
    pub fn lockup_program(&self) -> &L {
        &self.lockup
    }

    /// Get the option program.
    pub fn option_program(&self) -> &O {
        &self.options_program
    }

    /// Get the client options.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Get the decimals of the given mint.
    pub async fn decimals(&self, mint: &Pubkey) -> crate::Result<u8> {
        self.mints.decimals(&self.reader, mint).await
    }

    /// Get the decimals of two mints concurrently.
    pub async fn decimals_pair(&self, base: &Pubkey, quote: &Pubkey) -> crate::Result<(u8, u8)> {
        futures_util::try_join!(self.decimals(base), self.decimals(quote))
    }

    /// Whether an entry named `name` should be dropped.
    pub(crate) fn is_excluded_name(&self, name: &str) -> bool {
        self.options.skip_test_names && crate::position::is_test_name(name)
    }

    /// Get the full account of the given address.
    pub async fn account(&self, address: &Pubkey) -> crate::Result<solana_sdk::account::Account> {
        self.reader
            .get_multiple_accounts(&[*address])
            .await?
            .into_iter()
            .next()
            .flatten()
            .ok_or_else(|| crate::Error::account_not_found("requested", address))
    }
}

impl<R, L, O> std::fmt::Debug for Client<R, L, O>
where
    L: LockupProgram,
    O: OptionProgram,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("lockup_program", self.lockup.program_id())
            .field("option_program", self.options_program.program_id())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
