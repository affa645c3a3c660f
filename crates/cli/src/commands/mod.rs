use balance::Balance;
use details::Details;
use dual_sdk::{
    metadata::HttpMetadataSource,
    programs::{Gso as GsoProgram, StakingOptions},
    solana_utils::client_traits::{GenericRpcClient, GenericRpcClientConfig, HttpRpcSender},
    Client, ClientOptions,
};
use enum_dispatch::enum_dispatch;
use gso::Gso;
use inspect::Inspect;

use crate::config::Config;

mod balance;
mod details;
mod gso;
mod inspect;
mod utils;

/// Commands.
#[enum_dispatch(Command)]
#[derive(Debug, clap::Subcommand)]
pub(crate) enum Commands {
    /// List lockups open for staking.
    Gso(Gso),
    /// List the positions held by an owner.
    Balance(Balance),
    /// Show a single position held by an owner.
    Details(Details),
    /// Decode a lockup or staking options state account.
    Inspect(Inspect),
}

#[enum_dispatch]
pub(crate) trait Command {
    async fn execute(&self, ctx: Context<'_>) -> eyre::Result<()>;
}

pub(crate) struct Context<'a> {
    config: &'a Config,
    client: &'a CommandClient,
}

impl<'a> Context<'a> {
    pub(crate) fn new(config: &'a Config, client: &'a CommandClient) -> Self {
        Self { config, client }
    }

    pub(crate) fn config(&self) -> &Config {
        self.config
    }

    pub(crate) fn client(&self) -> &CommandClient {
        self.client
    }

    /// Metadata source sharing the RPC client and request timeout.
    pub(crate) fn metadata_source(&self) -> eyre::Result<HttpMetadataSource<&'a RpcClient>> {
        Ok(HttpMetadataSource::with_timeout(
            self.client.rpc(),
            self.config.timeout()?,
        )?)
    }
}

pub(crate) type RpcClient = GenericRpcClient<HttpRpcSender>;

pub(crate) struct CommandClient {
    rpc: RpcClient,
    gso: GsoProgram,
    staking_options: StakingOptions,
}

impl CommandClient {
    pub(crate) fn new(config: &Config) -> eyre::Result<Self> {
        let sender = HttpRpcSender::new(config.cluster().url()).with_timeout(config.timeout()?);
        let rpc = GenericRpcClient::new_with_sender_and_config(
            sender,
            GenericRpcClientConfig {
                commitment_config: config.commitment(),
            },
        );
        Ok(Self {
            rpc,
            gso: config.gso_program(),
            staking_options: config.staking_options_program(),
        })
    }

    pub(crate) fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    pub(crate) fn client(
        &self,
        options: ClientOptions,
    ) -> Client<&RpcClient, &GsoProgram, &StakingOptions> {
        Client::with_programs(&self.rpc, &self.gso, &self.staking_options).with_options(options)
    }
}
