//! RPC client traits.

use std::future::Future;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use solana_account_decoder_client_types::{UiAccount, UiAccountEncoding};
use solana_rpc_client_api::{
    client_error::Error as ClientError,
    config, filter,
    request::{RpcError, RpcRequest},
    response::{self, Response},
};
use solana_sdk::{account::Account, commitment_config::CommitmentConfig, pubkey::Pubkey};

use crate::utils::WithSlot;

pub mod generic;

/// A RPC client.
pub trait RpcClient {
    /// Returns the configured default commitment level.
    fn commitment(&self) -> CommitmentConfig;

    /// Send an [`RpcRequest`] with parameters.
    fn send<T>(
        &self,
        request: RpcRequest,
        params: impl Serialize,
    ) -> impl Future<Output = crate::Result<T>>
    where
        T: DeserializeOwned;
}

impl<C: RpcClient + ?Sized> RpcClient for &C {
    fn commitment(&self) -> CommitmentConfig {
        (**self).commitment()
    }

    fn send<T>(
        &self,
        request: RpcRequest,
        params: impl Serialize,
    ) -> impl Future<Output = crate::Result<T>>
    where
        T: DeserializeOwned,
    {
        (**self).send(request, params)
    }
}

/// A trait that extends [`RpcClient`] with RPC methods.
pub trait RpcClientExt: RpcClient {
    /// Get account info for `pubkey`, including the context slot.
    /// Returns `None` if the account does not exist.
    fn get_optional_account_with_slot(
        &self,
        address: &Pubkey,
        mut config: config::RpcAccountInfoConfig,
    ) -> impl Future<Output = crate::Result<WithSlot<Option<Account>>>> {
        config.encoding = Some(config.encoding.unwrap_or(UiAccountEncoding::Base64));
        let commitment = config.commitment.unwrap_or_else(|| self.commitment());
        config.commitment = Some(commitment);
        tracing::trace!(%address, ?config, "fetching account with config");
        async move {
            let res = self
                .send::<Response<Option<UiAccount>>>(
                    RpcRequest::GetAccountInfo,
                    json!([address.to_string(), config]),
                )
                .await?;
            Ok(WithSlot::new(res.context.slot, res.value)
                .map(|value| value.and_then(|a| a.decode::<Account>())))
        }
    }

    /// Get account info for `pubkey`.
    /// Returns `Err` if the account does not exist.
    fn get_account(
        &self,
        address: &Pubkey,
        config: config::RpcAccountInfoConfig,
    ) -> impl Future<Output = crate::Result<Account>> {
        async move {
            self.get_optional_account_with_slot(address, config)
                .await?
                .into_value()
                .ok_or(crate::Error::AccountNotFound(*address))
        }
    }

    /// Get multiple accounts in a single request, including the context slot.
    ///
    /// The result has the same length and order as `addresses`, with `None`
    /// for accounts that do not exist. RPC nodes usually reject requests with
    /// more than 100 addresses, batching is left to the caller.
    fn get_multiple_accounts_with_slot(
        &self,
        addresses: &[Pubkey],
        mut config: config::RpcAccountInfoConfig,
    ) -> impl Future<Output = crate::Result<WithSlot<Vec<Option<Account>>>>> {
        config.encoding = Some(config.encoding.unwrap_or(UiAccountEncoding::Base64));
        let commitment = config.commitment.unwrap_or_else(|| self.commitment());
        config.commitment = Some(commitment);
        let keys = addresses
            .iter()
            .map(|address| address.to_string())
            .collect::<Vec<_>>();
        tracing::trace!(len = keys.len(), ?config, "fetching multiple accounts");
        async move {
            let res = self
                .send::<Response<Vec<Option<UiAccount>>>>(
                    RpcRequest::GetMultipleAccounts,
                    json!([keys, config]),
                )
                .await?;
            if res.value.len() != keys.len() {
                return Err(crate::Error::custom(format!(
                    "getMultipleAccounts returned {} accounts for {} keys",
                    res.value.len(),
                    keys.len()
                )));
            }
            Ok(WithSlot::new(res.context.slot, res.value).map(|accounts| {
                accounts
                    .into_iter()
                    .map(|account| account.and_then(|a| a.decode::<Account>()))
                    .collect()
            }))
        }
    }

    /// Get program accounts with slot.
    fn get_program_accounts_with_slot(
        &self,
        program: &Pubkey,
        mut config: RpcProgramAccountsConfig,
    ) -> impl Future<Output = crate::Result<WithSlot<Vec<(Pubkey, Account)>>>> {
        let commitment = config
            .account_config
            .commitment
            .unwrap_or_else(|| self.commitment());
        config.account_config.commitment = Some(commitment);
        config.account_config.encoding = Some(
            config
                .account_config
                .encoding
                .unwrap_or(UiAccountEncoding::Base64),
        );
        let config = config::RpcProgramAccountsConfig {
            filters: config.filters,
            account_config: config.account_config,
            with_context: Some(true),
            sort_results: None,
        };
        tracing::trace!(%program, ?config, "fetching program accounts");
        async move {
            let res = self
                .send::<Response<Vec<response::RpcKeyedAccount>>>(
                    RpcRequest::GetProgramAccounts,
                    json!([program.to_string(), config]),
                )
                .await?;
            WithSlot::new(res.context.slot, res.value)
                .map(|accounts| parse_keyed_accounts(accounts, RpcRequest::GetProgramAccounts))
                .transpose()
        }
    }
}

impl<C: RpcClient + ?Sized> RpcClientExt for C {}

/// Configuration for program accounts.
#[derive(Debug, Default)]
pub struct RpcProgramAccountsConfig {
    /// Filters.
    pub filters: Option<Vec<filter::RpcFilterType>>,
    /// Account Config.
    pub account_config: config::RpcAccountInfoConfig,
}

fn parse_keyed_accounts(
    accounts: Vec<response::RpcKeyedAccount>,
    request: RpcRequest,
) -> crate::Result<Vec<(Pubkey, Account)>> {
    let mut pubkey_accounts: Vec<(Pubkey, Account)> = Vec::with_capacity(accounts.len());
    for response::RpcKeyedAccount { pubkey, account } in accounts.into_iter() {
        let pubkey = pubkey.parse().map_err(|_| {
            ClientError::new_with_request(
                RpcError::ParseError("Pubkey".to_string()).into(),
                request,
            )
        })?;
        pubkey_accounts.push((
            pubkey,
            account.decode().ok_or_else(|| {
                ClientError::new_with_request(
                    RpcError::ParseError("Account from rpc".to_string()).into(),
                    request,
                )
            })?,
        ));
    }
    Ok(pubkey_accounts)
}
