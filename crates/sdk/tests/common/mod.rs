#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use anchor_spl::associated_token::get_associated_token_address;
use dual_sdk::{
    constants::{GSO_NAME_PREFIX, USDC_MINT_MAINNET},
    decode::{GsoState, SoState},
    programs::{AccountReader, Gso, LockupProgram, OptionProgram, StakingOptions},
    solana_sdk::{account::Account, pubkey::Pubkey},
};

pub const NOW: i64 = 1_700_000_000;
pub const DAY: u64 = 86_400;

const MINT_LEN: usize = 82;
const TOKEN_ACCOUNT_LEN: usize = 165;

/// An in-memory chain.
#[derive(Default)]
pub struct MockChain {
    pub gso: Gso,
    pub staking_options: StakingOptions,
    accounts: HashMap<Pubkey, Account>,
    program_accounts: HashMap<Pubkey, Vec<(Pubkey, Account)>>,
    failing: HashMap<Pubkey, String>,
    pub fail_program_accounts: AtomicBool,
    pub batches: Mutex<Vec<usize>>,
}

impl AccountReader for MockChain {
    async fn get_program_accounts(
        &self,
        program: &Pubkey,
    ) -> dual_sdk::Result<Vec<(Pubkey, Account)>> {
        if self.fail_program_accounts.load(Ordering::SeqCst) {
            return Err(dual_sdk::Error::custom("rpc unavailable"));
        }
        Ok(self
            .program_accounts
            .get(program)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> dual_sdk::Result<Vec<Option<Account>>> {
        assert!(addresses.len() <= 100, "too many addresses in one request");
        self.batches.lock().unwrap().push(addresses.len());
        addresses
            .iter()
            .map(|address| match self.failing.get(address) {
                Some(msg) => Err(dual_sdk::Error::custom(msg)),
                None => Ok(self.accounts.get(address).cloned()),
            })
            .collect()
    }
}

pub fn mint_account(decimals: u8) -> Account {
    let mut data = vec![0u8; MINT_LEN];
    data[44] = decimals;
    data[45] = 1;
    Account {
        data,
        owner: anchor_spl::token::ID,
        ..Default::default()
    }
}

pub fn token_account(mint: &Pubkey, owner: &Pubkey, amount: u64) -> Account {
    let mut data = vec![0u8; TOKEN_ACCOUNT_LEN];
    data[..32].copy_from_slice(mint.as_ref());
    data[32..64].copy_from_slice(owner.as_ref());
    data[64..72].copy_from_slice(&amount.to_le_bytes());
    data[108] = 1;
    Account {
        data,
        owner: anchor_spl::token::ID,
        ..Default::default()
    }
}

pub fn so_state(so_name: &str, base_mint: Pubkey, strikes: Vec<u64>, expiration: u64) -> SoState {
    SoState {
        so_name: so_name.to_string(),
        authority: Pubkey::new_unique(),
        options_available: 1_000_000,
        option_expiration: expiration,
        subscription_period_end: expiration,
        base_decimals: 5,
        quote_decimals: 6,
        base_mint,
        quote_mint: USDC_MINT_MAINNET,
        quote_account: Pubkey::new_unique(),
        lot_size: 1_000_000,
        state_bump: 255,
        vault_bump: 254,
        strikes,
    }
}

pub fn gso_state(so_name: &str, base_mint: Pubkey, strike: u64, end: u64) -> GsoState {
    GsoState {
        period_num: 1,
        subscription_period_end: end,
        lockup_ratio_tokens_per_million: 2_500_000,
        gso_state_bump: 255,
        so_authority_bump: 254,
        x_base_mint_bump: 253,
        base_vault_bump: 252,
        strike,
        so_name: so_name.to_string(),
        staking_options_state: Pubkey::new_unique(),
        authority: Pubkey::new_unique(),
        base_mint,
        lockup_period_end: end + 30 * DAY,
    }
}

impl MockChain {
    pub fn insert(&mut self, address: Pubkey, account: Account) {
        self.accounts.insert(address, account);
    }

    /// Make reads of `address` fail.
    pub fn fail(&mut self, address: Pubkey, msg: &str) {
        self.failing.insert(address, msg.to_string());
    }

    pub fn add_program_account(&mut self, program: Pubkey, address: Pubkey, account: Account) {
        self.program_accounts
            .entry(program)
            .or_default()
            .push((address, account));
    }

    pub fn batches(&self) -> Vec<usize> {
        self.batches.lock().unwrap().clone()
    }

    pub fn reset_batches(&self) {
        self.batches.lock().unwrap().clear();
    }

    /// Add a staking options state, its option mint and the `owner`'s option balance.
    pub fn add_staking_options(
        &mut self,
        state: &SoState,
        owner: &Pubkey,
        amount: Option<u64>,
    ) -> eyre::Result<Pubkey> {
        let address = self
            .staking_options
            .state_address(&state.so_name, &state.base_mint)?;
        let data = state.to_account_data()?;
        let account = Account {
            data,
            owner: *self.staking_options.program_id(),
            ..Default::default()
        };
        self.insert(address, account.clone());
        self.add_program_account(*self.staking_options.program_id(), address, account);

        if let Some(strike) = state.strikes.first() {
            let option_mint =
                self.staking_options
                    .option_mint(*strike, &state.so_name, &state.base_mint)?;
            self.insert(option_mint, mint_account(0));
            if let Some(amount) = amount {
                let ata = get_associated_token_address(owner, &option_mint);
                self.insert(ata, token_account(&option_mint, owner, amount));
            }
        }
        Ok(address)
    }

    /// Add a lockup with its xBase mint, the `owner`'s xBase balance and the
    /// backing staking options state.
    pub fn add_lockup(
        &mut self,
        state: &GsoState,
        owner: &Pubkey,
        amount: u64,
        expiration: u64,
    ) -> eyre::Result<Pubkey> {
        let address = Pubkey::new_unique();
        let account = Account {
            data: state.to_bytes()?,
            owner: *self.gso.program_id(),
            ..Default::default()
        };
        self.add_program_account(*self.gso.program_id(), address, account);

        let x_base_mint = self.gso.x_base_mint(&address)?;
        self.insert(x_base_mint, mint_account(5));
        let ata = get_associated_token_address(owner, &x_base_mint);
        self.insert(ata, token_account(&x_base_mint, owner, amount));

        self.insert(state.base_mint, mint_account(5));
        let so_name = format!("{GSO_NAME_PREFIX}{}", state.so_name);
        // The lockup strike is not the first of the ladder.
        let so = so_state(
            &so_name,
            state.base_mint,
            vec![state.strike + 1, state.strike],
            expiration,
        );
        let so_address = self.staking_options.state_address(&so_name, &so.base_mint)?;
        self.insert(
            so_address,
            Account {
                data: so.to_account_data()?,
                owner: *self.staking_options.program_id(),
                ..Default::default()
            },
        );
        Ok(address)
    }

    /// Give the `owner` a balance of the option token of the lockup.
    pub fn add_lockup_option_balance(
        &mut self,
        state: &GsoState,
        owner: &Pubkey,
        amount: u64,
    ) -> eyre::Result<Pubkey> {
        let so_name = format!("{GSO_NAME_PREFIX}{}", state.so_name);
        let option_mint =
            self.staking_options
                .option_mint(state.strike, &so_name, &state.base_mint)?;
        self.insert(option_mint, mint_account(0));
        let ata = get_associated_token_address(owner, &option_mint);
        self.insert(ata, token_account(&option_mint, owner, amount));
        Ok(option_mint)
    }
}
