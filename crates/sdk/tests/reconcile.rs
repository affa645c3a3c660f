mod common;

use std::sync::atomic::Ordering;

use common::{gso_state, so_state, MockChain, DAY, NOW};
use dual_sdk::{
    constants::GSO_NAME_PREFIX,
    ops::BalanceOps,
    position::PositionKind,
    programs::OptionProgram,
    solana_sdk::pubkey::Pubkey,
    Client, ClientOptions,
};

const FUTURE: u64 = NOW as u64 + 10 * DAY;
/// Year 2096, for calls that use the system clock.
const FAR_FUTURE: u64 = 4_000_000_000;

fn client(chain: MockChain) -> Client<MockChain> {
    Client::new(chain)
}

#[tokio::test]
async fn lockup_positions_are_reconciled() -> eyre::Result<()> {
    let owner = Pubkey::new_unique();
    let base = Pubkey::new_unique();
    let mut chain = MockChain::default();
    let state = gso_state("BONK_LOYALTY_11", base, 25, FUTURE);
    let address = chain.add_lockup(&state, &owner, 300_000, FUTURE + 60 * DAY)?;
    let option_mint = chain.add_lockup_option_balance(&state, &owner, 7_000)?;
    // Holdings of another owner are not counted.
    chain.add_lockup_option_balance(&state, &Pubkey::new_unique(), 9)?;

    let client = client(chain);
    let records = client
        .reconcile_at(PositionKind::Lockup, &owner, NOW)
        .await?;
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.kind, PositionKind::Lockup);
    assert_eq!(record.so_name, "BONK_LOYALTY_11");
    assert_eq!(record.state, address);
    assert_eq!(record.amount, 300_000);
    assert_eq!(record.ui_amount, 3.0);
    assert_eq!(record.option_amount, 7_000);
    assert_eq!(record.lot_size, 1_000_000);
    assert_eq!(record.base_decimals, 5);
    assert_eq!(record.quote_decimals, 6);
    assert_eq!(record.expiration, state.lockup_period_end as i64);
    assert_eq!(record.time_left, "40d 0h 0m");
    assert!((record.strike_in_usd - 0.0000025).abs() < 1e-12);
    assert_eq!(record.option_mint, option_mint);
    assert_eq!(
        record.option_mint,
        client.option_program().option_mint(
            25,
            &format!("{GSO_NAME_PREFIX}BONK_LOYALTY_11"),
            &base
        )?
    );
    Ok(())
}

#[tokio::test]
async fn test_and_trial_names_are_excluded() -> eyre::Result<()> {
    let owner = Pubkey::new_unique();
    let mut chain = MockChain::default();
    for name in ["GSOBONK_test_1", "GSOBONK_LOYALTY_11", "DUAL_Trial"] {
        let state = gso_state(name, Pubkey::new_unique(), 25, FUTURE);
        chain.add_lockup(&state, &owner, 100, FUTURE)?;
    }

    let client = client(chain);
    let names = client
        .reconcile_at(PositionKind::Lockup, &owner, NOW)
        .await?
        .into_iter()
        .map(|record| record.so_name)
        .collect::<Vec<_>>();
    assert_eq!(names, ["GSOBONK_LOYALTY_11"]);

    let client = client.with_options(ClientOptions::builder().skip_test_names(false).build());
    let records = client
        .reconcile_at(PositionKind::Lockup, &owner, NOW)
        .await?;
    assert_eq!(records.len(), 3);
    Ok(())
}

#[tokio::test]
async fn zero_balances_are_excluded() -> eyre::Result<()> {
    let owner = Pubkey::new_unique();
    let mut chain = MockChain::default();
    chain.add_lockup(
        &gso_state("EMPTY", Pubkey::new_unique(), 25, FUTURE),
        &owner,
        0,
        FUTURE,
    )?;
    chain.add_lockup(
        &gso_state("HELD", Pubkey::new_unique(), 25, FUTURE),
        &owner,
        1,
        FUTURE,
    )?;

    let records = client(chain)
        .reconcile_at(PositionKind::Lockup, &owner, NOW)
        .await?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].so_name, "HELD");
    assert_eq!(records[0].option_amount, 0);
    Ok(())
}

#[tokio::test]
async fn failed_lookup_only_drops_its_entry() -> eyre::Result<()> {
    let owner = Pubkey::new_unique();
    let mut chain = MockChain::default();
    let broken = gso_state("BROKEN", Pubkey::new_unique(), 25, FUTURE);
    chain.add_lockup(&broken, &owner, 10, FUTURE)?;
    chain.add_lockup(
        &gso_state("HEALTHY", Pubkey::new_unique(), 25, FUTURE),
        &owner,
        10,
        FUTURE,
    )?;
    let so_address = chain
        .staking_options
        .state_address(&format!("{GSO_NAME_PREFIX}BROKEN"), &broken.base_mint)?;
    chain.fail(so_address, "timed out");

    let records = client(chain)
        .reconcile_at(PositionKind::Lockup, &owner, NOW)
        .await?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].so_name, "HEALTHY");
    Ok(())
}

#[tokio::test]
async fn enumeration_failure_is_fatal() -> eyre::Result<()> {
    let owner = Pubkey::new_unique();
    let mut chain = MockChain::default();
    chain.add_lockup(
        &gso_state("HELD", Pubkey::new_unique(), 25, FUTURE),
        &owner,
        1,
        FUTURE,
    )?;
    chain.fail_program_accounts.store(true, Ordering::SeqCst);

    let client = client(chain);
    assert!(client
        .reconcile_at(PositionKind::Lockup, &owner, NOW)
        .await
        .is_err());
    assert!(client.reconcile_all(&owner).await.is_err());
    Ok(())
}

#[tokio::test]
async fn balances_are_fetched_in_batches() -> eyre::Result<()> {
    let owner = Pubkey::new_unique();
    let base = Pubkey::new_unique();
    let mut chain = MockChain::default();
    for idx in 0..250 {
        let state = gso_state(&format!("LOCKUP_{idx}"), base, 25, FUTURE);
        chain.add_lockup(&state, &owner, 0, FUTURE)?;
    }

    let client = client(chain);
    let records = client
        .reconcile_at(PositionKind::Lockup, &owner, NOW)
        .await?;
    assert!(records.is_empty());

    let mut batches = client.reader().batches();
    batches.sort_unstable();
    assert_eq!(batches, [50, 100, 100]);
    Ok(())
}

#[tokio::test]
async fn staking_options_are_reconciled() -> eyre::Result<()> {
    let owner = Pubkey::new_unique();
    let mut chain = MockChain::default();
    let live = so_state("SO_LIVE", Pubkey::new_unique(), vec![25, 50], FUTURE);
    let live_address = chain.add_staking_options(&live, &owner, Some(7))?;
    let expired = so_state("SO_EXPIRED", Pubkey::new_unique(), vec![25], NOW as u64 - DAY);
    chain.add_staking_options(&expired, &owner, Some(7))?;
    let no_strikes = so_state("SO_EMPTY", Pubkey::new_unique(), vec![], FUTURE);
    chain.add_staking_options(&no_strikes, &owner, None)?;
    let zero_strike = so_state("SO_ZERO", Pubkey::new_unique(), vec![0], FUTURE);
    chain.add_staking_options(&zero_strike, &owner, Some(7))?;

    let client = client(chain);
    let records = client
        .reconcile_at(PositionKind::StakingOption, &owner, NOW)
        .await?;
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.kind, PositionKind::StakingOption);
    assert_eq!(record.so_name, "SO_LIVE");
    assert_eq!(record.state, live_address);
    assert_eq!(record.strike, 25);
    assert_eq!(record.amount, 7);
    assert_eq!(record.ui_amount, 7.0);
    assert_eq!(record.token_mint, record.option_mint);
    assert_eq!(record.expiration, FUTURE as i64);

    let client = client.with_options(ClientOptions::builder().include_expired(true).build());
    let mut names = client
        .reconcile_at(PositionKind::StakingOption, &owner, NOW)
        .await?
        .into_iter()
        .map(|record| record.so_name)
        .collect::<Vec<_>>();
    names.sort();
    assert_eq!(names, ["SO_EXPIRED", "SO_LIVE"]);
    Ok(())
}

#[tokio::test]
async fn details_finds_by_name() -> eyre::Result<()> {
    let owner = Pubkey::new_unique();
    let mut chain = MockChain::default();
    chain.add_lockup(
        &gso_state("DUAL_LOCKUP", Pubkey::new_unique(), 25, FAR_FUTURE),
        &owner,
        5,
        FAR_FUTURE,
    )?;
    let so = so_state("SO_LIVE", Pubkey::new_unique(), vec![25], FAR_FUTURE);
    chain.add_staking_options(&so, &owner, Some(3))?;

    let client = client(chain);
    let found = client
        .details(PositionKind::Lockup, &owner, "DUAL_LOCKUP")
        .await?;
    assert_eq!(found.map(|record| record.amount), Some(5));
    assert!(client
        .details(PositionKind::Lockup, &owner, "MISSING")
        .await?
        .is_none());

    let all = client.reconcile_all(&owner).await?;
    let kinds = all.iter().map(|record| record.kind).collect::<Vec<_>>();
    assert_eq!(kinds, [PositionKind::Lockup, PositionKind::StakingOption]);
    Ok(())
}
