/// Balance reconciliation.
pub mod balance;

/// Lockups open for staking.
pub mod offering;

pub use self::{balance::BalanceOps, offering::OfferingOps};
