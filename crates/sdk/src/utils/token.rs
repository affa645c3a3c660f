use anchor_lang::AccountDeserialize;
use anchor_spl::token_interface::TokenAccount;
use solana_sdk::account::Account;

/// Get the raw token amount held by a token account.
///
/// Returns `None` if the account is not an initialized token account.
pub fn token_amount(account: &Account) -> Option<u64> {
    match TokenAccount::try_deserialize(&mut account.data.as_slice()) {
        Ok(token_account) => Some(token_account.amount),
        Err(err) => {
            tracing::debug!(%err, "not a token account");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_of_initialized_account() {
        let mut data = vec![0u8; 165];
        data[64..72].copy_from_slice(&1_234u64.to_le_bytes());
        data[108] = 1;
        let account = Account {
            data,
            ..Default::default()
        };
        assert_eq!(token_amount(&account), Some(1_234));
    }

    #[test]
    fn garbage_is_not_a_token_account() {
        let account = Account {
            data: vec![1, 2, 3],
            ..Default::default()
        };
        assert_eq!(token_amount(&account), None);
    }
}
