use solana_sdk::{pubkey, pubkey::Pubkey};

/// Size of a GSO (lockup) state account.
pub const GSO_STATE_SIZE: usize = 1000;

/// Size of a staking options state account.
pub const STAKING_OPTIONS_STATE_SIZE: usize = 1150;

/// Maximum number of addresses per `getMultipleAccounts` request.
pub const MAX_MULTIPLE_ACCOUNTS: usize = 100;

/// Prefix of the staking options name backing a GSO.
pub const GSO_NAME_PREFIX: &str = "GSO";

/// Scale of the lockup ratio.
pub const LOCKUP_RATIO_UNIT: u64 = 1_000_000;

/// USDC mint on mainnet.
pub const USDC_MINT_MAINNET: Pubkey = pubkey!("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");

/// BONK mint on mainnet.
pub const BONK_MINT_MAINNET: Pubkey = pubkey!("DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263");

/// DUAL mint on mainnet.
pub const DUAL_MINT_MAINNET: Pubkey = pubkey!("DUALa4FC2yREwZ59PHeu1un4wis36vHRv5hWVBmzykCJ");

/// Wrapped SOL mint.
pub const WSOL_MINT: Pubkey = pubkey!("So11111111111111111111111111111111111111112");

/// A token with well-known symbol and decimals.
#[derive(Debug, Clone, Copy)]
pub struct KnownToken {
    /// Mint address.
    pub mint: Pubkey,
    /// Symbol.
    pub symbol: &'static str,
    /// Decimals.
    pub decimals: u8,
}

/// Tokens with well-known symbol and decimals.
pub const KNOWN_TOKENS: [KnownToken; 4] = [
    KnownToken {
        mint: WSOL_MINT,
        symbol: "WSOL",
        decimals: 9,
    },
    KnownToken {
        mint: USDC_MINT_MAINNET,
        symbol: "USDC",
        decimals: 6,
    },
    KnownToken {
        mint: BONK_MINT_MAINNET,
        symbol: "BONK",
        decimals: 5,
    },
    KnownToken {
        mint: DUAL_MINT_MAINNET,
        symbol: "DUAL",
        decimals: 6,
    },
];

/// Find a well-known token by mint.
pub fn known_token(mint: &Pubkey) -> Option<&'static KnownToken> {
    KNOWN_TOKENS.iter().find(|token| token.mint == *mint)
}
