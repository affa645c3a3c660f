use solana_sdk::pubkey::Pubkey;

mod gso {
    solana_sdk::declare_id!("DuALd6fooWzVDkaTsQzDAxPGYCnLrnWamdNNTNxicdX8");
}

/// GSO (lockup) Program ID.
pub const GSO: Pubkey = gso::ID;

mod staking_options {
    solana_sdk::declare_id!("4yx1NJ4Vqf2zT1oVLk4SySBhhDJXmXFt88ncm4gPxtL7");
}

/// Staking Options Program ID.
pub const STAKING_OPTIONS: Pubkey = staking_options::ID;

mod token_metadata {
    solana_sdk::declare_id!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");
}

/// Token Metadata Program ID.
pub const TOKEN_METADATA: Pubkey = token_metadata::ID;
