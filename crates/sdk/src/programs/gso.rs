use solana_sdk::pubkey::Pubkey;

use crate::client::program_ids;

use super::find_program_address;

/// Seed of the xBase (pool token) mint.
pub const X_BASE_MINT_SEED: &[u8] = b"xGSO";

/// Capabilities of the lockup program.
pub trait LockupProgram {
    /// Program ID.
    fn program_id(&self) -> &Pubkey;

    /// Find the xBase mint, the pool token received for staking into `gso_state`.
    fn x_base_mint(&self, gso_state: &Pubkey) -> crate::Result<Pubkey>;
}

impl<P: LockupProgram + ?Sized> LockupProgram for &P {
    fn program_id(&self) -> &Pubkey {
        (**self).program_id()
    }

    fn x_base_mint(&self, gso_state: &Pubkey) -> crate::Result<Pubkey> {
        (**self).x_base_mint(gso_state)
    }
}

/// The GSO program.
#[derive(Debug, Clone)]
pub struct Gso {
    program_id: Pubkey,
}

impl Gso {
    /// Create with a custom program ID.
    pub fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }
}

impl Default for Gso {
    fn default() -> Self {
        Self::new(program_ids::GSO)
    }
}

impl LockupProgram for Gso {
    fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    fn x_base_mint(&self, gso_state: &Pubkey) -> crate::Result<Pubkey> {
        find_program_address(&[X_BASE_MINT_SEED, gso_state.as_ref()], &self.program_id)
    }
}
