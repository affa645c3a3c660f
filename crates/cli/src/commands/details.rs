use dual_sdk::{
    metadata::attach_position_metadata,
    ops::BalanceOps,
    position::PositionKind,
    serde::StringPubkey,
    ClientOptions,
};
use eyre::OptionExt;

use crate::config::DisplayOptions;

/// Show a single position held by an owner.
#[derive(Debug, clap::Args)]
pub struct Details {
    /// Owner of the position.
    owner: StringPubkey,
    /// Name of the lockup or staking options.
    name: String,
    /// Kind of the position. Both kinds are searched if omitted.
    #[arg(long, value_enum)]
    kind: Option<PositionKind>,
    /// Resolve the metadata of the base and option tokens.
    #[arg(long)]
    metadata: bool,
}

impl super::Command for Details {
    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let client = ctx.client().client(ClientOptions::default());
        let owner = &self.owner.0;
        let mut record = match self.kind {
            Some(kind) => client.details(kind, owner, &self.name).await?,
            None => client
                .reconcile_all(owner)
                .await?
                .into_iter()
                .find(|record| record.so_name == self.name),
        }
        .ok_or_eyre("position not found")?;
        if self.metadata {
            attach_position_metadata(&ctx.metadata_source()?, std::slice::from_mut(&mut record))
                .await;
        }

        let out = ctx.config().output().display_one(
            super::balance::display_value(&record)?,
            DisplayOptions::table_projection([
                ("kind", "Kind"),
                ("so_name", "Name"),
                ("symbol", "Token"),
                ("state", "State"),
                ("base_mint", "Base Mint"),
                ("quote_mint", "Quote Mint"),
                ("option_mint", "Option Mint"),
                ("token_mint", "Held Mint"),
                ("amount", "Amount (raw)"),
                ("ui_amount", "Amount"),
                ("option_amount", "Options (raw)"),
                ("lot_size", "Lot Size"),
                ("strike", "Strike (raw)"),
                ("strike_price", "Strike"),
                ("expiration_date", "Expiration"),
                ("time_left", "Time Left"),
            ]),
        )?;
        println!("{out}");
        Ok(())
    }
}
