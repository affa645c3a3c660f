use dual_sdk::{
    format::pretty_price,
    metadata::attach_position_metadata,
    ops::BalanceOps,
    position::{PositionKind, PositionRecord},
    serde::StringPubkey,
    ClientOptions,
};

use crate::config::DisplayOptions;

use super::utils::with_field;

/// List the positions held by an owner.
#[derive(Debug, clap::Args)]
pub struct Balance {
    /// Owner of the positions.
    owner: StringPubkey,
    /// Only list positions of this kind.
    #[arg(long, value_enum)]
    kind: Option<PositionKind>,
    /// Also list expired staking options.
    #[arg(long)]
    include_expired: bool,
    /// Resolve the metadata of the base and option tokens.
    #[arg(long)]
    metadata: bool,
}

impl super::Command for Balance {
    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let options = ClientOptions::builder()
            .include_expired(self.include_expired)
            .build();
        let client = ctx.client().client(options);
        let owner = &self.owner.0;
        let mut records = match self.kind {
            Some(kind) => client.reconcile(kind, owner).await?,
            None => client.reconcile_all(owner).await?,
        };
        tracing::info!(%owner, positions = records.len(), "reconciled");
        if self.metadata {
            attach_position_metadata(&ctx.metadata_source()?, &mut records).await;
        }

        let items = records
            .iter()
            .map(display_value)
            .collect::<eyre::Result<Vec<_>>>()?;
        let out = ctx.config().output().display_many(
            items,
            DisplayOptions::table_projection([
                ("kind", "Kind"),
                ("so_name", "Name"),
                ("symbol", "Token"),
                ("ui_amount", "Amount"),
                ("option_amount", "Options"),
                ("strike_price", "Strike"),
                ("expiration_date", "Expiration"),
                ("time_left", "Time Left"),
            ]),
        )?;
        println!("{out}");
        Ok(())
    }
}

pub(super) fn display_value(record: &PositionRecord) -> eyre::Result<serde_json::Value> {
    with_field(
        record,
        "strike_price",
        pretty_price(record.strike_in_usd, usize::from(record.base_decimals)),
    )
}
