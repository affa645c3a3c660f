use dual_sdk::{
    format::pretty_price,
    metadata::attach_metadata,
    offering::Offering,
    ops::OfferingOps,
    ClientOptions,
};

use crate::config::DisplayOptions;

use super::utils::with_field;

/// List lockups open for staking.
#[derive(Debug, clap::Args)]
pub struct Gso {
    /// Show only the lockup with this name.
    name: Option<String>,
    /// Also list lockups whose subscription period has ended.
    #[arg(long)]
    include_closed: bool,
    /// Also list test and trial lockups.
    #[arg(long)]
    include_test: bool,
    /// Resolve the metadata of the base tokens.
    #[arg(long)]
    metadata: bool,
}

impl super::Command for Gso {
    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let options = ClientOptions::builder()
            .include_closed(self.include_closed)
            .skip_test_names(!self.include_test)
            .build();
        let client = ctx.client().client(options);

        let mut offerings = match &self.name {
            Some(name) => client.offering_details(name).await?.into_iter().collect(),
            None => client.offerings().await?,
        };
        if self.name.is_some() && offerings.is_empty() {
            eyre::bail!("lockup not found");
        }
        if self.metadata {
            let source = ctx.metadata_source()?;
            attach_metadata(&source, &mut offerings).await;
        }
        offerings.sort_by(|a, b| a.subscription_period_end.cmp(&b.subscription_period_end));

        let items = offerings
            .iter()
            .map(display_value)
            .collect::<eyre::Result<Vec<_>>>()?;
        let out = ctx.config().output().display_many(
            items,
            DisplayOptions::table_projection([
                ("so_name", "Name"),
                ("symbol", "Token"),
                ("lockup_ratio", "Ratio"),
                ("strike_price", "Strike"),
                ("subscription", "Subscription"),
                ("expiration_date", "Expiration"),
                ("gso_state", "Address"),
            ]),
        )?;
        println!("{out}");
        Ok(())
    }
}

fn display_value(offering: &Offering) -> eyre::Result<serde_json::Value> {
    with_field(
        offering,
        "strike_price",
        pretty_price(offering.strike_in_usd, usize::from(offering.base_decimals)),
    )
}
