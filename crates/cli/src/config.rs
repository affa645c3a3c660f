use std::{path::Path, time::Duration};

use dual_sdk::{
    programs::{Gso, StakingOptions},
    serde::StringPubkey,
    solana_sdk::commitment_config::{CommitmentConfig, CommitmentLevel},
    solana_utils::Cluster,
};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use prettytable::{format::consts::FORMAT_CLEAN, Cell, Row, Table};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default config file, loaded when present.
pub const DEFAULT_CONFIG_FILE: &str = "dual.toml";

/// Prefix of the environment variables overriding the config.
pub const ENV_PREFIX: &str = "DUAL_";

const DEFAULT_TIMEOUT: &str = "30s";

/// Configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    cluster: Cluster,
    commitment: CommitmentLevel,
    timeout: String,
    output: OutputFormat,
    gso_program: Option<StringPubkey>,
    staking_options_program: Option<StringPubkey>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cluster: Cluster::default(),
            commitment: CommitmentLevel::Confirmed,
            timeout: DEFAULT_TIMEOUT.to_string(),
            output: OutputFormat::default(),
            gso_program: None,
            staking_options_program: None,
        }
    }
}

/// Config overrides from the command line.
#[derive(Debug, Default, clap::Args, Serialize)]
pub struct ConfigArgs {
    /// RPC cluster: `mainnet`, `devnet`, `testnet`, `localnet` or an URL.
    #[arg(long, short = 'u', global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster: Option<Cluster>,
    /// Commitment level.
    #[arg(long, global = true, value_parser = parse_commitment)]
    #[serde(skip_serializing_if = "Option::is_none")]
    commitment: Option<CommitmentLevel>,
    /// RPC request timeout, e.g. `30s`.
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout: Option<String>,
    /// Output format.
    #[arg(long, short, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<OutputFormat>,
    /// GSO program ID.
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    gso_program: Option<StringPubkey>,
    /// Staking options program ID.
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    staking_options_program: Option<StringPubkey>,
}

fn parse_commitment(s: &str) -> Result<CommitmentLevel, String> {
    s.parse()
        .map_err(|_| format!("invalid commitment level `{s}`"))
}

impl Config {
    /// Load the config, layered as: defaults, config file, environment, command line.
    pub fn load(path: Option<&Path>, args: &ConfigArgs) -> eyre::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        match path {
            Some(path) => {
                if !path.exists() {
                    eyre::bail!("config file `{}` does not exist", path.display());
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
            }
        }
        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(args))
            .extract()?;
        config.timeout()?;
        Ok(config)
    }

    /// Get the cluster.
    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    /// Get the commitment config.
    pub fn commitment(&self) -> CommitmentConfig {
        CommitmentConfig {
            commitment: self.commitment,
        }
    }

    /// Get the RPC request timeout.
    pub fn timeout(&self) -> eyre::Result<Duration> {
        Ok(humantime::parse_duration(&self.timeout)?)
    }

    /// Get the output format.
    pub fn output(&self) -> OutputFormat {
        self.output
    }

    /// Get the lockup program.
    pub fn gso_program(&self) -> Gso {
        self.gso_program
            .map(|id| Gso::new(id.0))
            .unwrap_or_default()
    }

    /// Get the option program.
    pub fn staking_options_program(&self) -> StakingOptions {
        self.staking_options_program
            .map(|id| StakingOptions::new(id.0))
            .unwrap_or_default()
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Table.
    #[default]
    Table,
    /// Pretty JSON.
    Json,
    /// Compact JSON.
    JsonCompact,
}

/// Options for table display.
#[derive(Debug, Clone, Default)]
pub struct DisplayOptions {
    projection: Vec<(String, String)>,
}

impl DisplayOptions {
    /// Display the given fields as columns, keyed by dotted path and labelled.
    pub fn table_projection(
        projection: impl IntoIterator<Item = (impl ToString, impl ToString)>,
    ) -> Self {
        Self {
            projection: projection
                .into_iter()
                .map(|(key, label)| (key.to_string(), label.to_string()))
                .collect(),
        }
    }
}

impl OutputFormat {
    /// Display a list of items.
    pub fn display_many(
        &self,
        items: impl IntoIterator<Item = impl Serialize>,
        options: DisplayOptions,
    ) -> eyre::Result<String> {
        let items = items
            .into_iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        match self {
            Self::Table => Ok(table(&items, &options)),
            Self::Json => Ok(serde_json::to_string_pretty(&items)?),
            Self::JsonCompact => Ok(serde_json::to_string(&items)?),
        }
    }

    /// Display a single item.
    pub fn display_one(&self, item: impl Serialize, options: DisplayOptions) -> eyre::Result<String> {
        let value = serde_json::to_value(item)?;
        match self {
            Self::Table => {
                let mut table = Table::new();
                table.set_format(*FORMAT_CLEAN);
                for (key, label) in options.projection.iter() {
                    table.add_row(Row::new(vec![
                        Cell::new(label),
                        Cell::new(&cell(&value, key)),
                    ]));
                }
                Ok(table.to_string())
            }
            Self::Json => Ok(serde_json::to_string_pretty(&value)?),
            Self::JsonCompact => Ok(serde_json::to_string(&value)?),
        }
    }
}

fn table(items: &[Value], options: &DisplayOptions) -> String {
    let mut table = Table::new();
    table.set_format(*FORMAT_CLEAN);
    table.set_titles(Row::new(
        options
            .projection
            .iter()
            .map(|(_, label)| Cell::new(label))
            .collect(),
    ));
    for item in items {
        table.add_row(Row::new(
            options
                .projection
                .iter()
                .map(|(key, _)| Cell::new(&cell(item, key)))
                .collect(),
        ));
    }
    table.to_string()
}

fn cell(value: &Value, key: &str) -> String {
    let pointer = format!("/{}", key.replace('.', "/"));
    match value.pointer(&pointer) {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(value) => value.to_string(),
    }
}
