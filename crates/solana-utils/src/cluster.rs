use std::{fmt, str::FromStr};

use url::Url;

const MAINNET: &str = "https://api.mainnet-beta.solana.com";
const DEVNET: &str = "https://api.devnet.solana.com";
const TESTNET: &str = "https://api.testnet.solana.com";
const LOCALNET: &str = "http://127.0.0.1:8899";

/// A Solana cluster to send RPC requests to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cluster {
    /// Mainnet Beta.
    #[default]
    Mainnet,
    /// Devnet.
    Devnet,
    /// Testnet.
    Testnet,
    /// Local validator.
    Localnet,
    /// Custom RPC endpoint.
    Custom(Url),
}

impl Cluster {
    /// Get the RPC url.
    pub fn url(&self) -> &str {
        match self {
            Self::Mainnet => MAINNET,
            Self::Devnet => DEVNET,
            Self::Testnet => TESTNET,
            Self::Localnet => LOCALNET,
            Self::Custom(url) => url.as_str(),
        }
    }
}

impl FromStr for Cluster {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cluster = match s.to_lowercase().as_str() {
            "m" | "mainnet" | "mainnet-beta" => Self::Mainnet,
            "d" | "devnet" => Self::Devnet,
            "t" | "testnet" => Self::Testnet,
            "l" | "localnet" | "localhost" => Self::Localnet,
            _ if s.starts_with("http://") || s.starts_with("https://") => {
                Self::Custom(Url::parse(s)?)
            }
            _ => {
                return Err(crate::Error::ParseCluster(
                    "expecting a cluster name or an http(s) url",
                ))
            }
        };
        Ok(cluster)
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => f.write_str("mainnet"),
            Self::Devnet => f.write_str("devnet"),
            Self::Testnet => f.write_str("testnet"),
            Self::Localnet => f.write_str("localnet"),
            Self::Custom(url) => f.write_str(url.as_str()),
        }
    }
}

#[cfg(serde)]
impl serde::Serialize for Cluster {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(serde)]
impl<'de> serde::Deserialize<'de> for Cluster {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
