use solana_sdk::pubkey::Pubkey;

/// Error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Parse url error.
    #[error("parse url: {0}")]
    ParseUrl(#[from] url::ParseError),
    /// Parse cluster error.
    #[error("parse cluster: {0}")]
    ParseCluster(&'static str),
    /// Account not found.
    #[error("account not found: {0}")]
    AccountNotFound(Pubkey),
    /// Custom error.
    #[error("custom: {0}")]
    Custom(String),
    /// RPC client error.
    #[cfg(feature = "solana-rpc-client-api")]
    #[error("rpc-client-api: {0}")]
    RpcClientApi(Box<solana_rpc_client_api::client_error::Error>),
    /// JSON error.
    #[cfg(feature = "serde_json")]
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    /// Reqwest error.
    #[cfg(feature = "reqwest")]
    #[error("reqwest: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl Error {
    /// Create a custom error.
    pub fn custom(msg: impl ToString) -> Self {
        Self::Custom(msg.to_string())
    }

    /// Returns whether the error is caused by a request timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            #[cfg(feature = "reqwest")]
            Self::Reqwest(err) => err.is_timeout(),
            _ => false,
        }
    }
}

#[cfg(feature = "solana-rpc-client-api")]
impl From<solana_rpc_client_api::client_error::Error> for Error {
    fn from(err: solana_rpc_client_api::client_error::Error) -> Self {
        Self::RpcClientApi(Box::new(err))
    }
}
