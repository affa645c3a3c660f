use std::{future::Future, time::Duration};

use anchor_lang::AccountDeserialize;
use anchor_spl::metadata::MetadataAccount;
use solana_sdk::pubkey::Pubkey;

use crate::{
    client::program_ids,
    constants::known_token,
    offering::Offering,
    position::PositionRecord,
    programs::{find_program_address, AccountReader},
    utils::QueryCache,
};

/// Seed of the metadata account.
pub const METADATA_SEED: &[u8] = b"metadata";

/// Off-chain metadata of a token.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TokenMetadata {
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Symbol.
    #[serde(default)]
    pub symbol: String,
    /// Image URL.
    #[serde(default)]
    pub image: String,
}

impl TokenMetadata {
    /// Metadata of a well-known token, without name or image.
    pub fn known(mint: &Pubkey) -> Option<Self> {
        known_token(mint).map(|token| Self {
            symbol: token.symbol.to_string(),
            ..Default::default()
        })
    }
}

/// A source of token metadata.
pub trait TokenMetadataSource {
    /// Resolve the metadata of `mint`.
    fn resolve(&self, mint: &Pubkey) -> impl Future<Output = crate::Result<TokenMetadata>>;
}

/// Find the metadata account of `mint`.
pub fn find_metadata_address(mint: &Pubkey) -> crate::Result<Pubkey> {
    find_program_address(
        &[
            METADATA_SEED,
            program_ids::TOKEN_METADATA.as_ref(),
            mint.as_ref(),
        ],
        &program_ids::TOKEN_METADATA,
    )
}

/// Resolves metadata by reading the on-chain metadata account and
/// fetching the JSON document its URI points to.
#[derive(Debug)]
pub struct HttpMetadataSource<R> {
    reader: R,
    http: reqwest::Client,
    cache: QueryCache<Pubkey, TokenMetadata>,
}

impl<R: AccountReader> HttpMetadataSource<R> {
    /// Default timeout of a metadata request.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a new source with the default request timeout.
    pub fn new(reader: R) -> crate::Result<Self> {
        Self::with_timeout(reader, Self::DEFAULT_TIMEOUT)
    }

    /// Create a new source whose requests time out after `timeout`.
    pub fn with_timeout(reader: R, timeout: Duration) -> crate::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http_client(reader, http))
    }

    /// Create a new source with the given HTTP client.
    pub fn with_http_client(reader: R, http: reqwest::Client) -> Self {
        Self {
            reader,
            http,
            cache: QueryCache::default(),
        }
    }

    async fn fetch(&self, mint: &Pubkey) -> crate::Result<TokenMetadata> {
        let address = find_metadata_address(mint)?;
        let account = self
            .reader
            .get_multiple_accounts(&[address])
            .await?
            .into_iter()
            .next()
            .flatten()
            .ok_or_else(|| crate::Error::account_not_found("metadata", &address))?;
        let metadata = MetadataAccount::try_deserialize(&mut account.data.as_slice())?;
        let uri = trim_uri(&metadata.uri);
        tracing::trace!(%mint, %uri, "fetching token metadata");
        self.fetch_json(uri).await
    }

    async fn fetch_json(&self, uri: &str) -> crate::Result<TokenMetadata> {
        let json = self
            .http
            .get(uri)
            .send()
            .await?
            .error_for_status()?
            .json::<TokenMetadata>()
            .await?;
        Ok(json)
    }
}

impl<R: AccountReader> TokenMetadataSource for HttpMetadataSource<R> {
    async fn resolve(&self, mint: &Pubkey) -> crate::Result<TokenMetadata> {
        self.cache
            .get_or_try_insert_with(*mint, || self.fetch(mint))
            .await
    }
}

/// Metadata URIs are stored NUL-padded.
fn trim_uri(uri: &str) -> &str {
    uri.split('\0').next().unwrap_or_default().trim()
}

/// Resolve the metadata of `mint`, falling back to the well-known token table.
async fn resolve_or_known<S: TokenMetadataSource>(source: &S, mint: &Pubkey) -> Option<TokenMetadata> {
    match source.resolve(mint).await {
        Ok(metadata) => Some(metadata),
        Err(err) => {
            tracing::warn!(%err, %mint, "failed to resolve metadata");
            TokenMetadata::known(mint)
        }
    }
}

fn symbol_of(metadata: Option<&TokenMetadata>) -> Option<String> {
    metadata
        .map(|metadata| metadata.symbol.clone())
        .filter(|symbol| !symbol.is_empty())
}

/// Attach the metadata of the base token to each offering.
///
/// Unresolvable metadata falls back to the well-known token table.
pub async fn attach_metadata<S: TokenMetadataSource>(source: &S, offerings: &mut [Offering]) {
    let resolved = futures_util::future::join_all(
        offerings
            .iter()
            .map(|offering| resolve_or_known(source, &offering.base_mint)),
    )
    .await;
    for (offering, metadata) in offerings.iter_mut().zip(resolved) {
        if offering.symbol.is_none() {
            offering.symbol = symbol_of(metadata.as_ref());
        }
        offering.metadata = metadata;
    }
}

/// Attach the metadata of the base and option tokens to each position.
///
/// Unresolvable metadata falls back to the well-known token table.
pub async fn attach_position_metadata<S: TokenMetadataSource>(
    source: &S,
    records: &mut [PositionRecord],
) {
    let resolved = futures_util::future::join_all(records.iter().map(|record| async move {
        futures_util::join!(
            resolve_or_known(source, &record.base_mint),
            resolve_or_known(source, &record.option_mint),
        )
    }))
    .await;
    for (record, (metadata, option_metadata)) in records.iter_mut().zip(resolved) {
        if record.symbol.is_none() {
            record.symbol = symbol_of(metadata.as_ref());
        }
        record.metadata = metadata;
        record.option_metadata = option_metadata;
    }
}

#[cfg(test)]
mod tests {
    use crate::constants::BONK_MINT_MAINNET;

    use super::*;

    #[test]
    fn uri_is_trimmed() {
        assert_eq!(
            trim_uri("https://example.com/bonk.json\0\0\0"),
            "https://example.com/bonk.json"
        );
        assert_eq!(trim_uri("\0\0"), "");
    }

    #[test]
    fn metadata_address_is_deterministic() -> crate::Result<()> {
        let mint = Pubkey::new_unique();
        assert_eq!(find_metadata_address(&mint)?, find_metadata_address(&mint)?);
        Ok(())
    }

    #[test]
    fn known_metadata() {
        assert_eq!(
            TokenMetadata::known(&BONK_MINT_MAINNET).map(|m| m.symbol),
            Some("BONK".to_string())
        );
        assert_eq!(TokenMetadata::known(&Pubkey::new_unique()), None);
    }

    struct NoAccounts;

    impl AccountReader for NoAccounts {
        async fn get_program_accounts(
            &self,
            _program: &Pubkey,
        ) -> crate::Result<Vec<(Pubkey, solana_sdk::account::Account)>> {
            Ok(vec![])
        }

        async fn get_multiple_accounts(
            &self,
            addresses: &[Pubkey],
        ) -> crate::Result<Vec<Option<solana_sdk::account::Account>>> {
            Ok(vec![None; addresses.len()])
        }
    }

    #[tokio::test]
    async fn stalled_metadata_server_times_out() -> crate::Result<()> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(crate::Error::custom)?;
        let addr = listener.local_addr().map_err(crate::Error::custom)?;
        let server = tokio::spawn(async move {
            // Accept and never respond.
            let (_socket, _) = listener.accept().await?;
            tokio::time::sleep(Duration::from_secs(60)).await;
            std::io::Result::Ok(())
        });

        let source = HttpMetadataSource::with_timeout(
            NoAccounts,
            Duration::from_millis(200),
        )?;
        let result = tokio::time::timeout(
            Duration::from_secs(10),
            source.fetch_json(&format!("http://{addr}/token.json")),
        )
        .await
        .map_err(crate::Error::custom)?;
        assert!(matches!(result, Err(crate::Error::Reqwest(err)) if err.is_timeout()));
        server.abort();
        Ok(())
    }

    #[derive(Default)]
    struct StaticSource;

    impl TokenMetadataSource for StaticSource {
        async fn resolve(&self, mint: &Pubkey) -> crate::Result<TokenMetadata> {
            if *mint == BONK_MINT_MAINNET {
                Err(crate::Error::custom("unavailable"))
            } else {
                Ok(TokenMetadata {
                    name: "Token".into(),
                    symbol: "TKN".into(),
                    image: "https://example.com/tkn.png".into(),
                })
            }
        }
    }

    fn offering(base_mint: Pubkey, symbol: Option<&str>) -> Offering {
        Offering {
            so_name: "BONK_LOYALTY".into(),
            gso_state: Pubkey::new_unique(),
            so_state: Pubkey::new_unique(),
            base_mint,
            quote_mint: Pubkey::new_unique(),
            option_mint: Pubkey::new_unique(),
            base_decimals: 5,
            lot_size: 1_000_000,
            lockup_ratio: 1.0,
            subscription_period_end: 0,
            subscription: "0d 0h 0m".into(),
            expiration: 0,
            expiration_date: "Jan 01 1970".into(),
            strike: 25,
            strike_in_usd: 0.0000025,
            symbol: symbol.map(str::to_string),
            metadata: None,
        }
    }

    fn position(base_mint: Pubkey, option_mint: Pubkey) -> PositionRecord {
        PositionRecord {
            kind: crate::position::PositionKind::StakingOption,
            so_name: "SO_TKN".into(),
            state: Pubkey::new_unique(),
            base_mint,
            quote_mint: Pubkey::new_unique(),
            option_mint,
            token_mint: option_mint,
            base_decimals: 6,
            quote_decimals: 6,
            lot_size: 1_000_000,
            strike: 1_000_000,
            strike_in_usd: 1.0,
            expiration: 0,
            expiration_date: "Jan 01 1970".into(),
            time_left: "0d 0h 0m".into(),
            amount: 1,
            ui_amount: 0.000001,
            option_amount: 0,
            symbol: None,
            metadata: None,
            option_metadata: None,
        }
    }

    #[tokio::test]
    async fn position_metadata_is_attached() {
        let option_mint = Pubkey::new_unique();
        let mut records = vec![
            position(Pubkey::new_unique(), option_mint),
            position(BONK_MINT_MAINNET, BONK_MINT_MAINNET),
        ];
        attach_position_metadata(&StaticSource, &mut records).await;

        assert_eq!(records[0].symbol.as_deref(), Some("TKN"));
        assert_eq!(
            records[0].option_metadata.as_ref().map(|m| m.name.as_str()),
            Some("Token")
        );
        // Unresolvable metadata of both mints falls back to the well-known table.
        assert_eq!(records[1].symbol.as_deref(), Some("BONK"));
        assert_eq!(
            records[1].option_metadata.as_ref().map(|m| m.symbol.as_str()),
            Some("BONK")
        );
        assert_eq!(records[1].metadata.as_ref().map(|m| m.name.as_str()), Some(""));
    }

    #[tokio::test]
    async fn metadata_is_attached() {
        let mut offerings = vec![
            offering(BONK_MINT_MAINNET, Some("BONK")),
            offering(Pubkey::new_unique(), None),
        ];
        attach_metadata(&StaticSource, &mut offerings).await;

        // Falls back to the well-known table.
        assert_eq!(
            offerings[0].metadata.as_ref().map(|m| m.symbol.as_str()),
            Some("BONK")
        );
        assert_eq!(offerings[1].symbol.as_deref(), Some("TKN"));
        assert_eq!(
            offerings[1].metadata.as_ref().map(|m| m.image.as_str()),
            Some("https://example.com/tkn.png")
        );
    }
}
