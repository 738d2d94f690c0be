//! CoinGecko-backed market source.
//! Fetches the tracked assets via `/coins/markets`, ordered by market cap.

use super::{AssetQuote, MarketSource};
use crate::error::FeedError;
use async_trait::async_trait;
use derive_builder::Builder;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, trace};

pub const DEFAULT_MARKETS_URL: &str = "https://api.coingecko.com/api/v3/coins/markets";
pub const DEFAULT_TRACKED_ASSETS: [&str; 5] = [
    "bitcoin",
    "ethereum",
    "internet-computer",
    "solana",
    "ripple",
];
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

const MARKET_CAP_DESC: &str = "market_cap_desc";

fn default_markets_url() -> Url {
    Url::parse(DEFAULT_MARKETS_URL).expect("valid url")
}

fn default_tracked_assets() -> Vec<String> {
    DEFAULT_TRACKED_ASSETS.iter().map(|id| id.to_string()).collect()
}

#[derive(Builder, Clone, Debug)]
pub struct FeedConfig {
    /// Full URL of the `/coins/markets` endpoint
    #[builder(default = "default_markets_url()")]
    pub markets_url: Url,
    /// Provider asset ids to track
    #[builder(default = "default_tracked_assets()")]
    pub tracked_assets: Vec<String>,
    /// Quote currency
    #[builder(setter(into), default = "String::from(\"usd\")")]
    pub vs_currency: String,
    /// Delay between refreshes
    #[builder(default = "DEFAULT_POLL_INTERVAL")]
    pub poll_interval: Duration,
    /// Upper bound for a single refresh request
    #[builder(default = "Duration::from_secs(8)")]
    pub request_timeout: Duration,
}

impl FeedConfig {
    pub fn builder() -> FeedConfigBuilder {
        FeedConfigBuilder::default()
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            markets_url: default_markets_url(),
            tracked_assets: default_tracked_assets(),
            vs_currency: "usd".to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: Duration::from_secs(8),
        }
    }
}

/// CoinGecko `/coins/markets` client.
#[derive(Debug, Clone)]
pub struct CoinGeckoSource {
    client: Client,
    config: FeedConfig,
}

impl CoinGeckoSource {
    pub fn new(config: FeedConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn request_url(&self) -> Url {
        let mut url = self.config.markets_url.clone();
        url.query_pairs_mut()
            .append_pair("vs_currency", &self.config.vs_currency)
            .append_pair("ids", &self.config.tracked_assets.join(","))
            .append_pair("order", MARKET_CAP_DESC);
        url
    }
}

#[async_trait]
impl MarketSource for CoinGeckoSource {
    async fn fetch_quotes(&self) -> Result<Vec<AssetQuote>, FeedError> {
        let url = self.request_url();
        debug!(%url, "coingecko: refreshing quotes");

        let resp = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .timeout(self.config.request_timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        let body = resp.bytes().await?;
        trace!(size = body.len(), "coingecko: response received");

        parse_markets(&body)
    }
}

/// Parse a `/coins/markets` body: `[{"id": .., "name": .., "symbol": .., "current_price": ..}, ..]`.
pub(crate) fn parse_markets(body: &[u8]) -> Result<Vec<AssetQuote>, FeedError> {
    Ok(serde_json::from_slice(body)?)
}
