//! Market data: quote types, the provider seam and the refresh loop.

pub mod coingecko;
pub mod poller;

use crate::error::FeedError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One tracked asset as reported by the market-data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetQuote {
    pub id: String,     // "bitcoin"
    pub name: String,   // "Bitcoin"
    pub symbol: String, // "btc", as the provider sends it
    #[serde(rename = "current_price")]
    pub price: f64, // last price in the quote currency
}

impl AssetQuote {
    pub fn new(id: &str, name: &str, symbol: &str, price: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            price,
        }
    }
}

/// `Bitcoin (BTC): $65000`
impl fmt::Display for AssetQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): ${}",
            self.name,
            self.symbol.to_uppercase(),
            self.price
        )
    }
}

/// Immutable, wholesale-replaced view of the latest quotes.
///
/// Cloning is cheap. An empty snapshot means the last refresh failed or
/// returned nothing.
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    quotes: Arc<[AssetQuote]>,
    as_of: DateTime<Utc>,
}

impl Default for MarketSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl MarketSnapshot {
    pub fn new(quotes: Vec<AssetQuote>) -> Self {
        Self {
            quotes: quotes.into(),
            as_of: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn quotes(&self) -> &[AssetQuote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }

    /// True if both are clones of the same published snapshot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.quotes, &other.quotes)
    }
}

/// Source of market quotes.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Fetch the tracked quotes, ordered by descending market cap.
    async fn fetch_quotes(&self) -> Result<Vec<AssetQuote>, FeedError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_display_uppercases_symbol() {
        let quote = AssetQuote::new("bitcoin", "Bitcoin", "btc", 65000.0);
        assert_eq!(quote.to_string(), "Bitcoin (BTC): $65000");
    }

    #[test]
    fn test_quote_display_keeps_fraction() {
        let quote = AssetQuote::new("ripple", "XRP", "xrp", 0.52);
        assert_eq!(quote.to_string(), "XRP (XRP): $0.52");
    }

    #[test]
    fn test_snapshot_clone_shares_quotes() {
        let snapshot = MarketSnapshot::new(vec![AssetQuote::new("solana", "Solana", "sol", 150.0)]);
        let copy = snapshot.clone();

        assert_eq!(copy.len(), 1);
        assert!(snapshot.ptr_eq(&copy));
        assert!(!snapshot.ptr_eq(&MarketSnapshot::new(copy.quotes().to_vec())));
        assert!(MarketSnapshot::default().is_empty());
    }
}
