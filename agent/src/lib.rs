//! Conversation core of the Coinsight advisor.
//!
//! Pairs a chat transcript with a periodically refreshed crypto market
//! snapshot. Every user message is sent to an advisory backend together with
//! the quotes current at submit time.

pub mod controller;
pub mod error;
pub mod gateway;
pub mod market;
pub mod message;
pub mod prompt;
pub mod session;
pub mod transcript;
pub mod utils;

#[cfg(test)]
mod testing;

pub use controller::{ChatController, Dispatch, ExchangeId, SessionView, ERROR_MESSAGE};
pub use error::{FeedError, GatewayError, SubmitRejected};
pub use gateway::{AgentGateway, GatewayConfig, HttpGateway};
pub use market::coingecko::{CoinGeckoSource, FeedConfig};
pub use market::poller::MarketFeedPoller;
pub use market::{AssetQuote, MarketSnapshot, MarketSource};
pub use message::{Message, Role};
pub use prompt::build_prompt;
pub use session::AdvisorSession;
pub use transcript::{Transcript, GREETING, PLACEHOLDER};

pub use reqwest::Url;
