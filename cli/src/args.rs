use clap::{Parser, ValueHint};
use coinsight_agent::market::coingecko::DEFAULT_MARKETS_URL;
use coinsight_agent::Url;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL_SECS: &str = "10"; // parsed by parser
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: &str = "60"; // parsed by parser

/// Coinsight - chat with an advisor that sees live crypto prices
///
/// Every message is sent to the advisory backend together with the latest
/// quotes of the tracked assets.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Advisory backend endpoint (e.g., http://localhost:11434/api/chat)
    #[arg(long = "agent-url", env = "AGENT_API_URL", value_hint = ValueHint::Url)]
    pub(crate) agent_url: Url,

    /// Market-data endpoint returning `/coins/markets` JSON
    #[arg(
        long = "market-url",
        env = "MARKET_API_URL",
        value_hint = ValueHint::Url,
        default_value = DEFAULT_MARKETS_URL
    )]
    pub(crate) market_url: Url,

    /// Model id forwarded to the advisory backend
    #[arg(long = "model")]
    pub(crate) model_id: Option<String>,

    /// Asset ids to track (comma-separated or repeated; default: the top five)
    #[arg(long = "asset", value_delimiter = ',')]
    pub(crate) assets: Vec<String>,

    /// Seconds between market refreshes
    #[arg(
        long = "poll-interval",
        value_parser = parse_seconds,
        default_value = DEFAULT_POLL_INTERVAL_SECS
    )]
    pub(crate) poll_interval: Duration,

    /// Seconds to wait for an advisory reply (0 = no limit)
    #[arg(
        long = "gateway-timeout",
        value_parser = parse_seconds,
        default_value = DEFAULT_GATEWAY_TIMEOUT_SECS
    )]
    pub(crate) gateway_timeout: Duration,
}

/// Parse a whole number of seconds.
fn parse_seconds(s: &str) -> Result<Duration, String> {
    s.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| format!("invalid duration '{}'; expected whole seconds", s))
}
