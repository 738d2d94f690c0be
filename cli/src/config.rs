use crate::args::Cli;
use anyhow::{Context, Result};
use coinsight_agent::{FeedConfig, GatewayConfig};
use derive_builder::Builder;
use dialoguer::console::style;
use std::time::Duration;
use tracing::info;

#[derive(Builder, Clone, Debug)]
pub struct AdvisorConfig {
    /// Market-data source settings
    pub feed: FeedConfig,
    /// Advisory backend settings
    pub gateway: GatewayConfig,
}

impl AdvisorConfig {
    pub fn builder() -> AdvisorConfigBuilder {
        AdvisorConfigBuilder::default()
    }

    pub(crate) fn setup(args: Cli) -> Result<Self> {
        let mut feed = FeedConfig::builder();
        feed.markets_url(args.market_url)
            .poll_interval(args.poll_interval);
        if !args.assets.is_empty() {
            feed.tracked_assets(args.assets);
        }

        let mut gateway = GatewayConfig::builder();
        gateway
            .endpoint(args.agent_url)
            .request_timeout(non_zero(args.gateway_timeout));
        if let Some(model_id) = args.model_id {
            gateway.model(model_id);
        }

        let config = AdvisorConfig::builder()
            .feed(feed.build().context("invalid market feed configuration")?)
            .gateway(gateway.build().context("invalid gateway configuration")?)
            .build()
            .context("invalid advisor configuration")?;

        config.print_summary();
        Ok(config)
    }

    fn print_summary(&self) {
        info!(target: "plain",
            "{} {}\n{} {}\n",
            style("Advisor:").dim(),
            style(&self.gateway.endpoint).cyan(),
            style("Tracking:").dim(),
            style(self.feed.tracked_assets.join(", ")).cyan(),
        );
    }
}

fn non_zero(duration: Duration) -> Option<Duration> {
    (!duration.is_zero()).then_some(duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use coinsight_agent::market::coingecko::DEFAULT_TRACKED_ASSETS;

    fn setup(args: &[&str]) -> AdvisorConfig {
        let mut argv = vec!["coinsight", "--agent-url", "http://localhost:8080/v1/chat/completions"];
        argv.extend_from_slice(args);
        AdvisorConfig::setup(Cli::try_parse_from(argv).unwrap()).unwrap()
    }

    #[test]
    fn test_defaults_track_top_assets() {
        let config = setup(&[]);
        assert_eq!(config.feed.tracked_assets, DEFAULT_TRACKED_ASSETS);
        assert_eq!(config.feed.poll_interval, Duration::from_secs(10));
        assert_eq!(config.gateway.model, None);
        assert_eq!(config.gateway.request_timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = setup(&[
            "--asset",
            "solana",
            "--model",
            "gpt-4o-mini",
            "--poll-interval",
            "30",
            "--gateway-timeout",
            "0",
        ]);
        assert_eq!(config.feed.tracked_assets, vec!["solana"]);
        assert_eq!(config.feed.poll_interval, Duration::from_secs(30));
        assert_eq!(config.gateway.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(config.gateway.request_timeout, None);
    }
}
