use anyhow::{Context, Result};
use coinsight::Application;
use dialoguer::console::style;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging().context("initializing logging")?;

    print_welcome();

    let app = Application::init().await?;
    app.run().await
}

fn init_logging() -> Result<()> {
    // plain layer (only target="plain")
    let plain_fmt = tracing_subscriber::fmt::format()
        .without_time()
        .with_level(false)
        .with_target(false)
        .compact();
    let plain_layer = tracing_subscriber::fmt::layer()
        .event_format(plain_fmt)
        .with_filter(Targets::new().with_target("plain", LevelFilter::TRACE));

    // use RUST_LOG if provided; otherwise keep our own crates at INFO
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,coinsight=info,coinsight_agent=info"));

    let rich_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(plain_layer)
        .with(rich_layer)
        .try_init()?;

    Ok(())
}

fn print_welcome() {
    let sep = style("◆").blue().bold();
    let title = style("Welcome to Coinsight").bold();
    let subtitle = style("Chat with an advisor that watches live crypto prices.").dim();

    info!(target: "plain", "\n{sep} {title} {sep}\n{subtitle}\n");
}
