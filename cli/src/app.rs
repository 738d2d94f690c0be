use crate::args::Cli;
use crate::config::AdvisorConfig;
use crate::input::{InputSource, StdinInputSource};
use crate::ui::TerminalRenderer;
use anyhow::Context;
use clap::Parser;
use coinsight_agent::{AdvisorSession, CoinGeckoSource, HttpGateway};
use dialoguer::console::style;
use std::sync::Arc;
use tracing::{debug, info};

pub struct Application {
    config: AdvisorConfig,
}

impl Application {
    pub async fn init() -> anyhow::Result<Application> {
        // Preload environment variables from .env file if it exists before parsing CLI args
        dotenvy::dotenv().ok();

        let cli = Cli::parse();
        let config = AdvisorConfig::setup(cli)?;

        Ok(Application { config })
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        self.run_with(StdinInputSource::new()).await
    }

    /// Run the chat loop reading from `input` until it ends or Ctrl-C.
    pub async fn run_with<S: InputSource>(&self, input: S) -> anyhow::Result<()> {
        let source = Arc::new(CoinGeckoSource::new(self.config.feed.clone()));
        let gateway = Arc::new(HttpGateway::new(self.config.gateway.clone()));
        let session = AdvisorSession::start(source, gateway, self.config.feed.poll_interval);

        run_session(session, input).await
    }
}

pub(crate) async fn run_session<S: InputSource>(
    session: AdvisorSession,
    mut input: S,
) -> anyhow::Result<()> {
    let mut view = session.subscribe();
    let current = view.borrow_and_update().clone();
    let mut renderer = TerminalRenderer::new(&current);
    renderer.render(&current);

    info!(target: "plain",
        "{}\n",
        style("Type a message and press Enter ('exit' to end)").dim()
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let result = loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!(target: "plain", "\n{}", style("Interrupted, closing session").dim());
                break Ok(());
            }
            changed = view.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let current = view.borrow_and_update().clone();
                renderer.render(&current);
            }
            line = input.next() => match line.context("reading user input") {
                Ok(Some(text)) => {
                    if let Err(e) = session.submit(text).await {
                        debug!("input not submitted: {}", e);
                    }
                }
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            },
        }
    };

    session.shutdown().await;
    info!(target: "plain", "{}", style("Goodbye!").bold());
    result
}
