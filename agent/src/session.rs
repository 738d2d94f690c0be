//! Runs a [`ChatController`] and a [`MarketFeedPoller`] on one task.
//!
//! All session state lives on that task. Callers talk to it through an
//! [`AdvisorSession`] handle and observe it through a watch channel of
//! [`SessionView`]s.

use crate::controller::{ChatController, ExchangeId, SessionView};
use crate::error::{GatewayError, SubmitRejected};
use crate::gateway::AgentGateway;
use crate::market::poller::MarketFeedPoller;
use crate::market::MarketSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const COMMAND_BUFFER: usize = 16;

enum Command {
    Submit {
        text: String,
        ack: oneshot::Sender<Result<(), SubmitRejected>>,
    },
}

type CallResult = (ExchangeId, Result<String, GatewayError>);

/// Handle to a running advisor session.
///
/// Dropping the handle tears the session down in the background; use
/// [`AdvisorSession::shutdown`] to wait for it.
pub struct AdvisorSession {
    commands: mpsc::Sender<Command>,
    view: watch::Receiver<SessionView>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl AdvisorSession {
    /// Spawn the session task. Must be called from within a tokio runtime.
    pub fn start(
        source: Arc<dyn MarketSource>,
        gateway: Arc<dyn AgentGateway>,
        poll_interval: Duration,
    ) -> Self {
        let controller = ChatController::new();
        let (view_tx, view_rx) = watch::channel(controller.view());
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
        let cancel = CancellationToken::new();

        let task = SessionTask {
            controller,
            poller: MarketFeedPoller::new(source, poll_interval),
            gateway,
            view: view_tx,
        };
        let task = tokio::spawn(task.run(cmd_rx, cancel.clone()));
        info!("advisor session started");

        Self {
            commands: cmd_tx,
            view: view_rx,
            cancel,
            task: Some(task),
        }
    }

    /// Submit raw user input.
    ///
    /// Resolves once the session has accepted or rejected the input. The reply
    /// itself arrives later through the view.
    pub async fn submit(&self, text: impl Into<String>) -> Result<(), SubmitRejected> {
        let (ack, ack_rx) = oneshot::channel();
        let command = Command::Submit {
            text: text.into(),
            ack,
        };
        if self.commands.send(command).await.is_err() {
            return Err(SubmitRejected::Closed);
        }
        ack_rx.await.unwrap_or(Err(SubmitRejected::Closed))
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view.clone()
    }

    /// The latest published view.
    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }

    /// Stop polling, drop any in-flight call and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("advisor session task failed: {}", e);
            }
        }
    }
}

impl Drop for AdvisorSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct SessionTask {
    controller: ChatController,
    poller: MarketFeedPoller,
    gateway: Arc<dyn AgentGateway>,
    view: watch::Sender<SessionView>,
}

impl SessionTask {
    async fn run(mut self, mut commands: mpsc::Receiver<Command>, cancel: CancellationToken) {
        let (snapshot_tx, mut snapshots) = mpsc::unbounded_channel();
        self.poller.start(move |snapshot| {
            let _ = snapshot_tx.send(snapshot);
        });

        let mut calls: JoinSet<CallResult> = JoinSet::new();

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                Some(joined) = calls.join_next() => {
                    let (exchange, outcome) = match joined {
                        Ok(result) => result,
                        Err(e) => {
                            let Some(exchange) = self.controller.pending_exchange() else {
                                continue;
                            };
                            (exchange, Err(GatewayError::Interrupted(e.to_string())))
                        }
                    };
                    if self.controller.resolve(exchange, outcome) {
                        self.publish();
                    }
                }
                Some(snapshot) = snapshots.recv() => {
                    self.controller.apply_snapshot(snapshot);
                    self.publish();
                }
                command = commands.recv() => match command {
                    Some(Command::Submit { text, ack }) => {
                        let result = self.controller.submit(text).map(|dispatch| {
                            let gateway = self.gateway.clone();
                            calls.spawn(async move {
                                let outcome = gateway.ask(dispatch.context).await;
                                (dispatch.exchange, outcome)
                            });
                        });
                        if result.is_ok() {
                            self.publish();
                        } else {
                            debug!("submit rejected: {:?}", result);
                        }
                        let _ = ack.send(result);
                    }
                    None => break,
                },
            }
        }

        self.poller.stop().await;
        self.controller.dispose();
        calls.abort_all();
        self.publish();
        info!("advisor session stopped");
    }

    fn publish(&self) {
        self.view.send_replace(self.controller.view());
    }
}
