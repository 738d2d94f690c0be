//! In-crate fakes for the market and gateway seams.

use crate::error::{FeedError, GatewayError};
use crate::gateway::AgentGateway;
use crate::market::{AssetQuote, MarketSource};
use crate::message::Message;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::{oneshot, Notify};

/// Replays a fixed script of fetch results.
///
/// Once the script runs out, every call repeats the last successful quotes
/// (or an empty list if there never was one).
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<Vec<AssetQuote>, FeedError>>>,
    last_ok: Mutex<Vec<AssetQuote>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<Vec<AssetQuote>, FeedError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last_ok: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketSource for ScriptedSource {
    async fn fetch_quotes(&self) -> Result<Vec<AssetQuote>, FeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(quotes)) => {
                *self.last_ok.lock().unwrap() = quotes.clone();
                Ok(quotes)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self.last_ok.lock().unwrap().clone()),
        }
    }
}

/// Gateway whose replies are released by the test.
///
/// Every call records its context and then waits for the next scripted reply,
/// pushed with [`ManualGateway::reply`] or [`ManualGateway::fail`].
#[derive(Default)]
pub struct ManualGateway {
    contexts: Mutex<Vec<Vec<Message>>>,
    waiting: Mutex<VecDeque<oneshot::Sender<Result<String, GatewayError>>>>,
    arrived: Notify,
}

impl ManualGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contexts of every call so far, in call order.
    pub fn contexts(&self) -> Vec<Vec<Message>> {
        self.contexts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.contexts.lock().unwrap().len()
    }

    /// Wait until a call is waiting for its reply.
    pub async fn wait_for_call(&self) {
        loop {
            let notified = self.arrived.notified();
            if !self.waiting.lock().unwrap().is_empty() {
                return;
            }
            notified.await;
        }
    }

    pub async fn reply(&self, text: &str) {
        self.release(Ok(text.to_string())).await;
    }

    pub async fn fail(&self, error: GatewayError) {
        self.release(Err(error)).await;
    }

    async fn release(&self, outcome: Result<String, GatewayError>) {
        self.wait_for_call().await;
        let tx = self.waiting.lock().unwrap().pop_front();
        if let Some(tx) = tx {
            let _ = tx.send(outcome);
        }
    }
}

#[async_trait]
impl AgentGateway for ManualGateway {
    async fn ask(&self, context: Vec<Message>) -> Result<String, GatewayError> {
        let (tx, rx) = oneshot::channel();
        self.contexts.lock().unwrap().push(context);
        self.waiting.lock().unwrap().push_back(tx);
        self.arrived.notify_waiters();
        rx.await
            .unwrap_or_else(|_| Err(GatewayError::Interrupted("test gateway dropped".into())))
    }
}
