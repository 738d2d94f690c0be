//! Per-exchange state machine behind the chat.
//!
//! ```text
//!  Idle --submit--> Pending --resolve(Ok)--> Idle
//!                          \-resolve(Err)--> Idle (error text in place of the reply)
//! ```
//!
//! The controller performs no I/O. [`ChatController::submit`] hands back a
//! [`Dispatch`] that the caller forwards to the gateway, and the outcome comes
//! back through [`ChatController::resolve`].

use crate::error::{GatewayError, SubmitRejected};
use crate::market::MarketSnapshot;
use crate::message::Message;
use crate::prompt::build_prompt;
use crate::transcript::Transcript;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Shown in place of the reply when the backend call fails.
pub const ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Identifies one submit/resolve round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExchangeId(u64);

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A gateway call to perform.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub exchange: ExchangeId,
    /// Prior conversation without the greeting, then the built prompt.
    pub context: Vec<Message>,
}

#[derive(Debug)]
struct PendingExchange {
    id: ExchangeId,
    placeholder: usize,
}

/// Read-only state handed to renderers.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub transcript: Arc<[Message]>,
    pub snapshot: MarketSnapshot,
    pub can_submit: bool,
    /// Transcript index of the unresolved placeholder, if any.
    pub pending: Option<usize>,
}

impl SessionView {
    /// Index of the placeholder while an exchange is unresolved.
    ///
    /// A placeholder left behind by dispose stays unresolved.
    pub fn pending_index(&self) -> Option<usize> {
        self.pending
    }
}

#[derive(Debug, Default)]
pub struct ChatController {
    transcript: Transcript,
    snapshot: MarketSnapshot,
    pending: Option<PendingExchange>,
    next_exchange: u64,
    disposed: bool,
}

impl ChatController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn snapshot(&self) -> &MarketSnapshot {
        &self.snapshot
    }

    pub fn can_submit(&self) -> bool {
        self.pending.is_none() && !self.disposed
    }

    pub fn pending_exchange(&self) -> Option<ExchangeId> {
        self.pending.as_ref().map(|p| p.id)
    }

    /// Replace the snapshot used by future submits.
    pub fn apply_snapshot(&mut self, snapshot: MarketSnapshot) {
        if self.disposed {
            return;
        }
        self.snapshot = snapshot;
    }

    /// Start an exchange with the user's raw input.
    ///
    /// On success the transcript has grown by the user message and a
    /// placeholder. The context is captured before that append, so it holds
    /// the prompt but not the raw input.
    pub fn submit(&mut self, input: String) -> Result<Dispatch, SubmitRejected> {
        if self.disposed {
            return Err(SubmitRejected::Closed);
        }
        if self.pending.is_some() {
            return Err(SubmitRejected::Pending);
        }
        if input.trim().is_empty() {
            return Err(SubmitRejected::Empty);
        }

        let mut context = self.transcript.conversation().to_vec();
        context.push(Message::user(build_prompt(&input, self.snapshot.quotes())));

        let id = ExchangeId(self.next_exchange);
        self.next_exchange += 1;
        let placeholder = self.transcript.append_exchange(Message::user(input));
        self.pending = Some(PendingExchange { id, placeholder });
        debug!(exchange = %id, context = context.len(), "exchange dispatched");

        Ok(Dispatch {
            exchange: id,
            context,
        })
    }

    /// Finish `exchange` with the gateway outcome.
    ///
    /// Returns false, and changes nothing, when `exchange` is not the pending
    /// one or the controller is disposed.
    pub fn resolve(&mut self, exchange: ExchangeId, outcome: Result<String, GatewayError>) -> bool {
        if self.disposed {
            debug!(exchange = %exchange, "ignoring result after dispose");
            return false;
        }
        let placeholder = match &self.pending {
            Some(p) if p.id == exchange => p.placeholder,
            _ => {
                debug!(exchange = %exchange, "ignoring result for stale exchange");
                return false;
            }
        };

        let reply = match outcome {
            Ok(text) => Message::system(text),
            Err(e) => {
                warn!(exchange = %exchange, "advisory call failed: {}", e);
                Message::system(ERROR_MESSAGE)
            }
        };
        self.transcript.replace(placeholder, reply);
        self.pending = None;
        true
    }

    /// Enter the terminal state. Idempotent.
    ///
    /// A pending placeholder is left in place and never resolved.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            transcript: self.transcript.messages().into(),
            snapshot: self.snapshot.clone(),
            can_submit: self.can_submit(),
            pending: self.pending.as_ref().map(|p| p.placeholder),
        }
    }
}
