//! Error types for the advisor core.
//!
//! Every error here is recoverable. Feed failures degrade the market snapshot,
//! gateway failures become a fixed transcript message, and rejected submits
//! leave the session untouched.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Failure while refreshing market data.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Transport failure, timeout, or unreadable body.
    #[error("market data request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("market data provider returned {0}")]
    Status(StatusCode),

    /// The body was not a list of quotes.
    #[error("malformed market data: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure of the single outbound call to the advisory backend.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("advisory backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("advisory backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("advisory backend sent invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The reply parsed as JSON but did not carry assistant text.
    #[error("advisory backend reply has no assistant text: {0}")]
    MalformedResponse(String),

    #[error("advisory backend did not answer within {0:?}")]
    Timeout(Duration),

    /// The task running the call panicked or was cancelled.
    #[error("advisory call interrupted: {0}")]
    Interrupted(String),
}

/// Why a submit was refused. Never shown to the user.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("message is empty")]
    Empty,

    #[error("an exchange is already pending")]
    Pending,

    #[error("session is closed")]
    Closed,
}
