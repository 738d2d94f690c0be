//! The single outbound call to the advisory backend.

mod http;
mod provider;

pub use http::{GatewayConfig, GatewayConfigBuilder, HttpGateway};
pub use provider::{ApiProvider, Ollama, OpenAiCompatible, Plain, Provider};

use crate::error::GatewayError;
use crate::message::Message;
use async_trait::async_trait;

/// Advisory backend.
///
/// Implementations treat the reply as opaque text.
#[async_trait]
pub trait AgentGateway: Send + Sync {
    /// Ask the backend for a reply.
    ///
    /// `context` is the conversation without the greeting. Its last element is
    /// the user message carrying the built prompt.
    async fn ask(&self, context: Vec<Message>) -> Result<String, GatewayError>;
}
