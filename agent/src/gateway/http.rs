use super::provider::{ApiProvider, Provider};
use super::AgentGateway;
use crate::error::GatewayError;
use crate::message::Message;
use crate::utils::with_optional_timeout;
use async_trait::async_trait;
use derive_builder::Builder;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};

pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(60);

/// Longest error body kept in [`GatewayError::Status`].
const MAX_ERROR_BODY: usize = 512;

#[derive(Builder, Clone, Debug)]
pub struct GatewayConfig {
    /// The full URL of the chat endpoint
    pub endpoint: Url,
    /// Model id forwarded in the request body
    #[builder(setter(into, strip_option), default)]
    pub model: Option<String>,
    /// Upper bound for the whole call; `None` waits indefinitely
    #[builder(default = "Some(DEFAULT_GATEWAY_TIMEOUT)")]
    pub request_timeout: Option<Duration>,
}

impl GatewayConfig {
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::default()
    }
}

/// [`AgentGateway`] over HTTP JSON.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    provider: ApiProvider,
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: Client::new(),
            provider: ApiProvider::from_endpoint(&config.endpoint),
            config,
        }
    }

    pub fn provider(&self) -> &ApiProvider {
        &self.provider
    }

    async fn post_chat(&self, context: &[Message]) -> Result<String, GatewayError> {
        let body = self
            .provider
            .build_chat_body(self.config.model.as_deref(), context);
        trace!("gateway request body: {}", body);

        let resp = self
            .client
            .post(self.config.endpoint.clone())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&body)?)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes);
            return Err(GatewayError::Status {
                status,
                body: truncate(&text, MAX_ERROR_BODY).to_string(),
            });
        }

        decode_reply(&self.provider, &bytes)
    }
}

#[async_trait]
impl AgentGateway for HttpGateway {
    async fn ask(&self, context: Vec<Message>) -> Result<String, GatewayError> {
        debug!(
            endpoint = %self.config.endpoint,
            messages = context.len(),
            "asking advisory backend"
        );
        with_optional_timeout(
            self.post_chat(&context),
            self.config.request_timeout,
            GatewayError::Timeout,
        )
        .await
    }
}

/// Pull the assistant text out of a raw response body.
fn decode_reply(provider: &ApiProvider, bytes: &[u8]) -> Result<String, GatewayError> {
    let parsed: Value = serde_json::from_slice(bytes)?;
    provider
        .parse_chat_content(&parsed)
        .map(str::to_owned)
        .ok_or_else(|| {
            let raw = parsed.to_string();
            GatewayError::MalformedResponse(truncate(&raw, MAX_ERROR_BODY).to_string())
        })
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
