use crate::message::Message;
use enum_dispatch::enum_dispatch;
use reqwest::Url;
use serde_json::{json, Map, Value};

/// Wire format of a chat backend.
#[enum_dispatch]
pub trait Provider {
    /// Build the request body (default: `{"model"?, "messages": [..]}`)
    fn build_chat_body(&self, model_id: Option<&str>, messages: &[Message]) -> Value {
        let mut body = Map::new();
        if let Some(model_id) = model_id {
            body.insert("model".to_string(), json!(model_id));
        }
        body.insert("messages".to_string(), wire_messages(messages));
        Value::Object(body)
    }

    /// Extract the assistant text from the parsed reply
    fn parse_chat_content<'a>(&self, response: &'a Value) -> Option<&'a str>;
}

/// OpenAI-style `/v1/chat/completions`.
#[derive(Debug, Clone, Default)]
pub struct OpenAiCompatible;

impl Provider for OpenAiCompatible {
    fn parse_chat_content<'a>(&self, response: &'a Value) -> Option<&'a str> {
        response["choices"][0]["message"]["content"].as_str()
    }
}

/// Ollama `/api/chat`.
#[derive(Debug, Clone, Default)]
pub struct Ollama;

impl Provider for Ollama {
    fn build_chat_body(&self, model_id: Option<&str>, messages: &[Message]) -> Value {
        let mut body = OpenAiCompatible.build_chat_body(model_id, messages);
        body["stream"] = json!(false);
        body
    }

    fn parse_chat_content<'a>(&self, response: &'a Value) -> Option<&'a str> {
        response["message"]["content"].as_str()
    }
}

/// A backend that answers with bare text, either as a JSON string or
/// under `reply`, `response` or `content`.
#[derive(Debug, Clone, Default)]
pub struct Plain;

impl Provider for Plain {
    fn parse_chat_content<'a>(&self, response: &'a Value) -> Option<&'a str> {
        response
            .as_str()
            .or_else(|| response["reply"].as_str())
            .or_else(|| response["response"].as_str())
            .or_else(|| response["content"].as_str())
    }
}

#[enum_dispatch(Provider)]
#[derive(Debug, Clone)]
pub enum ApiProvider {
    OpenAiCompatible,
    Ollama,
    Plain,
}

impl ApiProvider {
    /// Detect the wire format from the endpoint path
    pub fn from_endpoint(endpoint: &Url) -> Self {
        let path = endpoint.path().trim_end_matches('/');
        if path.contains("/chat/completions") {
            OpenAiCompatible.into()
        } else if path.ends_with("/api/chat") {
            Ollama.into()
        } else {
            Plain.into()
        }
    }
}

fn wire_messages(messages: &[Message]) -> Value {
    Value::Array(
        messages
            .iter()
            .map(|m| json!({ "role": m.role().as_str(), "content": m.content() }))
            .collect(),
    )
}
