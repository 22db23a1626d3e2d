//! Turns raw request bodies into typed request records.
//!
//! Parsing is the only step that can fail: once a body is valid JSON, every
//! field is coerced or defaulted and never rejected. Fields with the wrong
//! type are treated as absent.
use crate::errors::Error;
use crate::schemas::chat_completions::{ChatMessage, ChatRequest};
use crate::schemas::completions::CompletionRequest;
use crate::schemas::embeddings::EmbeddingRequest;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Model name used when neither the request nor the configuration names one.
pub const DEFAULT_MODEL: &str = "local-tenstorrent";

const DEFAULT_ROLE: &str = "user";

pub type Payload = Map<String, Value>;

/// Parse a request body into a JSON object.
///
/// An empty body, or valid JSON that is not an object, yields an empty
/// mapping so that every field falls back to its default.
pub fn parse_payload(body: &[u8]) -> Result<Payload, Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Payload::new());
    }

    match serde_json::from_slice::<Value>(body)? {
        Value::Object(map) => Ok(map),
        other => {
            debug!(kind = json_kind(&other), "Ignoring non-object JSON payload");
            Ok(Payload::new())
        }
    }
}

/// Applies the field defaulting rules for each endpoint.
#[derive(Debug, Clone)]
pub struct Normalizer {
    default_model: Arc<str>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl Normalizer {
    pub fn new(default_model: impl Into<Arc<str>>) -> Self {
        Self {
            default_model: default_model.into(),
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn chat(&self, payload: &Payload) -> ChatRequest {
        let messages = match payload.get("messages") {
            Some(Value::Array(items)) => items.iter().filter_map(message).collect(),
            _ => Vec::new(),
        };

        ChatRequest {
            model: self.model(payload),
            messages,
            max_tokens: max_tokens(payload),
            temperature: temperature(payload),
            stream: stream(payload),
        }
    }

    pub fn completion(&self, payload: &Payload) -> CompletionRequest {
        CompletionRequest {
            model: self.model(payload),
            prompt: payload
                .get("prompt")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            max_tokens: max_tokens(payload),
            temperature: temperature(payload),
            stream: stream(payload),
        }
    }

    pub fn embedding(&self, payload: &Payload) -> EmbeddingRequest {
        let input = match payload.get("input") {
            Some(Value::String(text)) => vec![text.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };

        // Non-positive widths mean "use the default", same as absent.
        let dimensions = payload
            .get("dimensions")
            .and_then(Value::as_i64)
            .filter(|d| *d > 0)
            .and_then(|d| u32::try_from(d).ok());

        EmbeddingRequest {
            model: self.model(payload),
            input,
            dimensions,
        }
    }

    fn model(&self, payload: &Payload) -> String {
        payload
            .get("model")
            .and_then(Value::as_str)
            .filter(|model| !model.trim().is_empty())
            .unwrap_or(&*self.default_model)
            .to_string()
    }
}

fn max_tokens(payload: &Payload) -> Option<u32> {
    payload
        .get("max_tokens")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

fn temperature(payload: &Payload) -> Option<f64> {
    payload.get("temperature").and_then(Value::as_f64)
}

fn stream(payload: &Payload) -> bool {
    payload
        .get("stream")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn message(value: &Value) -> Option<ChatMessage> {
    let object = value.as_object()?;
    let role = object
        .get("role")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_ROLE);
    let content = match object.get("content") {
        Some(Value::String(text)) => text.clone(),
        // Multimodal content: keep the text parts only.
        Some(Value::Array(parts)) => parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect(),
        _ => String::new(),
    };
    Some(ChatMessage::new(role, content))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
