//! Response envelope construction
//!
//! Every endpoint returns a fixed-shape object: a single choice (or datum) at
//! index 0, a `created` timestamp taken at build time, and zeroed usage.
use crate::schemas::Usage;
use crate::schemas::chat_completions::{ChatCompletionResponse, ChatMessage, Choice};
use crate::schemas::completions::{CompletionChoice, CompletionResponse};
use crate::schemas::embeddings::{EmbeddingData, EmbeddingsResponse, EmbeddingsUsage};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

pub const CHAT_COMPLETION_ID: &str = "chatcmpl-local-stub";
pub const COMPLETION_ID: &str = "cmpl-local-stub";

const FINISH_REASON_STOP: &str = "stop";
const ASSISTANT_ROLE: &str = "assistant";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Chat,
    Completion,
    Embedding,
}

impl EndpointKind {
    /// The `object` tag of the envelope.
    pub fn object(self) -> &'static str {
        match self {
            EndpointKind::Chat => "chat.completion",
            EndpointKind::Completion => "text_completion",
            EndpointKind::Embedding => "list",
        }
    }

    /// Fixed response id. Embedding envelopes carry none.
    pub fn response_id(self) -> Option<&'static str> {
        match self {
            EndpointKind::Chat => Some(CHAT_COMPLETION_ID),
            EndpointKind::Completion => Some(COMPLETION_ID),
            EndpointKind::Embedding => None,
        }
    }
}

/// What a backend produced for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceOutput {
    Chat(String),
    Completion(String),
    Embedding(Vec<f32>),
}

impl InferenceOutput {
    pub fn kind(&self) -> EndpointKind {
        match self {
            InferenceOutput::Chat(_) => EndpointKind::Chat,
            InferenceOutput::Completion(_) => EndpointKind::Completion,
            InferenceOutput::Embedding(_) => EndpointKind::Embedding,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Envelope {
    Chat(ChatCompletionResponse),
    Completion(CompletionResponse),
    Embedding(EmbeddingsResponse),
}

impl Envelope {
    pub fn kind(&self) -> EndpointKind {
        match self {
            Envelope::Chat(_) => EndpointKind::Chat,
            Envelope::Completion(_) => EndpointKind::Completion,
            Envelope::Embedding(_) => EndpointKind::Embedding,
        }
    }
}

/// Wrap `output` in the envelope for its endpoint, stamped with the current time.
pub fn build_envelope(model: &str, output: InferenceOutput) -> Envelope {
    build_envelope_at(model, output, unix_now())
}

pub fn build_envelope_at(model: &str, output: InferenceOutput, created: u64) -> Envelope {
    let kind = output.kind();
    let id = kind.response_id().unwrap_or_default().to_string();

    match output {
        InferenceOutput::Chat(content) => Envelope::Chat(ChatCompletionResponse {
            id,
            object: kind.object().to_string(),
            created,
            model: model.to_string(),
            choices: vec![Choice {
                index: 0,
                message: ChatMessage::new(ASSISTANT_ROLE, content),
                finish_reason: FINISH_REASON_STOP.to_string(),
            }],
            usage: Usage::default(),
        }),
        InferenceOutput::Completion(text) => Envelope::Completion(CompletionResponse {
            id,
            object: kind.object().to_string(),
            created,
            model: model.to_string(),
            choices: vec![CompletionChoice {
                index: 0,
                text,
                logprobs: None,
                finish_reason: FINISH_REASON_STOP.to_string(),
            }],
            usage: Usage::default(),
        }),
        InferenceOutput::Embedding(embedding) => Envelope::Embedding(EmbeddingsResponse {
            object: kind.object().to_string(),
            data: vec![EmbeddingData {
                object: "embedding".to_string(),
                index: 0,
                embedding,
            }],
            model: model.to_string(),
            usage: EmbeddingsUsage::default(),
        }),
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_envelope() {
        let envelope = build_envelope_at("m", InferenceOutput::Chat("Hi".into()), 1_700_000_000);
        let Envelope::Chat(response) = envelope else {
            panic!("Expected chat envelope");
        };

        assert_eq!(response.id, "chatcmpl-local-stub");
        assert_eq!(response.object, "chat.completion");
        assert_eq!(response.created, 1_700_000_000);
        assert_eq!(response.choices.len(), 1);
        assert_eq!(response.choices[0].index, 0);
        assert_eq!(response.choices[0].message.role, "assistant");
        assert_eq!(response.choices[0].message.content, "Hi");
        assert_eq!(response.choices[0].finish_reason, "stop");
        assert_eq!(response.usage, Usage::default());
    }

    #[test]
    fn test_completion_envelope_json() {
        let envelope = build_envelope_at("m1", InferenceOutput::Completion("text".into()), 7);
        assert_eq!(envelope.kind(), EndpointKind::Completion);

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["id"], "cmpl-local-stub");
        assert_eq!(json["object"], "text_completion");
        assert_eq!(json["model"], "m1");
        assert!(json["choices"][0]["logprobs"].is_null());
        assert!(json["choices"][0].as_object().unwrap().contains_key("logprobs"));
        assert_eq!(json["choices"][0]["finish_reason"], "stop");
        assert_eq!(json["usage"]["prompt_tokens"], 0);
        assert_eq!(json["usage"]["completion_tokens"], 0);
        assert_eq!(json["usage"]["total_tokens"], 0);
    }

    #[test]
    fn test_embedding_envelope_json() {
        let envelope = build_envelope("m", InferenceOutput::Embedding(vec![0.0; 4]));
        let json = serde_json::to_value(&envelope).unwrap();

        let object = json.as_object().unwrap();
        assert!(!object.contains_key("id"));
        assert!(!object.contains_key("created"));
        assert_eq!(json["object"], "list");
        assert_eq!(json["data"][0]["object"], "embedding");
        assert_eq!(json["data"][0]["index"], 0);
        assert_eq!(json["data"][0]["embedding"].as_array().unwrap().len(), 4);
        assert!(json["data"][0].get("finish_reason").is_none());
        assert_eq!(json["usage"], serde_json::json!({"prompt_tokens": 0, "total_tokens": 0}));
    }

    #[test]
    fn test_created_is_current_time() {
        let before = unix_now();
        let Envelope::Chat(response) = build_envelope("m", InferenceOutput::Chat(String::new()))
        else {
            panic!("Expected chat envelope");
        };
        let after = unix_now();
        assert!(before <= response.created && response.created <= after);
    }
}
