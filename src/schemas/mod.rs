//! Request records and response envelopes for the OpenAI-compatible surface.
//!
//! Request records are produced by the [`crate::normalize`] step on the server
//! and serialized as-is by the [`crate::api_client`], so both sides agree on
//! the body shape.

pub mod chat_completions;
pub mod completions;
pub mod embeddings;

use serde::{Deserialize, Serialize};

/// Token usage for chat and text completions. Always zero: no token
/// accounting is performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
