//! Embeddings API schemas
//!
//! These schemas match the OpenAI Embeddings API specification.
//! See: https://platform.openai.com/docs/api-reference/embeddings

use serde::{Deserialize, Serialize};

/// Embedding width used when a request gives none, or a non-positive one.
pub const DEFAULT_EMBEDDING_DIMENSIONS: u32 = 16;

/// Request body for POST /v1/embeddings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    /// The model to use for embeddings
    pub model: String,

    /// Input texts to embed
    pub input: Vec<String>,

    /// Number of dimensions for the embedding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<u32>,
}

impl EmbeddingRequest {
    /// The width every returned vector will have.
    pub fn effective_dimensions(&self) -> u32 {
        match self.dimensions {
            Some(d) if d > 0 => d,
            _ => DEFAULT_EMBEDDING_DIMENSIONS,
        }
    }
}

/// Response from POST /v1/embeddings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingsResponse {
    pub object: String,
    pub data: Vec<EmbeddingData>,
    pub model: String,
    pub usage: EmbeddingsUsage,
}

/// A single embedding result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingData {
    pub object: String,
    pub index: u32,
    pub embedding: Vec<f32>,
}

/// Usage information for embeddings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingsUsage {
    pub prompt_tokens: u32,
    pub total_tokens: u32,
}
