//! Inference backends
//!
//! Handlers only ever talk to an [`InferenceBackend`], so a hardware-backed
//! implementation can replace [`StubBackend`] without touching request
//! normalization or response shaping.
use crate::cards::CardPlanner;
use crate::errors::Error;
use crate::schemas::chat_completions::ChatRequest;
use crate::schemas::completions::CompletionRequest;
use crate::schemas::embeddings::EmbeddingRequest;
use async_trait::async_trait;
use tracing::trace;

#[async_trait]
pub trait InferenceBackend: Send + Sync + 'static {
    /// Produce the assistant reply for a conversation.
    async fn chat(&self, request: &ChatRequest) -> Result<String, Error>;

    /// Produce the continuation of a prompt.
    async fn completion(&self, request: &CompletionRequest) -> Result<String, Error>;

    /// Produce one vector of `request.effective_dimensions()` values.
    async fn embedding(&self, request: &EmbeddingRequest) -> Result<Vec<f32>, Error>;
}

/// Placeholder backend returning fixed text and zero vectors.
///
/// `max_tokens` and `temperature` are ignored, so an absent value and zero
/// behave identically here.
#[derive(Debug, Clone, Default)]
pub struct StubBackend {
    planner: CardPlanner,
}

impl StubBackend {
    pub fn new(planner: CardPlanner) -> Self {
        Self { planner }
    }

    pub fn planner(&self) -> &CardPlanner {
        &self.planner
    }
}

#[async_trait]
impl InferenceBackend for StubBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<String, Error> {
        let cards = self.planner.plan(&request.model);
        trace!(model = %request.model, %cards, "Stub chat inference");
        Ok(format!(
            "[stub] Replace with Tenstorrent chat inference for {} using {}.",
            request.model, cards
        ))
    }

    async fn completion(&self, request: &CompletionRequest) -> Result<String, Error> {
        let cards = self.planner.plan(&request.model);
        trace!(model = %request.model, %cards, "Stub completion inference");
        Ok(format!(
            "[stub] Replace with Tenstorrent completion for {} using {}.",
            request.model, cards
        ))
    }

    async fn embedding(&self, request: &EmbeddingRequest) -> Result<Vec<f32>, Error> {
        let dimensions = request.effective_dimensions() as usize;
        trace!(model = %request.model, dimensions, "Stub embedding inference");
        Ok(vec![0.0; dimensions])
    }
}
