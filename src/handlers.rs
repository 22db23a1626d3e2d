/// Axum handlers for the stub server
///
/// Each inference handler runs the same pipeline: parse the body, normalize it into a typed
/// request, ask the backend for a result, then wrap the result in its envelope. Bodies are taken
/// as raw bytes so that malformed JSON is reported as a plain-text 400 whatever the content type.
use crate::AppState;
use crate::backend::InferenceBackend;
use crate::envelope::{Envelope, InferenceOutput, build_envelope};
use crate::errors::Error;
use crate::models::ListModelResponse;
use crate::normalize::parse_payload;
use axum::{Json, body::Bytes, extract::State, response::IntoResponse};
use tracing::{debug, instrument};

/// Handler for POST /v1/chat/completions
#[instrument(skip(state, body))]
pub async fn chat_completions<B: InferenceBackend>(
    State(state): State<AppState<B>>,
    body: Bytes,
) -> Result<Json<Envelope>, Error> {
    let payload = parse_payload(&body)?;
    let request = state.normalizer.chat(&payload);

    debug!(
        message_count = request.messages.len(),
        model = %request.model,
        max_tokens = ?request.max_tokens,
        temperature = ?request.temperature,
        stream = request.stream,
        "Handling chat completion"
    );

    let content = state.backend.chat(&request).await?;
    Ok(Json(build_envelope(
        &request.model,
        InferenceOutput::Chat(content),
    )))
}

/// Handler for POST /v1/completions
#[instrument(skip(state, body))]
pub async fn completions<B: InferenceBackend>(
    State(state): State<AppState<B>>,
    body: Bytes,
) -> Result<Json<Envelope>, Error> {
    let payload = parse_payload(&body)?;
    let request = state.normalizer.completion(&payload);

    debug!(
        prompt_length = request.prompt.len(),
        model = %request.model,
        max_tokens = ?request.max_tokens,
        temperature = ?request.temperature,
        stream = request.stream,
        "Handling text completion"
    );

    let text = state.backend.completion(&request).await?;
    Ok(Json(build_envelope(
        &request.model,
        InferenceOutput::Completion(text),
    )))
}

/// Handler for POST /v1/embeddings
#[instrument(skip(state, body))]
pub async fn embeddings<B: InferenceBackend>(
    State(state): State<AppState<B>>,
    body: Bytes,
) -> Result<Json<Envelope>, Error> {
    let payload = parse_payload(&body)?;
    let request = state.normalizer.embedding(&payload);

    debug!(
        input_count = request.input.len(),
        model = %request.model,
        dimensions = ?request.dimensions,
        "Handling embeddings"
    );

    let vector = state.backend.embedding(&request).await?;
    Ok(Json(build_envelope(
        &request.model,
        InferenceOutput::Embedding(vector),
    )))
}

/// Handler for GET /v1/models
#[instrument(skip(state))]
pub async fn models<B: InferenceBackend>(State(state): State<AppState<B>>) -> impl IntoResponse {
    Json(ListModelResponse::from_default_model(
        state.normalizer.default_model(),
    ))
}
