//! tt-local - an OpenAI-compatible surface for local Tenstorrent inference
//!
//! This library provides a stub server exposing chat, completion and embedding endpoints in the
//! OpenAI response shapes, and a thin client that speaks the same protocol to a deployment.
//! Inference itself sits behind the [`backend::InferenceBackend`] trait; the bundled
//! [`backend::StubBackend`] returns placeholder results.

use axum::Router;
use axum::routing::{get, post};
use axum_prometheus::{
    GenericMetricLayer, Handle, PrometheusMetricLayerBuilder,
    metrics_exporter_prometheus::PrometheusHandle,
};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{info, instrument};

pub mod api_client;
pub mod backend;
pub mod cards;
pub mod client;
pub mod envelope;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod schemas;
pub mod server;

use backend::InferenceBackend;
use normalize::Normalizer;

pub use normalize::DEFAULT_MODEL;
pub use server::{ServerConfig, start_server};

/// Shared, read-only state for the request handlers
#[derive(Debug)]
pub struct AppState<B: InferenceBackend> {
    pub backend: Arc<B>,
    pub normalizer: Normalizer,
}

impl<B: InferenceBackend> AppState<B> {
    /// Create a new AppState serving `default_model` when requests omit one
    pub fn new(default_model: impl Into<Arc<str>>, backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            normalizer: Normalizer::new(default_model),
        }
    }
}

impl<B: InferenceBackend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            normalizer: self.normalizer.clone(),
        }
    }
}

/// Build the main router
/// This creates routes for:
/// - `POST /v1/chat/completions`
/// - `POST /v1/completions`
/// - `POST /v1/embeddings`
/// - `GET /v1/models` - Returns the default model
///
/// Any other path returns 404.
#[instrument(skip(state))]
pub fn build_router<B: InferenceBackend>(state: AppState<B>) -> Router {
    info!("Building router");
    Router::new()
        .route("/v1/models", get(handlers::models::<B>))
        .route("/v1/chat/completions", post(handlers::chat_completions::<B>))
        .route("/v1/completions", post(handlers::completions::<B>))
        .route("/v1/embeddings", post(handlers::embeddings::<B>))
        .with_state(state)
}

/// Builds a router for the metrics endpoint.
#[instrument(skip(handle))]
pub fn build_metrics_router(handle: PrometheusHandle) -> Router {
    info!("Building metrics router");
    Router::new().route(
        "/metrics",
        axum::routing::get(move || async move { handle.render() }),
    )
}

type MetricsLayerAndHandle = (
    GenericMetricLayer<'static, PrometheusHandle, Handle>,
    PrometheusHandle,
);

/// Builds a layer and handle for prometheus metrics collection.
///
/// The prometheus recorder is process-global, so this can only be called once per process.
pub fn build_metrics_layer_and_handle(
    prefix: impl Into<Cow<'static, str>>,
) -> MetricsLayerAndHandle {
    info!("Building metrics layer");
    PrometheusMetricLayerBuilder::new()
        .with_prefix(prefix)
        .enable_response_body_size(true)
        .with_endpoint_label_type(axum_prometheus::EndpointLabel::Exact)
        .with_default_metrics()
        .build_pair()
}
