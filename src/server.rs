//! Server configuration and startup.
use crate::backend::InferenceBackend;
use crate::normalize::DEFAULT_MODEL;
use crate::{AppState, build_metrics_layer_and_handle, build_metrics_router, build_router};
use bon::Builder;
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// Everything the server needs to start. Built once and passed to [`start_server`].
#[derive(Debug, Clone, Builder)]
pub struct ServerConfig {
    #[builder(default = DEFAULT_HOST.to_string())]
    pub host: String,
    #[builder(default = DEFAULT_PORT)]
    pub port: u16,
    /// Model reported when a request does not name one.
    #[builder(default = DEFAULT_MODEL.to_string())]
    pub default_model: String,
    /// Serve Prometheus metrics on a separate port when set.
    pub metrics: Option<MetricsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    pub port: u16,
    pub prefix: String,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Bind the configured address and serve until the listener fails.
#[instrument(skip(config, backend), fields(addr = %config.bind_addr()))]
pub async fn start_server<B: InferenceBackend>(
    config: ServerConfig,
    backend: B,
) -> anyhow::Result<()> {
    info!(
        default_model = %config.default_model,
        "Starting Tenstorrent stub server"
    );

    let app_state = AppState::new(config.default_model.clone(), backend);
    let mut router = build_router(app_state);

    if let Some(metrics) = &config.metrics {
        let (prometheus_layer, handle) = build_metrics_layer_and_handle(metrics.prefix.clone());
        router = router.layer(prometheus_layer);

        let metrics_addr = format!("{}:{}", config.host, metrics.port);
        let metrics_listener = TcpListener::bind(&metrics_addr).await?;
        info!("Metrics server listening on {}", metrics_addr);

        let metrics_router = build_metrics_router(handle);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(metrics_listener, metrics_router).await {
                error!("Metrics server failed: {}", e);
            }
        });
    }

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Tenstorrent stub server listening on {}", bind_addr);

    axum::serve(listener, router).await?;

    Ok(())
}
