//! Configuration parsing and validation for the stub server
//!
//! This module handles command-line argument parsing and validation using clap. Every flag can
//! also be supplied through the environment variable named next to it.
use anyhow::anyhow;
use clap::Parser;
use tt_local::server::{MetricsConfig, ServerConfig};

#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// The address on which the server will listen.
    #[arg(long, env = "TT_SERVER_HOST", default_value = tt_local::server::DEFAULT_HOST)]
    pub host: String,

    /// The port on which the server will listen.
    #[arg(short = 'p', long, env = "TT_SERVER_PORT", default_value_t = tt_local::server::DEFAULT_PORT)]
    pub port: u16,

    /// Model used when a request does not name one.
    #[arg(long, env = "TT_MODEL", default_value = tt_local::DEFAULT_MODEL)]
    pub model: String,

    /// Comma-separated models that may run on wormhole cards.
    /// Matching is by case-insensitive prefix. Leave unset for the built-in list.
    #[arg(long, env = "TT_WORMHOLE_SUPPORTED_MODELS", value_delimiter = ',')]
    pub wormhole_models: Vec<String>,

    /// Log level (trace, debug, info, warning, error, critical). RUST_LOG takes precedence.
    #[arg(long, env = "TT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Whether to enable the metrics endpoint.
    #[arg(short = 'm', long, default_value_t = false)]
    pub metrics: bool,

    /// The port on which the metrics server will listen.
    #[arg(long, default_value_t = 9090)]
    pub metrics_port: u16,

    /// The prefix to use for metrics.
    #[arg(long, default_value = "tt_local")]
    pub metrics_prefix: String,
}

impl Config {
    pub fn validate(self) -> Result<Self, anyhow::Error> {
        if self.model.trim().is_empty() {
            return Err(anyhow!("Default model must not be empty"));
        }
        if self.metrics && self.metrics_port == self.port {
            return Err(anyhow!(
                "Metrics port {} clashes with the server port",
                self.metrics_port
            ));
        }
        Ok(self)
    }

    pub fn server_config(&self) -> ServerConfig {
        let metrics = self.metrics.then(|| MetricsConfig {
            port: self.metrics_port,
            prefix: self.metrics_prefix.clone(),
        });

        ServerConfig::builder()
            .host(self.host.clone())
            .port(self.port)
            .default_model(self.model.clone())
            .maybe_metrics(metrics)
            .build()
    }
}
