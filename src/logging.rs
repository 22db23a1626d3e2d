//! Tracing setup
use crate::errors::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Resolve a level name such as `debug`, `WARNING` or `critical`.
///
/// `None` resolves to info.
pub fn resolve_log_level(level: Option<&str>) -> Result<LevelFilter, Error> {
    let Some(level) = level else {
        return Ok(LevelFilter::INFO);
    };

    match level.trim().to_ascii_uppercase().as_str() {
        "TRACE" => Ok(LevelFilter::TRACE),
        "DEBUG" => Ok(LevelFilter::DEBUG),
        "INFO" => Ok(LevelFilter::INFO),
        "WARNING" | "WARN" => Ok(LevelFilter::WARN),
        "ERROR" | "CRITICAL" => Ok(LevelFilter::ERROR),
        _ => Err(Error::InvalidLogLevel(level.to_string())),
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `level` when set.
pub fn init_tracing(level: LevelFilter) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string())),
        )
        .init();
}
