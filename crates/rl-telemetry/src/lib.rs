//! # RL Telemetry
//!
//! Structured logging for RWA-Lending services, built on `tracing` and
//! `tracing-subscriber`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rl_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())?;
//!     // Logs from every crate now go through the configured subscriber
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RL_SERVICE_NAME` | `rwa-lending` | Service name on the startup line |
//! | `RL_LOG_LEVEL` / `RUST_LOG` | `info` | Filter directive |
//! | `RL_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `RL_JSON_LOGS` | `false` (`true` in containers) | JSON lines output |

mod config;
mod logging;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("Invalid log filter {0}")]
    InvalidFilter(String),

    /// A global subscriber was already installed. Not fatal: logs keep
    /// flowing to the existing subscriber.
    #[error("Telemetry already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Install the global log subscriber.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    logging::init_logging(&config)?;

    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        json = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active. Logs a final line when dropped.
#[derive(Debug)]
pub struct TelemetryGuard {
    service_name: String,
}

impl TelemetryGuard {
    /// Service this guard was created for.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}
