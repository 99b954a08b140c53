//! Subscriber installation.
//!
//! JSON output carries target, thread, file and line so that a log shipper
//! can index it without parsing the message. Human-readable output keeps
//! only the target.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Parse the configured filter directive.
pub(crate) fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::InvalidFilter(format!("{}: {}", config.log_level, e)))
}

/// Install the global subscriber.
pub(crate) fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if config.json_logs {
        // JSON output for containers/production
        let json_layer = config.console_output.then(|| {
            fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
        });
        registry.with(json_layer).try_init()
    } else {
        // Pretty output for development
        let fmt_layer = config
            .console_output
            .then(|| fmt::layer().with_target(true).with_ansi(true));
        registry.with(fmt_layer).try_init()
    };

    installed.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))
}
