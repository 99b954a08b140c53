//! # RWA-Lending Oracle Attestor
//!
//! Entry point for the attestor process: signs asset valuations for the loan
//! ledger and serves them over HTTP.
//!
//! ```text
//! RL_ORACLE_PRIVATE_KEY=0x... RL_ORACLE_PORT=8080 attestor-node
//! ```
//!
//! The ledger administrator registers the address printed at startup with
//! `setOracleSigner`; attestations from any other key are rejected.

use anyhow::{Context, Result};
use attestor_node::{load_config, AttestorNode};
use rl_telemetry::{init_telemetry, TelemetryError};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = load_config().context("Failed to load attestor configuration")?;

    // Initialize logging
    let _telemetry = match init_telemetry(config.telemetry) {
        Ok(guard) => Some(guard),
        Err(TelemetryError::AlreadyInitialized(reason)) => {
            warn!("Telemetry already initialized: {}", reason);
            None
        }
        Err(e) => return Err(e).context("Failed to initialize telemetry"),
    };

    // Create and start the attestor
    let mut node = AttestorNode::new(config.attestor, config.signer)
        .context("Failed to create attestor node")?;
    node.start().await.context("Failed to start attestor")?;

    // Keep the node running
    info!("Attestor is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    // Graceful shutdown
    node.shutdown().await?;

    Ok(())
}
