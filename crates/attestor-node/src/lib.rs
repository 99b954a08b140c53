//! # Attestor Node
//!
//! Runtime wiring for the oracle attestor process. The `main.rs` binary is a
//! thin shell over [`load_config`] and [`AttestorNode`]; both live here so
//! they can be driven from tests.
//!
//! ## Startup Sequence
//!
//! ```text
//! env ──load_config──→ NodeConfig ──AttestorNode::new──→ start() ──→ listening
//!                                                           │
//!                                       Ctrl+C ──shutdown()─┘──→ drained, stopped
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Required | Description |
//! |----------|----------|-------------|
//! | `RL_ORACLE_PRIVATE_KEY` | yes | Oracle secp256k1 key, hex (`0x` optional) |
//! | `RL_ORACLE_*`, `RL_VALUATION_*`, `RL_MAX_TTL_SECS`, `RL_CORS_ORIGINS` | no | See `AttestorConfig` |
//! | `RL_LOG_LEVEL`, `RL_JSON_LOGS`, `RL_SERVICE_NAME` | no | See `rl-telemetry` |

#![cfg_attr(test, allow(clippy::unwrap_used))]

use rl_02_oracle_attestor::{AttestorConfig, AttestorError, AttestorService, ConfigError, OracleSigner};
use rl_telemetry::TelemetryConfig;
use shared_types::{to_checksum_address, Address};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};
use zeroize::Zeroizing;

/// Service name reported by telemetry.
pub const SERVICE_NAME: &str = "rl-oracle-attestor";

/// Variable holding the oracle private key.
pub const PRIVATE_KEY_VAR: &str = "RL_ORACLE_PRIVATE_KEY";

/// Startup failures.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("RL_ORACLE_PRIVATE_KEY is not set")]
    MissingPrivateKey,

    #[error("invalid attestor configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Attestor(#[from] AttestorError),

    #[error("node already started")]
    AlreadyStarted,
}

/// Everything the node reads from its environment.
#[derive(Debug)]
pub struct NodeConfig {
    pub attestor: AttestorConfig,
    pub telemetry: TelemetryConfig,
    pub signer: OracleSigner,
}

/// Load the node configuration from the process environment.
pub fn load_config() -> Result<NodeConfig, NodeError> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an injectable variable source.
pub fn load_config_from<F>(lookup: F) -> Result<NodeConfig, NodeError>
where
    F: Fn(&str) -> Option<String>,
{
    let attestor = AttestorConfig::from_lookup(&lookup)?;
    attestor.validate()?;

    let mut telemetry = TelemetryConfig::from_lookup(&lookup);
    if lookup("RL_SERVICE_NAME").is_none() {
        telemetry.service_name = SERVICE_NAME.to_string();
    }

    let key = Zeroizing::new(lookup(PRIVATE_KEY_VAR).ok_or(NodeError::MissingPrivateKey)?);
    let signer = OracleSigner::from_hex(&key)?;

    Ok(NodeConfig {
        attestor,
        telemetry,
        signer,
    })
}

/// The running attestor process.
pub struct AttestorNode {
    service: Arc<AttestorService>,
    shutdown_tx: watch::Sender<bool>,
    server: Option<JoinHandle<Result<(), AttestorError>>>,
}

impl AttestorNode {
    /// Build the node. Does not bind any socket yet.
    pub fn new(attestor: AttestorConfig, signer: OracleSigner) -> Result<Self, NodeError> {
        info!("Creating oracle attestor node");
        let service = AttestorService::new(attestor, signer)?;
        let (shutdown_tx, _) = watch::channel(false);

        Ok(Self {
            service: Arc::new(service),
            shutdown_tx,
            server: None,
        })
    }

    /// Address the attestor signs with.
    pub fn signer_address(&self) -> Address {
        self.service.signer_address()
    }

    /// Bind the configured address and start serving in the background.
    pub async fn start(&mut self) -> Result<SocketAddr, NodeError> {
        let addr = self.service.config().http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AttestorError::Bind(format!("{}: {}", addr, e)))?;
        self.start_on(listener)
    }

    /// Start serving on an already-bound listener.
    pub fn start_on(&mut self, listener: TcpListener) -> Result<SocketAddr, NodeError> {
        if self.server.is_some() {
            return Err(NodeError::AlreadyStarted);
        }
        let local = listener.local_addr().map_err(AttestorError::from)?;

        let service = Arc::clone(&self.service);
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let shutdown = async move {
            // Sender dropped counts as shutdown too
            let _ = shutdown_rx.wait_for(|stop| *stop).await;
        };
        self.server = Some(tokio::spawn(async move {
            service.serve(listener, shutdown).await
        }));

        info!("===========================================");
        info!("  RWA-Lending Oracle Attestor v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");
        info!("HTTP: {}", local);
        info!("Oracle signer: {}", to_checksum_address(&self.signer_address()));

        Ok(local)
    }

    /// Stop accepting connections and wait for in-flight requests to finish.
    pub async fn shutdown(mut self) -> Result<(), NodeError> {
        info!("Initiating graceful shutdown...");

        if self.shutdown_tx.send(true).is_err() {
            // No receiver: the server task already exited
            info!("Server was not running");
        }

        if let Some(server) = self.server.take() {
            match server.await {
                Ok(result) => result?,
                Err(e) => error!("Server task failed: {}", e),
            }
        }

        info!("Shutdown complete");
        Ok(())
    }
}
