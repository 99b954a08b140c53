//! RL-02 Oracle Attestor - signs asset valuations for the loan ledger.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                    ORACLE ATTESTOR (rl-02)                    │
//! ├───────────────────────────────────────────────────────────────┤
//! │   GET  /api/valuation/{assetId}[?ttl=]   POST /api/valuation   │
//! │                         │                                     │
//! │            ┌────────────┴────────────┐                        │
//! │            │  Trace → CORS → Handler │                        │
//! │            └────────────┬────────────┘                        │
//! │                         │                                     │
//! │   ValuationSource ──► AttestationPayload ──► OracleSigner     │
//! │   (fixed / random)      (schema A / B / description)          │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use rl_02_oracle_attestor::{AttestorConfig, AttestorService, OracleSigner};
//!
//! let config = AttestorConfig::from_env()?;
//! let signer = OracleSigner::from_hex(&std::env::var("RL_ORACLE_PRIVATE_KEY")?)?;
//! let service = AttestorService::new(config, signer)?;
//! service.run(async { let _ = tokio::signal::ctrl_c().await; }).await?;
//! ```
//!
//! # Security
//!
//! - The signing key never leaves [`OracleSigner`] and is not printed by `Debug`
//! - Input is validated before anything is signed
//! - Internal failures are logged; clients only see a generic 500

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod middleware;
pub mod ports;
pub mod service;

// Re-exports for public API
pub use adapters::{FixedValuation, RandomRangeValuation};
pub use domain::config::{AttestorConfig, ConfigError, CorsConfig, ValuationConfig};
pub use domain::error::{ApiError, ApiResult, AttestorError};
pub use domain::signer::OracleSigner;
pub use domain::types::*;
pub use ports::{SystemTimeSource, TimeSource, Valuation, ValuationSource, ValuationSubject};
pub use service::AttestorService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
