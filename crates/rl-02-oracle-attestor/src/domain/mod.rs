//! Domain types for the Oracle Attestor.
//!
//! Configuration, errors, the signing key and the wire DTOs.

pub mod config;
pub mod error;
pub mod signer;
pub mod types;

// Re-exports for convenience
pub use config::{AttestorConfig, ConfigError, CorsConfig, ValuationConfig};
pub use error::{ApiError, ApiResult, AttestorError};
pub use signer::OracleSigner;
pub use types::*;
