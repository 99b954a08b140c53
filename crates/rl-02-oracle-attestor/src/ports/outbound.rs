//! Outbound ports for the Oracle Attestor.

use crate::domain::error::AttestorError;
use shared_types::{Timestamp, TokenId, U256};

/// What is being valued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuationSubject<'a> {
    /// A minted asset, by token id.
    Asset(TokenId),
    /// A not-yet-minted asset, by free-text description.
    Description(&'a str),
}

/// A valuation, in wei and in the whole-DAI figure it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Valuation {
    pub wei: U256,
    pub dai: u64,
}

/// Pluggable pricing function.
///
/// The protocol only cares that the number is signed, not how it is produced.
pub trait ValuationSource: Send + Sync {
    fn valuate(&self, subject: ValuationSubject<'_>) -> Result<Valuation, AttestorError>;
}

/// Time source trait for testability
pub trait TimeSource: Send + Sync {
    /// Current Unix time in seconds.
    fn now(&self) -> Timestamp;
}

/// System time implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Fixed clock for tests.
#[cfg(test)]
pub struct MockTimeSource(pub Timestamp);

#[cfg(test)]
impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.0
    }
}
