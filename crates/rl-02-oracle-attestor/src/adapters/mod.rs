//! Adapters for the Oracle Attestor.
//!
//! Concrete valuation sources selected by configuration.

pub mod valuation;

pub use valuation::{source_from_config, FixedValuation, RandomRangeValuation};
