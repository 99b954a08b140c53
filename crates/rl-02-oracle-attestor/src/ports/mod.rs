//! Ports for the Oracle Attestor.
//!
//! - **Outbound (Driven)**: valuation sources and the clock

pub mod outbound;

pub use outbound::{SystemTimeSource, TimeSource, Valuation, ValuationSource, ValuationSubject};
