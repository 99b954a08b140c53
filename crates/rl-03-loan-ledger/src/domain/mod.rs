//! Domain layer for the Loan Ledger.
//!
//! Contains the loan book, policy arithmetic and custody wrappers.

pub mod book;
pub mod custody;
pub mod entities;
pub mod errors;
pub mod events;

pub use book::{LoanBook, RESERVED_LOAN_ID};
pub use custody::{CollateralCustody, StablecoinCustody};
pub use entities::*;
pub use errors::{ErrorKind, LedgerError};
pub use events::{LendingEvent, Receipt};
