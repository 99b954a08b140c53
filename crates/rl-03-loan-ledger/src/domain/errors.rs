//! Loan Ledger error types.
//!
//! Every rejection aborts the whole transaction. The `Display` text of each
//! variant is the reason string reported to the caller.

use super::entities::{LoanId, Timestamp, TokenId, U256};
use crate::ports::outbound::CapabilityError;
use thiserror::Error;

/// Category of a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller lacks ownership, approval or admin rights.
    Authorization,
    /// Attestation signer mismatch or malformed signature.
    Signature,
    /// Attestation deadline passed.
    Expiry,
    /// Requested amount exceeds the LTV cap.
    Policy,
    /// Loan missing or not in the required status.
    State,
    /// Not enough funds to move.
    Liquidity,
    /// Malformed request parameters.
    Input,
}

/// Loan ledger error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Administrative operation by someone other than the admin.
    #[error("Caller is not the admin")]
    NotAdmin,

    /// Caller does not own the collateral token.
    #[error("Not token owner")]
    NotTokenOwner { token_id: TokenId },

    /// The ledger has no transfer approval for the collateral token.
    #[error("Ledger not approved for token")]
    NotApproved { token_id: TokenId },

    /// Attestation not signed by the registered oracle signer, or malformed.
    #[error("Invalid oracle signature")]
    InvalidSignature,

    /// Dated attestation presented after its deadline.
    #[error("Signature expired")]
    SignatureExpired { deadline: Timestamp, now: Timestamp },

    /// Requested amount above `valuation × LTV`.
    #[error("Exceeds LTV")]
    ExceedsLtv { requested: U256, max: U256 },

    /// Loan does not exist or is no longer active.
    #[error("Loan not active")]
    LoanNotActive(LoanId),

    /// Another active loan already holds this token.
    #[error("Token already collateralized")]
    TokenAlreadyCollateralized { token_id: TokenId, loan_id: LoanId },

    /// The pool cannot fund the requested amount.
    #[error("Insufficient pool liquidity")]
    InsufficientLiquidity { requested: U256, available: U256 },

    /// The payer's stablecoin balance is below the amount owed.
    #[error("Insufficient balance to repay")]
    InsufficientFunds { required: U256, available: U256 },

    /// The payer has not approved the ledger for the amount owed.
    #[error("Insufficient allowance to repay")]
    InsufficientAllowance { required: U256, available: U256 },

    /// Borrow of zero.
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    /// Amount arithmetic overflowed.
    #[error("Amount overflow")]
    Overflow,

    /// Lending policy rejected at construction.
    #[error("Invalid ledger config: {0}")]
    InvalidConfig(String),

    /// Failure reported by an external token capability.
    #[error("{0}")]
    Capability(#[from] CapabilityError),
}

impl LedgerError {
    /// Map the error onto its rejection category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAdmin
            | Self::NotTokenOwner { .. }
            | Self::NotApproved { .. }
            | Self::InsufficientAllowance { .. } => ErrorKind::Authorization,
            Self::InvalidSignature => ErrorKind::Signature,
            Self::SignatureExpired { .. } => ErrorKind::Expiry,
            Self::ExceedsLtv { .. } => ErrorKind::Policy,
            Self::LoanNotActive(_) | Self::TokenAlreadyCollateralized { .. } => ErrorKind::State,
            Self::InsufficientLiquidity { .. } | Self::InsufficientFunds { .. } => {
                ErrorKind::Liquidity
            }
            Self::ZeroAmount | Self::Overflow | Self::InvalidConfig(_) => ErrorKind::Input,
            Self::Capability(e) => e.kind(),
        }
    }
}
