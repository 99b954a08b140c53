//! # Custody Wrappers
//!
//! Thin wrappers over the external token capabilities, bound to the ledger's
//! pool address. They hold no state of their own; the loan book is the only
//! record of which token is locked by which loan.
//!
//! Each wrapper separates read-only precondition checks (`check_*`) from
//! effects, so the service can validate a whole transaction before moving
//! anything.

use super::entities::{Address, TokenId, U256};
use super::errors::LedgerError;
use crate::ports::outbound::{CapabilityError, CollateralCapability, StablecoinCapability};
use std::sync::Arc;

/// Collateral NFT custody.
#[derive(Clone)]
pub struct CollateralCustody {
    token: Arc<dyn CollateralCapability>,
    pool: Address,
}

impl CollateralCustody {
    pub fn new(token: Arc<dyn CollateralCapability>, pool: Address) -> Self {
        Self { token, pool }
    }

    /// Current holder of the token.
    pub fn custodian(&self, token_id: TokenId) -> Result<Address, CapabilityError> {
        self.token.owner_of(token_id)
    }

    /// `borrower` owns the token and the pool may move it.
    pub fn check_lockable(&self, token_id: TokenId, borrower: Address) -> Result<(), LedgerError> {
        if self.token.owner_of(token_id)? != borrower {
            return Err(LedgerError::NotTokenOwner { token_id });
        }

        let approved = self.token.get_approved(token_id)? == self.pool
            || self.token.is_approved_for_all(borrower, self.pool);
        if !approved {
            return Err(LedgerError::NotApproved { token_id });
        }

        Ok(())
    }

    /// Move the token from `borrower` into the pool.
    pub fn lock(&self, token_id: TokenId, borrower: Address) -> Result<(), CapabilityError> {
        self.token
            .transfer_from(self.pool, borrower, self.pool, token_id)
    }

    /// Move a pool-held token to `to`.
    pub fn release(&self, token_id: TokenId, to: Address) -> Result<(), CapabilityError> {
        self.token.transfer_from(self.pool, self.pool, to, token_id)
    }
}

/// Stablecoin custody.
#[derive(Clone)]
pub struct StablecoinCustody {
    coin: Arc<dyn StablecoinCapability>,
    pool: Address,
}

impl StablecoinCustody {
    pub fn new(coin: Arc<dyn StablecoinCapability>, pool: Address) -> Self {
        Self { coin, pool }
    }

    /// Funds available for disbursement.
    pub fn pool_balance(&self) -> U256 {
        self.coin.balance_of(self.pool)
    }

    /// The pool can fund `amount`.
    pub fn check_liquidity(&self, amount: U256) -> Result<(), LedgerError> {
        let available = self.pool_balance();
        if available < amount {
            return Err(LedgerError::InsufficientLiquidity {
                requested: amount,
                available,
            });
        }
        Ok(())
    }

    /// `payer` holds `amount` and has approved the pool for it.
    pub fn check_payment(&self, payer: Address, amount: U256) -> Result<(), LedgerError> {
        let available = self.coin.balance_of(payer);
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                required: amount,
                available,
            });
        }

        let allowance = self.coin.allowance(payer, self.pool);
        if allowance < amount {
            return Err(LedgerError::InsufficientAllowance {
                required: amount,
                available: allowance,
            });
        }

        Ok(())
    }

    /// Pay `amount` out of the pool to `to`.
    pub fn disburse(&self, to: Address, amount: U256) -> Result<(), CapabilityError> {
        self.coin.transfer(self.pool, to, amount)
    }

    /// Pull `amount` from `payer` into the pool.
    pub fn collect(&self, payer: Address, amount: U256) -> Result<(), CapabilityError> {
        self.coin.transfer_from(self.pool, payer, self.pool, amount)
    }
}
