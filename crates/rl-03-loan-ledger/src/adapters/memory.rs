//! In-memory token capabilities.
//!
//! ERC-721 and ERC-20 style doubles with the approval semantics the ledger
//! relies on. Used by tests and local simulations.

use crate::domain::entities::{Address, TokenId, U256, ZERO_ADDRESS};
use crate::ports::outbound::{CapabilityError, CollateralCapability, StablecoinCapability};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

// =============================================================================
// Collateral NFT
// =============================================================================

#[derive(Debug, Default)]
struct AssetState {
    last_id: u64,
    owners: HashMap<TokenId, Address>,
    approvals: HashMap<TokenId, Address>,
    operators: HashSet<(Address, Address)>,
    paused: bool,
}

/// ERC-721 style asset token. Ids are minted sequentially from 1.
#[derive(Debug, Default)]
pub struct InMemoryAssetToken {
    state: Mutex<AssetState>,
}

impl InMemoryAssetToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next token id to `to`.
    pub fn mint(&self, to: Address) -> Result<TokenId, CapabilityError> {
        if to == ZERO_ADDRESS {
            return Err(CapabilityError::InvalidReceiver);
        }
        let mut state = self.state.lock();
        state.last_id += 1;
        let id = U256::from(state.last_id);
        state.owners.insert(id, to);
        Ok(id)
    }

    /// Approve `approved` to move `token_id`. `caller` must be the owner or an operator.
    pub fn approve(
        &self,
        caller: Address,
        approved: Address,
        token_id: TokenId,
    ) -> Result<(), CapabilityError> {
        let mut state = self.state.lock();
        let owner = *state
            .owners
            .get(&token_id)
            .ok_or(CapabilityError::NonexistentToken(token_id))?;

        if caller != owner && !state.operators.contains(&(owner, caller)) {
            return Err(CapabilityError::NotOwnerOrApproved);
        }

        state.approvals.insert(token_id, approved);
        Ok(())
    }

    /// Grant or revoke `operator` over all of `owner`'s tokens.
    pub fn set_approval_for_all(&self, owner: Address, operator: Address, approved: bool) {
        let mut state = self.state.lock();
        if approved {
            state.operators.insert((owner, operator));
        } else {
            state.operators.remove(&(owner, operator));
        }
    }

    /// Number of tokens held by `owner`.
    pub fn balance_of(&self, owner: Address) -> usize {
        self.state
            .lock()
            .owners
            .values()
            .filter(|o| **o == owner)
            .count()
    }

    /// While paused, every transfer is refused.
    pub fn set_paused(&self, paused: bool) {
        self.state.lock().paused = paused;
    }
}

impl CollateralCapability for InMemoryAssetToken {
    fn owner_of(&self, token_id: TokenId) -> Result<Address, CapabilityError> {
        self.state
            .lock()
            .owners
            .get(&token_id)
            .copied()
            .ok_or(CapabilityError::NonexistentToken(token_id))
    }

    fn get_approved(&self, token_id: TokenId) -> Result<Address, CapabilityError> {
        let state = self.state.lock();
        if !state.owners.contains_key(&token_id) {
            return Err(CapabilityError::NonexistentToken(token_id));
        }
        Ok(state
            .approvals
            .get(&token_id)
            .copied()
            .unwrap_or(ZERO_ADDRESS))
    }

    fn is_approved_for_all(&self, owner: Address, operator: Address) -> bool {
        self.state.lock().operators.contains(&(owner, operator))
    }

    fn transfer_from(
        &self,
        operator: Address,
        from: Address,
        to: Address,
        token_id: TokenId,
    ) -> Result<(), CapabilityError> {
        let mut state = self.state.lock();
        if state.paused {
            return Err(CapabilityError::Unavailable("token paused".into()));
        }

        let owner = *state
            .owners
            .get(&token_id)
            .ok_or(CapabilityError::NonexistentToken(token_id))?;
        if owner != from {
            return Err(CapabilityError::IncorrectOwner { token_id });
        }
        if to == ZERO_ADDRESS {
            return Err(CapabilityError::InvalidReceiver);
        }

        let authorized = operator == owner
            || state.approvals.get(&token_id) == Some(&operator)
            || state.operators.contains(&(owner, operator));
        if !authorized {
            return Err(CapabilityError::NotOwnerOrApproved);
        }

        state.approvals.remove(&token_id);
        state.owners.insert(token_id, to);
        Ok(())
    }
}

// =============================================================================
// Stablecoin
// =============================================================================

#[derive(Debug, Default)]
struct CoinState {
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    frozen: HashSet<Address>,
    total_supply: U256,
}

impl CoinState {
    fn balance(&self, owner: &Address) -> U256 {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    fn move_funds(&mut self, from: Address, to: Address, amount: U256) -> Result<(), CapabilityError> {
        if to == ZERO_ADDRESS {
            return Err(CapabilityError::InvalidReceiver);
        }
        for account in [from, to] {
            if self.frozen.contains(&account) {
                return Err(CapabilityError::AccountFrozen(account));
            }
        }

        let available = self.balance(&from);
        if available < amount {
            return Err(CapabilityError::InsufficientBalance {
                required: amount,
                available,
            });
        }

        self.balances.insert(from, available - amount);
        // Cannot overflow: total supply bounds every balance
        let credited = self.balance(&to) + amount;
        self.balances.insert(to, credited);
        Ok(())
    }
}

/// ERC-20 style stablecoin.
#[derive(Debug, Default)]
pub struct InMemoryStablecoin {
    state: Mutex<CoinState>,
}

impl InMemoryStablecoin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `spender` to pull up to `amount` from `owner`. `U256::MAX` never decreases.
    pub fn approve(&self, owner: Address, spender: Address, amount: U256) {
        self.state.lock().allowances.insert((owner, spender), amount);
    }

    /// Block or unblock `account` from sending and receiving.
    pub fn set_frozen(&self, account: Address, frozen: bool) {
        let mut state = self.state.lock();
        if frozen {
            state.frozen.insert(account);
        } else {
            state.frozen.remove(&account);
        }
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> U256 {
        self.state.lock().total_supply
    }
}

impl StablecoinCapability for InMemoryStablecoin {
    fn balance_of(&self, owner: Address) -> U256 {
        self.state.lock().balance(&owner)
    }

    fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.state
            .lock()
            .allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<(), CapabilityError> {
        self.state.lock().move_funds(from, to, amount)
    }

    fn transfer_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), CapabilityError> {
        let mut state = self.state.lock();
        let allowance = state
            .allowances
            .get(&(from, spender))
            .copied()
            .unwrap_or_default();
        if allowance < amount {
            return Err(CapabilityError::InsufficientAllowance {
                required: amount,
                available: allowance,
            });
        }

        state.move_funds(from, to, amount)?;

        if allowance != U256::MAX {
            state.allowances.insert((from, spender), allowance - amount);
        }
        Ok(())
    }

    fn mint(&self, to: Address, amount: U256) -> Result<(), CapabilityError> {
        if to == ZERO_ADDRESS {
            return Err(CapabilityError::InvalidReceiver);
        }
        let mut state = self.state.lock();
        state.total_supply = state
            .total_supply
            .checked_add(amount)
            .ok_or_else(|| CapabilityError::Unavailable("supply overflow".into()))?;
        let credited = state.balance(&to) + amount;
        state.balances.insert(to, credited);
        Ok(())
    }
}
