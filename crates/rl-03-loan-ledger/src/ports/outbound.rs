//! Outbound (Driven) ports for the Loan Ledger.
//!
//! The collateral NFT and the stablecoin are external collaborators. The
//! ledger depends on them through these traits so that deployments can plug
//! in real token bindings and tests can use in-memory doubles.

use crate::domain::entities::{Address, Timestamp, TokenId, U256};
use crate::domain::errors::ErrorKind;
use thiserror::Error;

/// Failure inside an external token capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// No such token was ever minted.
    #[error("Token does not exist")]
    NonexistentToken(TokenId),

    /// `from` is not the current owner of the token.
    #[error("Transfer from incorrect owner")]
    IncorrectOwner { token_id: TokenId },

    /// The operator is neither owner, approved, nor an approved operator.
    #[error("Caller is not token owner or approved")]
    NotOwnerOrApproved,

    /// Account balance below the transfer amount.
    #[error("Insufficient balance")]
    InsufficientBalance { required: U256, available: U256 },

    /// Spender allowance below the transfer amount.
    #[error("Insufficient allowance")]
    InsufficientAllowance { required: U256, available: U256 },

    /// Transfer or mint to the zero address.
    #[error("Invalid receiver")]
    InvalidReceiver,

    /// The account is blocked from sending or receiving.
    #[error("Account frozen")]
    AccountFrozen(Address),

    /// The capability could not be reached.
    #[error("Capability unavailable: {0}")]
    Unavailable(String),
}

impl CapabilityError {
    /// Rejection category of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IncorrectOwner { .. }
            | Self::NotOwnerOrApproved
            | Self::InsufficientAllowance { .. }
            | Self::AccountFrozen(_) => ErrorKind::Authorization,
            Self::InsufficientBalance { .. } => ErrorKind::Liquidity,
            Self::InvalidReceiver => ErrorKind::Input,
            Self::NonexistentToken(_) | Self::Unavailable(_) => ErrorKind::State,
        }
    }
}

/// ERC-721 style collateral token.
pub trait CollateralCapability: Send + Sync {
    /// Current owner of `token_id`.
    fn owner_of(&self, token_id: TokenId) -> Result<Address, CapabilityError>;

    /// Address approved for `token_id`, or the zero address.
    fn get_approved(&self, token_id: TokenId) -> Result<Address, CapabilityError>;

    /// Whether `operator` may move every token of `owner`.
    fn is_approved_for_all(&self, owner: Address, operator: Address) -> bool;

    /// Move `token_id` from `from` to `to`, acting as `operator`.
    ///
    /// Clears the per-token approval on success.
    fn transfer_from(
        &self,
        operator: Address,
        from: Address,
        to: Address,
        token_id: TokenId,
    ) -> Result<(), CapabilityError>;
}

/// ERC-20 style stablecoin.
pub trait StablecoinCapability: Send + Sync {
    /// Balance of `owner`.
    fn balance_of(&self, owner: Address) -> U256;

    /// Amount `spender` may still pull from `owner`.
    fn allowance(&self, owner: Address, spender: Address) -> U256;

    /// Move `amount` from `from` to `to` on `from`'s own authority.
    fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<(), CapabilityError>;

    /// Move `amount` from `from` to `to` on `spender`'s allowance.
    fn transfer_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), CapabilityError>;

    /// Create `amount` new units for `to`.
    fn mint(&self, to: Address, amount: U256) -> Result<(), CapabilityError>;
}

/// Time source for deadline checks and loan start times.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    /// Returns the current Unix timestamp in seconds.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Settable clock for tests.
#[derive(Debug, Default)]
pub struct MockTimeSource {
    now: std::sync::atomic::AtomicU64,
}

impl MockTimeSource {
    /// Clock frozen at `now`.
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: std::sync::atomic::AtomicU64::new(now),
        }
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: Timestamp) {
        self.now.store(now, std::sync::atomic::Ordering::SeqCst);
    }

    /// Move the clock forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, std::sync::atomic::Ordering::SeqCst);
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.now.load(std::sync::atomic::Ordering::SeqCst)
    }
}
