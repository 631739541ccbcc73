//! Pool error taxonomy
//!
//! Every error is terminal for the call that produced it: the engine never
//! applies a partial transition. Codes are stable and surface on-chain as
//! `ProgramError::Custom(code)`.

use core::fmt;
use pinocchio::program_error::ProgramError;

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmmError {
    /// Fee outside 0..=10_000 basis points
    InvalidFee = 6000,
    /// Both pool assets share the same mint
    DuplicateMint = 6001,
    /// First deposit with a zero side, or zero LP issuance
    ZeroLiquidity = 6002,
    /// Realized amounts fell outside the caller's bounds
    SlippageExceeded = 6003,
    /// Pool is locked for deposit/withdraw/swap
    PoolLocked = 6004,
    /// Reserves cannot cover the requested output
    InsufficientLiquidity = 6005,
    /// Caller is not the pool authority
    Unauthorized = 6006,
    /// Checked arithmetic overflowed or underflowed
    ArithmeticOverflow = 6007,
    /// Division with a zero divisor
    DivisionByZero = 6008,
    /// Zero amount where a positive amount is required
    InvalidAmount = 6009,
    /// Caller balance is below the amount being spent
    InsufficientBalance = 6010,
    /// lock() on a locked pool
    AlreadyLocked = 6011,
    /// unlock() on an unlocked pool
    AlreadyUnlocked = 6012,
    /// A pool with this seed already exists
    PoolAlreadyExists = 6013,
    /// No pool with this seed
    PoolNotFound = 6014,
    /// Registry has no free slot
    RegistryFull = 6015,
    /// Transition was computed against an older pool version
    StaleState = 6016,
    /// Internal accounting invariant broken; never caller-recoverable
    InvariantViolation = 6017,
    /// Malformed instruction data
    InvalidInstruction = 6018,
    /// Account failed validation (owner, size, signer, layout)
    InvalidAccount = 6019,
}

impl AmmError {
    /// Stable numeric code
    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Short human-readable description
    pub fn as_str(self) -> &'static str {
        match self {
            AmmError::InvalidFee => "fee must be between 0 and 10000 basis points",
            AmmError::DuplicateMint => "pool mints must be distinct",
            AmmError::ZeroLiquidity => "initial liquidity must be non-zero on both sides",
            AmmError::SlippageExceeded => "slippage bound exceeded",
            AmmError::PoolLocked => "pool is locked",
            AmmError::InsufficientLiquidity => "insufficient pool liquidity",
            AmmError::Unauthorized => "caller is not the pool authority",
            AmmError::ArithmeticOverflow => "arithmetic overflow",
            AmmError::DivisionByZero => "division by zero",
            AmmError::InvalidAmount => "amount must be non-zero",
            AmmError::InsufficientBalance => "insufficient balance",
            AmmError::AlreadyLocked => "pool is already locked",
            AmmError::AlreadyUnlocked => "pool is already unlocked",
            AmmError::PoolAlreadyExists => "pool already exists",
            AmmError::PoolNotFound => "pool not found",
            AmmError::RegistryFull => "pool registry is full",
            AmmError::StaleState => "pool state changed since the transition was computed",
            AmmError::InvariantViolation => "pool invariant violated",
            AmmError::InvalidInstruction => "invalid instruction data",
            AmmError::InvalidAccount => "invalid account",
        }
    }

    /// Expected outcomes the caller can retry with adjusted inputs
    pub fn is_recoverable(self) -> bool {
        matches!(
            self,
            AmmError::SlippageExceeded | AmmError::StaleState | AmmError::InsufficientBalance
        )
    }
}

impl fmt::Display for AmmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<AmmError> for ProgramError {
    fn from(e: AmmError) -> Self {
        ProgramError::Custom(e.code())
    }
}
