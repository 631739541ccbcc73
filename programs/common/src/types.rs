//! Shared pool types and constants

/// Maximum number of pools held by a single registry
pub const MAX_POOLS: usize = 64;

/// Decimals of every LP mint
pub const LP_DECIMALS: u8 = 6;

/// Which asset the caller supplies in a swap
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    /// Caller supplies X, receives Y
    XToY = 0,
    /// Caller supplies Y, receives X
    YToX = 1,
}

impl SwapDirection {
    /// True when X is the input asset
    #[inline]
    pub fn is_x_in(self) -> bool {
        matches!(self, SwapDirection::XToY)
    }
}

/// Mutating pool operations, used to tag transitions and step reports
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolOp {
    Deposit = 0,
    Withdraw = 1,
    Swap = 2,
    Lock = 3,
    Unlock = 4,
}

impl PoolOp {
    pub fn name(self) -> &'static str {
        match self {
            PoolOp::Deposit => "deposit",
            PoolOp::Withdraw => "withdraw",
            PoolOp::Swap => "swap",
            PoolOp::Lock => "lock",
            PoolOp::Unlock => "unlock",
        }
    }
}
