//! Pool account state - config, reserve vaults and LP mint
//!
//! Layout: magic(8) + header(8) + seqno(8) + PoolConfig(112) +
//! ReserveVault x2 (80) + LiquidityMint(16) = 232 bytes.
//!
//! Every field is a plain integer or byte array so the struct is valid for
//! any bit pattern and can be read straight out of account data.

use cpamm_common::{
    checked_add, checked_sub, mul_div_floor, AmmError, LP_DECIMALS, PRICE_SCALE,
};
use pinocchio::pubkey::Pubkey;

/// Immutable pool parameters plus the lock flag
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Pool identifier, part of the pool's derived address
    pub seed: u64,
    /// Swap fee in basis points (0..=10_000)
    pub fee_bps: u16,
    /// 1 when deposit/withdraw/swap are gated off
    pub locked: u8,
    /// 1 when `authority` is set
    pub has_authority: u8,
    /// Derived-address bump for the pool account
    pub bump: u8,
    /// Derived-address bump for the LP mint
    pub lp_bump: u8,
    pub _padding: [u8; 2],
    /// Identity allowed to lock/unlock (meaningful only if has_authority == 1)
    pub authority: Pubkey,
    /// Mint of asset X
    pub mint_x: Pubkey,
    /// Mint of asset Y
    pub mint_y: Pubkey,
}

impl PoolConfig {
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked != 0
    }

    #[inline]
    pub fn authority(&self) -> Option<&Pubkey> {
        if self.has_authority != 0 {
            Some(&self.authority)
        } else {
            None
        }
    }
}

/// Pool-owned holding of one asset
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReserveVault {
    pub mint: Pubkey,
    pub balance: u64,
}

impl ReserveVault {
    pub fn empty(mint: Pubkey) -> Self {
        Self { mint, balance: 0 }
    }

    pub fn credit(&mut self, amount: u64) -> Result<(), AmmError> {
        self.balance = checked_add(self.balance, amount)?;
        Ok(())
    }

    pub fn debit(&mut self, amount: u64) -> Result<(), AmmError> {
        if amount > self.balance {
            return Err(AmmError::InsufficientLiquidity);
        }
        self.balance = checked_sub(self.balance, amount)?;
        Ok(())
    }
}

/// LP receipt mint, authority is the pool
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityMint {
    /// Outstanding LP units
    pub supply: u64,
    pub decimals: u8,
    pub _padding: [u8; 7],
}

impl LiquidityMint {
    pub fn new() -> Self {
        Self {
            supply: 0,
            decimals: LP_DECIMALS,
            _padding: [0; 7],
        }
    }

    pub fn mint(&mut self, amount: u64) -> Result<(), AmmError> {
        self.supply = checked_add(self.supply, amount)?;
        Ok(())
    }

    pub fn burn(&mut self, amount: u64) -> Result<(), AmmError> {
        if amount > self.supply {
            return Err(AmmError::InvariantViolation);
        }
        self.supply = checked_sub(self.supply, amount)?;
        Ok(())
    }
}

impl Default for LiquidityMint {
    fn default() -> Self {
        Self::new()
    }
}

/// Balance and supply changes produced by one engine call
///
/// All amounts are absolute and unsigned; the direction is in the field name.
/// "In" and "out" are from the pool's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolDelta {
    pub x_in: u64,
    pub x_out: u64,
    pub y_in: u64,
    pub y_out: u64,
    pub lp_minted: u64,
    pub lp_burned: u64,
}

impl PoolDelta {
    pub fn is_empty(&self) -> bool {
        *self == PoolDelta::default()
    }
}

/// Full pool account: versioned state record
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
    pub magic: [u8; 8],
    /// Account layout version
    pub layout_version: u8,
    pub _padding: [u8; 7],
    /// Bumped by one on every committed transition
    pub seqno: u64,
    pub config: PoolConfig,
    pub vault_x: ReserveVault,
    pub vault_y: ReserveVault,
    pub lp_mint: LiquidityMint,
}

impl PoolState {
    pub const LEN: usize = core::mem::size_of::<Self>();
    pub const MAGIC: &'static [u8; 8] = b"CPAMPOOL";
    pub const VERSION: u8 = 1;

    /// Fresh unlocked pool with empty vaults and zero LP supply
    pub fn new(config: PoolConfig) -> Self {
        Self {
            magic: *Self::MAGIC,
            layout_version: Self::VERSION,
            _padding: [0; 7],
            seqno: 0,
            vault_x: ReserveVault::empty(config.mint_x),
            vault_y: ReserveVault::empty(config.mint_y),
            lp_mint: LiquidityMint::new(),
            config,
        }
    }

    /// Magic, layout version and vault/mint consistency
    pub fn validate(&self) -> bool {
        &self.magic == Self::MAGIC
            && self.layout_version == Self::VERSION
            && self.vault_x.mint == self.config.mint_x
            && self.vault_y.mint == self.config.mint_y
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    #[inline]
    pub fn reserve_x(&self) -> u64 {
        self.vault_x.balance
    }

    #[inline]
    pub fn reserve_y(&self) -> u64 {
        self.vault_y.balance
    }

    #[inline]
    pub fn lp_supply(&self) -> u64 {
        self.lp_mint.supply
    }

    /// Constant-product k = x * y
    #[inline]
    pub fn invariant_k(&self) -> u128 {
        self.reserve_x() as u128 * self.reserve_y() as u128
    }

    /// Spot price of X in Y: y/x (scaled by PRICE_SCALE), 0 when empty
    pub fn spot_price_x_in_y(&self) -> Result<u64, AmmError> {
        if self.reserve_x() == 0 {
            return Ok(0);
        }
        mul_div_floor(self.reserve_y(), PRICE_SCALE, self.reserve_x())
    }

    /// Apply a delta to a copy of this state; `self` is left untouched
    pub fn apply(&self, delta: &PoolDelta) -> Result<PoolState, AmmError> {
        let mut next = *self;
        next.vault_x.credit(delta.x_in)?;
        next.vault_x.debit(delta.x_out)?;
        next.vault_y.credit(delta.y_in)?;
        next.vault_y.debit(delta.y_out)?;
        next.lp_mint.mint(delta.lp_minted)?;
        next.lp_mint.burn(delta.lp_burned)?;
        next.seqno = checked_add(self.seqno, 1)?;
        Ok(next)
    }
}

/// Per-user LP balance account kept by the on-chain adapter
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LpPosition {
    pub magic: [u8; 8],
    /// Pool account this position belongs to
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub balance: u64,
}

impl LpPosition {
    pub const LEN: usize = core::mem::size_of::<Self>();
    pub const MAGIC: &'static [u8; 8] = b"CPAMLPOS";

    pub fn new(pool: Pubkey, owner: Pubkey) -> Self {
        Self {
            magic: *Self::MAGIC,
            pool,
            owner,
            balance: 0,
        }
    }

    pub fn is_initialized(&self) -> bool {
        &self.magic == Self::MAGIC
    }

    pub fn credit(&mut self, amount: u64) -> Result<(), AmmError> {
        self.balance = checked_add(self.balance, amount)?;
        Ok(())
    }

    pub fn debit(&mut self, amount: u64) -> Result<(), AmmError> {
        if amount > self.balance {
            return Err(AmmError::InsufficientBalance);
        }
        self.balance = checked_sub(self.balance, amount)?;
        Ok(())
    }
}
