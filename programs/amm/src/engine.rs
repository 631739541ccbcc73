//! Pool engine - initialize, deposit, withdraw, swap, lock, unlock
//!
//! Every operation is a pure function of the current `PoolState` and the
//! call inputs. It returns a [`Transition`] (next state plus the deltas the
//! substrate must apply) or an error; it never mutates its input. Guards run
//! first, then all amounts are computed, then the delta is applied to a copy.

use crate::curve::{self, LiquidityAmounts, SwapQuote};
use crate::guard::{ensure_authority, ensure_unlocked, VerifiedCaller};
use crate::state::{PoolConfig, PoolDelta, PoolState};
use cpamm_common::{checked_add, validate_fee, AmmError, PoolOp, SwapDirection};
use pinocchio::pubkey::Pubkey;

/// Parameters for creating a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitializeParams {
    pub seed: u64,
    pub fee_bps: u16,
    pub authority: Option<Pubkey>,
    pub mint_x: Pubkey,
    pub mint_y: Pubkey,
    pub bump: u8,
    pub lp_bump: u8,
}

/// Result of one engine call, ready for atomic application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub op: PoolOp,
    /// Pool seqno the transition was computed against
    pub base_seqno: u64,
    pub next: PoolState,
    pub delta: PoolDelta,
}

impl Transition {
    fn from_delta(op: PoolOp, state: &PoolState, delta: PoolDelta) -> Result<Self, AmmError> {
        Ok(Self {
            op,
            base_seqno: state.seqno,
            next: state.apply(&delta)?,
            delta,
        })
    }
}

/// Create a new unlocked pool with empty vaults and no LP supply
pub fn initialize(params: &InitializeParams) -> Result<PoolState, AmmError> {
    validate_fee(params.fee_bps)?;
    if params.mint_x == params.mint_y {
        return Err(AmmError::DuplicateMint);
    }

    Ok(PoolState::new(PoolConfig {
        seed: params.seed,
        fee_bps: params.fee_bps,
        locked: 0,
        has_authority: params.authority.is_some() as u8,
        bump: params.bump,
        lp_bump: params.lp_bump,
        _padding: [0; 2],
        authority: params.authority.unwrap_or_default(),
        mint_x: params.mint_x,
        mint_y: params.mint_y,
    }))
}

/// Add liquidity
///
/// First deposit (supply == 0): takes exactly `max_x`/`max_y` and mints
/// floor(sqrt(max_x * max_y)). A non-zero `lp_amount` then acts as the
/// minimum issuance the caller accepts.
///
/// Later deposits: mints exactly `lp_amount` and takes the proportional
/// amounts, rounded up, which must fit under `max_x`/`max_y`.
pub fn deposit(
    state: &PoolState,
    lp_amount: u64,
    max_x: u64,
    max_y: u64,
) -> Result<Transition, AmmError> {
    ensure_unlocked(&state.config)?;

    let supply = state.lp_supply();
    let (amounts, minted) = if supply == 0 {
        if state.reserve_x() != 0 || state.reserve_y() != 0 {
            // Reserves without claims on them
            return Err(AmmError::InvariantViolation);
        }
        let issued = curve::initial_lp(max_x, max_y)?;
        if issued < lp_amount {
            return Err(AmmError::SlippageExceeded);
        }
        (LiquidityAmounts { x: max_x, y: max_y }, issued)
    } else {
        if lp_amount == 0 {
            return Err(AmmError::InvalidAmount);
        }
        let required =
            curve::deposit_amounts(lp_amount, state.reserve_x(), state.reserve_y(), supply)?;
        if required.x > max_x || required.y > max_y {
            return Err(AmmError::SlippageExceeded);
        }
        (required, lp_amount)
    };

    let delta = PoolDelta {
        x_in: amounts.x,
        y_in: amounts.y,
        lp_minted: minted,
        ..PoolDelta::default()
    };
    Transition::from_delta(PoolOp::Deposit, state, delta)
}

/// Burn `lp_amount` for a proportional share of both reserves, rounded down
///
/// `caller_lp_balance` is the caller's LP holding as read from the substrate.
pub fn withdraw(
    state: &PoolState,
    lp_amount: u64,
    min_x: u64,
    min_y: u64,
    caller_lp_balance: u64,
) -> Result<Transition, AmmError> {
    ensure_unlocked(&state.config)?;
    if lp_amount == 0 {
        return Err(AmmError::InvalidAmount);
    }

    let supply = state.lp_supply();
    if supply == 0 {
        // Outstanding LP with zero supply means the books are already broken
        return Err(AmmError::InvariantViolation);
    }
    if lp_amount > caller_lp_balance {
        return Err(AmmError::InsufficientBalance);
    }
    if lp_amount > supply {
        return Err(AmmError::InsufficientLiquidity);
    }

    let out = curve::withdraw_amounts(lp_amount, state.reserve_x(), state.reserve_y(), supply)?;
    if out.x < min_x || out.y < min_y {
        return Err(AmmError::SlippageExceeded);
    }

    let delta = PoolDelta {
        x_out: out.x,
        y_out: out.y,
        lp_burned: lp_amount,
        ..PoolDelta::default()
    };
    Transition::from_delta(PoolOp::Withdraw, state, delta)
}

/// Swap `amount_in` of one asset for the other
pub fn swap(
    state: &PoolState,
    amount_in: u64,
    direction: SwapDirection,
    min_out: u64,
) -> Result<Transition, AmmError> {
    ensure_unlocked(&state.config)?;

    let quote = quote_swap(state, amount_in, direction)?;
    if quote.amount_out < min_out {
        return Err(AmmError::SlippageExceeded);
    }

    let delta = match direction {
        SwapDirection::XToY => PoolDelta {
            x_in: quote.amount_in,
            y_out: quote.amount_out,
            ..PoolDelta::default()
        },
        SwapDirection::YToX => PoolDelta {
            y_in: quote.amount_in,
            x_out: quote.amount_out,
            ..PoolDelta::default()
        },
    };
    Transition::from_delta(PoolOp::Swap, state, delta)
}

/// Lock the pool (authority only, pool must be unlocked)
pub fn lock(state: &PoolState, caller: &VerifiedCaller) -> Result<Transition, AmmError> {
    ensure_authority(&state.config, caller)?;
    if state.config.is_locked() {
        return Err(AmmError::AlreadyLocked);
    }
    set_locked(PoolOp::Lock, state, true)
}

/// Unlock the pool (authority only, pool must be locked)
pub fn unlock(state: &PoolState, caller: &VerifiedCaller) -> Result<Transition, AmmError> {
    ensure_authority(&state.config, caller)?;
    if !state.config.is_locked() {
        return Err(AmmError::AlreadyUnlocked);
    }
    set_locked(PoolOp::Unlock, state, false)
}

fn set_locked(op: PoolOp, state: &PoolState, locked: bool) -> Result<Transition, AmmError> {
    let mut next = *state;
    next.config.locked = locked as u8;
    next.seqno = checked_add(state.seqno, 1)?;
    Ok(Transition {
        op,
        base_seqno: state.seqno,
        next,
        delta: PoolDelta::default(),
    })
}

/// Price a swap against the current reserves, ignoring lock state and bounds
pub fn quote_swap(
    state: &PoolState,
    amount_in: u64,
    direction: SwapDirection,
) -> Result<SwapQuote, AmmError> {
    let (reserve_in, reserve_out) = match direction {
        SwapDirection::XToY => (state.reserve_x(), state.reserve_y()),
        SwapDirection::YToX => (state.reserve_y(), state.reserve_x()),
    };
    curve::quote_swap(reserve_in, reserve_out, state.config.fee_bps, amount_in)
}

/// Amounts a later deposit minting `lp_amount` would take
pub fn quote_deposit(state: &PoolState, lp_amount: u64) -> Result<LiquidityAmounts, AmmError> {
    curve::deposit_amounts(lp_amount, state.reserve_x(), state.reserve_y(), state.lp_supply())
}

/// Amounts burning `lp_amount` would pay out
pub fn quote_withdraw(state: &PoolState, lp_amount: u64) -> Result<LiquidityAmounts, AmmError> {
    curve::withdraw_amounts(lp_amount, state.reserve_x(), state.reserve_y(), state.lp_supply())
}
