//! Constant product curve math (x·y=k)
//!
//! Rounding always favors the pool:
//! - swap output and withdraw payouts round down
//! - deposit requirements round up

use cpamm_common::{
    apply_fee, checked_add, checked_sub, isqrt, mul_div_ceil, mul_div_floor,
    to_u64, AmmError,
};

/// Swap quote with fee breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    /// Full amount the caller pays in
    pub amount_in: u64,

    /// Input after the fee is taken, the part that moves the curve
    pub amount_in_after_fee: u64,

    /// Fee retained by the pool (stays in the input reserve)
    pub fee_amount: u64,

    /// Amount paid out of the output reserve
    pub amount_out: u64,

    /// Input reserve after the trade
    pub new_reserve_in: u64,

    /// Output reserve after the trade
    pub new_reserve_out: u64,
}

/// Per-asset amounts for a liquidity change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityAmounts {
    pub x: u64,
    pub y: u64,
}

/// Quote a swap with fee on input
///
/// - Δin_net = floor(Δin * (10000 - fee) / 10000)
/// - out1 = floor(in0 * out0 / (in0 + Δin_net))
/// - Δout = out0 - out1
///
/// If the floored `out1` would leave `in1 * out1 < in0 * out0` (reachable
/// when the fee rounds to nothing, e.g. `fee = 0`), `out1` is raised by one.
pub fn quote_swap(
    reserve_in: u64,
    reserve_out: u64,
    fee_bps: u16,
    amount_in: u64,
) -> Result<SwapQuote, AmmError> {
    if amount_in == 0 {
        return Err(AmmError::InvalidAmount);
    }
    if reserve_in == 0 || reserve_out == 0 {
        return Err(AmmError::InsufficientLiquidity);
    }

    let amount_in_after_fee = apply_fee(amount_in, fee_bps)?;
    let fee_amount = checked_sub(amount_in, amount_in_after_fee)?;

    let k = reserve_in as u128 * reserve_out as u128;
    let effective_in = reserve_in as u128 + amount_in_after_fee as u128;
    let mut new_reserve_out = to_u64(k / effective_in)?;

    let after_in = reserve_in as u128 + amount_in as u128;
    let k_holds = after_in
        .checked_mul(new_reserve_out as u128)
        .map_or(true, |k1| k1 >= k);
    if !k_holds {
        new_reserve_out = checked_add(new_reserve_out, 1)?;
    }

    let amount_out = checked_sub(reserve_out, new_reserve_out)?;
    if amount_out == 0 {
        return Err(AmmError::InvalidAmount);
    }
    if amount_out >= reserve_out {
        return Err(AmmError::InsufficientLiquidity);
    }

    let new_reserve_in = checked_add(reserve_in, amount_in)?;

    Ok(SwapQuote {
        amount_in,
        amount_in_after_fee,
        fee_amount,
        amount_out,
        new_reserve_in,
        new_reserve_out,
    })
}

/// LP issued by the first deposit: floor(sqrt(x * y))
pub fn initial_lp(amount_x: u64, amount_y: u64) -> Result<u64, AmmError> {
    if amount_x == 0 || amount_y == 0 {
        return Err(AmmError::ZeroLiquidity);
    }
    let lp = to_u64(isqrt(amount_x as u128 * amount_y as u128))?;
    if lp == 0 {
        return Err(AmmError::ZeroLiquidity);
    }
    Ok(lp)
}

/// Amounts required to mint `lp` against existing reserves (rounded up)
pub fn deposit_amounts(
    lp: u64,
    reserve_x: u64,
    reserve_y: u64,
    supply: u64,
) -> Result<LiquidityAmounts, AmmError> {
    Ok(LiquidityAmounts {
        x: mul_div_ceil(lp, reserve_x, supply)?,
        y: mul_div_ceil(lp, reserve_y, supply)?,
    })
}

/// Amounts paid out for burning `lp` (rounded down)
pub fn withdraw_amounts(
    lp: u64,
    reserve_x: u64,
    reserve_y: u64,
    supply: u64,
) -> Result<LiquidityAmounts, AmmError> {
    Ok(LiquidityAmounts {
        x: mul_div_floor(lp, reserve_x, supply)?,
        y: mul_div_floor(lp, reserve_y, supply)?,
    })
}
