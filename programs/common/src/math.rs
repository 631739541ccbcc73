//! Checked integer math for reserves, LP supply and fees
//!
//! Nothing in here wraps or saturates. Every operation that can leave the
//! `u64` domain returns `ArithmeticOverflow`, and every division by zero
//! returns `DivisionByZero`. Products are formed in `u128`, so
//! `a * b / d` is exact for any `u64` operands.

use crate::error::AmmError;

/// Basis points scale (10,000 bps = 100%)
pub const BPS_SCALE: u64 = 10_000;

/// Maximum fee in basis points
pub const MAX_FEE_BPS: u16 = 10_000;

/// Price scaling factor (1e6)
pub const PRICE_SCALE: u64 = 1_000_000;

#[inline]
pub fn checked_add(a: u64, b: u64) -> Result<u64, AmmError> {
    a.checked_add(b).ok_or(AmmError::ArithmeticOverflow)
}

#[inline]
pub fn checked_sub(a: u64, b: u64) -> Result<u64, AmmError> {
    a.checked_sub(b).ok_or(AmmError::ArithmeticOverflow)
}

/// Narrow a `u128` result back into `u64`
#[inline]
pub fn to_u64(x: u128) -> Result<u64, AmmError> {
    u64::try_from(x).map_err(|_| AmmError::ArithmeticOverflow)
}

/// floor(a * b / d)
pub fn mul_div_floor(a: u64, b: u64, d: u64) -> Result<u64, AmmError> {
    if d == 0 {
        return Err(AmmError::DivisionByZero);
    }
    let product = (a as u128) * (b as u128);
    to_u64(product / d as u128)
}

/// ceil(a * b / d)
pub fn mul_div_ceil(a: u64, b: u64, d: u64) -> Result<u64, AmmError> {
    if d == 0 {
        return Err(AmmError::DivisionByZero);
    }
    let product = (a as u128) * (b as u128);
    let d = d as u128;
    let q = product / d;
    let q = if product % d != 0 { q + 1 } else { q };
    to_u64(q)
}

/// Integer square root, floor(sqrt(n)), via Newton's method
pub fn isqrt(n: u128) -> u128 {
    if n == 0 {
        return 0;
    }
    let mut x = n;
    let mut y = x.div_ceil(2);
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

/// Validate a fee expressed in basis points
#[inline]
pub fn validate_fee(fee_bps: u16) -> Result<(), AmmError> {
    if fee_bps > MAX_FEE_BPS {
        return Err(AmmError::InvalidFee);
    }
    Ok(())
}

/// Amount left after taking the fee on input: floor(amount * (10000 - fee) / 10000)
pub fn apply_fee(amount: u64, fee_bps: u16) -> Result<u64, AmmError> {
    validate_fee(fee_bps)?;
    mul_div_floor(amount, BPS_SCALE - fee_bps as u64, BPS_SCALE)
}
