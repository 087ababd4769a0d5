use crate::WAD;
use crate::error::MathError;
use alloy_primitives::U256;

const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// Converts a `U256` into the nearest `f64`.
///
/// Values above `2^53` lose low-order precision, which is fine for supply
/// figures that only feed floating-point price math.
#[inline]
pub fn u256_to_f64(value: U256) -> f64 {
    value
        .as_limbs()
        .iter()
        .rev()
        .fold(0.0, |acc, &limb| acc * TWO_POW_64 + limb as f64)
}

/// Returns `10^exponent` as `f64` for a signed decimal difference.
#[inline]
pub fn pow10(exponent: i32) -> f64 {
    10f64.powi(exponent)
}

/// Scales a base-unit token amount down by its decimals, e.g. `1e27` with 18
/// decimals becomes `1e9` whole tokens.
pub fn to_whole_units(amount: U256, decimals: u8) -> f64 {
    u256_to_f64(amount) / pow10(decimals as i32)
}

/// Floors `a / b` for signed integers, so `-15 / 10` is `-2` rather than `-1`.
///
/// Returns `MathError::InvalidArgument` if `b` is not positive.
#[inline]
pub fn floor_div(a: i32, b: i32) -> Result<i32, MathError> {
    if b <= 0 {
        return Err(MathError::invalid("divisor", b));
    }
    Ok(a.div_euclid(b))
}

/// Ceils `a / b` for signed integers and a positive divisor.
#[inline]
pub fn ceil_div(a: i32, b: i32) -> Result<i32, MathError> {
    let floor = floor_div(a, b)?;
    Ok(if a.rem_euclid(b) == 0 { floor } else { floor + 1 })
}

/// Expresses a WAD-scaled share as a percentage of the whole.
pub fn wad_percentage(shares: U256) -> f64 {
    u256_to_f64(shares) / u256_to_f64(WAD) * 100.0
}

/// Rejects NaN and infinities with a named `InvalidArgument`.
#[inline]
pub fn ensure_finite(name: &'static str, value: f64) -> Result<f64, MathError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MathError::invalid(name, value))
    }
}
