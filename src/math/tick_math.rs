use crate::error::MathError;
use crate::math::math_helpers::{ceil_div, ensure_finite, floor_div};

pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = -MIN_TICK;

/// Price ratio between two adjacent ticks.
pub const TICK_BASE: f64 = 1.0001;

/// Standard fee tiers (hundredths of a bip) and their tick spacings.
pub const FEE_TIER_SPACINGS: [(u32, i32); 4] = [(100, 1), (500, 10), (3000, 60), (10000, 200)];

/// Returns the tick spacing used by a standard fee tier, if any.
pub fn tick_spacing_for_fee(fee: u32) -> Option<i32> {
    FEE_TIER_SPACINGS
        .iter()
        .find(|(tier, _)| *tier == fee)
        .map(|(_, spacing)| *spacing)
}

/// Converts a price ratio into its unrounded tick, `ln(ratio) / ln(1.0001)`.
///
/// Fails with `MathError::InvalidArgument` for a non-positive or
/// non-finite ratio.
pub fn ratio_to_tick(ratio: f64) -> Result<f64, MathError> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(MathError::invalid("ratio", ratio));
    }
    Ok(ratio.ln() / TICK_BASE.ln())
}

/// Returns the price ratio `1.0001^tick`.
#[inline]
pub fn tick_to_ratio(tick: i32) -> f64 {
    TICK_BASE.powi(tick)
}

/// Aligns an unrounded tick onto the spacing grid with floor semantics:
/// `floor(raw / spacing) * spacing`. Negative ticks step away from zero,
/// so `-15.0` with spacing 10 lands on `-20`.
pub fn align_to_spacing(raw_tick: f64, spacing: i32) -> Result<i32, MathError> {
    if spacing <= 0 {
        return Err(MathError::invalid("tick_spacing", spacing));
    }
    let raw_tick = ensure_finite("raw_tick", raw_tick)?;

    let steps = (raw_tick / spacing as f64).floor();
    // anything this large is far outside the tick bounds anyway
    if steps.abs() > (i32::MAX / spacing) as f64 {
        return Err(MathError::OutOfRange {
            tick: if steps > 0.0 { i32::MAX } else { i32::MIN },
            min: MIN_TICK,
            max: MAX_TICK,
        });
    }
    Ok(steps as i32 * spacing)
}

/// Rounds an integer tick down to the nearest multiple of `spacing`.
#[inline]
pub fn align_tick_down(tick: i32, spacing: i32) -> Result<i32, MathError> {
    Ok(floor_div(tick, spacing)? * spacing)
}

/// Rounds an integer tick up to the nearest multiple of `spacing`.
#[inline]
pub fn align_tick_up(tick: i32, spacing: i32) -> Result<i32, MathError> {
    Ok(ceil_div(tick, spacing)? * spacing)
}

/// Returns `tick` unchanged if it lies within `[MIN_TICK, MAX_TICK]`,
/// otherwise `MathError::OutOfRange` carrying the offending tick.
#[inline]
pub fn check_tick_bounds(tick: i32) -> Result<i32, MathError> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(MathError::OutOfRange {
            tick,
            min: MIN_TICK,
            max: MAX_TICK,
        });
    }
    Ok(tick)
}

/// Smallest tick aligned to `spacing` that is still `>= MIN_TICK`.
pub fn min_usable_tick(spacing: i32) -> Result<i32, MathError> {
    align_tick_up(MIN_TICK, spacing)
}

/// Largest tick aligned to `spacing` that is still `<= MAX_TICK`.
pub fn max_usable_tick(spacing: i32) -> Result<i32, MathError> {
    align_tick_down(MAX_TICK, spacing)
}

/// Clamps an observed tick into the usable range, then aligns it down, or
/// up when `round_up` is set. The result is always a usable tick.
pub fn clamp_and_align(tick: i32, spacing: i32, round_up: bool) -> Result<i32, MathError> {
    let min = min_usable_tick(spacing)?;
    let max = max_usable_tick(spacing)?;
    let clamped = tick.clamp(min, max);

    if round_up {
        align_tick_up(clamped, spacing)
    } else {
        align_tick_down(clamped, spacing)
    }
}
