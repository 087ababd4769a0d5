use crate::WAD;
use crate::curve::builder::{
    ensure_contiguous, lower_curves, shares_mismatch, sum_shares, validate_and_sort,
};
use crate::curve::types::{CurveContext, MarketCapCurve, TickCurve};
use crate::error::{CurveError, MathError};
use crate::math::tick_math::check_tick_bounds;
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

pub const PRESET_NUM_POSITIONS: u16 = 10;
/// Each preset sells 10% of the supply.
pub const PRESET_SHARES: U256 = U256::from_limbs([100_000_000_000_000_000, 0, 0, 0]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketCapPreset {
    Low,
    Medium,
    High,
}

impl MarketCapPreset {
    /// USD market cap interval covered by the preset. Neighbouring presets
    /// share their boundary, so any adjacent selection is gapless.
    pub fn range(self) -> (f64, f64) {
        match self {
            MarketCapPreset::Low => (7_500.0, 30_000.0),
            MarketCapPreset::Medium => (30_000.0, 150_000.0),
            MarketCapPreset::High => (150_000.0, 750_000.0),
        }
    }

    pub fn curve(self) -> MarketCapCurve {
        let (start, end) = self.range();
        MarketCapCurve::new(start, end, PRESET_NUM_POSITIONS, PRESET_SHARES)
    }
}

/// Builds the curves for a set of presets and closes the set with a filler
/// curve holding whatever share the presets leave unsold.
pub fn build_preset_curve_set(
    presets: &[MarketCapPreset],
    context: &CurveContext,
) -> Result<Vec<TickCurve>, CurveError> {
    let curves: Vec<MarketCapCurve> = presets.iter().map(|preset| preset.curve()).collect();
    build_partial_curve_set(&curves, context, PRESET_NUM_POSITIONS)
}

/// Like [`crate::curve::build_curve_set`], but accepts shares summing to less
/// than `WAD` and appends a filler curve for the residual.
pub fn build_partial_curve_set(
    curves: &[MarketCapCurve],
    context: &CurveContext,
    filler_positions: u16,
) -> Result<Vec<TickCurve>, CurveError> {
    let sorted = validate_and_sort(curves)?;
    ensure_contiguous(&sorted)?;

    let total = sum_shares(sorted.iter().map(|curve| curve.shares));
    match total {
        Some(total) if total <= WAD => {}
        _ => return Err(shares_mismatch(total)),
    }

    let lowered = lower_curves(&sorted, context)?;
    append_filler_curve(lowered, context.tick_spacing, filler_positions)
}

/// Appends a curve starting at the last curve's upper tick and spanning
/// `num_positions * tick_spacing` ticks, carrying `WAD - Σ shares`.
///
/// Returns the curves unchanged when they already sum to `WAD`.
pub fn append_filler_curve(
    mut curves: Vec<TickCurve>,
    tick_spacing: i32,
    num_positions: u16,
) -> Result<Vec<TickCurve>, CurveError> {
    let Some(last) = curves.last().copied() else {
        return Err(CurveError::EmptyCurveSet);
    };
    if tick_spacing <= 0 {
        return Err(MathError::invalid("tick_spacing", tick_spacing).into());
    }
    if num_positions == 0 {
        return Err(MathError::invalid("num_positions", num_positions).into());
    }

    let total = sum_shares(curves.iter().map(|curve| curve.shares));
    let residual = match total {
        Some(total) if total <= WAD => WAD - total,
        _ => return Err(shares_mismatch(total)),
    };
    if residual.is_zero() {
        return Ok(curves);
    }

    let span = i32::from(num_positions)
        .checked_mul(tick_spacing)
        .and_then(|span| last.tick_upper.checked_add(span))
        .ok_or_else(|| MathError::invalid("filler_span", num_positions))?;

    curves.push(TickCurve {
        tick_lower: last.tick_upper,
        tick_upper: check_tick_bounds(span)?,
        num_positions,
        shares: residual,
    });
    Ok(curves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::builder::total_shares;
    use crate::curve::types::SupplySource;
    use crate::math::tick_math::MAX_TICK;
    use alloy_primitives::{Address, address};

    const WETH: Address = address!("0x4200000000000000000000000000000000000006");

    fn context() -> CurveContext {
        CurveContext {
            numeraire: WETH,
            numeraire_price_usd: 3000.0,
            token_decimals: 18,
            numeraire_decimals: 18,
            tick_spacing: 200,
            supply: SupplySource::Explicit(U256::from(1_000_000_000u64) * WAD),
        }
    }

    #[test]
    fn preset_shares_are_ten_percent() {
        assert_eq!(PRESET_SHARES * U256::from(10u8), WAD);
    }

    #[test]
    fn presets_get_a_filler_curve() {
        let presets = [
            MarketCapPreset::High,
            MarketCapPreset::Low,
            MarketCapPreset::Medium,
        ];
        let curves = build_preset_curve_set(&presets, &context()).unwrap();

        assert_eq!(curves.len(), 4);
        assert_eq!(total_shares(&curves), Some(WAD));

        let filler = curves[3];
        assert_eq!(filler.tick_lower, curves[2].tick_upper);
        assert_eq!(
            filler.tick_upper - filler.tick_lower,
            i32::from(PRESET_NUM_POSITIONS) * 200
        );
        assert_eq!(filler.shares, WAD - PRESET_SHARES * U256::from(3u8));
    }

    #[test]
    fn non_adjacent_presets_leave_a_gap() {
        let presets = [MarketCapPreset::Low, MarketCapPreset::High];
        assert!(matches!(
            build_preset_curve_set(&presets, &context()),
            Err(CurveError::GapDetected { .. })
        ));
    }

    #[test]
    fn full_shares_need_no_filler() {
        let curves = vec![TickCurve {
            tick_lower: -600,
            tick_upper: 0,
            num_positions: 3,
            shares: WAD,
        }];
        assert_eq!(append_filler_curve(curves.clone(), 200, 5).unwrap(), curves);
    }

    #[test]
    fn filler_rejects_bad_input() {
        let curve = TickCurve {
            tick_lower: MAX_TICK - 1_000,
            tick_upper: MAX_TICK - 200,
            num_positions: 1,
            shares: WAD / U256::from(2u8),
        };
        assert!(matches!(
            append_filler_curve(vec![curve], 200, 5),
            Err(CurveError::Math(MathError::OutOfRange { .. }))
        ));
        assert!(append_filler_curve(vec![], 200, 5).is_err());
        assert!(append_filler_curve(vec![curve], 0, 5).is_err());
        assert!(append_filler_curve(vec![curve], 200, 0).is_err());
    }

    #[test]
    fn oversold_partial_set_is_rejected() {
        let curves = vec![
            MarketCapCurve::new(10_000.0, 50_000.0, 5, WAD),
            MarketCapCurve::new(50_000.0, 90_000.0, 5, PRESET_SHARES),
        ];
        assert!(matches!(
            build_partial_curve_set(&curves, &context(), 5),
            Err(CurveError::SharesMismatch { .. })
        ));
    }
}
