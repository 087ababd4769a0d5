use crate::WAD;
use crate::curve::types::{CurveContext, MarketCapCurve, TickCurve};
use crate::error::CurveError;
use crate::math::market_cap::market_cap_range_to_ticks_for_curve;
use crate::math::math_helpers::wad_percentage;
use alloy_primitives::U256;
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Validates, sorts and lowers a set of market cap curves onto ticks.
///
/// The output order only depends on the curves themselves, never on the
/// order they were passed in. Overlapping curves are accepted; a market
/// cap interval left uncovered between two curves is not. Shares must sum
/// to exactly `WAD`.
pub fn build_curve_set(
    curves: &[MarketCapCurve],
    context: &CurveContext,
) -> Result<Vec<TickCurve>, CurveError> {
    let sorted = validate_and_sort(curves)?;
    ensure_contiguous(&sorted)?;

    let total = sum_shares(sorted.iter().map(|curve| curve.shares));
    if total != Some(WAD) {
        return Err(shares_mismatch(total));
    }

    lower_curves(&sorted, context)
}

/// Checks each curve on its own and returns them in canonical order.
pub(crate) fn validate_and_sort(
    curves: &[MarketCapCurve],
) -> Result<Vec<MarketCapCurve>, CurveError> {
    if curves.is_empty() {
        return Err(CurveError::EmptyCurveSet);
    }

    for (index, curve) in curves.iter().enumerate() {
        validate_curve(index, curve)?;
    }

    let mut sorted = curves.to_vec();
    sorted.sort_by(compare_curves);
    Ok(sorted)
}

fn validate_curve(index: usize, curve: &MarketCapCurve) -> Result<(), CurveError> {
    let invalid = |field: &'static str, value: String| CurveError::InvalidCurve {
        index,
        field,
        value,
    };

    let range = curve.market_cap;
    if !range.start.is_finite() || range.start <= 0.0 {
        return Err(invalid("market_cap.start", range.start.to_string()));
    }
    if !range.end.is_finite() || range.end <= 0.0 {
        return Err(invalid("market_cap.end", range.end.to_string()));
    }
    if range.start >= range.end {
        return Err(invalid(
            "market_cap",
            format!("start {} >= end {}", range.start, range.end),
        ));
    }
    if curve.num_positions == 0 {
        return Err(invalid("num_positions", curve.num_positions.to_string()));
    }
    if curve.shares.is_zero() {
        return Err(invalid("shares", curve.shares.to_string()));
    }
    Ok(())
}

// (start, end) ascending; the trailing keys only break exact ties so the
// result stays independent of input order.
fn compare_curves(a: &MarketCapCurve, b: &MarketCapCurve) -> Ordering {
    a.market_cap
        .start
        .total_cmp(&b.market_cap.start)
        .then(a.market_cap.end.total_cmp(&b.market_cap.end))
        .then(a.num_positions.cmp(&b.num_positions))
        .then(a.shares.cmp(&b.shares))
}

/// Fails on the first pair of neighbours that leaves a gap. Overlaps pass.
pub(crate) fn ensure_contiguous(sorted: &[MarketCapCurve]) -> Result<(), CurveError> {
    for pair in sorted.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        if current.market_cap.start > previous.market_cap.end {
            return Err(CurveError::GapDetected {
                previous_end: previous.market_cap.end,
                next_start: current.market_cap.start,
            });
        }
    }
    Ok(())
}

/// Sums WAD-scaled shares, `None` on overflow.
pub fn sum_shares(shares: impl IntoIterator<Item = U256>) -> Option<U256> {
    shares
        .into_iter()
        .try_fold(U256::ZERO, |acc, share| acc.checked_add(share))
}

/// Total shares of an already lowered curve set.
pub fn total_shares(curves: &[TickCurve]) -> Option<U256> {
    sum_shares(curves.iter().map(|curve| curve.shares))
}

pub(crate) fn shares_mismatch(total: Option<U256>) -> CurveError {
    let total = total.unwrap_or(U256::MAX);
    CurveError::SharesMismatch {
        total,
        percentage: wad_percentage(total),
    }
}

/// Lowers sorted curves one by one, keeping their order.
pub(crate) fn lower_curves(
    sorted: &[MarketCapCurve],
    context: &CurveContext,
) -> Result<Vec<TickCurve>, CurveError> {
    let params = context.pricing_params();
    let mut lowered = Vec::with_capacity(sorted.len());

    for curve in sorted {
        let ticks = market_cap_range_to_ticks_for_curve(&curve.market_cap, &params)?;
        trace!(
            start = curve.market_cap.start,
            end = curve.market_cap.end,
            tick_lower = ticks.tick_lower,
            tick_upper = ticks.tick_upper,
            "lowered curve"
        );
        lowered.push(TickCurve {
            tick_lower: ticks.tick_lower,
            tick_upper: ticks.tick_upper,
            num_positions: curve.num_positions,
            shares: curve.shares,
        });
    }

    debug!(
        curves = lowered.len(),
        tick_spacing = context.tick_spacing,
        "built curve set"
    );
    Ok(lowered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::types::{SaleConfig, SupplySource};
    use crate::error::MathError;
    use alloy_primitives::{Address, address};

    const WETH: Address = address!("0x4200000000000000000000000000000000000006");

    fn supply() -> U256 {
        U256::from(1_000_000_000u64) * WAD
    }

    fn context() -> CurveContext {
        CurveContext {
            numeraire: WETH,
            numeraire_price_usd: 3000.0,
            token_decimals: 18,
            numeraire_decimals: 18,
            tick_spacing: 60,
            supply: SupplySource::Explicit(supply()),
        }
    }

    fn wad_fraction(numerator: u64, denominator: u64) -> U256 {
        WAD * U256::from(numerator) / U256::from(denominator)
    }

    fn three_curves() -> Vec<MarketCapCurve> {
        vec![
            MarketCapCurve::new(100_000.0, 500_000.0, 10, wad_fraction(1, 2)),
            MarketCapCurve::new(500_000.0, 2_000_000.0, 10, wad_fraction(3, 10)),
            MarketCapCurve::new(2_000_000.0, 10_000_000.0, 5, wad_fraction(1, 5)),
        ]
    }

    #[test]
    fn builds_sorted_tick_curves() {
        let curves = build_curve_set(&three_curves(), &context()).unwrap();
        assert_eq!(curves.len(), 3);
        for curve in &curves {
            assert!(curve.tick_lower < curve.tick_upper);
            assert_eq!(curve.tick_lower % 60, 0);
            assert_eq!(curve.tick_upper % 60, 0);
        }
        assert_eq!(curves[0].shares, wad_fraction(1, 2));
        assert_eq!(curves[2].num_positions, 5);
        assert_eq!(total_shares(&curves), Some(WAD));
    }

    #[test]
    fn output_does_not_depend_on_input_order() {
        let expected = build_curve_set(&three_curves(), &context()).unwrap();

        let mut reversed = three_curves();
        reversed.reverse();
        assert_eq!(build_curve_set(&reversed, &context()).unwrap(), expected);

        let mut rotated = three_curves();
        rotated.rotate_left(1);
        assert_eq!(build_curve_set(&rotated, &context()).unwrap(), expected);
    }

    #[test]
    fn identical_starts_are_ordered_by_end() {
        let curves = vec![
            MarketCapCurve::new(100_000.0, 5_000_000.0, 10, wad_fraction(1, 2)),
            MarketCapCurve::new(100_000.0, 1_000_000.0, 10, wad_fraction(1, 2)),
        ];
        let sorted = validate_and_sort(&curves).unwrap();
        assert_eq!(sorted[0].market_cap.end, 1_000_000.0);
        assert_eq!(sorted[1].market_cap.end, 5_000_000.0);
    }

    #[test]
    fn gap_is_detected_in_any_order() {
        let mut curves = vec![
            MarketCapCurve::new(100_000.0, 1_000_000.0, 10, wad_fraction(1, 2)),
            MarketCapCurve::new(2_000_000.0, 5_000_000.0, 10, wad_fraction(1, 2)),
        ];
        for _ in 0..2 {
            let result = build_curve_set(&curves, &context());
            assert_eq!(
                result,
                Err(CurveError::GapDetected {
                    previous_end: 1_000_000.0,
                    next_start: 2_000_000.0
                })
            );
            curves.reverse();
        }
    }

    #[test]
    fn overlapping_curves_are_allowed() {
        let curves = vec![
            MarketCapCurve::new(500_000.0, 2_000_000.0, 10, wad_fraction(1, 2)),
            MarketCapCurve::new(1_000_000.0, 5_000_000.0, 10, wad_fraction(1, 2)),
        ];
        let lowered = build_curve_set(&curves, &context()).unwrap();
        assert_eq!(lowered.len(), 2);
    }

    #[test]
    fn shares_must_sum_to_exactly_wad() {
        let curve = |shares| vec![MarketCapCurve::new(100_000.0, 1_000_000.0, 10, shares)];

        let under = wad_fraction(9_999, 10_000);
        let over = wad_fraction(10_001, 10_000);
        for shares in [under, over] {
            match build_curve_set(&curve(shares), &context()) {
                Err(CurveError::SharesMismatch { total, percentage }) => {
                    assert_eq!(total, shares);
                    assert!((percentage - 100.0).abs() > 0.009);
                }
                other => panic!("expected SharesMismatch, got {other:?}"),
            }
        }

        assert!(build_curve_set(&curve(WAD), &context()).is_ok());
    }

    #[test]
    fn share_overflow_is_a_mismatch() {
        let curves = vec![
            MarketCapCurve::new(100_000.0, 1_000_000.0, 10, U256::MAX),
            MarketCapCurve::new(1_000_000.0, 2_000_000.0, 10, U256::from(1u8)),
        ];
        assert!(matches!(
            build_curve_set(&curves, &context()),
            Err(CurveError::SharesMismatch { total, .. }) if total == U256::MAX
        ));
    }

    #[test]
    fn invalid_curves_name_the_field() {
        let cases = [
            (MarketCapCurve::new(0.0, 1_000.0, 10, WAD), "market_cap.start"),
            (MarketCapCurve::new(10.0, -1.0, 10, WAD), "market_cap.end"),
            (MarketCapCurve::new(5_000.0, 1_000.0, 10, WAD), "market_cap"),
            (MarketCapCurve::new(1_000.0, 5_000.0, 0, WAD), "num_positions"),
            (MarketCapCurve::new(1_000.0, 5_000.0, 10, U256::ZERO), "shares"),
        ];
        for (curve, expected) in cases {
            match build_curve_set(&[curve], &context()) {
                Err(CurveError::InvalidCurve { index, field, .. }) => {
                    assert_eq!(index, 0);
                    assert_eq!(field, expected);
                }
                other => panic!("expected InvalidCurve({expected}), got {other:?}"),
            }
        }
    }

    #[test]
    fn empty_set_is_rejected() {
        assert_eq!(
            build_curve_set(&[], &context()),
            Err(CurveError::EmptyCurveSet)
        );
    }

    #[test]
    fn supply_can_be_inherited_from_sale() {
        let mut inherited = context();
        inherited.supply = SupplySource::Sale(SaleConfig {
            initial_supply: supply(),
        });
        assert_eq!(
            build_curve_set(&three_curves(), &inherited).unwrap(),
            build_curve_set(&three_curves(), &context()).unwrap()
        );
    }

    #[test]
    fn conversion_errors_surface_as_math_errors() {
        let mut broken = context();
        broken.supply = SupplySource::Explicit(U256::ZERO);
        assert!(matches!(
            build_curve_set(&three_curves(), &broken),
            Err(CurveError::Math(MathError::InvalidArgument { .. }))
        ));
    }
}
