//! Conversions between USD market caps and pool ticks.
//!
//! The pipeline runs market cap → token price → price ratio → tick. The
//! sign of the final tick depends on whether the new token is expected to
//! sort below the numeraire (token0) or above it (token1); token1 pools
//! price inversely, so their ticks are negated.

use crate::error::MathError;
use crate::math::math_helpers::{ensure_finite, pow10, to_whole_units};
use crate::math::tick_math::{
    MAX_TICK, MIN_TICK, align_to_spacing, check_tick_bounds, ratio_to_tick, tick_to_ratio,
};
use alloy_primitives::{Address, U160, U256};
use serde::{Deserialize, Serialize};

/// Largest address that still counts as the lower half of the address space,
/// `2^159 - 1`.
pub const ADDRESS_MIDPOINT: U160 = U160::from_limbs([u64::MAX, u64::MAX, (1 << 31) - 1]);

/// Everything besides the market cap that the tick conversion needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingParams {
    /// Total token supply in base units.
    pub token_supply: U256,
    pub token_decimals: u8,
    pub numeraire: Address,
    pub numeraire_price_usd: f64,
    pub numeraire_decimals: u8,
    pub tick_spacing: i32,
}

impl PricingParams {
    /// Parameters for an 18-decimal token priced against an 18-decimal numeraire.
    pub fn new(
        token_supply: U256,
        numeraire: Address,
        numeraire_price_usd: f64,
        tick_spacing: i32,
    ) -> Self {
        Self {
            token_supply,
            token_decimals: 18,
            numeraire,
            numeraire_price_usd,
            numeraire_decimals: 18,
            tick_spacing,
        }
    }

    pub fn with_decimals(mut self, token_decimals: u8, numeraire_decimals: u8) -> Self {
        self.token_decimals = token_decimals;
        self.numeraire_decimals = numeraire_decimals;
        self
    }

    #[inline]
    pub fn is_token0_expected(&self) -> bool {
        is_token0_expected(self.numeraire)
    }

    fn decimal_adjustment(&self) -> f64 {
        pow10(self.token_decimals as i32 - self.numeraire_decimals as i32)
    }
}

/// A USD market cap interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketCapRange {
    pub start: f64,
    pub end: f64,
}

impl MarketCapRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    fn ensure_ordered(&self) -> Result<(), MathError> {
        if !(self.start < self.end) {
            return Err(MathError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// Tick bounds for a simple start/end sale, `start_tick <= end_tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickRange {
    pub start_tick: i32,
    pub end_tick: i32,
}

/// Tick bounds of a single curve, `tick_lower <= tick_upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveTicks {
    pub tick_lower: i32,
    pub tick_upper: i32,
}

/// Planning heuristic for the ordering of a token that has not been mined
/// yet: it is expected to be token0 only when the numeraire sits in the
/// upper half of the address space. The zero address (native ether) is
/// always currency0, so the token is then token1.
pub fn is_token0_expected(numeraire: Address) -> bool {
    let value: U160 = numeraire.into();
    value > ADDRESS_MIDPOINT
}

/// USD price of one whole token at the given market cap.
pub fn market_cap_to_token_price(
    market_cap_usd: f64,
    token_supply: U256,
    decimals: u8,
) -> Result<f64, MathError> {
    let market_cap_usd = ensure_finite("market_cap_usd", market_cap_usd)?;
    if market_cap_usd <= 0.0 {
        return Err(MathError::invalid("market_cap_usd", market_cap_usd));
    }
    if token_supply.is_zero() {
        return Err(MathError::invalid("token_supply", token_supply));
    }
    Ok(market_cap_usd / to_whole_units(token_supply, decimals))
}

/// Raw price ratio (numeraire per token, adjusted for decimals).
pub fn token_price_to_ratio(
    token_price_usd: f64,
    numeraire_price_usd: f64,
    token_decimals: u8,
    numeraire_decimals: u8,
) -> Result<f64, MathError> {
    let token_price_usd = ensure_finite("token_price_usd", token_price_usd)?;
    let numeraire_price_usd = ensure_finite("numeraire_price_usd", numeraire_price_usd)?;
    if token_price_usd <= 0.0 {
        return Err(MathError::invalid("token_price_usd", token_price_usd));
    }
    if numeraire_price_usd <= 0.0 {
        return Err(MathError::invalid("numeraire_price_usd", numeraire_price_usd));
    }

    let ratio = numeraire_price_usd / token_price_usd;
    Ok(ratio * pow10(token_decimals as i32 - numeraire_decimals as i32))
}

/// Converts a USD market cap into a spacing-aligned tick.
///
/// The unrounded tick is floored onto the spacing grid, negated when the
/// token is expected to be token1, and finally bounds checked.
pub fn market_cap_to_tick(market_cap_usd: f64, params: &PricingParams) -> Result<i32, MathError> {
    let token_price =
        market_cap_to_token_price(market_cap_usd, params.token_supply, params.token_decimals)?;
    let ratio = token_price_to_ratio(
        token_price,
        params.numeraire_price_usd,
        params.token_decimals,
        params.numeraire_decimals,
    )?;
    let aligned = align_to_spacing(ratio_to_tick(ratio)?, params.tick_spacing)?;

    let tick = if params.is_token0_expected() {
        aligned
    } else {
        aligned.checked_neg().ok_or(MathError::OutOfRange {
            tick: aligned,
            min: MIN_TICK,
            max: MAX_TICK,
        })?
    };

    check_tick_bounds(tick)
}

/// USD price of one whole token at `tick`; the inverse of the first three
/// pipeline stages.
pub fn tick_to_token_price(tick: i32, params: &PricingParams) -> Result<f64, MathError> {
    check_tick_bounds(tick)?;
    let numeraire_price_usd = ensure_finite("numeraire_price_usd", params.numeraire_price_usd)?;
    if numeraire_price_usd <= 0.0 {
        return Err(MathError::invalid("numeraire_price_usd", numeraire_price_usd));
    }

    let oriented = if params.is_token0_expected() {
        tick
    } else {
        -tick
    };
    let ratio = tick_to_ratio(oriented);

    Ok(numeraire_price_usd * params.decimal_adjustment() / ratio)
}

/// Converts a tick back into the USD market cap it represents.
///
/// Round-tripping `market_cap_to_tick` through this function only loses
/// the precision dropped by spacing alignment: the result is at most one
/// spacing step (`1.0001^spacing`) above the original market cap.
pub fn tick_to_market_cap(tick: i32, params: &PricingParams) -> Result<f64, MathError> {
    if params.token_supply.is_zero() {
        return Err(MathError::invalid("token_supply", params.token_supply));
    }
    let token_price = tick_to_token_price(tick, params)?;

    Ok(token_price * to_whole_units(params.token_supply, params.token_decimals))
}

fn range_endpoint_ticks(
    range: &MarketCapRange,
    params: &PricingParams,
) -> Result<(i32, i32), MathError> {
    range.ensure_ordered()?;
    let start = market_cap_to_tick(range.start, params)?;
    let end = market_cap_to_tick(range.end, params)?;
    Ok((start.min(end), start.max(end)))
}

/// Converts a market cap interval into an ordered tick range.
///
/// Fails with `InvalidRange` unless `start < end`, and `DegenerateRange` if
/// the interval is narrower than one spacing step at this price.
pub fn market_cap_range_to_ticks(
    range: &MarketCapRange,
    params: &PricingParams,
) -> Result<TickRange, MathError> {
    let (lower, upper) = range_endpoint_ticks(range, params)?;
    if lower == upper {
        return Err(MathError::DegenerateRange {
            start: range.start,
            end: range.end,
            tick: lower,
        });
    }

    Ok(TickRange {
        start_tick: lower,
        end_tick: upper,
    })
}

/// Converts a curve's market cap interval into `(tick_lower, tick_upper)`.
///
/// Unlike [`market_cap_range_to_ticks`] a range that collapses onto a
/// single tick is returned as is.
pub fn market_cap_range_to_ticks_for_curve(
    range: &MarketCapRange,
    params: &PricingParams,
) -> Result<CurveTicks, MathError> {
    let (tick_lower, tick_upper) = range_endpoint_ticks(range, params)?;
    Ok(CurveTicks {
        tick_lower,
        tick_upper,
    })
}

/// Places a curve relative to a shared peg tick.
///
/// For token1 the offsets are added to the peg; for token0 they are
/// subtracted in reverse so the lower bound stays below the upper one.
pub fn apply_tick_offsets(
    peg_tick: i32,
    offset_lower: i32,
    offset_upper: i32,
    numeraire: Address,
) -> Result<CurveTicks, MathError> {
    if offset_lower < 0 {
        return Err(MathError::invalid("offset_lower", offset_lower));
    }
    if offset_upper < offset_lower {
        return Err(MathError::invalid("offset_upper", offset_upper));
    }

    let overflow = |tick: i32| MathError::OutOfRange {
        tick,
        min: MIN_TICK,
        max: MAX_TICK,
    };

    let (tick_lower, tick_upper) = if is_token0_expected(numeraire) {
        (
            peg_tick.checked_sub(offset_upper).ok_or(overflow(peg_tick))?,
            peg_tick.checked_sub(offset_lower).ok_or(overflow(peg_tick))?,
        )
    } else {
        (
            peg_tick.checked_add(offset_lower).ok_or(overflow(peg_tick))?,
            peg_tick.checked_add(offset_upper).ok_or(overflow(peg_tick))?,
        )
    };

    Ok(CurveTicks {
        tick_lower: check_tick_bounds(tick_lower)?,
        tick_upper: check_tick_bounds(tick_upper)?,
    })
}
