//! Curve sets: validation, canonical ordering and lowering of market cap
//! curves onto the tick grid.

pub mod builder;
pub mod presets;
pub mod types;

pub use builder::{build_curve_set, sum_shares, total_shares};
pub use presets::{
    MarketCapPreset, append_filler_curve, build_partial_curve_set, build_preset_curve_set,
};
pub use types::{CurveContext, MarketCapCurve, SaleConfig, SupplySource, TickCurve};
