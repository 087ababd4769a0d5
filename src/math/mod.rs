pub mod math_helpers;
pub mod tick_math;

pub mod market_cap;
