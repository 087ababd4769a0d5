use crate::math::market_cap::{MarketCapRange, PricingParams};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// A curve as the caller describes it, in USD market caps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketCapCurve {
    pub market_cap: MarketCapRange,
    /// Number of liquidity positions the curve is split into.
    pub num_positions: u16,
    /// Fraction of the sale supply, WAD-scaled.
    pub shares: U256,
}

impl MarketCapCurve {
    pub fn new(start: f64, end: f64, num_positions: u16, shares: U256) -> Self {
        Self {
            market_cap: MarketCapRange::new(start, end),
            num_positions,
            shares,
        }
    }
}

/// A curve lowered onto the tick grid, ready for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickCurve {
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub num_positions: u16,
    pub shares: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleConfig {
    pub initial_supply: U256,
}

/// Where the curve set takes its token supply from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplySource {
    Explicit(U256),
    /// Inherit `initial_supply` from the sale configuration.
    Sale(SaleConfig),
}

impl SupplySource {
    pub fn resolve(&self) -> U256 {
        match self {
            SupplySource::Explicit(supply) => *supply,
            SupplySource::Sale(sale) => sale.initial_supply,
        }
    }
}

/// Shared inputs for lowering every curve of a set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveContext {
    pub numeraire: Address,
    pub numeraire_price_usd: f64,
    pub token_decimals: u8,
    pub numeraire_decimals: u8,
    pub tick_spacing: i32,
    pub supply: SupplySource,
}

impl CurveContext {
    pub fn token_supply(&self) -> U256 {
        self.supply.resolve()
    }

    pub fn pricing_params(&self) -> PricingParams {
        PricingParams {
            token_supply: self.token_supply(),
            token_decimals: self.token_decimals,
            numeraire: self.numeraire,
            numeraire_price_usd: self.numeraire_price_usd,
            numeraire_decimals: self.numeraire_decimals,
            tick_spacing: self.tick_spacing,
        }
    }
}
