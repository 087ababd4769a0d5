//! Pricing and address math for launching a token into a hooked
//! concentrated-liquidity pool.
//!
//! This crate exposes:
//! - Tick conversions for USD market caps (`math::*`).
//! - Validation and lowering of multi-curve liquidity layouts (`curve::*`).
//! - CREATE2 salt mining under token-ordering and hook-flag constraints
//!   (`mining::*`).
//! - Optional `onchain` helpers that skip salts whose address already holds
//!   code on a live chain.
//!
//! # Examples
//!
//! ## Market cap to tick
//! ```no_run
//! use launch_math::{Address, U256, math::market_cap::{PricingParams, market_cap_to_tick}};
//!
//! let weth: Address = "0x4200000000000000000000000000000000000006".parse().unwrap();
//! let supply = U256::from(1_000_000_000u64) * U256::from(10u64).pow(U256::from(18u8));
//! let params = PricingParams::new(supply, weth, 3000.0, 60);
//!
//! let tick = market_cap_to_tick(1_000_000.0, &params).unwrap();
//! assert_eq!(tick % 60, 0);
//! ```
//!
//! ## Building a curve set
//! ```no_run
//! use launch_math::{
//!     Address, U256, WAD,
//!     curve::{CurveContext, MarketCapCurve, SupplySource, build_curve_set},
//! };
//!
//! # let numeraire = Address::ZERO;
//! let supply = U256::from(1_000_000_000u64) * WAD;
//! let ctx = CurveContext {
//!     numeraire,
//!     numeraire_price_usd: 3000.0,
//!     token_decimals: 18,
//!     numeraire_decimals: 18,
//!     tick_spacing: 60,
//!     supply: SupplySource::Explicit(supply),
//! };
//! let curves = [
//!     MarketCapCurve::new(10_000.0, 100_000.0, 10, WAD / U256::from(2u8)),
//!     MarketCapCurve::new(100_000.0, 1_000_000.0, 10, WAD / U256::from(2u8)),
//! ];
//! let lowered = build_curve_set(&curves, &ctx).unwrap();
//! assert_eq!(lowered.len(), 2);
//! ```
//!
//! ## Mining a token salt
//! ```no_run
//! use launch_math::{
//!     Address, keccak256,
//!     mining::{OrderingConstraint, SaltMiner},
//! };
//!
//! # let deployer = Address::repeat_byte(0x11);
//! # let numeraire = Address::repeat_byte(0x42);
//! let miner = SaltMiner::new(deployer, keccak256(b"token init code")).unwrap();
//! let mined = miner
//!     .mine(&OrderingConstraint::for_token(numeraire, false), None)
//!     .unwrap();
//! assert!(mined.address > numeraire);
//! ```

pub use alloy_primitives::{Address, B256, U256, keccak256};

pub mod curve;
pub mod error;
mod hash;
pub mod math;
pub mod mining;
#[cfg(feature = "onchain")]
pub mod onchain;

pub use error::{CurveError, Error, MathError, MiningError};
pub use hash::FastMap;

pub use curve::{CurveContext, MarketCapCurve, TickCurve, build_curve_set};
pub use math::market_cap::{PricingParams, market_cap_range_to_ticks, market_cap_to_tick};
pub use mining::{MinedSalt, SaltMiner, mine_salt};

/// 1e18, the fixed-point unit curve shares are expressed in.
pub const WAD: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);
