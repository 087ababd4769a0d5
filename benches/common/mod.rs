#![allow(dead_code)]

use alloy_primitives::{Address, U256, address, keccak256};
use criterion::Criterion;
use launch_math::WAD;
use launch_math::curve::{
    CurveContext, MarketCapCurve, MarketCapPreset, SupplySource, build_curve_set,
    build_preset_curve_set,
};
use launch_math::math::market_cap::{
    MarketCapRange, PricingParams, market_cap_range_to_ticks, market_cap_to_tick,
    tick_to_market_cap,
};
use launch_math::math::tick_math::{align_to_spacing, clamp_and_align, ratio_to_tick};
use launch_math::mining::{
    HookFlags, OrderingConstraint, SaltMiner, compute_create2_address, hook_constraint,
};
use std::hint::black_box;

const WETH: Address = address!("0x4200000000000000000000000000000000000006");
const DEPLOYER: Address = address!("0x4e59b44847b379578588920cA78FbF26c0B4956C");

fn params() -> PricingParams {
    PricingParams::new(U256::from(1_000_000_000u64) * WAD, WETH, 3000.0, 60)
}

fn context() -> CurveContext {
    CurveContext {
        numeraire: WETH,
        numeraire_price_usd: 3000.0,
        token_decimals: 18,
        numeraire_decimals: 18,
        tick_spacing: 60,
        supply: SupplySource::Explicit(U256::from(1_000_000_000u64) * WAD),
    }
}

pub fn bench_tick_math(c: &mut Criterion) {
    c.bench_function("ratio_to_tick", |b| {
        b.iter(|| ratio_to_tick(black_box(3_000_000.0)))
    });
    c.bench_function("align_to_spacing", |b| {
        b.iter(|| align_to_spacing(black_box(149_148.7), black_box(60)))
    });
    c.bench_function("clamp_and_align", |b| {
        b.iter(|| clamp_and_align(black_box(-887_272), black_box(60), black_box(true)))
    });
}

pub fn bench_market_cap(c: &mut Criterion) {
    let params = params();
    c.bench_function("market_cap_to_tick", |b| {
        b.iter(|| market_cap_to_tick(black_box(1_000_000.0), black_box(&params)))
    });
    c.bench_function("tick_to_market_cap", |b| {
        b.iter(|| tick_to_market_cap(black_box(-149_100), black_box(&params)))
    });

    let range = MarketCapRange::new(100_000.0, 10_000_000.0);
    c.bench_function("market_cap_range_to_ticks", |b| {
        b.iter(|| market_cap_range_to_ticks(black_box(&range), black_box(&params)))
    });
}

pub fn bench_curve_set(c: &mut Criterion) {
    let ctx = context();
    let quarter = WAD / U256::from(4u8);
    let curves = [
        MarketCapCurve::new(1_000_000.0, 5_000_000.0, 10, quarter),
        MarketCapCurve::new(10_000.0, 100_000.0, 10, quarter),
        MarketCapCurve::new(500_000.0, 2_000_000.0, 10, quarter),
        MarketCapCurve::new(100_000.0, 500_000.0, 10, quarter),
    ];
    c.bench_function("build_curve_set", |b| {
        b.iter(|| build_curve_set(black_box(&curves), black_box(&ctx)))
    });

    let presets = [
        MarketCapPreset::Low,
        MarketCapPreset::Medium,
        MarketCapPreset::High,
    ];
    c.bench_function("build_preset_curve_set", |b| {
        b.iter(|| build_preset_curve_set(black_box(&presets), black_box(&ctx)))
    });
}

pub fn bench_create2(c: &mut Criterion) {
    let init_code_hash = keccak256(b"token init code");
    c.bench_function("compute_create2_address", |b| {
        b.iter(|| {
            compute_create2_address(
                black_box(DEPLOYER),
                black_box(U256::from(42u8)),
                black_box(init_code_hash),
            )
        })
    });
}

pub fn bench_salt_mining(c: &mut Criterion) {
    let token_miner = SaltMiner::new(DEPLOYER, keccak256(b"token init code")).unwrap();
    let ordering = OrderingConstraint::above(WETH);
    c.bench_function("mine_ordering_salt", |b| {
        b.iter(|| token_miner.mine(black_box(&ordering), None))
    });

    let hook_miner = SaltMiner::new(DEPLOYER, keccak256(b"hook init code")).unwrap();
    let hook = hook_constraint(HookFlags::BEFORE_SWAP | HookFlags::AFTER_SWAP, ordering);
    let mut group = c.benchmark_group("hook_mining");
    group.sample_size(10);
    group.bench_function("mine_hook_salt", |b| {
        b.iter(|| hook_miner.mine(black_box(&hook), None))
    });
    group.finish();
}
