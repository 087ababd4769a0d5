//! Multi-stage mining where later stages depend on earlier results.
//!
//! Each stage remembers a fingerprint of the upstream value it was mined
//! against (an earlier stage's result or an observed tick). If that value
//! changes the stage is stale and has to be mined again from scratch.

use crate::error::MiningError;
use crate::math::tick_math::clamp_and_align;
use crate::mining::constraint::{AddressConstraint, OrderingConstraint};
use crate::mining::deployed::{DeployedCode, mine_undeployed};
use crate::mining::miner::{MinedSalt, MinerConfig, SaltMiner};
use alloy_primitives::{Address, B256, U160, U256, keccak256};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StageFingerprint(B256);

impl StageFingerprint {
    /// Fingerprint of a finished stage: its inputs and its result.
    pub fn of_stage(stage: &MinedStage) -> Self {
        let mut buf = Vec::with_capacity(20 + 32 + 32 + 20);
        buf.extend_from_slice(stage.deployer.as_slice());
        buf.extend_from_slice(stage.init_code_hash.as_slice());
        buf.extend_from_slice(stage.result.salt.as_slice());
        buf.extend_from_slice(stage.result.address.as_slice());
        StageFingerprint(keccak256(buf))
    }

    /// Fingerprint of an observed tick.
    pub fn of_tick(tick: i32) -> Self {
        StageFingerprint(keccak256(tick.to_be_bytes()))
    }

    pub fn as_b256(&self) -> B256 {
        self.0
    }
}

/// Result of one mining stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinedStage {
    pub name: &'static str,
    pub deployer: Address,
    pub init_code_hash: B256,
    pub result: MinedSalt,
    upstream: Option<StageFingerprint>,
}

impl MinedStage {
    #[inline]
    pub fn address(&self) -> Address {
        self.result.address
    }

    #[inline]
    pub fn salt(&self) -> B256 {
        self.result.salt
    }

    pub fn fingerprint(&self) -> StageFingerprint {
        StageFingerprint::of_stage(self)
    }

    pub fn upstream(&self) -> Option<StageFingerprint> {
        self.upstream
    }

    /// Fails with `UpstreamStale` unless this stage was mined against
    /// exactly `current`.
    pub fn ensure_upstream(&self, current: StageFingerprint) -> Result<(), MiningError> {
        if self.upstream != Some(current) {
            warn!(stage = self.name, "upstream input changed since mining");
            return Err(MiningError::UpstreamStale { stage: self.name });
        }
        Ok(())
    }

    /// Checks this stage against the current state of the stage it depends on.
    pub fn ensure_fresh(&self, upstream: &MinedStage) -> Result<(), MiningError> {
        self.ensure_upstream(upstream.fingerprint())
    }
}

/// Mines a stage with no upstream dependency, skipping candidates that
/// already hold code.
pub fn mine_stage<C, D>(
    name: &'static str,
    miner: &SaltMiner,
    constraint: &C,
    deployed: &D,
    start_salt: Option<U256>,
) -> Result<MinedStage, MiningError>
where
    C: AddressConstraint + ?Sized,
    D: DeployedCode + ?Sized,
{
    let result = mine_undeployed(miner, constraint, deployed, start_salt)?;
    debug!(stage = name, address = %result.address, attempts = result.attempts, "stage mined");

    Ok(MinedStage {
        name,
        deployer: miner.deployer(),
        init_code_hash: miner.init_code_hash(),
        result,
        upstream: None,
    })
}

fn mine_with_upstream<C, D>(
    name: &'static str,
    miner: SaltMiner,
    upstream: StageFingerprint,
    constraint: &C,
    deployed: &D,
) -> Result<MinedStage, MiningError>
where
    C: AddressConstraint + ?Sized,
    D: DeployedCode + ?Sized,
{
    let mut stage = mine_stage(name, &miner, constraint, deployed, None)?;
    stage.upstream = Some(upstream);
    Ok(stage)
}

/// Mines a stage whose init code embeds the address mined by `upstream`.
///
/// `init_code_hash_for` builds the init-code hash from the upstream
/// address; it is called once per mining run, so re-running after the
/// upstream changed always starts over.
pub fn mine_dependent_stage<F, C, D>(
    name: &'static str,
    deployer: Address,
    upstream: &MinedStage,
    init_code_hash_for: F,
    constraint: &C,
    deployed: &D,
    config: MinerConfig,
) -> Result<MinedStage, MiningError>
where
    F: FnOnce(Address) -> B256,
    C: AddressConstraint + ?Sized,
    D: DeployedCode + ?Sized,
{
    let miner = SaltMiner::new(deployer, init_code_hash_for(upstream.address()))?
        .with_config(config);
    mine_with_upstream(name, miner, upstream.fingerprint(), constraint, deployed)
}

/// Actual ordering of a mined token against the numeraire. Fails with
/// `OrderingMismatch` when it disagrees with the planning heuristic.
pub fn resolve_token_order(
    token: Address,
    numeraire: Address,
    expected_token0: bool,
) -> Result<bool, MiningError> {
    if token == numeraire {
        return Err(MiningError::InvalidArgument {
            name: "token",
            value: token.to_string(),
        });
    }

    let token_value: U160 = token.into();
    let numeraire_value: U160 = numeraire.into();
    let actual_token0 = token_value < numeraire_value;
    if actual_token0 != expected_token0 {
        return Err(MiningError::OrderingMismatch {
            expected_token0,
            actual_token0,
        });
    }
    Ok(actual_token0)
}

/// Token and hook mined for one deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenHookStages {
    pub token: MinedStage,
    pub hook: MinedStage,
    pub token_is_token0: bool,
}

impl TokenHookStages {
    /// Re-validates the hook against the token it was mined with.
    pub fn ensure_consistent(&self) -> Result<(), MiningError> {
        self.hook.ensure_fresh(&self.token)
    }
}

/// Deployer, constraint and search settings for a hook stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookStagePlan<C> {
    pub deployer: Address,
    pub constraint: C,
    /// Applies to the hook search only; the token miner's settings never do.
    pub config: MinerConfig,
}

/// Mines the token so it sorts on the expected side of the numeraire, then
/// the hook whose init code embeds the token address. Both stages skip
/// candidates `deployed` reports as already holding code.
pub fn mine_token_then_hook<F, C, D>(
    token_miner: &SaltMiner,
    numeraire: Address,
    expected_token0: bool,
    hook: &HookStagePlan<C>,
    hook_init_code_hash_for: F,
    deployed: &D,
) -> Result<TokenHookStages, MiningError>
where
    F: FnOnce(Address) -> B256,
    C: AddressConstraint,
    D: DeployedCode + ?Sized,
{
    let ordering = OrderingConstraint::for_token(numeraire, expected_token0);
    let token = mine_stage("token", token_miner, &ordering, deployed, None)?;
    let token_is_token0 = resolve_token_order(token.address(), numeraire, expected_token0)?;

    let hook_stage = mine_dependent_stage(
        "hook",
        hook.deployer,
        &token,
        hook_init_code_hash_for,
        &hook.constraint,
        deployed,
        hook.config,
    )?;

    Ok(TokenHookStages {
        token,
        hook: hook_stage,
        token_is_token0,
    })
}

/// Tick a completion pass builds on: the observed clearing tick clamped into
/// the usable range, aligned down for token0 and up for token1.
pub fn completion_tick(
    observed_tick: i32,
    tick_spacing: i32,
    is_token0: bool,
) -> Result<i32, MiningError> {
    Ok(clamp_and_align(observed_tick, tick_spacing, !is_token0)?)
}

/// Re-derives a hook from a freshly observed clearing tick.
///
/// Returns the aligned tick together with the stage; the stage stays valid
/// only while [`MinedStage::ensure_upstream`] accepts
/// `StageFingerprint::of_tick` of that tick.
pub fn mine_completion<F, C, D>(
    hook: &HookStagePlan<C>,
    observed_tick: i32,
    tick_spacing: i32,
    is_token0: bool,
    init_code_hash_for: F,
    deployed: &D,
) -> Result<(i32, MinedStage), MiningError>
where
    F: FnOnce(i32) -> B256,
    C: AddressConstraint,
    D: DeployedCode + ?Sized,
{
    let tick = completion_tick(observed_tick, tick_spacing, is_token0)?;
    let miner = SaltMiner::new(hook.deployer, init_code_hash_for(tick))?.with_config(hook.config);
    let stage = mine_with_upstream(
        "completion",
        miner,
        StageFingerprint::of_tick(tick),
        &hook.constraint,
        deployed,
    )?;
    Ok((tick, stage))
}
