pub mod constraint;
pub mod deployed;
pub mod miner;
pub mod staged;

pub use constraint::{
    AddressConstraint, AllOf, FLAG_MASK, HookFlags, HookFlagsConstraint, OrderingConstraint,
    Position, hook_constraint,
};
pub use deployed::{DeployedCode, KnownDeployments, mine_undeployed};
pub use miner::{
    ABSOLUTE_MAX_SALT_ITERATIONS, CEILING_SAFETY_FACTOR, MAX_SALT_ITERATIONS, MinedSalt, MinerConfig, SaltMiner,
    compute_create2_address, iteration_ceiling, mine_salt,
};
pub use staged::{
    HookStagePlan, MinedStage, StageFingerprint, TokenHookStages, completion_tick,
    mine_completion, mine_dependent_stage, mine_stage, mine_token_then_hook,
    resolve_token_order,
};
