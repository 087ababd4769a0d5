use crate::error::MiningError;
use crate::mining::constraint::AddressConstraint;
use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default iteration ceiling for a single salt search.
pub const MAX_SALT_ITERATIONS: u64 = 1_000_000;

/// Harder constraints get at least this many times their expected attempts.
pub const CEILING_SAFETY_FACTOR: u64 = 64;

/// Hard cap on any derived ceiling, about four billion candidates.
pub const ABSOLUTE_MAX_SALT_ITERATIONS: u64 = 1 << 32;

/// Iteration ceiling for a constraint: [`MAX_SALT_ITERATIONS`], raised to
/// `expected_attempts * CEILING_SAFETY_FACTOR` when that is larger, and never
/// above [`ABSOLUTE_MAX_SALT_ITERATIONS`].
pub fn iteration_ceiling<C: AddressConstraint + ?Sized>(constraint: &C) -> u64 {
    MAX_SALT_ITERATIONS
        .max(
            constraint
                .expected_attempts()
                .saturating_mul(CEILING_SAFETY_FACTOR),
        )
        .min(ABSOLUTE_MAX_SALT_ITERATIONS)
}

/// Runtime knobs for salt searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerConfig {
    /// Overrides the constraint-derived ceiling.
    pub max_iterations: Option<u64>,
    /// First salt tried when the call does not pass one.
    pub start_salt: Option<U256>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinedSalt {
    pub salt: B256,
    pub address: Address,
    /// Candidates evaluated, including the accepted one.
    pub attempts: u64,
}

impl MinedSalt {
    pub fn salt_value(&self) -> U256 {
        U256::from_be_bytes(self.salt.0)
    }

    /// Where a search resumes to skip past this result.
    pub fn next_salt(&self) -> Option<U256> {
        self.salt_value().checked_add(U256::from(1u8))
    }
}

#[inline]
pub fn salt_to_bytes(salt: U256) -> B256 {
    B256::from(salt.to_be_bytes::<32>())
}

/// CREATE2 address: low 20 bytes of
/// `keccak256(0xff ++ deployer ++ salt ++ init_code_hash)`.
#[inline]
pub fn compute_create2_address(deployer: Address, salt: U256, init_code_hash: B256) -> Address {
    deployer.create2(salt_to_bytes(salt), init_code_hash)
}

/// Sequential CREATE2 salt search for one deployer and init code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaltMiner {
    deployer: Address,
    init_code_hash: B256,
    config: MinerConfig,
}

impl SaltMiner {
    pub fn new(deployer: Address, init_code_hash: B256) -> Result<Self, MiningError> {
        if deployer.is_zero() {
            return Err(MiningError::InvalidArgument {
                name: "deployer",
                value: deployer.to_string(),
            });
        }
        if init_code_hash.is_zero() {
            return Err(MiningError::InvalidArgument {
                name: "init_code_hash",
                value: init_code_hash.to_string(),
            });
        }

        Ok(Self {
            deployer,
            init_code_hash,
            config: MinerConfig::default(),
        })
    }

    pub fn with_config(mut self, config: MinerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn deployer(&self) -> Address {
        self.deployer
    }

    pub fn init_code_hash(&self) -> B256 {
        self.init_code_hash
    }

    pub fn config(&self) -> MinerConfig {
        self.config
    }

    #[inline]
    pub fn address_of(&self, salt: U256) -> Address {
        compute_create2_address(self.deployer, salt, self.init_code_hash)
    }

    pub fn ceiling_for<C: AddressConstraint + ?Sized>(&self, constraint: &C) -> u64 {
        self.config
            .max_iterations
            .unwrap_or_else(|| iteration_ceiling(constraint))
    }

    fn resolve_start(&self, start_salt: Option<U256>) -> U256 {
        start_salt
            .or(self.config.start_salt)
            .unwrap_or(U256::ZERO)
    }

    /// Scans `start, start + 1, ...` and returns the first salt whose
    /// address satisfies `constraint`.
    ///
    /// Fails with `MiningError::SaltNotFound` once the ceiling's worth of
    /// candidates has been evaluated, or when the salt counter would wrap.
    pub fn mine<C: AddressConstraint + ?Sized>(
        &self,
        constraint: &C,
        start_salt: Option<U256>,
    ) -> Result<MinedSalt, MiningError> {
        let start = self.resolve_start(start_salt);
        self.mine_bounded(constraint, start, self.ceiling_for(constraint))
    }

    pub(crate) fn mine_bounded<C: AddressConstraint + ?Sized>(
        &self,
        constraint: &C,
        start: U256,
        max_attempts: u64,
    ) -> Result<MinedSalt, MiningError> {
        if max_attempts == 0 {
            return Err(MiningError::InvalidArgument {
                name: "max_iterations",
                value: max_attempts.to_string(),
            });
        }

        debug!(
            deployer = %self.deployer,
            init_code_hash = %self.init_code_hash,
            %start,
            max_attempts,
            "mining salt"
        );

        let mut salt = start;
        for attempt in 1..=max_attempts {
            let address = self.address_of(salt);
            if constraint.is_satisfied(&address) {
                debug!(%address, %salt, attempts = attempt, "salt found");
                return Ok(MinedSalt {
                    salt: salt_to_bytes(salt),
                    address,
                    attempts: attempt,
                });
            }

            salt = match salt.checked_add(U256::from(1u8)) {
                Some(next) => next,
                None => {
                    return Err(MiningError::SaltNotFound {
                        attempts: attempt,
                        start_salt: start,
                    });
                }
            };
        }

        Err(MiningError::SaltNotFound {
            attempts: max_attempts,
            start_salt: start,
        })
    }
}

/// One-shot search with the default configuration.
pub fn mine_salt<C: AddressConstraint + ?Sized>(
    deployer: Address,
    init_code_hash: B256,
    constraint: &C,
    start_salt: Option<U256>,
) -> Result<MinedSalt, MiningError> {
    SaltMiner::new(deployer, init_code_hash)?.mine(constraint, start_salt)
}
