use crate::FastMap;
use crate::error::MiningError;
use crate::mining::constraint::AddressConstraint;
use crate::mining::miner::{MinedSalt, SaltMiner};
use alloy_primitives::{Address, B256, U256};
use tracing::warn;

/// Answers whether code already lives at an address on the target chain.
pub trait DeployedCode {
    fn has_code(&self, address: &Address) -> bool;
}

impl<F: Fn(&Address) -> bool> DeployedCode for F {
    fn has_code(&self, address: &Address) -> bool {
        self(address)
    }
}

/// In-memory record of addresses known to hold code, passed explicitly to
/// whoever needs it.
#[derive(Debug, Clone, Default)]
pub struct KnownDeployments {
    deployed: FastMap<Address, B256>,
}

impl KnownDeployments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `address` as deployed with `salt`, returning the previously
    /// recorded salt if there was one.
    pub fn record(&mut self, address: Address, salt: B256) -> Option<B256> {
        self.deployed.insert(address, salt)
    }

    pub fn record_mined(&mut self, mined: &MinedSalt) -> Option<B256> {
        self.record(mined.address, mined.salt)
    }

    pub fn salt_of(&self, address: &Address) -> Option<B256> {
        self.deployed.get(address).copied()
    }

    pub fn len(&self) -> usize {
        self.deployed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deployed.is_empty()
    }
}

impl DeployedCode for KnownDeployments {
    fn has_code(&self, address: &Address) -> bool {
        self.deployed.contains_key(address)
    }
}

/// Salt search that may be restarted past colliding candidates while every
/// restart draws from one shared ceiling.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CollisionSearch {
    first: U256,
    next: U256,
    ceiling: u64,
    spent: u64,
}

impl CollisionSearch {
    pub(crate) fn new<C: AddressConstraint + ?Sized>(
        miner: &SaltMiner,
        constraint: &C,
        start_salt: Option<U256>,
    ) -> Self {
        let first = start_salt
            .or(miner.config().start_salt)
            .unwrap_or(U256::ZERO);
        Self {
            first,
            next: first,
            ceiling: miner.ceiling_for(constraint),
            spent: 0,
        }
    }

    /// Mines the next satisfying candidate with whatever budget is left.
    /// `SaltNotFound` reports the attempts of every restart so far.
    pub(crate) fn candidate<C: AddressConstraint + ?Sized>(
        &mut self,
        miner: &SaltMiner,
        constraint: &C,
    ) -> Result<MinedSalt, MiningError> {
        let spent = self.spent;
        let first = self.first;
        let mined = miner
            .mine_bounded(constraint, self.next, self.ceiling - spent)
            .map_err(|err| match err {
                MiningError::SaltNotFound { attempts, .. } => MiningError::SaltNotFound {
                    attempts: spent + attempts,
                    start_salt: first,
                },
                other => other,
            })?;
        self.spent += mined.attempts;
        Ok(mined)
    }

    /// The accepted candidate, with attempts counted across restarts.
    pub(crate) fn accept(&self, mined: MinedSalt) -> MinedSalt {
        MinedSalt {
            attempts: self.spent,
            ..mined
        }
    }

    /// Moves past a candidate that already holds code.
    pub(crate) fn skip(&mut self, mined: &MinedSalt) -> Result<(), MiningError> {
        warn!(address = %mined.address, salt = %mined.salt, "mined address already has code");
        match mined.next_salt() {
            Some(next) if self.spent < self.ceiling => {
                self.next = next;
                Ok(())
            }
            _ => Err(MiningError::SaltNotFound {
                attempts: self.spent,
                start_salt: self.first,
            }),
        }
    }
}

/// Mines like [`SaltMiner::mine`], but skips candidates that already hold
/// code by resuming from the next salt.
///
/// All restarts share one ceiling; `attempts` on the result counts every
/// candidate evaluated across them.
pub fn mine_undeployed<C, D>(
    miner: &SaltMiner,
    constraint: &C,
    deployed: &D,
    start_salt: Option<U256>,
) -> Result<MinedSalt, MiningError>
where
    C: AddressConstraint + ?Sized,
    D: DeployedCode + ?Sized,
{
    let mut search = CollisionSearch::new(miner, constraint, start_salt);
    loop {
        let mined = search.candidate(miner, constraint)?;
        if !deployed.has_code(&mined.address) {
            return Ok(search.accept(mined));
        }
        search.skip(&mined)?;
    }
}
