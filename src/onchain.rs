use crate::error::OnchainError;
use crate::mining::constraint::AddressConstraint;
use crate::mining::deployed::CollisionSearch;
use crate::mining::miner::{MinedSalt, SaltMiner};
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use futures::try_join;
use std::sync::Arc;
use std::time::Duration;

pub type OnchainProvider<P> = Arc<P>;

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Looks up deployed code through a JSON-RPC provider.
#[derive(Debug, Clone)]
pub struct ChainCodeReader<P> {
    provider: OnchainProvider<P>,
    timeout: Duration,
}

impl<P> ChainCodeReader<P>
where
    P: Provider + Send + Sync + 'static,
{
    pub fn new(provider: OnchainProvider<P>) -> Self {
        Self {
            provider,
            timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether `eth_getCode` returns non-empty bytecode for `address` at the
    /// latest block.
    pub async fn has_code(&self, address: Address) -> Result<bool, OnchainError> {
        let code = tokio::time::timeout(self.timeout, self.provider.get_code_at(address))
            .await
            .map_err(|_| OnchainError::Timeout(self.timeout))?
            .map_err(|e| OnchainError::FailedToGetCode(e.to_string()))?;

        Ok(!code.is_empty())
    }

    /// Looks up two candidates concurrently, e.g. a token and its hook.
    pub async fn has_code_pair(
        &self,
        first: Address,
        second: Address,
    ) -> Result<(bool, bool), OnchainError> {
        try_join!(self.has_code(first), self.has_code(second))
    }
}

/// Async counterpart of [`crate::mining::mine_undeployed`]: every accepted
/// candidate is checked on chain, and a search that hits deployed code
/// resumes from the next salt under the same ceiling.
pub async fn mine_undeployed_onchain<P, C>(
    reader: &ChainCodeReader<P>,
    miner: &SaltMiner,
    constraint: &C,
    start_salt: Option<U256>,
) -> Result<MinedSalt, OnchainError>
where
    P: Provider + Send + Sync + 'static,
    C: AddressConstraint + ?Sized,
{
    let mut search = CollisionSearch::new(miner, constraint, start_salt);
    loop {
        let mined = search.candidate(miner, constraint)?;
        if !reader.has_code(mined.address).await? {
            return Ok(search.accept(mined));
        }
        search.skip(&mined)?;
    }
}
