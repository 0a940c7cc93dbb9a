//! Staking contract interface.

use alloy::primitives::{Address, U256};
use alloy::sol;
use std::future::Future;

use crate::blockchain::types::{BlockchainResult, TxOutcome};
use crate::staking::types::{StakerRecord, TxRequest};

sol! {
    /// On-chain staking contract.
    #[sol(rpc)]
    interface IStaking {
        function stake(uint256 amount) external;
        function unstake(uint256 amount) external;
        function claimReward() external;
        function stakers(address staker) external view returns (uint256 totalStaked, uint256 reward);
    }
}

/// Typed access to a staking contract.
///
/// Mutating calls resolve once the transaction is confirmed.
pub trait StakingContract: Send + Sync + 'static {
    fn stakers(&self, staker: Address) -> impl Future<Output = BlockchainResult<StakerRecord>> + Send;

    fn stake(&self, amount: U256) -> impl Future<Output = BlockchainResult<TxOutcome>> + Send;

    fn unstake(&self, amount: U256) -> impl Future<Output = BlockchainResult<TxOutcome>> + Send;

    fn claim_reward(&self) -> impl Future<Output = BlockchainResult<TxOutcome>> + Send;
}

/// Dispatch a request to the matching contract call.
pub async fn submit<C: StakingContract>(contract: &C, request: TxRequest) -> BlockchainResult<TxOutcome> {
    match request {
        TxRequest::Stake(amount) => contract.stake(amount).await,
        TxRequest::Unstake(amount) => contract.unstake(amount).await,
        TxRequest::Claim => contract.claim_reward().await,
    }
}
