//! Staking contract deployment.
//!
//! # Data Flow
//! ```text
//! StakingConfig + CLI overrides
//!     → DeployPlan::resolve (network, signer, token, reward rate)
//!     → artifact.rs (bytecode from the Hardhat artifact)
//!     → constructor args ABI-encoded and appended to the bytecode
//!     → contract-creation transaction, wait for receipt
//!     → Deployment { contract_address, .. }
//! ```
//!
//! The signer is resolved before any file or network I/O, so a missing or
//! malformed key fails immediately.

pub mod artifact;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolValue;
use std::path::PathBuf;
use thiserror::Error;

use crate::blockchain::transaction::{wait_for_receipt, ConfirmationPolicy};
use crate::blockchain::{BlockchainClient, BlockchainError, KeySource, Wallet};
use crate::config::{select_network, NetworkConfig, StakingConfig};

pub use artifact::ContractArtifact;

/// Errors that abort a deployment.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Chain(#[from] BlockchainError),

    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("Deployment transaction failed: {0}")]
    Transaction(String),
}

/// Command-line overrides for the deploy config section.
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    pub network: Option<String>,
    pub artifact: Option<PathBuf>,
    pub token: Option<String>,
    pub reward_rate: Option<u64>,
}

/// Everything needed to deploy, resolved and validated.
#[derive(Debug)]
pub struct DeployPlan {
    pub network: NetworkConfig,
    pub wallet: Wallet,
    pub artifact_path: PathBuf,
    pub token: Address,
    pub reward_rate: U256,
    pub policy: ConfirmationPolicy,
}

/// Result of a successful deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub contract_address: Address,
    pub deployer: Address,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}

impl DeployPlan {
    pub fn resolve(config: &StakingConfig, options: &DeployOptions) -> Result<Self, DeployError> {
        let network = select_network(config, options.network.as_deref())
            .map_err(|e| DeployError::Config(e.to_string()))?
            .clone();

        let wallet = Wallet::detect(&KeySource::from_config(&config.wallet))?;

        let raw_token = options
            .token
            .clone()
            .or_else(|| config.deploy.token_address.clone())
            .ok_or_else(|| DeployError::Config("deploy.token_address is not set".to_string()))?;
        let token = raw_token
            .parse::<Address>()
            .map_err(|e| DeployError::Config(format!("invalid token address '{}': {}", raw_token, e)))?;

        let reward_rate = options.reward_rate.unwrap_or(config.deploy.reward_rate_percent);

        Ok(Self {
            network,
            wallet,
            artifact_path: options
                .artifact
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.deploy.artifact_path)),
            token,
            reward_rate: U256::from(reward_rate),
            policy: ConfirmationPolicy {
                confirmations: config.contract.confirmations.max(1),
                timeout: None,
            },
        })
    }

    /// Creation code: bytecode followed by `(token, rewardRate)`.
    pub fn creation_code(&self, artifact: &ContractArtifact) -> Result<Bytes, DeployError> {
        if artifact.constructor_arity() != 2 {
            return Err(DeployError::Artifact(format!(
                "{} constructor takes {} arguments, expected (address token, uint256 rewardRate)",
                artifact.contract_name,
                artifact.constructor_arity()
            )));
        }
        let mut code = artifact.bytecode.to_vec();
        code.extend((self.token, self.reward_rate).abi_encode_params());
        Ok(code.into())
    }
}

/// Publish the contract and wait for its receipt.
pub async fn deploy(plan: &DeployPlan) -> Result<Deployment, DeployError> {
    let client = BlockchainClient::new(&plan.network, Some(&plan.wallet))?;
    deploy_with(&client, plan).await
}

/// Publish through `client`, whose primary provider must sign for the plan's wallet.
pub async fn deploy_with(client: &BlockchainClient, plan: &DeployPlan) -> Result<Deployment, DeployError> {
    let artifact = ContractArtifact::load(&plan.artifact_path)?;
    let code = plan.creation_code(&artifact)?;

    let chain_id = client.verify_chain_id().await?;
    tracing::info!(
        contract = %artifact.contract_name,
        chain_id = %chain_id,
        token = %plan.token,
        reward_rate = %plan.reward_rate,
        "Deploying contract"
    );

    let tx = TransactionRequest::default()
        .with_from(plan.wallet.address())
        .with_deploy_code(code);
    let pending = client
        .provider()
        .send_transaction(tx)
        .await
        .map_err(|e| DeployError::Transaction(e.to_string()))?;
    let tx_hash = *pending.tx_hash();
    tracing::info!(tx_hash = %tx_hash, "Deployment submitted");

    let receipt = wait_for_receipt(client.provider(), tx_hash, plan.policy).await?;
    let contract_address = receipt.contract_address.ok_or_else(|| {
        DeployError::Transaction(format!(
            "receipt for {} has no contract address",
            receipt.transaction_hash
        ))
    })?;

    Ok(Deployment {
        contract_address,
        deployer: plan.wallet.address(),
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
    })
}
