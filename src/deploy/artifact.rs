//! Compiled contract artifacts (Hardhat JSON layout).

use alloy::json_abi::JsonAbi;
use alloy::primitives::Bytes;
use serde::Deserialize;
use std::path::Path;

use crate::deploy::DeployError;

/// The subset of a Hardhat artifact needed to deploy.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

impl ContractArtifact {
    pub fn load(path: &Path) -> Result<Self, DeployError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DeployError::Artifact(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, DeployError> {
        let artifact: Self = serde_json::from_str(json)
            .map_err(|e| DeployError::Artifact(format!("invalid artifact JSON: {}", e)))?;
        if artifact.bytecode.is_empty() {
            return Err(DeployError::Artifact(format!(
                "{} has no bytecode (abstract contract or interface?)",
                artifact.contract_name
            )));
        }
        Ok(artifact)
    }

    /// Number of constructor parameters declared in the ABI.
    pub fn constructor_arity(&self) -> usize {
        self.abi.constructor.as_ref().map_or(0, |c| c.inputs.len())
    }
}
