//! Staking record and transaction request types.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::staking::units::format_amount;

/// A staker's position as reported by `stakers(address)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakerRecord {
    /// Tokens currently staked, 18-decimal fixed point.
    pub total_staked: U256,
    /// Accrued reward, 18-decimal fixed point.
    pub reward: U256,
}

impl StakerRecord {
    pub fn total_staked_display(&self) -> String {
        format_amount(self.total_staked)
    }

    pub fn reward_display(&self) -> String {
        format_amount(self.reward)
    }
}

/// Kind of mutating call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    Stake,
    Unstake,
    Claim,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Stake => "stake",
            TxKind::Unstake => "unstake",
            TxKind::Claim => "claim",
        }
    }
}

impl std::fmt::Display for TxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mutating call with its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxRequest {
    Stake(U256),
    Unstake(U256),
    Claim,
}

impl TxRequest {
    pub fn kind(&self) -> TxKind {
        match self {
            TxRequest::Stake(_) => TxKind::Stake,
            TxRequest::Unstake(_) => TxKind::Unstake,
            TxRequest::Claim => TxKind::Claim,
        }
    }
}
