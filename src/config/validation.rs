//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (default network exists)
//! - Validate value ranges (confirmations > 0, retry attempts > 0)
//! - Check that addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: StakingConfig → Result<(), Vec<ValidationError>>
//! - URLs containing `{api_key}` are checked after substitution, not here

use alloy::primitives::Address;

use crate::config::schema::{StakingConfig, API_KEY_PLACEHOLDER};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &StakingConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !config.networks.contains_key(&config.default_network) {
        errors.push(ValidationError::new(
            "default_network",
            format!("network '{}' is not defined", config.default_network),
        ));
    }

    for (name, network) in &config.networks {
        let field = format!("networks.{}", name);
        let urls = std::iter::once(&network.rpc_url).chain(network.failover_urls.iter());
        for url in urls {
            if url.contains(API_KEY_PLACEHOLDER) {
                if network.api_key_env.is_none() {
                    errors.push(ValidationError::new(
                        format!("{}.api_key_env", field),
                        "required when rpc_url contains {api_key}",
                    ));
                }
            } else if let Err(e) = url.parse::<url::Url>() {
                errors.push(ValidationError::new(
                    format!("{}.rpc_url", field),
                    format!("invalid URL '{}': {}", url, e),
                ));
            }
        }
        if network.rpc_timeout_secs == 0 {
            errors.push(ValidationError::new(
                format!("{}.rpc_timeout_secs", field),
                "must be greater than zero",
            ));
        }
    }

    check_address(&mut errors, "contract.address", config.contract.address.as_deref());
    check_address(&mut errors, "deploy.token_address", config.deploy.token_address.as_deref());

    if config.contract.confirmations == 0 {
        errors.push(ValidationError::new(
            "contract.confirmations",
            "must be at least 1",
        ));
    }
    if config.contract.confirmation_timeout_secs == Some(0) {
        errors.push(ValidationError::new(
            "contract.confirmation_timeout_secs",
            "must be greater than zero when set",
        ));
    }
    if config.wallet.chain_poll_secs == 0 {
        errors.push(ValidationError::new(
            "wallet.chain_poll_secs",
            "must be greater than zero",
        ));
    }
    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be at least 1"));
    }
    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.base_delay_ms",
            "must not exceed retries.max_delay_ms",
        ));
    }
    if !matches!(config.observability.log_format.as_str(), "full" | "compact") {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!("unknown format '{}'", config.observability.log_format),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<std::net::SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address '{}'", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &str, value: Option<&str>) {
    if let Some(raw) = value {
        if let Err(e) = raw.parse::<Address>() {
            errors.push(ValidationError::new(field, format!("invalid address '{}': {}", raw, e)));
        }
    }
}
