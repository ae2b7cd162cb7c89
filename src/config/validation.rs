//! Configuration validation.
//!
//! Semantic checks only; serde handles syntax. Every problem is collected so
//! an operator sees the whole list at once. Messages never include the
//! issuer private key.

use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::address::parse_checksummed;
use crate::config::schema::DashboardConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &DashboardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.chain.rpc_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "chain.rpc_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("chain.rpc_url", e.to_string())),
    }

    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.rpc_timeout_secs", "must be greater than 0"));
    }
    if config.chain.receipt_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "chain.receipt_timeout_secs",
            "must be greater than 0",
        ));
    }

    if !config.contract.address.is_empty() {
        if let Err(e) = parse_checksummed(&config.contract.address) {
            errors.push(ValidationError::new("contract.address", e.to_string()));
        }
    }
    if config.contract.gas_limit == 0 {
        errors.push(ValidationError::new("contract.gas_limit", "must be greater than 0"));
    }

    if config.issuer.has_key() {
        let key = config.issuer.private_key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);
        if key.parse::<PrivateKeySigner>().is_err() {
            errors.push(ValidationError::new(
                "issuer.private_key",
                "not a valid secp256k1 private key",
            ));
        }
    }
    if !config.issuer.public_address.is_empty() {
        if let Err(e) = parse_checksummed(&config.issuer.public_address) {
            errors.push(ValidationError::new("issuer.public_address", e.to_string()));
        }
    }

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&DashboardConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = DashboardConfig::default();
        config.chain.rpc_url = "ftp://node".to_string();
        config.contract.address = "0x1234".to_string();
        config.contract.gas_limit = 0;
        config.issuer.private_key = "not-a-key".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "chain.rpc_url",
                "contract.address",
                "contract.gas_limit",
                "issuer.private_key"
            ]
        );
    }

    #[test]
    fn test_key_error_does_not_echo_key() {
        let mut config = DashboardConfig::default();
        config.issuer.private_key = "0xnotreallyakey".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().all(|e| !e.to_string().contains("notreallyakey")));
    }
}
