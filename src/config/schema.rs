//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Field names are snake_case; the camelCase option names used by the
//! dashboard form (`rpcUrl`, `contractAddress`, `issuerPrivateKey`,
//! `issuerPublicAddress`) are accepted as aliases.

use serde::{Deserialize, Serialize};

/// Root configuration for the credential service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DashboardConfig {
    /// HTTP listener settings.
    pub listener: ListenerConfig,

    /// JSON-RPC connection settings.
    pub chain: ChainSettings,

    /// Credential contract binding and transaction parameters.
    pub contract: ContractSettings,

    /// Issuing account. Never serialized with its key.
    pub issuer: IssuerSettings,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request hardening.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Chain connection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainSettings {
    /// JSON-RPC endpoint URL.
    #[serde(alias = "rpcUrl")]
    pub rpc_url: String,

    /// Chain the endpoint is expected to serve (e.g., 1337 for Ganache).
    /// A mismatch is reported, never fatal.
    pub expected_chain_id: Option<u64>,

    /// Timeout for each RPC read in seconds.
    pub rpc_timeout_secs: u64,

    /// Maximum time to wait for a submitted transaction to be mined.
    pub receipt_timeout_secs: u64,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:7545".to_string(),
            expected_chain_id: None,
            rpc_timeout_secs: 10,
            receipt_timeout_secs: 120,
        }
    }
}

/// Credential contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractSettings {
    /// Address of the deployed credential contract. Empty means not configured.
    #[serde(alias = "contractAddress")]
    pub address: String,

    /// Fixed gas limit for issuance transactions.
    pub gas_limit: u64,

    /// Fixed gas price in gwei; 0 uses the node's current gas price.
    pub gas_price_gwei: u64,
}

impl Default for ContractSettings {
    fn default() -> Self {
        Self {
            address: String::new(),
            gas_limit: 2_000_000,
            gas_price_gwei: 20,
        }
    }
}

/// Issuing account configuration.
///
/// The private key is skipped on serialization and redacted from `Debug`.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct IssuerSettings {
    /// Hex-encoded private key (with or without 0x prefix).
    #[serde(alias = "issuerPrivateKey", skip_serializing)]
    pub private_key: String,

    /// Public address of the issuing account. Empty means "derive from key".
    #[serde(alias = "issuerPublicAddress")]
    pub public_address: String,
}

impl IssuerSettings {
    /// Whether a private key has been supplied.
    pub fn has_key(&self) -> bool {
        !self.private_key.trim().is_empty()
    }
}

impl std::fmt::Debug for IssuerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuerSettings")
            .field("private_key", &if self.has_key() { "<redacted>" } else { "<unset>" })
            .field("public_address", &self.public_address)
            .finish()
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Request hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}
