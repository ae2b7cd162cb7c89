//! Chain-specific types and error definitions.

use alloy::primitives::{TxHash, U256};
use alloy::transports::TransportError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

/// Chain id Ganache uses for local development networks.
pub const GANACHE_CHAIN_ID: u64 = 1337;

impl ChainId {
    /// Human-readable network label.
    pub fn network_name(&self) -> String {
        if self.0 == GANACHE_CHAIN_ID {
            "Ganache Local".to_string()
        } else {
            format!("Chain {}", self.0)
        }
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Clone, Error)]
pub enum BlockchainError {
    /// Transport failure: endpoint unreachable, malformed URL, broken connection.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The node answered with a JSON-RPC error (e.g. insufficient funds, bad nonce).
    #[error("Node rejected request: {0}")]
    Rejected(String),

    /// Transaction was submitted but its receipt could not be obtained.
    #[error("Transaction {tx_hash} submitted but not confirmed: {reason}")]
    Unconfirmed { tx_hash: TxHash, reason: String },

    /// Contract call failed (revert on eth_call, undecodable return data).
    #[error("Contract error: {0}")]
    Contract(String),

    /// Contract address missing or invalid.
    #[error("Invalid contract binding: {0}")]
    InvalidContract(String),

    /// Invalid private key format or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

impl BlockchainError {
    /// Whether the failure happened at the transport level.
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            BlockchainError::Rpc(_) | BlockchainError::Timeout(_) | BlockchainError::ChainMismatch { .. }
        )
    }
}

impl From<TransportError> for BlockchainError {
    /// JSON-RPC error responses come from a reachable node; everything else
    /// is a connection problem.
    fn from(err: TransportError) -> Self {
        if err.is_error_resp() {
            BlockchainError::Rejected(err.to_string())
        } else {
            BlockchainError::Rpc(err.to_string())
        }
    }
}

impl From<alloy::contract::Error> for BlockchainError {
    fn from(err: alloy::contract::Error) -> Self {
        match err {
            alloy::contract::Error::TransportError(e) if !e.is_error_resp() => {
                BlockchainError::Rpc(e.to_string())
            }
            other => BlockchainError::Contract(other.to_string()),
        }
    }
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Outcome of a mined issuance transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceReceipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    pub gas_used: u64,
    /// Receipt status flag; false means the transaction reverted.
    pub success: bool,
    /// Token minted, when the receipt carries the contract's Transfer log.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<U256>,
}

/// Result of a soft connectivity probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reachability {
    pub reachable: bool,
    pub block_number: Option<u64>,
    pub chain_id: Option<ChainId>,
}

impl Reachability {
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            block_number: None,
            chain_id: None,
        }
    }
}
