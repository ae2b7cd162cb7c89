//! Workflow-level error taxonomy.

use serde::Serialize;
use thiserror::Error;

use crate::blockchain::{AddressError, BlockchainError};

/// Why a workflow step failed. Only connection failures are worth retrying,
/// and nothing in this crate retries on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("contract binding error: {0}")]
    ContractBinding(String),

    #[error("transaction error: {0}")]
    Transaction(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Connection,
    Validation,
    ContractBinding,
    Transaction,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Connection => "connection",
            ErrorKind::Validation => "validation",
            ErrorKind::ContractBinding => "contract_binding",
            ErrorKind::Transaction => "transaction",
        }
    }
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::Connection(_) => ErrorKind::Connection,
            WorkflowError::Validation(_) => ErrorKind::Validation,
            WorkflowError::ContractBinding(_) => ErrorKind::ContractBinding,
            WorkflowError::Transaction(_) => ErrorKind::Transaction,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            WorkflowError::Connection(m)
            | WorkflowError::Validation(m)
            | WorkflowError::ContractBinding(m)
            | WorkflowError::Transaction(m) => m,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, WorkflowError::Connection(_))
    }
}

impl From<BlockchainError> for WorkflowError {
    fn from(err: BlockchainError) -> Self {
        let message = err.to_string();
        match err {
            BlockchainError::Rpc(_)
            | BlockchainError::Timeout(_)
            | BlockchainError::ChainMismatch { .. } => WorkflowError::Connection(message),
            BlockchainError::InvalidContract(_) => WorkflowError::ContractBinding(message),
            BlockchainError::Rejected(_)
            | BlockchainError::Unconfirmed { .. }
            | BlockchainError::Contract(_)
            | BlockchainError::Wallet(_) => WorkflowError::Transaction(message),
        }
    }
}

impl From<AddressError> for WorkflowError {
    fn from(err: AddressError) -> Self {
        WorkflowError::Validation(err.to_string())
    }
}
