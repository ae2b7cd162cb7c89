//! Credential lookups.

use alloy::primitives::{Address, U256};
use serde::Serialize;

use crate::blockchain::{parse_checksummed, serialize_checksummed, CredentialRegistry};
use crate::observability::metrics;
use crate::workflow::error::WorkflowError;

/// Count the credentials held by `address`.
///
/// The address is validated before any chain access. Zero is a normal answer.
pub async fn query_balance(
    registry: &dyn CredentialRegistry,
    address: &str,
) -> Result<u64, WorkflowError> {
    let holder = parse_checksummed(address)?;

    let result = registry
        .balance_of(holder)
        .await
        .map_err(WorkflowError::from)
        .and_then(|count| {
            u64::try_from(count).map_err(|_| {
                WorkflowError::Transaction(format!("credential count {count} out of range"))
            })
        });

    metrics::record_balance_query(result.is_ok());
    match &result {
        Ok(count) => tracing::debug!(holder = %holder, count, "Credential count queried"),
        Err(e) => tracing::warn!(holder = %holder, error = %e, "Credential count query failed"),
    }
    result
}

/// A single issued credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRecord {
    pub token_id: U256,
    #[serde(serialize_with = "serialize_checksummed")]
    pub owner: Address,
    pub metadata_url: String,
}

/// Resolve the owner and metadata pointer of one token.
pub async fn lookup_token(
    registry: &dyn CredentialRegistry,
    token_id: U256,
) -> Result<TokenRecord, WorkflowError> {
    let owner = registry.owner_of(token_id).await?;
    let metadata_url = registry.metadata_url(token_id).await?;

    Ok(TokenRecord {
        token_id,
        owner,
        metadata_url,
    })
}
