//! Seams between the workflows and the chain library.
//!
//! Workflows and HTTP handlers only see these traits, so they run unchanged
//! against the alloy-backed [`ChainClient`](crate::blockchain::ChainClient)
//! or an in-memory fake.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::blockchain::types::{BlockchainResult, ChainId, IssuanceReceipt, Reachability};
use crate::blockchain::wallet::IssuerCredentials;
use crate::config::ContractSettings;

/// Read access to chain state.
#[async_trait]
pub trait ChainAdapter: Send + Sync {
    async fn block_number(&self) -> BlockchainResult<u64>;

    async fn chain_id(&self) -> BlockchainResult<ChainId>;

    /// Native balance in wei.
    async fn balance(&self, address: Address) -> BlockchainResult<U256>;

    /// Current gas price in wei.
    async fn gas_price(&self) -> BlockchainResult<u128>;

    /// Probe the endpoint. Never fails: any error reports unreachable.
    async fn is_reachable(&self) -> Reachability {
        let block_number = match self.block_number().await {
            Ok(block) => block,
            Err(e) => {
                tracing::debug!(error = %e, "Endpoint unreachable");
                return Reachability::unreachable();
            }
        };
        let chain_id = match self.chain_id().await {
            Ok(id) => id,
            Err(e) => {
                tracing::debug!(error = %e, "Endpoint unreachable");
                return Reachability::unreachable();
            }
        };

        Reachability {
            reachable: true,
            block_number: Some(block_number),
            chain_id: Some(chain_id),
        }
    }
}

/// The credential contract's four-method interface.
#[async_trait]
pub trait CredentialRegistry: Send + Sync {
    /// Bound contract address.
    fn address(&self) -> Address;

    /// Number of credentials held by `owner`.
    async fn balance_of(&self, owner: Address) -> BlockchainResult<U256>;

    async fn owner_of(&self, token_id: U256) -> BlockchainResult<Address>;

    async fn metadata_url(&self, token_id: U256) -> BlockchainResult<String>;

    /// Sign, submit and wait for an issuance transaction.
    ///
    /// A mined transaction is returned even when it reverted; check
    /// [`IssuanceReceipt::success`].
    async fn issue(
        &self,
        recipient: Address,
        metadata_url: &str,
        issuer: &IssuerCredentials,
    ) -> BlockchainResult<IssuanceReceipt>;
}

/// A connected chain handle able to bind the credential contract.
pub trait ChainGateway: Send + Sync {
    fn chain(&self) -> &dyn ChainAdapter;

    /// Bind the contract described by `contract`. Stateless; call per request.
    fn bind(&self, contract: &ContractSettings) -> BlockchainResult<Box<dyn CredentialRegistry>>;
}
