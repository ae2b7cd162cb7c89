//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint (one reusable provider handle)
//! - Query chain state (block number, chain id, balances, gas price, nonces)
//! - Bound every read by the configured timeout
//! - Bind the credential contract on demand

use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::transports::TransportResult;
use async_trait::async_trait;
use std::future::IntoFuture;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::contract::CredentialContract;
use crate::blockchain::gateway::{ChainAdapter, ChainGateway, CredentialRegistry};
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};
use crate::config::{ChainSettings, ContractSettings};

/// Alloy-backed chain client. Cheap to clone; clones share the provider.
#[derive(Clone)]
pub struct ChainClient {
    provider: DynProvider,
    settings: ChainSettings,
    timeout_duration: Duration,
}

impl ChainClient {
    /// Create a client for the configured endpoint.
    ///
    /// No request is made here; an unreachable node is only discovered by
    /// the first call. Fails if the URL is malformed.
    pub fn connect(settings: &ChainSettings) -> BlockchainResult<Self> {
        let url: url::Url = settings.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", settings.rpc_url, e))
        })?;

        let provider = ProviderBuilder::new().connect_http(url).erased();

        tracing::info!(
            rpc_url = %settings.rpc_url,
            timeout_secs = settings.rpc_timeout_secs,
            "Chain client initialized"
        );

        Ok(Self {
            provider,
            settings: settings.clone(),
            timeout_duration: Duration::from_secs(settings.rpc_timeout_secs),
        })
    }

    /// Run one RPC request under the read timeout.
    async fn rpc<F, T>(&self, method: &'static str, request: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = TransportResult<T>>,
    {
        match timeout(self.timeout_duration, request).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(method, error = %e, "RPC error");
                Err(e.into())
            }
            Err(_) => {
                tracing::warn!(method, "RPC timeout");
                Err(BlockchainError::Timeout(self.settings.rpc_timeout_secs))
            }
        }
    }

    /// Verify the connected chain ID matches `expected_chain_id`, if set.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let Some(expected) = self.settings.expected_chain_id else {
            return Ok(());
        };
        let actual = self.chain_id().await?;
        if actual.0 != expected {
            return Err(BlockchainError::ChainMismatch {
                expected,
                actual: actual.0,
            });
        }
        Ok(())
    }

    /// Get the transaction count (next nonce) for an address.
    pub async fn transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        self.rpc("eth_getTransactionCount", self.provider.get_transaction_count(address))
            .await
    }

    /// Get the underlying provider.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Get the connection settings.
    pub fn settings(&self) -> &ChainSettings {
        &self.settings
    }
}

#[async_trait]
impl ChainAdapter for ChainClient {
    async fn block_number(&self) -> BlockchainResult<u64> {
        self.rpc("eth_blockNumber", self.provider.get_block_number()).await
    }

    async fn chain_id(&self) -> BlockchainResult<ChainId> {
        self.rpc("eth_chainId", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    async fn balance(&self, address: Address) -> BlockchainResult<U256> {
        self.rpc("eth_getBalance", self.provider.get_balance(address)).await
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        self.rpc("eth_gasPrice", self.provider.get_gas_price()).await
    }
}

impl ChainGateway for ChainClient {
    fn chain(&self) -> &dyn ChainAdapter {
        self
    }

    fn bind(&self, contract: &ContractSettings) -> BlockchainResult<Box<dyn CredentialRegistry>> {
        let bound = CredentialContract::bind(self.clone(), contract)?;
        Ok(Box::new(bound))
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("rpc_url", &self.settings.rpc_url)
            .field("expected_chain_id", &self.settings.expected_chain_id)
            .field("timeout_secs", &self.settings.rpc_timeout_secs)
            .finish()
    }
}
