//! Connection status and network statistics.
//!
//! Every read fails soft: an unavailable value is reported as `None` rather
//! than failing the whole overview.

use alloy::primitives::Address;
use serde::Serialize;

use crate::blockchain::units::{format_ether, format_gwei};
use crate::blockchain::{serialize_checksummed_opt, ChainAdapter, ChainId};
use crate::observability::metrics;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub block_number: Option<u64>,
    pub chain_id: Option<ChainId>,
    pub network: Option<String>,
    /// Set when the node serves a different chain than configured.
    pub chain_mismatch: bool,
    pub message: String,
}

/// Probe the endpoint and describe the result.
pub async fn connection_status(
    chain: &dyn ChainAdapter,
    expected_chain_id: Option<u64>,
) -> ConnectionStatus {
    let probe = chain.is_reachable().await;
    metrics::record_rpc_reachable(probe.reachable);

    let (Some(block_number), Some(chain_id)) = (probe.block_number, probe.chain_id) else {
        return ConnectionStatus {
            connected: false,
            block_number: None,
            chain_id: None,
            network: None,
            chain_mismatch: false,
            message: "Not connected to the blockchain".to_string(),
        };
    };

    let chain_mismatch = expected_chain_id.is_some_and(|expected| expected != chain_id.0);
    let message = if chain_mismatch {
        format!(
            "Connected to chain {} but chain {} is configured",
            chain_id,
            expected_chain_id.unwrap_or_default()
        )
    } else {
        format!("Connected! Block: {}, Chain ID: {}", block_number, chain_id)
    };

    ConnectionStatus {
        connected: true,
        block_number: Some(block_number),
        chain_id: Some(chain_id),
        network: Some(chain_id.network_name()),
        chain_mismatch,
        message,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkStats {
    pub block_number: Option<u64>,
    pub chain_id: Option<ChainId>,
    pub network: Option<String>,
    #[serde(serialize_with = "serialize_checksummed_opt")]
    pub issuer_address: Option<Address>,
    /// Issuer balance in ether, 4 decimals.
    pub issuer_balance_eth: Option<String>,
    /// Current gas price in gwei, 2 decimals.
    pub gas_price_gwei: Option<String>,
}

/// Gather the dashboard statistics, each value independently.
pub async fn network_stats(chain: &dyn ChainAdapter, issuer: Option<Address>) -> NetworkStats {
    let block_number = chain.block_number().await.ok();
    let chain_id = chain.chain_id().await.ok();

    let issuer_balance_eth = match issuer {
        Some(address) => chain.balance(address).await.ok().map(format_ether),
        None => None,
    };
    let gas_price_gwei = chain.gas_price().await.ok().map(format_gwei);

    NetworkStats {
        block_number,
        chain_id,
        network: chain_id.map(|id| id.network_name()),
        issuer_address: issuer,
        issuer_balance_eth,
        gas_price_gwei,
    }
}
