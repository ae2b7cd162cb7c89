//! Credential contract binding.
//!
//! # Responsibilities
//! - Fixed ABI of the diploma contract (issue, token URI, balance, owner)
//! - Read-only calls bounded by the RPC timeout
//! - Issuance: nonce lookup, fixed gas, local signing, raw submission,
//!   blocking wait for the receipt

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{Ethereum, TransactionBuilder};
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{
    DynProvider, PendingTransactionBuilder, PendingTransactionError, Provider, WatchTxError,
};
use alloy::rpc::types::{Log, TransactionReceipt};
use alloy::sol;
use async_trait::async_trait;
use std::future::IntoFuture;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::address::parse_checksummed;
use crate::blockchain::client::ChainClient;
use crate::blockchain::gateway::{ChainAdapter, CredentialRegistry};
use crate::blockchain::types::{BlockchainError, BlockchainResult, IssuanceReceipt};
use crate::blockchain::units::gwei_to_wei;
use crate::blockchain::wallet::IssuerCredentials;
use crate::config::ContractSettings;

sol! {
    #[sol(rpc)]
    contract DiplomaNFT {
        /// ERC-721 transfer; a mint has `from == 0`.
        #[derive(Debug)]
        event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);

        function issueDiploma(address student, string calldata tokenURI) external returns (uint256);
        function tokenURI(uint256 tokenId) external view returns (string memory);
        function balanceOf(address owner) external view returns (uint256);
        function ownerOf(uint256 tokenId) external view returns (address);
    }
}

/// The diploma contract bound to a chain client.
pub struct CredentialContract {
    client: ChainClient,
    instance: DiplomaNFT::DiplomaNFTInstance<DynProvider>,
    settings: ContractSettings,
}

impl CredentialContract {
    /// Bind the configured contract address.
    ///
    /// Fails if the address is missing or not a valid checksum address.
    pub fn bind(client: ChainClient, settings: &ContractSettings) -> BlockchainResult<Self> {
        if settings.address.trim().is_empty() {
            return Err(BlockchainError::InvalidContract(
                "contract address not configured".to_string(),
            ));
        }
        let address = parse_checksummed(&settings.address)
            .map_err(|e| BlockchainError::InvalidContract(e.to_string()))?;

        let instance = DiplomaNFT::new(address, client.provider().clone());

        Ok(Self {
            client,
            instance,
            settings: settings.clone(),
        })
    }

    fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.client.settings().rpc_timeout_secs)
    }

    /// Run a read-only contract call under the RPC timeout.
    async fn view<F, T>(&self, method: &'static str, call: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = Result<T, alloy::contract::Error>>,
    {
        match timeout(self.read_timeout(), call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(method, contract = %self.address(), error = %e, "Contract call failed");
                Err(e.into())
            }
            Err(_) => Err(BlockchainError::Timeout(self.client.settings().rpc_timeout_secs)),
        }
    }

    async fn send_raw(&self, raw: &[u8]) -> BlockchainResult<PendingTransactionBuilder<Ethereum>> {
        match timeout(self.read_timeout(), self.client.provider().send_raw_transaction(raw)).await {
            Ok(result) => result.map_err(BlockchainError::from),
            Err(_) => Err(BlockchainError::Timeout(self.client.settings().rpc_timeout_secs)),
        }
    }

    /// Block until the transaction is mined or the receipt timeout elapses.
    ///
    /// Every failure here is reported as unconfirmed: the transaction is
    /// already in the node's hands and must not be resubmitted blindly.
    async fn wait_for_receipt(
        &self,
        pending: PendingTransactionBuilder<Ethereum>,
    ) -> BlockchainResult<TransactionReceipt> {
        let tx_hash = *pending.tx_hash();
        let receipt_timeout = Duration::from_secs(self.client.settings().receipt_timeout_secs);

        pending
            .with_timeout(Some(receipt_timeout))
            .get_receipt()
            .await
            .map_err(|e| {
                let reason = match e {
                    PendingTransactionError::TxWatcher(WatchTxError::Timeout) => format!(
                        "no receipt after {} seconds",
                        receipt_timeout.as_secs()
                    ),
                    other => other.to_string(),
                };
                BlockchainError::Unconfirmed { tx_hash, reason }
            })
    }

    fn to_issuance_receipt(&self, receipt: &TransactionReceipt) -> IssuanceReceipt {
        let token_id = minted_token_id(receipt.inner.logs(), self.address());

        IssuanceReceipt {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number.unwrap_or_default(),
            gas_used: receipt.gas_used,
            success: receipt.status(),
            token_id,
        }
    }
}

/// Token minted by `contract`: the first `Transfer` it emitted from the zero address.
fn minted_token_id(logs: &[Log], contract: Address) -> Option<U256> {
    logs.iter()
        .filter(|log| log.address() == contract)
        .filter_map(|log| log.log_decode::<DiplomaNFT::Transfer>().ok())
        .find(|decoded| decoded.inner.data.from == Address::ZERO)
        .map(|decoded| decoded.inner.data.tokenId)
}

#[async_trait]
impl CredentialRegistry for CredentialContract {
    fn address(&self) -> Address {
        *self.instance.address()
    }

    async fn balance_of(&self, owner: Address) -> BlockchainResult<U256> {
        let call = self.instance.balanceOf(owner);
        self.view("balanceOf", call.call()).await
    }

    async fn owner_of(&self, token_id: U256) -> BlockchainResult<Address> {
        let call = self.instance.ownerOf(token_id);
        self.view("ownerOf", call.call()).await
    }

    async fn metadata_url(&self, token_id: U256) -> BlockchainResult<String> {
        let call = self.instance.tokenURI(token_id);
        self.view("tokenURI", call.call()).await
    }

    async fn issue(
        &self,
        recipient: Address,
        metadata_url: &str,
        issuer: &IssuerCredentials,
    ) -> BlockchainResult<IssuanceReceipt> {
        let from = issuer.address();
        let nonce = self.client.transaction_count(from).await?;
        let chain_id = self.client.chain_id().await?;
        let gas_price = match self.settings.gas_price_gwei {
            0 => self.client.gas_price().await?,
            gwei => gwei_to_wei(gwei),
        };

        let request = self
            .instance
            .issueDiploma(recipient, metadata_url.to_string())
            .from(from)
            .nonce(nonce)
            .gas(self.settings.gas_limit)
            .gas_price(gas_price)
            .into_transaction_request()
            .with_chain_id(chain_id.0);

        let envelope = request
            .build(&issuer.wallet())
            .await
            .map_err(|e| BlockchainError::Wallet(format!("Signing failed: {}", e)))?;

        let pending = self.send_raw(&envelope.encoded_2718()).await?;
        let tx_hash: TxHash = *pending.tx_hash();

        tracing::info!(
            tx_hash = %tx_hash,
            from = %from,
            recipient = %recipient,
            nonce,
            gas_limit = self.settings.gas_limit,
            "Issuance transaction submitted"
        );

        let receipt = self.wait_for_receipt(pending).await?;
        let issued = self.to_issuance_receipt(&receipt);

        tracing::info!(
            tx_hash = %tx_hash,
            block_number = issued.block_number,
            gas_used = issued.gas_used,
            success = issued.success,
            "Issuance transaction mined"
        );

        Ok(issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChainSettings;
    use alloy::sol_types::{SolCall, SolEvent};

    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const CONTRACT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
    const STUDENT: &str = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";
    const ISSUER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn unreachable_client() -> ChainClient {
        ChainClient::connect(&ChainSettings {
            rpc_url: "http://127.0.0.1:1".to_string(),
            expected_chain_id: None,
            rpc_timeout_secs: 2,
            receipt_timeout_secs: 5,
        })
        .unwrap()
    }

    fn contract_settings(address: &str) -> ContractSettings {
        ContractSettings {
            address: address.to_string(),
            ..ContractSettings::default()
        }
    }

    #[test]
    fn test_abi_selectors() {
        assert_eq!(DiplomaNFT::balanceOfCall::SELECTOR, [0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(DiplomaNFT::ownerOfCall::SELECTOR, [0x63, 0x52, 0x21, 0x1e]);
        assert_eq!(DiplomaNFT::tokenURICall::SELECTOR, [0xc8, 0x7b, 0x56, 0xdd]);
    }

    #[test]
    fn test_bind_validates_address() {
        let bound = CredentialContract::bind(unreachable_client(), &contract_settings(CONTRACT));
        assert_eq!(bound.unwrap().address().to_string(), CONTRACT);

        let missing = CredentialContract::bind(unreachable_client(), &contract_settings(""));
        assert!(matches!(missing, Err(BlockchainError::InvalidContract(_))));

        let tampered = CredentialContract::bind(
            unreachable_client(),
            &contract_settings("0x70997970c51812dc3A010C7d01b50e0d17dc79C8"),
        );
        assert!(matches!(tampered, Err(BlockchainError::InvalidContract(_))));
    }

    #[tokio::test]
    async fn test_issue_against_unreachable_endpoint() {
        let contract =
            CredentialContract::bind(unreachable_client(), &contract_settings(CONTRACT)).unwrap();
        let issuer = IssuerCredentials::from_private_key(TEST_PRIVATE_KEY, "").unwrap();
        let student: Address = STUDENT.parse().unwrap();

        let err = contract
            .issue(student, "https://example.com/cred.json", &issuer)
            .await
            .unwrap_err();
        assert!(err.is_connection(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_view_against_unreachable_endpoint() {
        let contract =
            CredentialContract::bind(unreachable_client(), &contract_settings(CONTRACT)).unwrap();
        let err = contract
            .balance_of(STUDENT.parse().unwrap())
            .await
            .unwrap_err();
        assert!(err.is_connection(), "unexpected error: {err}");
    }

    fn transfer_log(emitter: Address, from: Address, to: Address, token_id: u64) -> Log {
        let event = DiplomaNFT::Transfer {
            from,
            to,
            tokenId: U256::from(token_id),
        };
        Log {
            inner: alloy::primitives::Log {
                address: emitter,
                data: event.encode_log_data(),
            },
            ..Log::default()
        }
    }

    #[test]
    fn test_minted_token_id_from_transfer_log() {
        let contract: Address = CONTRACT.parse().unwrap();
        let student: Address = STUDENT.parse().unwrap();
        let other: Address = ISSUER.parse().unwrap();

        let logs = vec![
            // same event from another contract
            transfer_log(other, Address::ZERO, student, 99),
            // plain transfer, not a mint
            transfer_log(contract, other, student, 5),
            transfer_log(contract, Address::ZERO, student, 7),
        ];
        assert_eq!(minted_token_id(&logs, contract), Some(U256::from(7u64)));

        assert_eq!(minted_token_id(&logs[..2], contract), None);
        assert_eq!(minted_token_id(&[], contract), None);
    }
}
