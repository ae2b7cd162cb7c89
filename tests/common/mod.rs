//! Shared fakes for integration tests.
//!
//! `FakeChain` stands in for the JSON-RPC node and the credential contract.
//! Clones share state, so a test can keep a handle while the server owns
//! another.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;

use diploma_desk::blockchain::{
    parse_checksummed, BlockchainError, BlockchainResult, ChainAdapter, ChainGateway, ChainId,
    CredentialRegistry, IssuanceReceipt, IssuerCredentials,
};
use diploma_desk::config::{ContractSettings, DashboardConfig, IssuerSettings};

/// Well-known development key and its address.
pub const ISSUER_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const ISSUER_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

pub const STUDENT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
pub const OTHER_STUDENT: &str = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";
pub const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

/// Same as `ISSUER_ADDRESS` with one letter's case flipped.
pub const BAD_CHECKSUM: &str = "0xF39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

pub const ISSUANCE_GAS: u64 = 182_000;
pub const GAS_LIMIT: u64 = 2_000_000;

#[derive(Default)]
pub struct ChainState {
    pub unreachable: AtomicBool,
    pub revert: AtomicBool,
    pub calls: AtomicUsize,
    pub block: AtomicU64,
    pub next_token: AtomicU64,
    pub balances: Mutex<HashMap<Address, U256>>,
    pub tokens: Mutex<HashMap<U256, (Address, String)>>,
}

#[derive(Clone)]
pub struct FakeChain {
    pub state: Arc<ChainState>,
    pub chain_id: u64,
}

impl FakeChain {
    pub fn new() -> Self {
        let state = ChainState::default();
        state.block.store(100, Ordering::SeqCst);
        state.next_token.store(1, Ordering::SeqCst);
        Self {
            state: Arc::new(state),
            chain_id: 1337,
        }
    }

    pub fn unreachable() -> Self {
        let chain = Self::new();
        chain.state.unreachable.store(true, Ordering::SeqCst);
        chain
    }

    pub fn reverting() -> Self {
        let chain = Self::new();
        chain.state.revert.store(true, Ordering::SeqCst);
        chain
    }

    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub fn set_balance(&self, holder: &str, count: u64) {
        let holder = parse_checksummed(holder).unwrap();
        self.state
            .balances
            .lock()
            .unwrap()
            .insert(holder, U256::from(count));
    }

    fn touch(&self) -> BlockchainResult<()> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);
        if self.state.unreachable.load(Ordering::SeqCst) {
            return Err(BlockchainError::Rpc("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ChainAdapter for FakeChain {
    async fn block_number(&self) -> BlockchainResult<u64> {
        self.touch()?;
        Ok(self.state.block.load(Ordering::SeqCst))
    }

    async fn chain_id(&self) -> BlockchainResult<ChainId> {
        self.touch()?;
        Ok(ChainId(self.chain_id))
    }

    async fn balance(&self, _address: Address) -> BlockchainResult<U256> {
        self.touch()?;
        // 100 ether
        Ok(U256::from(100u64) * U256::from(10u64).pow(U256::from(18u64)))
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        self.touch()?;
        Ok(20_000_000_000)
    }
}

impl ChainGateway for FakeChain {
    fn chain(&self) -> &dyn ChainAdapter {
        self
    }

    fn bind(&self, contract: &ContractSettings) -> BlockchainResult<Box<dyn CredentialRegistry>> {
        if contract.address.trim().is_empty() {
            return Err(BlockchainError::InvalidContract(
                "contract address not configured".to_string(),
            ));
        }
        let address = parse_checksummed(&contract.address)
            .map_err(|e| BlockchainError::InvalidContract(e.to_string()))?;
        Ok(Box::new(FakeRegistry {
            chain: self.clone(),
            address,
        }))
    }
}

pub struct FakeRegistry {
    chain: FakeChain,
    address: Address,
}

#[async_trait]
impl CredentialRegistry for FakeRegistry {
    fn address(&self) -> Address {
        self.address
    }

    async fn balance_of(&self, owner: Address) -> BlockchainResult<U256> {
        self.chain.touch()?;
        let balances = self.chain.state.balances.lock().unwrap();
        Ok(balances.get(&owner).copied().unwrap_or_default())
    }

    async fn owner_of(&self, token_id: U256) -> BlockchainResult<Address> {
        self.chain.touch()?;
        let tokens = self.chain.state.tokens.lock().unwrap();
        tokens
            .get(&token_id)
            .map(|(owner, _)| *owner)
            .ok_or_else(|| BlockchainError::Contract("execution reverted: invalid token ID".into()))
    }

    async fn metadata_url(&self, token_id: U256) -> BlockchainResult<String> {
        self.chain.touch()?;
        let tokens = self.chain.state.tokens.lock().unwrap();
        tokens
            .get(&token_id)
            .map(|(_, url)| url.clone())
            .ok_or_else(|| BlockchainError::Contract("execution reverted: invalid token ID".into()))
    }

    async fn issue(
        &self,
        recipient: Address,
        metadata_url: &str,
        _issuer: &IssuerCredentials,
    ) -> BlockchainResult<IssuanceReceipt> {
        self.chain.touch()?;
        let state = &self.chain.state;
        let block_number = state.block.fetch_add(1, Ordering::SeqCst) + 1;
        let transaction_hash = B256::with_last_byte(block_number as u8);

        if state.revert.load(Ordering::SeqCst) {
            return Ok(IssuanceReceipt {
                transaction_hash,
                block_number,
                gas_used: 30_000,
                success: false,
                token_id: None,
            });
        }

        let token_id = U256::from(state.next_token.fetch_add(1, Ordering::SeqCst));
        state
            .tokens
            .lock()
            .unwrap()
            .insert(token_id, (recipient, metadata_url.to_string()));
        *state
            .balances
            .lock()
            .unwrap()
            .entry(recipient)
            .or_default() += U256::from(1u64);

        Ok(IssuanceReceipt {
            transaction_hash,
            block_number,
            gas_used: ISSUANCE_GAS,
            success: true,
            token_id: Some(token_id),
        })
    }
}

pub fn issuer_settings() -> IssuerSettings {
    IssuerSettings {
        private_key: ISSUER_KEY.to_string(),
        public_address: ISSUER_ADDRESS.to_string(),
    }
}

/// Configuration pointing at a bound contract with a usable issuer.
pub fn test_config() -> DashboardConfig {
    let mut config = DashboardConfig::default();
    config.contract.address = CONTRACT.to_string();
    config.issuer = issuer_settings();
    config
}
