//! Issuer signing credentials.
//!
//! # Security
//! - Built per issuance from configuration or the request body, dropped
//!   when the workflow finishes
//! - Keys are never logged or serialized; `Debug` shows the address only

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::address::parse_checksummed;
use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// A signing key paired with the public address it controls.
pub struct IssuerCredentials {
    signer: PrivateKeySigner,
}

impl IssuerCredentials {
    /// Create credentials from a hex-encoded private key.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    /// * `public_address` - Optional address the key must control; empty skips the check
    pub fn from_private_key(private_key_hex: &str, public_address: &str) -> BlockchainResult<Self> {
        let key = private_key_hex.trim();
        if key.is_empty() {
            return Err(BlockchainError::Wallet("issuer private key not configured".to_string()));
        }
        let key_hex = key.strip_prefix("0x").unwrap_or(key);

        // The parse error is dropped on purpose: it may quote key material.
        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|_| BlockchainError::Wallet("invalid private key format".to_string()))?;

        if !public_address.trim().is_empty() {
            let expected = parse_checksummed(public_address)
                .map_err(|e| BlockchainError::Wallet(format!("issuer address: {e}")))?;
            if expected != signer.address() {
                return Err(BlockchainError::Wallet(format!(
                    "issuer address {} does not match private key",
                    expected
                )));
            }
        }

        tracing::debug!(address = %signer.address(), "Issuer credentials loaded");

        Ok(Self { signer })
    }

    /// The issuing account's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Wallet used to sign a transaction request.
    pub(crate) fn wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

impl std::fmt::Debug for IssuerCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuerCredentials")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
