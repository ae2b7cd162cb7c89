//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! ChainSettings (RPC URL, timeouts)
//!     → client.rs (one provider handle, timed reads)
//!     → contract.rs (bind address, calls, sign + submit + receipt)
//!         ↑ wallet.rs (issuer key, scoped to one issuance)
//!         ↑ address.rs (checksum validation)
//! ```
//!
//! # Security Constraints
//! - Issuer keys are parsed per issuance and dropped afterwards
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Graceful degradation when the node is unreachable

pub mod address;
pub mod client;
pub mod contract;
pub mod gateway;
pub mod types;
pub mod units;
pub mod wallet;

pub use address::{
    parse_checksummed, serialize_checksummed, serialize_checksummed_opt, AddressError,
};
pub use client::ChainClient;
pub use contract::CredentialContract;
pub use gateway::{ChainAdapter, ChainGateway, CredentialRegistry};
pub use types::{BlockchainError, BlockchainResult, ChainId, IssuanceReceipt, Reachability};
pub use wallet::IssuerCredentials;
