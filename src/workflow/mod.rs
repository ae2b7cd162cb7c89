//! Headless workflows behind the HTTP API.
//!
//! # Data Flow
//! ```text
//! request + config snapshot
//!     → issuance.rs (validate → bind → sign/submit → receipt)
//!     → query.rs    (validate → balanceOf / ownerOf + tokenURI)
//!     → overview.rs (reachability, block, chain, balances, gas)
//! ```
//!
//! Workflows take `&dyn` chain seams so they run against fakes in tests.

pub mod error;
pub mod issuance;
pub mod overview;
pub mod query;

pub use error::{ErrorKind, WorkflowError};
pub use issuance::{IssuanceOutcome, IssuanceRequest, IssuanceStage, IssuanceWorkflow, ValidatedIssuance};
pub use overview::{connection_status, network_stats, ConnectionStatus, NetworkStats};
pub use query::{lookup_token, query_balance, TokenRecord};
