//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! diploma.toml (+ DIPLOMA_ISSUER_PRIVATE_KEY)
//!     → loader.rs (parse, env overlay)
//!     → validation.rs (semantic checks, all errors at once)
//!     → DashboardConfig (immutable snapshot)
//!     → ArcSwap in the HTTP state, re-read on every request
//!
//! On file change:
//!     watcher.rs reloads and validates
//!     → server swaps in the new snapshot
//! ```

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ChainSettings, ContractSettings, DashboardConfig, IssuerSettings, ListenerConfig,
    ObservabilityConfig, SecurityConfig,
};
