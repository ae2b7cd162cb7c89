//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Workflows and handlers produce:
//!     → logging.rs (structured tracing events, never key material)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer, EnvFilter)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;
