//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, request id, tracing, body limit)
//!     → handlers.rs (config snapshot → workflow call)
//!     → response.rs (outcome / error → JSON + status code)
//! ```

pub mod handlers;
pub mod response;
pub mod server;

pub use server::{AppState, HttpServer};
