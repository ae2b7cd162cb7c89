//! Diploma credential issuance and query service.

pub mod blockchain;
pub mod config;
pub mod http;
pub mod observability;
pub mod workflow;

pub use config::schema::DashboardConfig;
pub use http::HttpServer;
