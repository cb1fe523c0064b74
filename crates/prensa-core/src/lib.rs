//! Core utilities and types shared across all Prensa crates

pub mod config;
pub mod error_builder;
pub mod plugin;
pub mod problemdetails;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error_builder::ErrorBuilder;
pub use problemdetails::Problem;

// Re-export external dependencies
pub use anyhow;
pub use async_trait;
pub use chrono;
pub use serde;
pub use serde_json;
pub use thiserror;
pub use tokio;
pub use tracing;
