//! PrintQuote Core Library
//!
//! This crate provides the domain models, error types and configuration shared by
//! every PrintQuote component: the slicing pipeline, the HTTP API and the CLI.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, QuoteServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    PriceQuote, PricingTable, PrintDuration, QuoteCalculation, QuoteResponse, STANDARD_PRICING,
};
