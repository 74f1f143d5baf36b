//! Domain models for the quote pipeline.

pub mod duration;
pub mod pricing;
pub mod quote;

pub use duration::PrintDuration;
pub use pricing::{PricingSummary, PricingTable, RateEntry, STANDARD_PRICING};
pub use quote::{PriceQuote, QuoteCalculation, QuoteResponse};
