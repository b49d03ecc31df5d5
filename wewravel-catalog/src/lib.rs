pub mod client;
pub mod pricing;

pub use client::{CatalogClient, CatalogError};
pub use pricing::{BookingQuote, PricingConfig, PricingEngine, PricingError};
