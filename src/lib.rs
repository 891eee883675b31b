//! Loan Simulator - amortization quotes for fixed-rate consumer credit
//!
//! This library provides:
//! - Product definitions for the two credit lines (monthly and weekly)
//! - Fixed ancillary fee schedule financed into every credit
//! - Quote calculation via the fixed-payment annuity formula
//! - An interactive console simulator mirroring the original quote form

pub mod fees;
pub mod format;
pub mod product;
pub mod quote;
pub mod simulator;

// Re-export commonly used types
pub use fees::FeeSchedule;
pub use product::{PaymentFrequency, ProductCatalog, ProductDefinition, ProductKey};
pub use quote::{Quote, QuoteCalculator, QuoteError};
pub use simulator::Simulator;
