//! Credit product definitions and the rate-sheet catalog

mod catalog;
mod definition;

pub use catalog::ProductCatalog;
pub use definition::{PaymentFrequency, ProductDefinition, ProductKey};
