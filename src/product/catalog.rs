//! Product catalog with the built-in rate sheet and optional file override

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::{PaymentFrequency, ProductDefinition, ProductKey};
use crate::quote::QuoteError;

/// The two credit lines offered, in display order
///
/// Built from the rate sheet at startup; a JSON catalog file with the same
/// shape can be loaded instead so rates can change without recompiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCatalog {
    products: Vec<ProductDefinition>,
}

impl ProductCatalog {
    /// Built-in catalog matching the published rate sheet
    pub fn builtin() -> Self {
        Self {
            products: vec![
                ProductDefinition {
                    key: ProductKey::LoansiFlex,
                    description: "Crédito de libre inversión para empleados, independientes, \
                                  personas naturales y pensionados."
                        .to_string(),
                    min_principal: 1_000_000.0,
                    max_principal: 20_000_000.0,
                    principal_step: 50_000.0,
                    min_term: 12,
                    max_term: 60,
                    term_step: 12,
                    frequency: PaymentFrequency::Monthly,
                    monthly_rate_pct: 1.9715,
                    annual_effective_pct: 26.4,
                    guarantee_pct: 0.10,
                    base_annual_insurance: Some(150_000.0),
                },
                ProductDefinition {
                    key: ProductKey::Microflex,
                    description: "Crédito rotativo para personas en sectores informales, \
                                  orientado a cubrir necesidades de liquidez rápida con pagos \
                                  semanales."
                        .to_string(),
                    min_principal: 50_000.0,
                    max_principal: 500_000.0,
                    principal_step: 50_000.0,
                    min_term: 4,
                    max_term: 8,
                    term_step: 1,
                    frequency: PaymentFrequency::Weekly,
                    monthly_rate_pct: 2.0718,
                    annual_effective_pct: 27.9,
                    guarantee_pct: 0.12,
                    base_annual_insurance: None,
                },
            ],
        }
    }

    /// Parse a catalog from JSON and validate every definition
    pub fn from_json_str(json: &str) -> Result<Self, QuoteError> {
        let catalog: ProductCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file
    pub fn from_json_path(path: &Path) -> Result<Self, QuoteError> {
        let json = fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&json)?;
        info!("loaded {} products from {}", catalog.products.len(), path.display());
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), QuoteError> {
        if self.products.is_empty() {
            return Err(QuoteError::EmptyCatalog);
        }
        for product in &self.products {
            product.validate()?;
        }
        Ok(())
    }

    /// Look up a product, panicking if absent
    ///
    /// Only valid for the built-in catalog, which always carries both keys.
    pub fn get(&self, key: ProductKey) -> &ProductDefinition {
        self.find(key).unwrap_or_else(|| panic!("product {key} missing from catalog"))
    }

    /// Look up a product by key
    pub fn find(&self, key: ProductKey) -> Option<&ProductDefinition> {
        self.products.iter().find(|p| p.key == key)
    }

    /// Look up a product by user-entered name
    pub fn find_by_name(&self, name: &str) -> Option<&ProductDefinition> {
        ProductKey::from_name(name).and_then(|key| self.find(key))
    }

    /// Products in display order
    pub fn iter(&self) -> impl Iterator<Item = &ProductDefinition> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
