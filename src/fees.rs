//! Fixed ancillary costs charged on every credit
//!
//! These are the document and bureau fees that get financed along with the
//! principal. They are flat COP amounts, independent of product and term.

use serde::{Deserialize, Serialize};

/// A single named fixed cost
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeItem {
    pub name: String,
    pub amount: f64,
}

/// Schedule of fixed ancillary costs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeSchedule {
    items: Vec<FeeItem>,
}

impl FeeSchedule {
    /// The standard schedule charged on every credit
    pub fn standard() -> Self {
        Self {
            items: vec![
                FeeItem { name: "Pagaré Digital".to_string(), amount: 2_800.0 },
                FeeItem { name: "Carta de Instrucción".to_string(), amount: 2_800.0 },
                FeeItem { name: "Custodia TVE".to_string(), amount: 5_600.0 },
                FeeItem { name: "Consulta Datacrédito".to_string(), amount: 11_000.0 },
            ],
        }
    }

    /// Sum of all fixed costs
    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.amount).sum()
    }

    /// Items in schedule order
    pub fn iter(&self) -> impl Iterator<Item = &FeeItem> {
        self.items.iter()
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_total() {
        let fees = FeeSchedule::standard();
        assert_eq!(fees.total(), 22_200.0);
        assert_eq!(fees.iter().count(), 4);
    }
}
