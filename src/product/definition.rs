//! Credit product definitions matching the commercial rate sheet

use serde::{Deserialize, Serialize};

use crate::quote::QuoteError;

/// Product identifier for the two credit lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductKey {
    /// Free-investment credit, monthly installments
    LoansiFlex,
    /// Rotating micro-credit, weekly installments
    Microflex,
}

impl ProductKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKey::LoansiFlex => "LoansiFlex",
            ProductKey::Microflex => "Microflex",
        }
    }

    /// Parse a product key from user input (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "loansiflex" => Some(ProductKey::LoansiFlex),
            "microflex" => Some(ProductKey::Microflex),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProductKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment frequency of the installments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentFrequency {
    Monthly,
    Weekly,
}

impl PaymentFrequency {
    /// Customer-facing label (Spanish)
    pub fn label(&self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "Mensual",
            PaymentFrequency::Weekly => "Semanal",
        }
    }

    /// Unit of the term for this frequency (Spanish)
    pub fn term_unit(&self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "Meses",
            PaymentFrequency::Weekly => "Semanas",
        }
    }
}

/// A single credit line from the commercial rate sheet
///
/// Immutable configuration: two instances exist in the built-in catalog and
/// are never mutated after startup. Rates are stored in percent, the way the
/// rate sheet publishes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDefinition {
    /// Product identifier
    pub key: ProductKey,

    /// Customer-facing description (Spanish)
    pub description: String,

    /// Minimum principal in COP
    pub min_principal: f64,

    /// Maximum principal in COP
    pub max_principal: f64,

    /// Principal input increment in COP
    pub principal_step: f64,

    /// Minimum term, in the product's term unit
    pub min_term: u32,

    /// Maximum term, in the product's term unit
    pub max_term: u32,

    /// Term increment (12 for annual blocks of months, 1 for weeks)
    pub term_step: u32,

    /// Payment frequency (also defines the term unit)
    pub frequency: PaymentFrequency,

    /// Monthly nominal rate in percent (e.g. 1.9715)
    pub monthly_rate_pct: f64,

    /// Annual effective rate in percent, for disclosure only
    pub annual_effective_pct: f64,

    /// Guarantee ("aval") fee as a fraction of principal (e.g. 0.10)
    pub guarantee_pct: f64,

    /// Base annual life-insurance cost in COP, if the product carries one
    #[serde(default)]
    pub base_annual_insurance: Option<f64>,
}

impl ProductDefinition {
    /// Monthly nominal rate as a decimal
    pub fn monthly_rate(&self) -> f64 {
        self.monthly_rate_pct / 100.0
    }

    /// Periodic rate matching the payment frequency
    ///
    /// Monthly products use the nominal monthly rate directly. Weekly
    /// products derive the weekly rate from the monthly one so that four
    /// weekly compoundings reproduce a month: (1 + m)^(1/4) - 1.
    pub fn periodic_rate(&self) -> f64 {
        let monthly = self.monthly_rate();
        match self.frequency {
            PaymentFrequency::Monthly => monthly,
            PaymentFrequency::Weekly => (1.0 + monthly).powf(0.25) - 1.0,
        }
    }

    /// Guarantee fee for a given principal
    pub fn guarantee_fee(&self, principal: f64) -> f64 {
        principal * self.guarantee_pct
    }

    /// Life-insurance cost for a given term
    ///
    /// The base annual cost is charged once per completed 12-month block of
    /// the term, so terms under a year carry no insurance. Products without a
    /// base cost (weekly line) always return 0.
    pub fn insurance_for_term(&self, term: u32) -> f64 {
        match self.base_annual_insurance {
            Some(base) => base * (term / 12) as f64,
            None => 0.0,
        }
    }

    /// Check a requested principal against the product bounds
    pub fn validate_principal(&self, principal: f64) -> Result<(), QuoteError> {
        if !principal.is_finite() || principal < self.min_principal || principal > self.max_principal {
            return Err(QuoteError::PrincipalOutOfRange {
                product: self.key,
                requested: principal,
                min: self.min_principal,
                max: self.max_principal,
            });
        }
        Ok(())
    }

    /// Check a requested term against the product bounds and step
    pub fn validate_term(&self, term: u32) -> Result<(), QuoteError> {
        if term < self.min_term || term > self.max_term {
            return Err(QuoteError::TermOutOfRange {
                product: self.key,
                requested: term,
                min: self.min_term,
                max: self.max_term,
            });
        }
        if (term - self.min_term) % self.term_step != 0 {
            return Err(QuoteError::TermNotAligned {
                product: self.key,
                requested: term,
                step: self.term_step,
            });
        }
        Ok(())
    }

    /// Clamp and snap a raw principal to the nearest valid input value,
    /// the way the original entry widget constrained typed amounts
    pub fn snap_principal(&self, raw: f64) -> f64 {
        let snapped = (raw / self.principal_step).round() * self.principal_step;
        snapped.clamp(self.min_principal, self.max_principal)
    }

    /// Clamp and snap a raw term to the nearest valid slider position
    pub fn snap_term(&self, raw: u32) -> u32 {
        let clamped = raw.clamp(self.min_term, self.max_term);
        let offset = clamped - self.min_term;
        let snapped = self.min_term + (offset + self.term_step / 2) / self.term_step * self.term_step;
        snapped.min(self.max_term)
    }

    /// Sanity-check a definition loaded from an external catalog file
    pub fn validate(&self) -> Result<(), QuoteError> {
        let ok = self.min_principal > 0.0
            && self.max_principal >= self.min_principal
            && self.principal_step > 0.0
            && self.min_term > 0
            && self.max_term >= self.min_term
            && self.term_step > 0
            && self.monthly_rate_pct > 0.0
            && self.guarantee_pct >= 0.0
            && self.base_annual_insurance.map_or(true, |b| b >= 0.0);
        if ok {
            Ok(())
        } else {
            Err(QuoteError::InvalidProduct { product: self.key })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductCatalog;
    use approx::assert_relative_eq;

    #[test]
    fn test_weekly_rate_derivation() {
        let catalog = ProductCatalog::builtin();
        let micro = catalog.get(ProductKey::Microflex);

        // Four weekly compoundings must reproduce one month
        let weekly = micro.periodic_rate();
        assert_relative_eq!(
            (1.0 + weekly).powi(4),
            1.0 + micro.monthly_rate(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_monthly_rate_passthrough() {
        let catalog = ProductCatalog::builtin();
        let flex = catalog.get(ProductKey::LoansiFlex);
        assert_relative_eq!(flex.periodic_rate(), 0.019715, epsilon = 1e-12);
    }

    #[test]
    fn test_insurance_steps_at_year_boundaries() {
        let catalog = ProductCatalog::builtin();
        let flex = catalog.get(ProductKey::LoansiFlex);

        assert_eq!(flex.insurance_for_term(11), 0.0);
        assert_eq!(flex.insurance_for_term(12), 150_000.0);
        assert_eq!(flex.insurance_for_term(23), 150_000.0);
        assert_eq!(flex.insurance_for_term(24), 300_000.0);
        assert_eq!(flex.insurance_for_term(60), 750_000.0);

        // Weekly line has no life insurance at any term
        let micro = catalog.get(ProductKey::Microflex);
        assert_eq!(micro.insurance_for_term(8), 0.0);
        assert_eq!(micro.insurance_for_term(52), 0.0);
    }

    #[test]
    fn test_term_validation() {
        let catalog = ProductCatalog::builtin();
        let flex = catalog.get(ProductKey::LoansiFlex);

        assert!(flex.validate_term(12).is_ok());
        assert!(flex.validate_term(60).is_ok());
        assert!(matches!(
            flex.validate_term(18),
            Err(QuoteError::TermNotAligned { .. })
        ));
        assert!(matches!(
            flex.validate_term(72),
            Err(QuoteError::TermOutOfRange { .. })
        ));
        assert!(matches!(
            flex.validate_term(0),
            Err(QuoteError::TermOutOfRange { .. })
        ));

        let micro = catalog.get(ProductKey::Microflex);
        for term in 4..=8 {
            assert!(micro.validate_term(term).is_ok());
        }
        assert!(micro.validate_term(9).is_err());
    }

    #[test]
    fn test_principal_validation() {
        let catalog = ProductCatalog::builtin();
        let flex = catalog.get(ProductKey::LoansiFlex);

        assert!(flex.validate_principal(1_000_000.0).is_ok());
        assert!(flex.validate_principal(20_000_000.0).is_ok());
        assert!(flex.validate_principal(999_999.0).is_err());
        assert!(flex.validate_principal(f64::NAN).is_err());
    }

    #[test]
    fn test_snapping() {
        let catalog = ProductCatalog::builtin();
        let flex = catalog.get(ProductKey::LoansiFlex);

        assert_eq!(flex.snap_principal(5_024_999.0), 5_000_000.0);
        assert_eq!(flex.snap_principal(5_025_000.0), 5_050_000.0);
        assert_eq!(flex.snap_principal(100.0), 1_000_000.0);
        assert_eq!(flex.snap_principal(99_999_999.0), 20_000_000.0);

        assert_eq!(flex.snap_term(1), 12);
        assert_eq!(flex.snap_term(17), 12);
        assert_eq!(flex.snap_term(18), 24);
        assert_eq!(flex.snap_term(100), 60);
    }
}
