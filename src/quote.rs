//! Quote calculation: fee composition and the fixed-payment annuity formula
//!
//! A quote is a single deterministic formula evaluation. The guarantee fee,
//! fixed ancillary costs, and pro-rated life insurance are financed together
//! with the principal, and the installment solves the standard annuity
//! equation for that financed total at the product's periodic rate.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fees::FeeSchedule;
use crate::product::{PaymentFrequency, ProductDefinition, ProductKey};

/// Errors from quote calculation and catalog loading
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("{product}: principal {requested:.0} outside [{min:.0}, {max:.0}] COP")]
    PrincipalOutOfRange {
        product: ProductKey,
        requested: f64,
        min: f64,
        max: f64,
    },

    #[error("{product}: term {requested} outside [{min}, {max}]")]
    TermOutOfRange {
        product: ProductKey,
        requested: u32,
        min: u32,
        max: u32,
    },

    #[error("{product}: term {requested} is not a valid step of {step}")]
    TermNotAligned {
        product: ProductKey,
        requested: u32,
        step: u32,
    },

    #[error("term must be at least one period")]
    ZeroTerm,

    #[error("periodic rate {rate} is not positive; annuity formula is undefined")]
    NonPositiveRate { rate: f64 },

    #[error("unknown product '{0}'")]
    UnknownProduct(String),

    #[error("product {product} has an invalid definition")]
    InvalidProduct { product: ProductKey },

    #[error("catalog contains no products")]
    EmptyCatalog,

    #[error("failed to read catalog file")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog JSON")]
    Json(#[from] serde_json::Error),
}

/// Fixed installment for a financed total at a periodic rate over `periods`
///
/// Standard annuity formula: F * r / (1 - (1 + r)^-n). Rejects the degenerate
/// cases (n = 0, r <= 0) instead of producing an infinite or NaN payment.
pub fn installment(financed_total: f64, periodic_rate: f64, periods: u32) -> Result<f64, QuoteError> {
    if periods == 0 {
        return Err(QuoteError::ZeroTerm);
    }
    if periodic_rate <= 0.0 || !periodic_rate.is_finite() {
        return Err(QuoteError::NonPositiveRate { rate: periodic_rate });
    }
    let r = periodic_rate;
    Ok(financed_total * r / (1.0 - (1.0 + r).powi(-(periods as i32))))
}

/// A computed quote, created per request and discarded after render
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Product the quote was computed for
    pub product: ProductKey,

    /// Requested principal in COP
    pub principal: f64,

    /// Guarantee ("aval") fee, a percentage of principal
    pub guarantee_fee: f64,

    /// Sum of fixed ancillary costs
    pub ancillary_fees: f64,

    /// Pro-rated life insurance for the term (0 for the weekly line)
    pub life_insurance: f64,

    /// Total financed: principal plus all fees above
    pub financed_total: f64,

    /// Number of installments
    pub term: u32,

    /// Payment frequency of the installments
    pub frequency: PaymentFrequency,

    /// Periodic rate used, as a decimal
    pub periodic_rate: f64,

    /// Fixed installment amount in COP
    pub installment: f64,

    /// Total interest over the life of the credit
    pub total_interest: f64,

    /// Total paid over the life of the credit
    pub total_payable: f64,

    /// Date the quote was produced
    pub quoted_on: NaiveDate,
}

/// Stateless quote calculator over a fixed fee schedule
#[derive(Debug, Clone)]
pub struct QuoteCalculator {
    fees: FeeSchedule,
}

impl QuoteCalculator {
    pub fn new(fees: FeeSchedule) -> Self {
        Self { fees }
    }

    /// Calculator with the standard ancillary fee schedule
    pub fn standard() -> Self {
        Self::new(FeeSchedule::standard())
    }

    /// The fee schedule financed into every quote
    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    /// Compute a quote for a product, principal, and term
    ///
    /// Validates inputs against the product bounds and term step before
    /// evaluating the formula. The insurance cost is pro-rated from the
    /// requested term, one base charge per completed year.
    pub fn quote(
        &self,
        product: &ProductDefinition,
        principal: f64,
        term: u32,
    ) -> Result<Quote, QuoteError> {
        self.quote_on(product, principal, term, chrono::Utc::now().date_naive())
    }

    /// Compute a quote with an explicit quote date
    pub fn quote_on(
        &self,
        product: &ProductDefinition,
        principal: f64,
        term: u32,
        quoted_on: NaiveDate,
    ) -> Result<Quote, QuoteError> {
        product.validate_principal(principal)?;
        product.validate_term(term)?;

        let guarantee_fee = product.guarantee_fee(principal);
        let life_insurance = product.insurance_for_term(term);
        let ancillary_fees = self.fees.total();
        let financed_total = principal + guarantee_fee + ancillary_fees + life_insurance;

        let periodic_rate = product.periodic_rate();
        let installment = installment(financed_total, periodic_rate, term)?;

        let total_payable = installment * term as f64;
        let total_interest = total_payable - financed_total;

        debug!(
            "{}: P={principal:.0} N={term} F={financed_total:.0} r={periodic_rate:.6} cuota={installment:.2}",
            product.key
        );

        Ok(Quote {
            product: product.key,
            principal,
            guarantee_fee,
            ancillary_fees,
            life_insurance,
            financed_total,
            term,
            frequency: product.frequency,
            periodic_rate,
            installment,
            total_interest,
            total_payable,
            quoted_on,
        })
    }
}

impl Default for QuoteCalculator {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductCatalog;
    use approx::assert_relative_eq;

    fn calc() -> QuoteCalculator {
        QuoteCalculator::standard()
    }

    #[test]
    fn test_reference_quote_matches_annuity_formula() {
        // LoansiFlex, 10M COP over 12 months at 1.9715% monthly
        let catalog = ProductCatalog::builtin();
        let flex = catalog.get(ProductKey::LoansiFlex);
        let quote = calc().quote(flex, 10_000_000.0, 12).unwrap();

        // Financed total: principal + 10% aval + 22,200 fixed + one year of insurance
        assert_eq!(quote.guarantee_fee, 1_000_000.0);
        assert_eq!(quote.life_insurance, 150_000.0);
        assert_eq!(quote.financed_total, 11_172_200.0);

        let r = 0.019715;
        let expected = 11_172_200.0 * r / (1.0 - (1.0_f64 + r).powi(-12));
        assert_relative_eq!(quote.installment, expected, epsilon = 1e-6);

        // Sanity: a 12-month credit near 11M finances at roughly 1.05M/month
        assert!(quote.installment > 1_000_000.0 && quote.installment < 1_100_000.0);
    }

    #[test]
    fn test_totals_are_exact() {
        let catalog = ProductCatalog::builtin();
        let calc = calc();

        for product in catalog.iter() {
            let principal = product.min_principal;
            let term = product.min_term;
            let quote = calc.quote(product, principal, term).unwrap();

            assert_eq!(quote.total_payable, quote.installment * term as f64);
            assert_eq!(quote.total_interest, quote.total_payable - quote.financed_total);
            assert!(quote.total_interest > 0.0);
        }
    }

    #[test]
    fn test_weekly_quote_uses_derived_rate() {
        let catalog = ProductCatalog::builtin();
        let micro = catalog.get(ProductKey::Microflex);
        let quote = calc().quote(micro, 300_000.0, 6).unwrap();

        assert_eq!(quote.frequency, PaymentFrequency::Weekly);
        assert_relative_eq!(
            (1.0 + quote.periodic_rate).powi(4),
            1.0 + micro.monthly_rate(),
            epsilon = 1e-12
        );

        // 12% aval, no insurance on the weekly line
        assert_eq!(quote.guarantee_fee, 36_000.0);
        assert_eq!(quote.life_insurance, 0.0);
        assert_eq!(quote.financed_total, 300_000.0 + 36_000.0 + 22_200.0);
    }

    #[test]
    fn test_insurance_follows_requested_term() {
        let catalog = ProductCatalog::builtin();
        let flex = catalog.get(ProductKey::LoansiFlex);
        let calc = calc();

        // One base charge per completed year of the requested term
        assert_eq!(calc.quote(flex, 5_000_000.0, 12).unwrap().life_insurance, 150_000.0);
        assert_eq!(calc.quote(flex, 5_000_000.0, 36).unwrap().life_insurance, 450_000.0);
        assert_eq!(calc.quote(flex, 5_000_000.0, 60).unwrap().life_insurance, 750_000.0);
    }

    #[test]
    fn test_longer_term_lowers_installment() {
        let catalog = ProductCatalog::builtin();
        let flex = catalog.get(ProductKey::LoansiFlex);
        let calc = calc();

        let short = calc.quote(flex, 8_000_000.0, 12).unwrap();
        let long = calc.quote(flex, 8_000_000.0, 60).unwrap();

        assert!(long.installment < short.installment);
        assert!(long.total_interest > short.total_interest);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let catalog = ProductCatalog::builtin();
        let flex = catalog.get(ProductKey::LoansiFlex);
        let calc = calc();

        assert!(matches!(
            calc.quote(flex, 500_000.0, 12),
            Err(QuoteError::PrincipalOutOfRange { .. })
        ));
        assert!(matches!(
            calc.quote(flex, 5_000_000.0, 18),
            Err(QuoteError::TermNotAligned { .. })
        ));
        assert!(matches!(
            calc.quote(flex, 5_000_000.0, 0),
            Err(QuoteError::TermOutOfRange { .. })
        ));
    }

    #[test]
    fn test_degenerate_annuity_inputs_rejected() {
        assert!(matches!(installment(1_000_000.0, 0.02, 0), Err(QuoteError::ZeroTerm)));
        assert!(matches!(
            installment(1_000_000.0, 0.0, 12),
            Err(QuoteError::NonPositiveRate { .. })
        ));
        assert!(matches!(
            installment(1_000_000.0, -0.5, 12),
            Err(QuoteError::NonPositiveRate { .. })
        ));
    }
}
