//! Interactive console simulator
//!
//! Console rendition of the original quote form: pick a credit line, enter a
//! principal, pick a term, and get the installment with the full breakdown.
//! Entered values are snapped to the product's bounds and steps the way the
//! original input widgets constrained them.

use std::io::{self, BufRead, Write};

use log::warn;

use crate::format::{format_cop, format_pct};
use crate::product::{PaymentFrequency, ProductCatalog, ProductDefinition};
use crate::quote::{Quote, QuoteCalculator};

/// Contact link shown after every simulation
pub const WHATSAPP_URL: &str = "https://wa.me/XXXXXXXXXXX";

/// Interactive simulator session over arbitrary input/output streams
pub struct Simulator<R, W> {
    catalog: ProductCatalog,
    calculator: QuoteCalculator,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Simulator<R, W> {
    pub fn new(catalog: ProductCatalog, calculator: QuoteCalculator, input: R, output: W) -> Self {
        Self { catalog, calculator, input, output }
    }

    /// Run simulations until EOF or "salir"
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "Simulador de Crédito Loansi")?;
        writeln!(self.output, "===========================")?;

        loop {
            writeln!(self.output)?;
            let Some(product) = self.select_product()? else {
                break;
            };

            writeln!(self.output, "Descripción: {}", product.description)?;

            let Some(principal) = self.read_principal(&product)? else {
                break;
            };
            let Some(term) = self.read_term(&product)? else {
                break;
            };

            match self.calculator.quote(&product, principal, term) {
                Ok(quote) => {
                    writeln!(self.output)?;
                    self.render_quote(&product, &quote)?;
                }
                Err(err) => {
                    // Snapped inputs are always valid, so this only fires on
                    // a broken external catalog definition.
                    warn!("quote failed: {err}");
                    writeln!(self.output, "No fue posible calcular la cuota: {err}")?;
                }
            }

            writeln!(self.output)?;
            write!(self.output, "¿Otra simulación? (s/n): ")?;
            self.output.flush()?;
            match self.read_line()? {
                Some(line) if line.trim().eq_ignore_ascii_case("s") => continue,
                _ => break,
            }
        }

        Ok(())
    }

    fn select_product(&mut self) -> io::Result<Option<ProductDefinition>> {
        writeln!(self.output, "Líneas de crédito:")?;
        let products: Vec<ProductDefinition> = self.catalog.iter().cloned().collect();
        for (i, product) in products.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, product.key)?;
        }

        loop {
            write!(self.output, "Selecciona la línea de crédito [1-{}]: ", products.len())?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            let entry = line.trim();
            if entry.eq_ignore_ascii_case("salir") {
                return Ok(None);
            }
            if let Ok(index) = entry.parse::<usize>() {
                if index >= 1 && index <= products.len() {
                    return Ok(Some(products[index - 1].clone()));
                }
            }
            if let Some(product) = self.catalog.find_by_name(entry) {
                return Ok(Some(product.clone()));
            }
            writeln!(self.output, "Opción no válida.")?;
        }
    }

    fn read_principal(&mut self, product: &ProductDefinition) -> io::Result<Option<f64>> {
        loop {
            write!(
                self.output,
                "Valor del crédito (entre {} y {} COP): ",
                format_cop(product.min_principal),
                format_cop(product.max_principal),
            )?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            let raw = line.trim().replace([',', '.'], "");
            match raw.parse::<f64>() {
                Ok(value) => {
                    let snapped = product.snap_principal(value);
                    if snapped != value {
                        writeln!(self.output, "Valor ajustado a COP {}.", format_cop(snapped))?;
                    }
                    return Ok(Some(snapped));
                }
                Err(_) => writeln!(self.output, "Ingresa un valor numérico.")?,
            }
        }
    }

    fn read_term(&mut self, product: &ProductDefinition) -> io::Result<Option<u32>> {
        let unit = product.frequency.term_unit();
        loop {
            write!(
                self.output,
                "Plazo en {} [{}-{}, paso {}]: ",
                unit, product.min_term, product.max_term, product.term_step,
            )?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match line.trim().parse::<u32>() {
                Ok(value) => {
                    let snapped = product.snap_term(value);
                    if snapped != value {
                        writeln!(self.output, "Plazo ajustado a {snapped} {unit}.")?;
                    }
                    return Ok(Some(snapped));
                }
                Err(_) => writeln!(self.output, "Ingresa un plazo numérico.")?,
            }
        }
    }

    fn render_quote(&mut self, product: &ProductDefinition, quote: &Quote) -> io::Result<()> {
        writeln!(
            self.output,
            "Pagarás {} cuotas por un valor aproximado de:",
            quote.term
        )?;
        writeln!(
            self.output,
            "COP {} {}",
            format_cop(quote.installment),
            quote.frequency.label()
        )?;
        writeln!(self.output)?;
        writeln!(self.output, "Detalles del crédito:")?;
        writeln!(self.output, "  Monto solicitado:        COP {}", format_cop(quote.principal))?;
        writeln!(
            self.output,
            "  Tasa de interés mensual: {}",
            format_pct(product.monthly_rate_pct)
        )?;
        writeln!(
            self.output,
            "  Interés efectivo anual:  {}",
            format_pct(product.annual_effective_pct)
        )?;
        writeln!(self.output, "  Frecuencia de pago:      {}", quote.frequency.label())?;
        writeln!(self.output, "  Número de cuotas:        {}", quote.term)?;
        writeln!(
            self.output,
            "  Costo del aval y otros:  COP {}",
            format_cop(quote.guarantee_fee + quote.ancillary_fees)
        )?;
        if quote.frequency == PaymentFrequency::Monthly {
            writeln!(
                self.output,
                "  Seguro de vida:          COP {}",
                format_cop(quote.life_insurance)
            )?;
        }
        writeln!(
            self.output,
            "  Total interés a pagar:   COP {}",
            format_cop(quote.total_interest)
        )?;
        writeln!(
            self.output,
            "  Total a pagar:           COP {}",
            format_cop(quote.total_payable)
        )?;
        writeln!(self.output, "  Fecha de simulación:     {}", quote.quoted_on)?;
        writeln!(self.output)?;
        writeln!(self.output, "¿Interesado en solicitar este crédito?")?;
        writeln!(self.output, "Solicítalo vía WhatsApp: {WHATSAPP_URL}")?;
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            Ok(None)
        } else {
            Ok(Some(line))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_session(script: &str) -> String {
        let input = Cursor::new(script.to_string());
        let mut output = Vec::new();
        let mut simulator = Simulator::new(
            ProductCatalog::builtin(),
            QuoteCalculator::standard(),
            input,
            &mut output,
        );
        simulator.run().unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_full_session_renders_quote() {
        let output = run_session("1\n10000000\n12\nn\n");

        assert!(output.contains("Pagarás 12 cuotas"));
        assert!(output.contains("Mensual"));
        assert!(output.contains("Monto solicitado:        COP 10,000,000"));
        assert!(output.contains("Seguro de vida:          COP 150,000"));
        assert!(output.contains(WHATSAPP_URL));
    }

    #[test]
    fn test_weekly_session_omits_insurance() {
        let output = run_session("2\n300000\n6\nn\n");

        assert!(output.contains("Pagarás 6 cuotas"));
        assert!(output.contains("Semanal"));
        assert!(!output.contains("Seguro de vida"));
    }

    #[test]
    fn test_out_of_range_inputs_are_snapped() {
        // 99M principal and 90-month term snap to the product maximums
        let output = run_session("LoansiFlex\n99000000\n90\nn\n");

        assert!(output.contains("Valor ajustado a COP 20,000,000."));
        assert!(output.contains("Plazo ajustado a 60 Meses."));
        assert!(output.contains("Pagarás 60 cuotas"));
    }

    #[test]
    fn test_invalid_selection_reprompts() {
        let output = run_session("hipotecario\n1\n5000000\n24\nn\n");
        assert!(output.contains("Opción no válida."));
        assert!(output.contains("Pagarás 24 cuotas"));
    }

    #[test]
    fn test_eof_ends_session() {
        let output = run_session("");
        assert!(output.contains("Simulador de Crédito Loansi"));
        assert!(!output.contains("Pagarás"));
    }
}
