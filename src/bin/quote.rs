//! One-shot quote calculation
//!
//! Computes a single quote from the command line and prints either a
//! human-readable breakdown or a JSON response for API/script consumption
//! via --json.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;
use loan_simulator::format::{format_cop, format_pct};
use loan_simulator::{PaymentFrequency, ProductCatalog, Quote, QuoteCalculator};
use serde::Serialize;

#[derive(Parser)]
#[command(about = "Compute an amortization quote for a credit product")]
struct Args {
    /// Product name (LoansiFlex or Microflex)
    product: String,

    /// Requested principal in COP
    amount: f64,

    /// Term in the product's unit (months or weeks)
    term: u32,

    /// Optional JSON catalog file overriding the built-in rate sheet
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Emit the quote as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct QuoteResponse {
    quote: Quote,
    monthly_rate_pct: f64,
    annual_effective_pct: f64,
    execution_time_ms: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let start = Instant::now();

    let catalog = match &args.catalog {
        Some(path) => ProductCatalog::from_json_path(path)
            .with_context(|| format!("loading catalog from {}", path.display()))?,
        None => ProductCatalog::builtin(),
    };

    let Some(product) = catalog.find_by_name(&args.product) else {
        bail!("unknown product '{}'; expected LoansiFlex or Microflex", args.product);
    };

    let calculator = QuoteCalculator::standard();
    let quote = calculator.quote(product, args.amount, args.term)?;

    if args.json {
        let response = QuoteResponse {
            monthly_rate_pct: product.monthly_rate_pct,
            annual_effective_pct: product.annual_effective_pct,
            quote,
            execution_time_ms: start.elapsed().as_millis() as u64,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        println!("{} - {} cuotas de COP {} ({})",
            quote.product,
            quote.term,
            format_cop(quote.installment),
            quote.frequency.label(),
        );
        println!();
        println!("  Monto solicitado:   COP {}", format_cop(quote.principal));
        println!("  Aval:               COP {}", format_cop(quote.guarantee_fee));
        println!("  Costos asociados:   COP {}", format_cop(quote.ancillary_fees));
        if quote.frequency == PaymentFrequency::Monthly {
            println!("  Seguro de vida:     COP {}", format_cop(quote.life_insurance));
        }
        println!("  Total a financiar:  COP {}", format_cop(quote.financed_total));
        println!("  Tasa mensual:       {}", format_pct(product.monthly_rate_pct));
        println!("  Tasa E.A.:          {}", format_pct(product.annual_effective_pct));
        println!("  Total interés:      COP {}", format_cop(quote.total_interest));
        println!("  Total a pagar:      COP {}", format_cop(quote.total_payable));
    }

    Ok(())
}
