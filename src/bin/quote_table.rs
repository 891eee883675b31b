//! Quote table across all valid terms
//!
//! For a requested principal, prints the installment, total interest, and
//! total payable at every valid term of each product. Principals outside a
//! product's range are snapped to the nearest valid amount, the same way the
//! simulator input does.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use loan_simulator::format::format_cop;
use loan_simulator::{ProductCatalog, QuoteCalculator};

#[derive(Parser)]
#[command(about = "Print amortization quotes across all valid terms")]
struct Args {
    /// Requested principal in COP, snapped into each product's range
    amount: f64,

    /// Optional JSON catalog file overriding the built-in rate sheet
    #[arg(long)]
    catalog: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let catalog = match &args.catalog {
        Some(path) => ProductCatalog::from_json_path(path)
            .with_context(|| format!("loading catalog from {}", path.display()))?,
        None => ProductCatalog::builtin(),
    };

    let calculator = QuoteCalculator::standard();

    for product in catalog.iter() {
        let principal = product.snap_principal(args.amount);

        println!("{} - COP {} ({})", product.key, format_cop(principal), product.frequency.label());
        println!("{:>6} {:>16} {:>16} {:>16}",
            "Plazo", "Cuota", "Interés", "Total");
        println!("{}", "-".repeat(57));

        let mut term = product.min_term;
        while term <= product.max_term {
            let quote = calculator.quote(product, principal, term)?;
            println!("{:>6} {:>16} {:>16} {:>16}",
                term,
                format_cop(quote.installment),
                format_cop(quote.total_interest),
                format_cop(quote.total_payable),
            );
            term += product.term_step;
        }
        println!();
    }

    Ok(())
}
