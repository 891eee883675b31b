//! Interactive credit simulator
//!
//! Console form: pick a credit line, enter principal and term, get the
//! installment and cost breakdown per simulation.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use loan_simulator::{ProductCatalog, QuoteCalculator, Simulator};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Optional catalog override, e.g. `loan_simulator rates.json`
    let catalog = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => ProductCatalog::from_json_path(&path)
            .with_context(|| format!("loading catalog from {}", path.display()))?,
        None => ProductCatalog::builtin(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut simulator = Simulator::new(
        catalog,
        QuoteCalculator::standard(),
        stdin.lock(),
        stdout.lock(),
    );
    simulator.run()?;

    Ok(())
}
