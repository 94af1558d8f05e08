use anyhow::{Context, Result};
use scms_query::{Config, DeliveryEngine};
use std::{env, path::PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

/// Load the dataset once and print its totals and dimension listings.
///
/// Usage: `dataset_summary [PATH]` (defaults to `SCMS_DATASET` / the stock
/// file name).
fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr) // keep stdout for the report
        .init();

    let path = match env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => Config::from_env()?.dataset_path,
    };
    tracing::info!(path = %path.display(), "summarising dataset");

    let engine = DeliveryEngine::from_path(&path);
    let stats = engine
        .compute_statistics()
        .with_context(|| format!("loading {}", path.display()))?;
    let countries = engine.list_distinct_countries()?;
    let vendors = engine.list_distinct_vendors()?;

    println!("dataset            {}", path.display());
    println!("deliveries         {}", stats.count);
    println!("line item value    {:.2}", stats.total_line_item_value);
    println!("weight (kg)        {:.2}", stats.total_weight_kg);
    println!("freight cost (USD) {:.2}", stats.total_freight_usd);

    println!("\ncountries ({})", countries.len());
    for c in &countries {
        println!("  {}", c);
    }
    println!("\nvendors ({})", vendors.len());
    for v in &vendors {
        println!("  {}", v);
    }

    Ok(())
}
