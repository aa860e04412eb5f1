use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use skyline_data::{MarketDataLoader, train};
use skyline_model_json::write_artifact;

/// Fit the house price model from a market dataset and save it as JSON.
///
/// The CSV file should have the following columns:
/// - area: Built-up area in square feet
/// - bedrooms: BHK count
/// - price: Sale price in lakhs
/// - distance: Distance to the city centre in km
/// - age: Property age in years
#[derive(Parser, Debug)]
#[command(name = "skyline-train")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing market sales
    #[arg(short, long, default_value = "house_prices.csv")]
    file: PathBuf,

    /// Where to write the model artifact
    #[arg(short, long, default_value = "house_model.json")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Loading market data from: {}", args.file.display());

    let records = MarketDataLoader::load_from_file(&args.file)
        .with_context(|| format!("Failed to load: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let trained = train(&records).context("Failed to fit the price model")?;

    println!(
        "Fitted intercept {:.4}, coefficients {:?} (R² = {:.4})",
        trained.model.intercept, trained.model.coefficients, trained.r_squared
    );

    write_artifact(&args.output, &trained.to_artifact(Utc::now()))
        .with_context(|| format!("Failed to write: {}", args.output.display()))?;

    println!("Model trained and saved to {}", args.output.display());

    Ok(())
}
