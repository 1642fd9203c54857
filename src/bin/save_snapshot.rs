//! Fetch products from the catalog and write them to a JSON snapshot.
//!
//! Usage:
//!   cargo run --bin save_snapshot -- "nutella" "oat milk" ...
//!
//! The output path comes from `SNAPSHOT_PATH` (default `ingredients_data.json`).

use anyhow::Context;
use eco_scorer_rust::lookup::OpenFoodFactsClient;
use eco_scorer_rust::snapshot::save_snapshot;
use eco_scorer_rust::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eco_scorer_rust=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let names: Vec<String> = std::env::args()
        .skip(1)
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();

    if names.is_empty() {
        anyhow::bail!("usage: save_snapshot <product name>...");
    }

    let config = Config::from_env();
    let client = OpenFoodFactsClient::new(&config.catalog_base_url, config.lookup_timeout)
        .context("Failed to build catalog HTTP client")?;

    let entries = save_snapshot(&names, &client, &config.snapshot_path)
        .await
        .with_context(|| format!("Failed to write snapshot {:?}", config.snapshot_path))?;

    println!(
        "Saved {} of {} products to {}",
        entries.len(),
        names.len(),
        config.snapshot_path.display()
    );

    Ok(())
}
