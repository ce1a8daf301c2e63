//! Dataset overview for the terminal.
//!
//! `salescope stats` prints record counts and the facet summary the API
//! would serve, which makes it a quick smoke test of a freshly imported
//! dataset.

use anyhow::Result;
use sales_scope_core::compute_facets;

use crate::config::Config;
use crate::store::SalesStore;

/// Run the stats command: load the dataset and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let store = SalesStore::from_path(config.dataset.path.clone());
    let snapshot = store.load().await;
    let facets = compute_facets(&snapshot);

    let dataset_size = std::fs::metadata(&config.dataset.path)
        .map(|meta| meta.len())
        .unwrap_or(0);

    println!("SalesScope Dataset Stats");
    println!("========================");
    println!();
    println!("  Dataset:     {}", config.dataset.path.display());
    println!("  Size:        {}", format_bytes(dataset_size));
    println!("  Records:     {}", snapshot.len());
    println!();
    println!("  Regions:     {}", summarize(&facets.regions));
    println!("  Genders:     {}", summarize(&facets.genders));
    println!("  Categories:  {}", summarize(&facets.categories));
    println!("  Tags:        {}", summarize(&facets.tags));
    println!("  Payments:    {}", summarize(&facets.payment_methods));
    println!();
    println!(
        "  Age range:   {} to {}",
        facets.age_range.min, facets.age_range.max
    );
    match (&facets.date_range.min, &facets.date_range.max) {
        (Some(min), Some(max)) => println!("  Date range:  {} to {}", min, max),
        _ => println!("  Date range:  (no parseable dates)"),
    }
    println!();

    Ok(())
}

/// Join facet values for display, truncating long lists.
fn summarize(values: &[String]) -> String {
    const SHOWN: usize = 6;
    if values.is_empty() {
        return "(none)".to_string();
    }
    if values.len() <= SHOWN {
        return values.join(", ");
    }
    format!(
        "{} (+{} more)",
        values[..SHOWN].join(", "),
        values.len() - SHOWN
    )
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
