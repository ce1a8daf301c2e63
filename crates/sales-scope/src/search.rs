use anyhow::Result;
use sales_scope_core::{run_query, SalesQuery};

use crate::config::Config;
use crate::store::SalesStore;

/// Run the search command: execute one query against the dataset and print
/// the resulting page.
pub async fn run_search(config: &Config, query: &SalesQuery) -> Result<()> {
    let store = SalesStore::from_path(config.dataset.path.clone());
    let snapshot = store.load().await;
    let page = run_query(&snapshot, query);

    if page.rows.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let first_index = (page.meta.current_page - 1) * page.meta.page_size;
    for (i, record) in page.rows.iter().enumerate() {
        let name = if record.customer_name.is_empty() {
            "(unnamed)"
        } else {
            record.customer_name.as_str()
        };
        let date = if record.date.is_empty() {
            "(no date)"
        } else {
            record.date.as_str()
        };
        println!("{}. {} / {}", first_index + i + 1, name, date);
        if !record.product_name.is_empty() {
            println!("    product: {} ({})", record.product_name, record.product_category);
        }
        println!(
            "    region: {}   qty: {}   final: {}",
            record.customer_region, record.quantity, record.final_amount
        );
        if !record.tags.is_empty() {
            println!("    tags: {}", record.tags);
        }
        println!();
    }

    println!(
        "Page {} of {} ({} matching record{})",
        page.meta.current_page,
        page.meta.total_pages,
        page.meta.total_items,
        if page.meta.total_items == 1 { "" } else { "s" }
    );

    Ok(())
}
