//! `tamarind seed` - print a seeded sample catalog as JSON.

use std::sync::Arc;

use tamarind_client::{EntityKind, MemoryStore, RemoteStore};

use super::sample_products;

/// Seed an in-memory store and print the resulting rows.
///
/// # Errors
///
/// Returns an error when seeding or serialization fails.
#[allow(clippy::print_stdout)]
pub async fn print_catalog(count: usize) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryStore::new());

    for draft in sample_products().into_iter().cycle().take(count) {
        store
            .insert(EntityKind::Products, serde_json::to_value(&draft)?)
            .await?;
    }

    let rows = store.fetch_all(EntityKind::Products).await?;
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
