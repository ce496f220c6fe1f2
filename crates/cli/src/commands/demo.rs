//! `tamarind demo` - a scripted storefront session.
//!
//! Seeds the in-memory store, mounts the product catalog and the order
//! book, fills a cart, and places an order, waiting for the change feed to
//! converge at each step. The cart persists under the configured directory,
//! so a second run starts from the previous session's cart.

use std::sync::Arc;

use tamarind_client::{
    CheckoutDetails, EntityKind, FileStorage, LocalCart, MemoryStore, Notifier, OrderBook,
    ProductCatalog, RemoteStore, TracingNotifier, place_order,
};
use tamarind_core::{Email, UserId};
use tracing::info;
use uuid::Uuid;

use super::sample_products;
use crate::config::CliConfig;

/// Run the scripted session.
///
/// # Errors
///
/// Returns an error when seeding fails or the checkout is rejected.
#[allow(clippy::print_stdout)]
pub async fn run(config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryStore::new());
    for draft in sample_products() {
        store
            .insert(EntityKind::Products, serde_json::to_value(&draft)?)
            .await?;
    }

    let notifier = Arc::new(TracingNotifier) as Arc<dyn Notifier>;
    let catalog = ProductCatalog::mount(
        Arc::clone(&store) as Arc<dyn RemoteStore>,
        Arc::clone(&notifier),
    );
    let orders = OrderBook::mount(
        Arc::clone(&store) as Arc<dyn RemoteStore>,
        Arc::clone(&notifier),
    );

    let mut catalog_changes = catalog.watch();
    while catalog.loading() {
        catalog_changes.changed().await?;
    }
    info!(products = catalog.items().len(), "catalog ready");

    println!("Featured products:");
    for product in catalog.featured() {
        println!("  {} - {} ({})", product.name, product.price, product.category);
    }

    let mut cart = LocalCart::open(Box::new(FileStorage::new(&config.cart_dir)), notifier);
    let picks: Vec<_> = catalog.items().into_iter().take(2).collect();
    for product in picks {
        let size = product.sizes.first().cloned();
        cart.add_item(product, 2, size, None);
    }
    println!(
        "Cart: {} items, total {}",
        cart.total_item_count(),
        cart.total_price()
    );

    let details = CheckoutDetails {
        user_id: UserId::new(Uuid::new_v4()),
        customer_name: "Demo Customer".to_owned(),
        email: Email::parse("demo@example.com")?,
        phone: "+1 555 0100".to_owned(),
        address: "42 Harbor Lane".to_owned(),
        payment_method: "card".to_owned(),
    };
    let order = place_order(&mut cart, &orders, details).await?;
    println!(
        "Placed order {} for {} ({})",
        order.id, order.amount, order.status
    );

    // The order book converges when the feed delivers the insert.
    let mut order_changes = orders.watch();
    while orders.get(order.id.as_uuid()).is_none() {
        order_changes.changed().await?;
    }
    println!("Order book now holds {} order(s)", orders.items().len());
    println!("Cart after checkout: {} items", cart.total_item_count());

    Ok(())
}
