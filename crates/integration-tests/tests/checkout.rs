//! End-to-end storefront session: browse, fill the cart, place an order.

use std::sync::Arc;

use rust_decimal::Decimal;

use tamarind_client::{
    EntityKind, LocalCart, MemoryStore, MemoryStorage, Notifier, OrderBook, ProductCatalog,
    RecordingNotifier, RemoteStore, place_order,
};
use tamarind_core::OrderStatus;
use tamarind_integration_tests::{checkout_details, product_draft, wait_until};

#[tokio::test]
async fn test_full_storefront_session() {
    let store = Arc::new(MemoryStore::new());
    store
        .insert(
            EntityKind::Products,
            serde_json::to_value(product_draft("shirt", 500)).expect("serialize"),
        )
        .await
        .expect("seed");

    let notifier = Arc::new(RecordingNotifier::new());
    let catalog = ProductCatalog::mount(
        Arc::clone(&store) as Arc<dyn RemoteStore>,
        notifier.clone() as Arc<dyn Notifier>,
    );
    let orders = OrderBook::mount(
        Arc::clone(&store) as Arc<dyn RemoteStore>,
        notifier.clone() as Arc<dyn Notifier>,
    );
    wait_until(|| !catalog.loading() && !orders.loading()).await;

    // Browse and fill the cart: two of product X at 500, size M.
    let shirt = catalog.items().into_iter().next().expect("seeded product");
    let mut cart = LocalCart::open(
        Box::new(MemoryStorage::new()),
        notifier.clone() as Arc<dyn Notifier>,
    );
    cart.add_item(shirt.clone(), 2, Some("M".to_owned()), None);
    assert_eq!(cart.total_price(), Decimal::from(1000));

    // Checkout.
    let order = place_order(&mut cart, &orders, checkout_details())
        .await
        .expect("checkout succeeds");

    assert!(cart.items().is_empty());
    assert_eq!(cart.total_item_count(), 0);
    assert_eq!(order.amount, Decimal::from(1000));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].product_id, shirt.id);
    assert_eq!(order.items[0].quantity, 2);
    assert_eq!(order.items[0].price, Decimal::from(500));

    // The admin's order book converges through the feed, and the status
    // transition round-trips.
    wait_until(|| orders.get(order.id.as_uuid()).is_some()).await;
    orders
        .set_status(order.id, OrderStatus::Processing)
        .await
        .expect("status update");
    wait_until(|| orders.by_status(OrderStatus::Processing).len() == 1).await;
}

#[tokio::test]
async fn test_cart_survives_a_session_restart_mid_shopping() {
    let store = Arc::new(MemoryStore::new());
    store
        .insert(
            EntityKind::Products,
            serde_json::to_value(product_draft("beanie", 25)).expect("serialize"),
        )
        .await
        .expect("seed");

    let notifier = Arc::new(RecordingNotifier::new());
    let catalog = ProductCatalog::mount(
        Arc::clone(&store) as Arc<dyn RemoteStore>,
        notifier.clone() as Arc<dyn Notifier>,
    );
    wait_until(|| !catalog.loading()).await;
    let beanie = catalog.items().into_iter().next().expect("seeded product");

    let dir = tempfile::tempdir().expect("tempdir");
    {
        let mut cart = LocalCart::open(
            Box::new(tamarind_client::FileStorage::new(dir.path())),
            notifier.clone() as Arc<dyn Notifier>,
        );
        cart.add_item(beanie.clone(), 3, None, Some("black".to_owned()));
    }

    // A new session rehydrates the same lines.
    let cart = LocalCart::open(
        Box::new(tamarind_client::FileStorage::new(dir.path())),
        notifier as Arc<dyn Notifier>,
    );
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].product.id, beanie.id);
    assert_eq!(cart.items()[0].quantity, 3);
    assert_eq!(cart.total_price(), Decimal::from(75));
}
