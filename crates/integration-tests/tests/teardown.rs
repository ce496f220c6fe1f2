//! Unmount semantics: a torn-down mirror must stay torn down.

use std::sync::Arc;
use std::time::Duration;

use tamarind_client::{
    EntityKind, MemoryStore, Notifier, ProductCatalog, RecordingNotifier, RemoteStore,
};
use tamarind_integration_tests::{GatedStore, product_draft, wait_until};

#[tokio::test]
async fn test_fetch_resolving_after_release_is_discarded() {
    let inner = Arc::new(MemoryStore::new());
    inner
        .insert(
            EntityKind::Products,
            serde_json::to_value(product_draft("shirt", 500)).expect("serialize"),
        )
        .await
        .expect("seed");

    let store = Arc::new(GatedStore::new(Arc::clone(&inner)));
    let catalog = ProductCatalog::mount(
        Arc::clone(&store) as Arc<dyn RemoteStore>,
        Arc::new(RecordingNotifier::new()) as Arc<dyn Notifier>,
    );

    // The fetch is parked behind the gate; unmount while it is in flight.
    assert!(catalog.loading());
    catalog.release();

    // Let the fetch resolve now. Its result must not touch the mirror.
    store.open_gate();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(catalog.items().is_empty());
}

#[tokio::test]
async fn test_no_event_application_after_release() {
    let store = Arc::new(MemoryStore::new());
    let catalog = ProductCatalog::mount(
        Arc::clone(&store) as Arc<dyn RemoteStore>,
        Arc::new(RecordingNotifier::new()) as Arc<dyn Notifier>,
    );
    wait_until(|| !catalog.loading()).await;

    catalog.release();
    store
        .insert(
            EntityKind::Products,
            serde_json::to_value(product_draft("late", 10)).expect("serialize"),
        )
        .await
        .expect("insert");

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(catalog.items().is_empty());
}

#[tokio::test]
async fn test_release_is_idempotent_and_runs_on_drop() {
    let store = Arc::new(MemoryStore::new());
    let catalog = ProductCatalog::mount(
        Arc::clone(&store) as Arc<dyn RemoteStore>,
        Arc::new(RecordingNotifier::new()) as Arc<dyn Notifier>,
    );
    wait_until(|| !catalog.loading()).await;

    catalog.release();
    catalog.release();
    drop(catalog);

    // Feed delivery to a dropped mirror must not panic anything.
    store
        .insert(
            EntityKind::Products,
            serde_json::to_value(product_draft("after-drop", 10)).expect("serialize"),
        )
        .await
        .expect("insert");
    tokio::time::sleep(Duration::from_millis(20)).await;
}
