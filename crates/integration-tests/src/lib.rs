//! Shared fixtures for the integration test suite.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::sync::{Notify, broadcast};
use uuid::Uuid;

use tamarind_client::{
    ChangeEvent, CheckoutDetails, EntityKind, MemoryStore, RemoteError, RemoteStore,
};
use tamarind_core::{Email, NewProduct, UserId};

/// Poll until the condition holds, panicking after two seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

/// A product draft with the given name and whole-unit price.
#[must_use]
pub fn product_draft(name: &str, price: i64) -> NewProduct {
    NewProduct {
        name: name.to_owned(),
        description: format!("{name} description"),
        price: Decimal::from(price),
        original_price: None,
        shipping_charges: None,
        image_url: format!("https://cdn.example.com/{name}.jpg"),
        category: "apparel".to_owned(),
        sizes: vec!["S".to_owned(), "M".to_owned(), "L".to_owned()],
        colors: vec!["black".to_owned()],
        in_stock: true,
        rating: 4.0,
        reviews: 3,
        tags: vec![],
        featured: false,
    }
}

/// Checkout details for a fixed test customer.
///
/// # Panics
///
/// Panics if the fixture email fails validation, which it does not.
#[must_use]
pub fn checkout_details() -> CheckoutDetails {
    CheckoutDetails {
        user_id: UserId::new(Uuid::new_v4()),
        customer_name: "Ada Lovelace".to_owned(),
        email: Email::parse("ada@example.com").expect("fixture email is valid"),
        phone: "+1 555 0100".to_owned(),
        address: "42 Harbor Lane".to_owned(),
        payment_method: "card".to_owned(),
    }
}

/// A store whose bulk fetch blocks until the test opens the gate.
///
/// Lets tests hold a fetch in flight across an unmount and only then let it
/// resolve. Writes and the change feed pass straight through.
pub struct GatedStore {
    inner: Arc<MemoryStore>,
    gate: Notify,
}

impl GatedStore {
    #[must_use]
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            gate: Notify::new(),
        }
    }

    /// Let one pending (or the next) fetch proceed.
    pub fn open_gate(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl RemoteStore for GatedStore {
    async fn fetch_all(&self, kind: EntityKind) -> Result<Vec<Value>, RemoteError> {
        self.gate.notified().await;
        self.inner.fetch_all(kind).await
    }

    async fn insert(&self, kind: EntityKind, fields: Value) -> Result<Value, RemoteError> {
        self.inner.insert(kind, fields).await
    }

    async fn update(&self, kind: EntityKind, id: Uuid, patch: Value) -> Result<Value, RemoteError> {
        self.inner.update(kind, id, patch).await
    }

    async fn delete(&self, kind: EntityKind, id: Uuid) -> Result<(), RemoteError> {
        self.inner.delete(kind, id).await
    }

    fn subscribe(&self, kind: EntityKind) -> broadcast::Receiver<ChangeEvent> {
        self.inner.subscribe(kind)
    }
}
