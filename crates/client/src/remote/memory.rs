//! In-memory remote store.
//!
//! A full [`RemoteStore`] implementation backed by process memory: rows per
//! collection plus a broadcast change feed. It stands in for the hosted
//! store in tests and in the CLI demo, and supports injecting failures to
//! exercise error paths.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::{ChangeEvent, EntityKind, RemoteError, RemoteStore};

const FEED_CAPACITY: usize = 256;

/// In-memory [`RemoteStore`] with a broadcast change feed.
pub struct MemoryStore {
    rows: Mutex<HashMap<EntityKind, Vec<Value>>>,
    products_tx: broadcast::Sender<ChangeEvent>,
    orders_tx: broadcast::Sender<ChangeEvent>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        let (products_tx, _) = broadcast::channel(FEED_CAPACITY);
        let (orders_tx, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            rows: Mutex::new(HashMap::new()),
            products_tx,
            orders_tx,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make subsequent `fetch_all` calls fail with a transport error.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent insert/update/delete calls fail with a transport
    /// error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Broadcast a raw change event without touching the rows.
    ///
    /// Lets tests drive the feed with arbitrary payloads, including ones
    /// that do not decode.
    pub fn emit(&self, kind: EntityKind, event: ChangeEvent) {
        // send only errors when nobody is subscribed
        let _ = self.feed(kind).send(event);
    }

    fn feed(&self, kind: EntityKind) -> &broadcast::Sender<ChangeEvent> {
        match kind {
            EntityKind::Products => &self.products_tx,
            EntityKind::Orders => &self.orders_tx,
        }
    }

    fn injected() -> RemoteError {
        RemoteError::Transport("injected failure".to_owned())
    }

    fn with_rows<R>(&self, f: impl FnOnce(&mut HashMap<EntityKind, Vec<Value>>) -> R) -> R {
        let mut guard = self
            .rows
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut guard)
    }

    fn row_id(row: &Value) -> Option<Uuid> {
        row.get("id")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
    }

    fn created_at(row: &Value) -> DateTime<Utc> {
        row.get("created_at")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map_or(DateTime::UNIX_EPOCH, |t| t.with_timezone(&Utc))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn fetch_all(&self, kind: EntityKind) -> Result<Vec<Value>, RemoteError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }

        let mut rows = self.with_rows(|rows| rows.get(&kind).cloned().unwrap_or_default());
        rows.sort_by_key(|row| std::cmp::Reverse(Self::created_at(row)));
        Ok(rows)
    }

    async fn insert(&self, kind: EntityKind, fields: Value) -> Result<Value, RemoteError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }

        let Value::Object(mut row) = fields else {
            return Err(RemoteError::Query(
                "insert payload must be a JSON object".to_owned(),
            ));
        };

        let now = Utc::now();
        row.insert("id".to_owned(), json!(Uuid::new_v4()));
        row.insert("created_at".to_owned(), json!(now));
        row.insert("updated_at".to_owned(), json!(now));
        let row = Value::Object(row);

        self.with_rows(|rows| rows.entry(kind).or_default().push(row.clone()));
        self.emit(kind, ChangeEvent::Insert { new: row.clone() });
        Ok(row)
    }

    async fn update(&self, kind: EntityKind, id: Uuid, patch: Value) -> Result<Value, RemoteError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }

        let Value::Object(patch) = patch else {
            return Err(RemoteError::Query(
                "update patch must be a JSON object".to_owned(),
            ));
        };

        let updated = self.with_rows(|rows| {
            let collection = rows.entry(kind).or_default();
            let row = collection
                .iter_mut()
                .find(|row| Self::row_id(row) == Some(id))?;
            if let Value::Object(existing) = row {
                for (key, value) in patch {
                    existing.insert(key, value);
                }
            }
            Some(row.clone())
        });

        let row = updated.ok_or(RemoteError::NotFound { kind, id })?;
        self.emit(kind, ChangeEvent::Update { new: row.clone() });
        Ok(row)
    }

    async fn delete(&self, kind: EntityKind, id: Uuid) -> Result<(), RemoteError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }

        let removed = self.with_rows(|rows| {
            let collection = rows.entry(kind).or_default();
            let position = collection
                .iter()
                .position(|row| Self::row_id(row) == Some(id))?;
            Some(collection.remove(position))
        });

        let old = removed.ok_or(RemoteError::NotFound { kind, id })?;
        self.emit(kind, ChangeEvent::Delete { old });
        Ok(())
    }

    fn subscribe(&self, kind: EntityKind) -> broadcast::Receiver<ChangeEvent> {
        self.feed(kind).subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamps() {
        let store = MemoryStore::new();
        let row = store
            .insert(EntityKind::Products, json!({"name": "Beanie"}))
            .await
            .unwrap();

        assert!(MemoryStore::row_id(&row).is_some());
        assert!(row.get("created_at").is_some());
        assert!(row.get("updated_at").is_some());
        assert_eq!(row.get("name").and_then(Value::as_str), Some("Beanie"));
    }

    #[tokio::test]
    async fn test_fetch_all_orders_newest_first() {
        let store = MemoryStore::new();
        for name in ["first", "second", "third"] {
            store
                .insert(EntityKind::Products, json!({"name": name}))
                .await
                .unwrap();
            // Distinct created_at values
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let rows = store.fetch_all(EntityKind::Products).await.unwrap();
        let names: Vec<_> = rows
            .iter()
            .map(|row| row.get("name").and_then(Value::as_str).unwrap())
            .collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_update_merges_patch_and_broadcasts() {
        let store = MemoryStore::new();
        let row = store
            .insert(EntityKind::Products, json!({"name": "Beanie", "price": "25"}))
            .await
            .unwrap();
        let id = MemoryStore::row_id(&row).unwrap();

        let mut feed = store.subscribe(EntityKind::Products);
        let updated = store
            .update(EntityKind::Products, id, json!({"price": "19"}))
            .await
            .unwrap();

        assert_eq!(updated.get("name").and_then(Value::as_str), Some("Beanie"));
        assert_eq!(updated.get("price").and_then(Value::as_str), Some("19"));

        match feed.recv().await.unwrap() {
            ChangeEvent::Update { new } => assert_eq!(new, updated),
            other => panic!("expected update event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_broadcasts_old_row() {
        let store = MemoryStore::new();
        let row = store
            .insert(EntityKind::Orders, json!({"customer_name": "Ada"}))
            .await
            .unwrap();
        let id = MemoryStore::row_id(&row).unwrap();

        let mut feed = store.subscribe(EntityKind::Orders);
        store.delete(EntityKind::Orders, id).await.unwrap();

        match feed.recv().await.unwrap() {
            ChangeEvent::Delete { old } => assert_eq!(old, row),
            other => panic!("expected delete event, got {other:?}"),
        }
        assert!(store.fetch_all(EntityKind::Orders).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();

        let err = store
            .update(EntityKind::Products, id, json!({"price": "1"}))
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::NotFound { .. }));

        let err = store.delete(EntityKind::Products, id).await.unwrap_err();
        assert!(matches!(err, RemoteError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = MemoryStore::new();
        store.set_fail_reads(true);
        assert!(store.fetch_all(EntityKind::Products).await.is_err());
        store.set_fail_reads(false);
        assert!(store.fetch_all(EntityKind::Products).await.is_ok());

        store.set_fail_writes(true);
        assert!(
            store
                .insert(EntityKind::Products, json!({}))
                .await
                .is_err()
        );
    }
}
