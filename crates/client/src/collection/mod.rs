//! In-memory mirrors of remote collections.
//!
//! [`RemoteCollection`] keeps one entity collection consistent with the
//! remote store: a bulk fetch on mount replaces the mirror wholly, then a
//! change-feed subscription reconciles every committed row change in
//! arrival order. Local writes go through the same remote API and are never
//! applied to the mirror directly - the feed delivers them back, so the
//! mirror converges shortly after a write resolves rather than at the
//! moment it resolves.
//!
//! The product catalog and the order book are the two instantiations; see
//! [`ProductCatalog`] and [`OrderBook`].

mod orders;
mod products;

pub use orders::OrderBook;
pub use products::ProductCatalog;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{FetchError, MutationError};
use crate::notify::Notifier;
use crate::remote::{ChangeEvent, EntityKind, RemoteStore};

/// Where a freshly inserted entity lands in the mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Appended at the end (products).
    Append,
    /// Prepended at the front, matching the newest-first fetch order
    /// (orders).
    Prepend,
}

/// An entity kind a [`RemoteCollection`] can mirror.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The remote collection this entity lives in.
    const KIND: EntityKind;

    /// Where feed inserts land in the mirror.
    const INSERT_POSITION: InsertPosition;

    /// The stable remote identifier.
    fn entity_id(&self) -> Uuid;
}

/// Shared state behind one mounted collection.
struct CollectionState<T> {
    items: RwLock<Vec<T>>,
    loading: AtomicBool,
    error: RwLock<Option<String>>,
    released: AtomicBool,
    version: watch::Sender<u64>,
}

impl<T: Entity> CollectionState<T> {
    fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            items: RwLock::new(Vec::new()),
            loading: AtomicBool::new(true),
            error: RwLock::new(None),
            released: AtomicBool::new(false),
            version,
        }
    }

    fn released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// Signal consumers that the collection processed something.
    fn bump(&self) {
        self.version.send_modify(|v| *v = v.wrapping_add(1));
    }

    fn read_items(&self) -> std::sync::RwLockReadGuard<'_, Vec<T>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_items(&self) -> std::sync::RwLockWriteGuard<'_, Vec<T>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_error(&self, error: Option<String>) {
        *self.error.write().unwrap_or_else(PoisonError::into_inner) = error;
    }

    /// Apply one change-feed event in arrival order.
    ///
    /// Payloads that do not decode are logged and dropped rather than
    /// corrupting the mirror. An update for an id the mirror does not hold
    /// is ignored, never treated as an implicit insert.
    fn apply_event(&self, event: ChangeEvent) {
        if self.released() {
            return;
        }

        match event {
            ChangeEvent::Insert { new } => match serde_json::from_value::<T>(new) {
                Ok(entity) => {
                    let mut items = self.write_items();
                    match T::INSERT_POSITION {
                        InsertPosition::Append => items.push(entity),
                        InsertPosition::Prepend => items.insert(0, entity),
                    }
                }
                Err(err) => {
                    warn!(kind = %T::KIND, error = %err, "ignoring undecodable insert event");
                }
            },
            ChangeEvent::Update { new } => match serde_json::from_value::<T>(new) {
                Ok(entity) => {
                    let mut items = self.write_items();
                    let id = entity.entity_id();
                    if let Some(slot) = items.iter_mut().find(|item| item.entity_id() == id) {
                        *slot = entity;
                    } else {
                        debug!(kind = %T::KIND, %id, "ignoring update for id not in mirror");
                    }
                }
                Err(err) => {
                    warn!(kind = %T::KIND, error = %err, "ignoring undecodable update event");
                }
            },
            ChangeEvent::Delete { old } => match serde_json::from_value::<T>(old) {
                Ok(entity) => {
                    let id = entity.entity_id();
                    self.write_items().retain(|item| item.entity_id() != id);
                }
                Err(err) => {
                    warn!(kind = %T::KIND, error = %err, "ignoring undecodable delete event");
                }
            },
        }

        self.bump();
    }
}

/// A reactive in-memory mirror of one remote entity collection.
///
/// Dropping the collection (or calling [`Self::release`]) tears the
/// subscription down and discards the result of any fetch still in flight.
pub struct RemoteCollection<T: Entity> {
    state: Arc<CollectionState<T>>,
    store: Arc<dyn RemoteStore>,
    notifier: Arc<dyn Notifier>,
    feed_task: JoinHandle<()>,
}

impl<T: Entity> RemoteCollection<T> {
    /// Mount the collection: subscribe to the change feed and start the
    /// initial bulk fetch.
    ///
    /// The subscription is established regardless of how the fetch turns
    /// out; a failed fetch leaves the mirror as it was but realtime events
    /// still arrive.
    pub fn mount(store: Arc<dyn RemoteStore>, notifier: Arc<dyn Notifier>) -> Self {
        let state = Arc::new(CollectionState::new());

        let mut feed = store.subscribe(T::KIND);
        let feed_state = Arc::clone(&state);
        let feed_task = tokio::spawn(async move {
            loop {
                match feed.recv().await {
                    Ok(event) => feed_state.apply_event(event),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(kind = %T::KIND, missed, "change feed lagged, events dropped");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        let fetch_store = Arc::clone(&store);
        let fetch_state = Arc::clone(&state);
        let fetch_notifier = Arc::clone(&notifier);
        tokio::spawn(async move {
            Self::run_fetch(&fetch_store, &fetch_state, &fetch_notifier).await;
        });

        Self {
            state,
            store,
            notifier,
            feed_task,
        }
    }

    /// Run the bulk fetch again, replacing the mirror wholly on success.
    pub async fn refetch(&self) {
        Self::run_fetch(&self.store, &self.state, &self.notifier).await;
    }

    async fn run_fetch(
        store: &Arc<dyn RemoteStore>,
        state: &Arc<CollectionState<T>>,
        notifier: &Arc<dyn Notifier>,
    ) {
        state.loading.store(true, Ordering::SeqCst);

        let fetched = store
            .fetch_all(T::KIND)
            .await
            .map_err(FetchError::Remote)
            .and_then(|rows| {
                rows.into_iter()
                    .map(|row| {
                        serde_json::from_value::<T>(row).map_err(|source| FetchError::Decode {
                            kind: T::KIND,
                            source,
                        })
                    })
                    .collect::<Result<Vec<T>, FetchError>>()
            });

        // The consuming view may have unmounted while the fetch was in
        // flight; its result must not touch the torn-down mirror.
        if state.released() {
            debug!(kind = %T::KIND, "discarding fetch result after release");
            return;
        }

        match fetched {
            Ok(items) => {
                *state.write_items() = items;
                state.set_error(None);
            }
            Err(err) => {
                warn!(kind = %T::KIND, error = %err, "bulk fetch failed");
                state.set_error(Some(err.to_string()));
                notifier.error(&format!("Failed to fetch {}", T::KIND));
            }
        }

        state.loading.store(false, Ordering::SeqCst);
        state.bump();
    }

    /// Snapshot of the mirror.
    #[must_use]
    pub fn items(&self) -> Vec<T> {
        self.state.read_items().clone()
    }

    /// The entity with the given id, if mirrored.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<T> {
        self.state
            .read_items()
            .iter()
            .find(|item| item.entity_id() == id)
            .cloned()
    }

    /// Entities passing the predicate, recomputed from the live mirror.
    #[must_use]
    pub fn filtered(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.state
            .read_items()
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    /// Whether the initial (or a re-run) bulk fetch is in flight.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.state.loading.load(Ordering::SeqCst)
    }

    /// The last fetch failure, if the mirror is in an error state.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state
            .error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// A change signal: the watched counter moves every time the collection
    /// processes a fetch completion or a feed event.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<u64> {
        self.state.version.subscribe()
    }

    /// Create an entity remotely and return the server-confirmed record.
    ///
    /// The mirror is not touched here; the matching feed event updates it.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError`] when the remote write fails or the
    /// server's response does not decode. No retry is attempted.
    pub async fn create<D>(&self, draft: &D) -> Result<T, MutationError>
    where
        D: Serialize + Sync,
    {
        let fields = serde_json::to_value(draft).map_err(MutationError::Decode)?;
        match self.store.insert(T::KIND, fields).await {
            Ok(row) => {
                let entity: T = serde_json::from_value(row)?;
                self.notifier
                    .success(&format!("{} created", capitalize(T::KIND.singular())));
                Ok(entity)
            }
            Err(err) => {
                self.notifier
                    .error(&format!("Failed to create {}", T::KIND.singular()));
                Err(err.into())
            }
        }
    }

    /// Merge a partial patch into the entity with the given id remotely.
    ///
    /// A fresh `updated_at` timestamp is stamped into the patch. The mirror
    /// is not touched here; the matching feed event updates it.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::InvalidPatch`] when the patch is not a JSON
    /// object, and [`MutationError`] when the remote write fails.
    pub async fn update(&self, id: Uuid, patch: Value) -> Result<T, MutationError> {
        let Value::Object(mut patch) = patch else {
            return Err(MutationError::InvalidPatch);
        };
        patch.insert("updated_at".to_owned(), json!(Utc::now()));

        match self.store.update(T::KIND, id, Value::Object(patch)).await {
            Ok(row) => {
                let entity: T = serde_json::from_value(row)?;
                self.notifier
                    .success(&format!("{} updated", capitalize(T::KIND.singular())));
                Ok(entity)
            }
            Err(err) => {
                self.notifier
                    .error(&format!("Failed to update {}", T::KIND.singular()));
                Err(err.into())
            }
        }
    }

    /// Delete the entity with the given id remotely.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError`] when the remote write fails.
    pub async fn delete(&self, id: Uuid) -> Result<(), MutationError> {
        match self.store.delete(T::KIND, id).await {
            Ok(()) => {
                self.notifier
                    .success(&format!("{} deleted", capitalize(T::KIND.singular())));
                Ok(())
            }
            Err(err) => {
                self.notifier
                    .error(&format!("Failed to delete {}", T::KIND.singular()));
                Err(err.into())
            }
        }
    }

    /// Tear the collection down: stop applying feed events and discard any
    /// fetch still in flight. Idempotent; also runs on drop.
    pub fn release(&self) {
        self.state.released.store(true, Ordering::SeqCst);
        self.feed_task.abort();
    }
}

impl<T: Entity> Drop for RemoteCollection<T> {
    fn drop(&mut self) {
        self.release();
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}
