//! Remote store interface.
//!
//! The persistent store and its realtime transport live on the other side of
//! this boundary. The client only assumes:
//!
//! - a bulk query per entity kind, ordered newest-first
//! - row-level insert/update/delete, with the server assigning IDs and
//!   timestamps
//! - a change feed broadcasting one event per committed row change
//!
//! Rows and event payloads cross the boundary as loosely-typed
//! [`serde_json::Value`]s, the way a hosted store's client SDK delivers
//! them. Consumers decode into typed entities and fail closed on bad
//! payloads.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

/// The entity collections the store serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Products,
    Orders,
}

impl EntityKind {
    /// Remote table name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Orders => "orders",
        }
    }

    /// Singular label for user-facing messages.
    #[must_use]
    pub const fn singular(self) -> &'static str {
        match self {
            Self::Products => "product",
            Self::Orders => "order",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One change-feed event for a single row.
///
/// Insert and update carry the row's new value, delete carries the old one.
/// Payloads are loosely typed; the consumer decodes them.
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    Insert { new: Value },
    Update { new: Value },
    Delete { old: Value },
}

/// Errors returned by the remote store.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The transport failed before the store answered.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The store rejected the query or write.
    #[error("query failed: {0}")]
    Query(String),

    /// The addressed row does not exist.
    #[error("no {kind} row with id {id}")]
    NotFound { kind: EntityKind, id: Uuid },
}

/// The remote persistent store with a realtime change feed.
///
/// All operations are single-attempt: no retry or timeout policy is applied
/// here, callers decide what a failure means.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch every row of a collection, ordered by `created_at` descending.
    async fn fetch_all(&self, kind: EntityKind) -> Result<Vec<Value>, RemoteError>;

    /// Insert a row. The store assigns `id`, `created_at`, and `updated_at`
    /// and returns the completed row.
    async fn insert(&self, kind: EntityKind, fields: Value) -> Result<Value, RemoteError>;

    /// Merge a partial patch into the row with the given id and return the
    /// updated row.
    async fn update(&self, kind: EntityKind, id: Uuid, patch: Value) -> Result<Value, RemoteError>;

    /// Delete the row with the given id.
    async fn delete(&self, kind: EntityKind, id: Uuid) -> Result<(), RemoteError>;

    /// Subscribe to the change feed for a collection.
    ///
    /// Dropping the receiver is unsubscription; delivery stops with it.
    fn subscribe(&self, kind: EntityKind) -> broadcast::Receiver<ChangeEvent>;
}
