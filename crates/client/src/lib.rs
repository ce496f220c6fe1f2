//! Tamarind Client - Reactive state caches.
//!
//! This crate is the state-synchronization layer behind the storefront and
//! the admin console. It owns three caches:
//!
//! - [`cart::LocalCart`] - the shopping cart, local-only, persisted to
//!   durable storage and rehydrated once per session
//! - [`collection::ProductCatalog`] - an in-memory mirror of the remote
//!   product collection
//! - [`collection::OrderBook`] - the same mirror pattern applied to orders
//!
//! The two remote mirrors are instantiations of one reusable design,
//! [`collection::RemoteCollection`]: a bulk fetch on mount plus a realtime
//! change feed, reconciled into the mirror in arrival order.
//!
//! # Architecture
//!
//! The remote store and its change feed are injected through the
//! [`remote::RemoteStore`] trait, never reached as ambient globals, so every
//! cache is testable against the bundled [`remote::MemoryStore`]. User-visible
//! confirmations go through the [`notify::Notifier`] seam; presentation of
//! those notifications lives elsewhere.
//!
//! Callers must not assume a local write is visible in a mirror the moment
//! the call resolves: mirrors converge when the matching change-feed event
//! arrives.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod collection;
pub mod error;
pub mod notify;
pub mod remote;

#[cfg(test)]
mod testutil;

pub use cart::{CartStorage, FileStorage, LocalCart, MemoryStorage, PersistenceError};
pub use checkout::{CheckoutDetails, place_order};
pub use collection::{Entity, InsertPosition, OrderBook, ProductCatalog, RemoteCollection};
pub use error::{CheckoutError, FetchError, MutationError};
pub use notify::{Notification, Notifier, RecordingNotifier, TracingNotifier};
pub use remote::{ChangeEvent, EntityKind, MemoryStore, RemoteError, RemoteStore};
