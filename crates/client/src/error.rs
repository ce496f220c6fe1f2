//! Error taxonomy for the state caches.
//!
//! Three failure classes with different audiences:
//!
//! - [`crate::cart::PersistenceError`] - corrupt or unreadable local
//!   storage; recovered inside the cart by resetting to empty, never
//!   propagated to callers
//! - [`FetchError`] - the initial bulk load failed; recorded as the
//!   collection's error state and shown to the user, but does not prevent
//!   later realtime updates from arriving
//! - [`MutationError`] - a remote write failed; surfaced to the user and
//!   returned to the caller, who decides whether to retry or abandon

use thiserror::Error;

use crate::remote::{EntityKind, RemoteError};

/// The initial bulk fetch of a collection failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote query failed.
    #[error("fetch failed: {0}")]
    Remote(#[from] RemoteError),

    /// A fetched row did not decode into the entity type.
    #[error("could not decode fetched {kind} row: {source}")]
    Decode {
        kind: EntityKind,
        #[source]
        source: serde_json::Error,
    },
}

/// A create/update/delete remote call failed.
///
/// The mirror was never optimistically updated, so there is nothing to roll
/// back. No automatic retry is attempted.
#[derive(Debug, Error)]
pub enum MutationError {
    /// The remote write failed.
    #[error("remote write failed: {0}")]
    Remote(#[from] RemoteError),

    /// The server-confirmed record did not decode into the entity type.
    #[error("could not decode server response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The caller-supplied patch was not a JSON object.
    #[error("update patch must be a JSON object")]
    InvalidPatch,
}

/// Placing an order failed.
///
/// Order creation and the subsequent cart clear are independent steps: a
/// creation failure leaves the cart untouched, and clearing the cart cannot
/// fail the checkout (cart persistence errors are absorbed locally).
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("cannot place an order from an empty cart")]
    EmptyCart,

    /// Creating the order remotely failed.
    #[error("order creation failed: {0}")]
    Order(#[from] MutationError),
}
