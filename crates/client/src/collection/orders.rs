//! The order book mirror.
//!
//! Orders display newest-first, so feed inserts are prepended to match the
//! fetch ordering. After creation the only mutation an order sees is a
//! status change.

use serde_json::json;
use tamarind_core::{Order, OrderId, OrderStatus};
use uuid::Uuid;

use super::{Entity, InsertPosition, RemoteCollection};
use crate::error::MutationError;
use crate::remote::EntityKind;

impl Entity for Order {
    const KIND: EntityKind = EntityKind::Orders;
    const INSERT_POSITION: InsertPosition = InsertPosition::Prepend;

    fn entity_id(&self) -> Uuid {
        self.id.as_uuid()
    }
}

/// The admin console's mirrored order collection.
pub type OrderBook = RemoteCollection<Order>;

impl RemoteCollection<Order> {
    /// Orders currently in the given status.
    #[must_use]
    pub fn by_status(&self, status: OrderStatus) -> Vec<Order> {
        self.filtered(|order| order.status == status)
    }

    /// Orders matching a free-text query across customer name, email, and
    /// id.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Order> {
        self.filtered(|order| order.matches_search(query))
    }

    /// Move an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError`] when the remote write fails.
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, MutationError> {
        self.update(id.as_uuid(), json!({ "status": status })).await
    }
}
