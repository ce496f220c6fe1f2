//! The shopping cart cache.
//!
//! The cart is the only cache with durable local persistence and the only
//! one with no remote source: the browser session owns it outright. Lines
//! merge by identity key (product plus variant selection), and every
//! mutation rewrites the whole persisted document so a reload always
//! rehydrates the latest state.

mod storage;

pub use storage::{CART_STORAGE_KEY, CartStorage, FileStorage, MemoryStorage, PersistenceError};

use std::sync::Arc;

use rust_decimal::Decimal;
use tamarind_core::{CartLine, Product, ProductId};
use tracing::warn;

use crate::notify::Notifier;

/// The authoritative cart for the current session.
pub struct LocalCart {
    items: Vec<CartLine>,
    storage: Box<dyn CartStorage>,
    notifier: Arc<dyn Notifier>,
}

impl LocalCart {
    /// Open the cart, rehydrating it from storage.
    ///
    /// Happens once per session. A corrupt or unreadable persisted document
    /// is logged and discarded; the cart starts empty rather than failing
    /// the caller.
    pub fn open(storage: Box<dyn CartStorage>, notifier: Arc<dyn Notifier>) -> Self {
        let items = match storage.load() {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(items) => items,
                Err(err) => {
                    warn!(error = %err, "discarding corrupt persisted cart");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %err, "could not read persisted cart, starting empty");
                Vec::new()
            }
        };

        Self {
            items,
            storage,
            notifier,
        }
    }

    /// Current cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    /// Add `quantity` of a product with the given variant selection.
    ///
    /// Merges into the existing line when one matches the identity key,
    /// otherwise appends a new line. Quantities below 1 are treated as 1.
    pub fn add_item(
        &mut self,
        product: Product,
        quantity: u32,
        selected_size: Option<String>,
        selected_color: Option<String>,
    ) {
        let quantity = quantity.max(1);
        let existing = self.items.iter_mut().find(|line| {
            line.matches(
                product.id,
                selected_size.as_deref(),
                selected_color.as_deref(),
            )
        });

        if let Some(line) = existing {
            line.quantity += quantity;
            self.notifier.success("Cart updated");
        } else {
            self.items.push(CartLine {
                product,
                quantity,
                selected_size,
                selected_color,
            });
            self.notifier.success("Added to cart");
        }

        self.persist();
    }

    /// Remove the line matching the identity key. A missing line is a
    /// no-op, not an error.
    pub fn remove_item(
        &mut self,
        product_id: ProductId,
        selected_size: Option<&str>,
        selected_color: Option<&str>,
    ) {
        let before = self.items.len();
        self.items
            .retain(|line| !line.matches(product_id, selected_size, selected_color));

        if self.items.len() < before {
            self.notifier.success("Removed from cart");
            self.persist();
        }
    }

    /// Set the quantity of the line matching the identity key.
    ///
    /// A quantity of zero or less removes the line, exactly like
    /// [`Self::remove_item`]. Unmatched lines are left untouched.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        quantity: i64,
        selected_size: Option<&str>,
        selected_color: Option<&str>,
    ) {
        if quantity <= 0 {
            self.remove_item(product_id, selected_size, selected_color);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let line = self
            .items
            .iter_mut()
            .find(|line| line.matches(product_id, selected_size, selected_color));

        if let Some(line) = line {
            line.quantity = quantity;
            self.persist();
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.notifier.success("Cart cleared");
        self.persist();
    }

    /// Sum of `price * quantity` over all lines, recomputed from scratch.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Rewrite the whole persisted document from the current lines.
    ///
    /// A save failure is logged; the in-memory cart stays authoritative for
    /// the rest of the session.
    fn persist(&self) {
        let raw = match serde_json::to_string(&self.items) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "could not serialize cart");
                return;
            }
        };

        if let Err(err) = self.storage.save(&raw) {
            warn!(error = %err, "could not persist cart");
        }
    }
}
