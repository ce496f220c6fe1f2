//! Cart line item.
//!
//! Cart contents are owned by the browser session, never by the remote
//! store. A line is identified by product plus variant selection: the same
//! product in two sizes is two distinct lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;

/// The identity key distinguishing cart lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product_id: ProductId,
    pub selected_size: Option<String>,
    pub selected_color: Option<String>,
}

/// One entry in the shopping cart.
///
/// Invariant: `quantity >= 1`. A line whose quantity would drop to zero is
/// removed from the cart, never retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
    #[serde(default)]
    pub selected_size: Option<String>,
    #[serde(default)]
    pub selected_color: Option<String>,
}

impl CartLine {
    /// The identity key for this line.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product.id,
            selected_size: self.selected_size.clone(),
            selected_color: self.selected_color.clone(),
        }
    }

    /// Whether this line matches the given identity key components.
    #[must_use]
    pub fn matches(
        &self,
        product_id: ProductId,
        selected_size: Option<&str>,
        selected_color: Option<&str>,
    ) -> bool {
        self.product.id == product_id
            && self.selected_size.as_deref() == selected_size
            && self.selected_color.as_deref() == selected_color
    }

    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}
