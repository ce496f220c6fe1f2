//! Product entity.
//!
//! Products are remote-owned: they are created, edited, and deleted through
//! the remote store only, and the client keeps a read-mostly mirror of them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A catalog product as stored remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    /// Pre-discount price, shown struck through when present.
    #[serde(default)]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub shipping_charges: Option<Decimal>,
    pub image_url: String,
    pub category: String,
    /// Available sizes, in display order.
    pub sizes: Vec<String>,
    /// Available colors, in display order.
    pub colors: Vec<String>,
    pub in_stock: bool,
    /// Average review rating in `0.0..=5.0`.
    pub rating: f64,
    /// Number of reviews behind the rating.
    pub reviews: u32,
    pub tags: Vec<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Case-insensitive free-text match across name and description.
    #[must_use]
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

/// Fields for creating a product.
///
/// The remote store assigns `id`, `created_at`, and `updated_at` on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub shipping_charges: Option<Decimal>,
    pub image_url: String,
    pub category: String,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub in_stock: bool,
    pub rating: f64,
    pub reviews: u32,
    pub tags: Vec<String>,
    pub featured: bool,
}
