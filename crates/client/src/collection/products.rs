//! The product catalog mirror.

use tamarind_core::Product;
use uuid::Uuid;

use super::{Entity, InsertPosition, RemoteCollection};
use crate::remote::EntityKind;

impl Entity for Product {
    const KIND: EntityKind = EntityKind::Products;
    const INSERT_POSITION: InsertPosition = InsertPosition::Append;

    fn entity_id(&self) -> Uuid {
        self.id.as_uuid()
    }
}

/// The storefront's mirrored product collection.
pub type ProductCatalog = RemoteCollection<Product>;

impl RemoteCollection<Product> {
    /// Products flagged for the home page.
    #[must_use]
    pub fn featured(&self) -> Vec<Product> {
        self.filtered(|product| product.featured)
    }

    /// Products in the given category.
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<Product> {
        self.filtered(|product| product.category == category)
    }

    /// Products matching a free-text query across name and description.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Product> {
        self.filtered(|product| product.matches_search(query))
    }
}
