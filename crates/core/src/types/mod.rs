//! Core types for Tamarind.
//!
//! This module provides the domain model shared by the storefront-facing
//! caches: remote-owned entities (products, orders), the locally-owned cart
//! line, and type-safe wrappers for IDs and email addresses.

pub mod cart;
pub mod email;
pub mod id;
pub mod order;
pub mod product;

pub use cart::{CartLine, LineKey};
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{NewOrder, Order, OrderItem, OrderStatus};
pub use product::{NewProduct, Product};
