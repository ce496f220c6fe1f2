//! Tamarind Core - Shared types library.
//!
//! This crate provides the domain types used across all Tamarind components:
//! - `client` - Reactive state caches (cart, product catalog, order book)
//! - `cli` - Command-line demo and seeding tools
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no network clients, no
//! persistence. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, entities, statuses, and the cart line

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
