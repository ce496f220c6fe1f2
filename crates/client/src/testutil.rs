//! Shared fixtures for unit tests.

use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tamarind_core::{Email, NewOrder, NewProduct, OrderStatus, Product, ProductId, UserId};
use uuid::Uuid;

/// Poll until the condition holds, panicking after two seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

/// A product with the given name and whole-unit price.
pub fn product(name: &str, price: i64) -> Product {
    Product {
        id: ProductId::new(Uuid::new_v4()),
        name: name.to_owned(),
        description: format!("{name} description"),
        price: Decimal::from(price),
        original_price: None,
        shipping_charges: None,
        image_url: format!("https://cdn.example.com/{name}.jpg"),
        category: "apparel".to_owned(),
        sizes: vec!["S".to_owned(), "M".to_owned(), "L".to_owned()],
        colors: vec!["black".to_owned(), "ecru".to_owned()],
        in_stock: true,
        rating: 4.2,
        reviews: 7,
        tags: vec![],
        featured: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// A product draft with the given name and whole-unit price.
pub fn new_product(name: &str, price: i64) -> NewProduct {
    NewProduct {
        name: name.to_owned(),
        description: format!("{name} description"),
        price: Decimal::from(price),
        original_price: None,
        shipping_charges: None,
        image_url: format!("https://cdn.example.com/{name}.jpg"),
        category: "apparel".to_owned(),
        sizes: vec!["S".to_owned(), "M".to_owned(), "L".to_owned()],
        colors: vec!["black".to_owned(), "ecru".to_owned()],
        in_stock: true,
        rating: 4.2,
        reviews: 7,
        tags: vec![],
        featured: false,
    }
}

/// An order draft for the given customer with a whole-unit amount.
pub fn new_order(customer_name: &str, amount: i64) -> NewOrder {
    let local = customer_name
        .split_whitespace()
        .next()
        .unwrap_or("customer")
        .to_lowercase();
    NewOrder {
        user_id: UserId::new(Uuid::new_v4()),
        customer_name: customer_name.to_owned(),
        email: Email::parse(&format!("{local}@example.com")).expect("fixture email is valid"),
        phone: "+1 555 0100".to_owned(),
        address: "42 Harbor Lane".to_owned(),
        payment_method: "card".to_owned(),
        amount: Decimal::from(amount),
        status: OrderStatus::Pending,
        items: vec![],
    }
}
