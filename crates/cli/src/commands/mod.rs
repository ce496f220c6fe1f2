//! CLI subcommands.

pub mod demo;
pub mod seed;

use rust_decimal::Decimal;
use tamarind_core::NewProduct;

/// Sample catalog used by both subcommands.
#[must_use]
pub fn sample_products() -> Vec<NewProduct> {
    let entries: [(&str, &str, &str, i64, bool); 5] = [
        (
            "Linen Overshirt",
            "Relaxed fit, garment washed",
            "shirts",
            65,
            true,
        ),
        ("Wool Beanie", "Ribbed knit", "accessories", 25, false),
        (
            "Canvas Tote",
            "Heavy 16oz cotton canvas",
            "accessories",
            30,
            false,
        ),
        (
            "Selvedge Jeans",
            "14oz raw denim, tapered",
            "trousers",
            140,
            true,
        ),
        ("Oxford Shirt", "Button-down collar", "shirts", 80, false),
    ];

    entries
        .into_iter()
        .map(|(name, description, category, price, featured)| NewProduct {
            name: name.to_owned(),
            description: description.to_owned(),
            price: Decimal::from(price),
            original_price: None,
            shipping_charges: None,
            image_url: format!(
                "https://cdn.example.com/{}.jpg",
                name.to_lowercase().replace(' ', "-")
            ),
            category: category.to_owned(),
            sizes: vec!["S".to_owned(), "M".to_owned(), "L".to_owned()],
            colors: vec!["black".to_owned(), "ecru".to_owned()],
            in_stock: true,
            rating: 4.5,
            reviews: 12,
            tags: vec![category.to_owned()],
            featured,
        })
        .collect()
}
