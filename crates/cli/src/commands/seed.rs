//! Catalog seeding command.
//!
//! Inserts a small starter catalog (electronics, fashion, home) so a
//! fresh install has something to browse. A non-empty catalog is left
//! untouched, so the command is safe to run twice.

use clementine_api::db::{NewProduct, ProductRepository};
use clementine_core::Price;

use super::CommandError;

/// name, description, price in cents, category, stock, image URL
type SeedRow = (&'static str, &'static str, i64, &'static str, i64, &'static str);

const STARTER_CATALOG: &[SeedRow] = &[
    // Electronics
    (
        "Smartphone X",
        "Latest flagship smartphone with amazing camera.",
        99_999,
        "Electronics",
        50,
        "https://images.unsplash.com/photo-1511707171634-5f897ff02aa9?w=500&auto=format&fit=crop&q=60",
    ),
    (
        "Laptop Pro",
        "High performance laptop for professionals.",
        149_999,
        "Electronics",
        30,
        "https://images.unsplash.com/photo-1496181133206-80ce9b88a853?w=500&auto=format&fit=crop&q=60",
    ),
    (
        "Wireless Earbuds",
        "Noise cancelling earbuds.",
        19_999,
        "Electronics",
        100,
        "https://images.unsplash.com/photo-1590658268037-6bf12165a8df?w=500&auto=format&fit=crop&q=60",
    ),
    (
        "Smart Watch",
        "Track your fitness and health.",
        29_999,
        "Electronics",
        45,
        "https://images.unsplash.com/photo-1544117519-31a4b719223d?w=500&auto=format&fit=crop&q=60",
    ),
    (
        "4K Monitor",
        "Ultra HD monitor for crisp visuals.",
        39_999,
        "Electronics",
        20,
        "https://images.unsplash.com/photo-1527443224154-c4a3942d3acf?w=500&auto=format&fit=crop&q=60",
    ),
    // Fashion
    (
        "Leather Jacket",
        "Genuine leather jacket, stylish and warm.",
        19_999,
        "Fashion",
        15,
        "https://images.unsplash.com/photo-1551028919-ac7bcb7d7162?w=500&auto=format&fit=crop&q=60",
    ),
    (
        "Denim Jeans",
        "Classic fit denim jeans.",
        4_999,
        "Fashion",
        60,
        "https://images.unsplash.com/photo-1542272617-0858607c2242?w=500&auto=format&fit=crop&q=60",
    ),
    (
        "Sneakers",
        "Comfortable running shoes.",
        8_999,
        "Fashion",
        40,
        "https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=500&auto=format&fit=crop&q=60",
    ),
    (
        "Classic T-Shirt",
        "Cotton crew neck t-shirt.",
        2_499,
        "Fashion",
        100,
        "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?w=500&auto=format&fit=crop&q=60",
    ),
    (
        "Sunglasses",
        "UV protection sunglasses.",
        12_999,
        "Fashion",
        25,
        "https://images.unsplash.com/photo-1511499767150-a48a237f0083?w=500&auto=format&fit=crop&q=60",
    ),
    // Home
    (
        "Coffee Maker",
        "Brew the perfect cup every morning.",
        7_999,
        "Home",
        30,
        "https://images.unsplash.com/photo-1517668808822-9ebb02f2a0e6?w=500&auto=format&fit=crop&q=60",
    ),
    (
        "Throw Pillow",
        "Soft and decorative pillow.",
        1_999,
        "Home",
        50,
        "https://images.unsplash.com/photo-1584100936595-f06ee2b4146c?w=500&auto=format&fit=crop&q=60",
    ),
    (
        "Desk Lamp",
        "Adjustable LED desk lamp.",
        3_499,
        "Home",
        40,
        "https://images.unsplash.com/photo-1507473888900-52a10b546dbd?w=500&auto=format&fit=crop&q=60",
    ),
    (
        "Plant Pot",
        "Ceramic pot for indoor plants.",
        1_499,
        "Home",
        60,
        "https://images.unsplash.com/photo-1485955900006-10f4d324d411?w=500&auto=format&fit=crop&q=60",
    ),
    (
        "Wall Clock",
        "Modern minimalist wall clock.",
        2_999,
        "Home",
        20,
        "https://images.unsplash.com/photo-1563861826100-9cb868c62586?w=500&auto=format&fit=crop&q=60",
    ),
];

/// Seed the catalog with the starter products.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset, the connection fails, or
/// an insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;
    let products = ProductRepository::new(&pool);

    if !products.list().await?.is_empty() {
        tracing::info!("Catalog is not empty, skipping seed");
        return Ok(());
    }

    for &(name, description, cents, category, stock, image_url) in STARTER_CATALOG {
        let price = Price::from_cents(cents)
            .map_err(|e| CommandError::InvalidSeedPrice(name, e))?;
        products
            .create(&NewProduct {
                name: name.to_owned(),
                description: description.to_owned(),
                price,
                category: category.to_owned(),
                stock,
                image_url: Some(image_url.to_owned()),
            })
            .await?;
    }

    tracing::info!("Seeded {} products", STARTER_CATALOG.len());
    Ok(())
}
