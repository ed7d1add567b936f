//! Seed catalog for the storefront.
//!
//! The shop sells a fixed set of products. IDs are pinned so that repeated
//! seeding (CLI `seed` command, in-memory store construction, test fixtures)
//! always produces the same rows and cart payloads stay valid across
//! restarts.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::uuid;

use marigold_core::ProductId;

use crate::models::Product;

/// A catalog row before it is stamped with timestamps.
pub struct CatalogEntry {
    pub id: ProductId,
    pub name: &'static str,
    pub description: &'static str,
    /// Unit price in cents.
    pub price_cents: i64,
    pub image: &'static str,
    pub category: &'static str,
}

/// Every product the shop sells.
pub const CATALOG: [CatalogEntry; 8] = [
    CatalogEntry {
        id: ProductId::new(uuid!("5de3e229-22f1-4a83-9e31-1f44d0f0b4fe")),
        name: "Wireless Noise Cancelling Headphones",
        description: "Premium wireless headphones with active noise cancellation.",
        price_cents: 249_99,
        image: "/images/products/headphones.jpg",
        category: "Electronics",
    },
    CatalogEntry {
        id: ProductId::new(uuid!("a17c7c67-4f5c-4e0e-8e9a-6c2f1b3d5a70")),
        name: "Premium Leather Backpack",
        description: "Handcrafted leather backpack with multiple compartments.",
        price_cents: 129_99,
        image: "/images/products/backpack.jpg",
        category: "Fashion",
    },
    CatalogEntry {
        id: ProductId::new(uuid!("3f9b2d7e-95d0-4b5b-b6a3-815f3a9ce923")),
        name: "Smart Fitness Tracker",
        description: "Track your fitness goals with this advanced smart tracker.",
        price_cents: 99_99,
        image: "/images/products/fitness-tracker.jpg",
        category: "Wearables",
    },
    CatalogEntry {
        id: ProductId::new(uuid!("c4dd4712-3f3a-4f0a-9c6b-22e09e9b2cb1")),
        name: "Organic Cotton T-shirt",
        description: "Comfortable and eco-friendly cotton t-shirt.",
        price_cents: 29_99,
        image: "/images/products/tshirt.jpg",
        category: "Clothing",
    },
    CatalogEntry {
        id: ProductId::new(uuid!("88a9a6c8-2f2e-4c21-a7d4-51c0e0f6d3b9")),
        name: "Stainless Steel Water Bottle",
        description: "Double-walled insulated water bottle that keeps drinks cold for 24 hours.",
        price_cents: 24_99,
        image: "/images/products/water-bottle.jpg",
        category: "Home & Kitchen",
    },
    CatalogEntry {
        id: ProductId::new(uuid!("e3b6d0e7-6a4f-4d57-8c0d-9f1e2a3b4c5d")),
        name: "Wireless Bluetooth Speaker",
        description: "Portable speaker with rich sound and long battery life.",
        price_cents: 79_99,
        image: "/images/products/speaker.jpg",
        category: "Electronics",
    },
    CatalogEntry {
        id: ProductId::new(uuid!("7d1f60b2-c3f1-4ad0-b7c9-d8e4f0a1b2c3")),
        name: "Ceramic Coffee Mug Set",
        description: "Set of 4 handcrafted ceramic coffee mugs.",
        price_cents: 34_99,
        image: "/images/products/mugs.jpg",
        category: "Home & Kitchen",
    },
    CatalogEntry {
        id: ProductId::new(uuid!("19c8e5d4-7b6a-4e88-a1b2-c3d4e5f6a7b8")),
        name: "Yoga Mat",
        description: "Non-slip yoga mat made from eco-friendly materials.",
        price_cents: 45_99,
        image: "/images/products/yoga-mat.jpg",
        category: "Fitness",
    },
];

/// Materialize the catalog as product rows stamped with the current time.
#[must_use]
pub fn products() -> Vec<Product> {
    let now = Utc::now();
    CATALOG
        .iter()
        .map(|entry| Product {
            id: entry.id,
            name: entry.name.to_owned(),
            description: entry.description.to_owned(),
            price: Decimal::new(entry.price_cents, 2),
            image: entry.image.to_owned(),
            category: entry.category.to_owned(),
            created_at: now,
            updated_at: now,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_catalog_ids_are_distinct() {
        let ids: HashSet<_> = CATALOG.iter().map(|entry| entry.id).collect();
        assert_eq!(ids.len(), CATALOG.len());
    }

    #[test]
    fn test_products_carry_two_decimal_prices() {
        for product in products() {
            assert_eq!(product.price.scale(), 2, "{}", product.name);
            assert!(product.price > Decimal::ZERO, "{}", product.name);
        }
    }

    #[test]
    fn test_headphones_price() {
        let products = products();
        let headphones = products
            .iter()
            .find(|p| p.name == "Wireless Noise Cancelling Headphones")
            .unwrap();
        assert_eq!(headphones.price.to_string(), "249.99");
    }
}
