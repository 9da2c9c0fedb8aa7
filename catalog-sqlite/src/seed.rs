//! Sample catalog data.
//!
//! This module provides a small, fixed set of products for development and
//! demonstration, and the means to (re)load it into a database.

use crate::Db;
use catalog_core::models::{DateTime, FieldMap, Product, Review};
use rust_decimal::Decimal;
use sqlx::types::Json;
use tracing::{Level, event};

fn review(
    review_id: &str,
    user_id: &str,
    rating: u8,
    comment: &str,
    verified: bool,
    created_at: DateTime,
) -> Review {
    Review {
        review_id: review_id.to_owned(),
        user_id: Some(user_id.to_owned()),
        author: None,
        rating,
        comment: Some(comment.to_owned()),
        verified: Some(verified),
        created_at,
        extra: FieldMap::default(),
    }
}

fn product(sku: &str, name: &str, cents: i64, tags: [&str; 2], reviews: Vec<Review>) -> Product {
    Product {
        sku: sku.into(),
        name: name.to_owned(),
        price: Decimal::new(cents, 2),
        category: None,
        tags: tags.iter().map(|&tag| tag.to_owned()).collect(),
        reviews,
    }
}

/// The sample products: three with reviews, and `SKU1004` with none.
pub fn sample_products() -> Vec<Product> {
    let now = DateTime::now();
    vec![
        product(
            "SKU1001",
            "Wireless Headphones",
            12999,
            ["audio", "bluetooth"],
            vec![
                review(
                    "r1001-1",
                    "u100",
                    5,
                    "Excellent sound and battery life!",
                    true,
                    now,
                ),
                review(
                    "r1001-2",
                    "u101",
                    4,
                    "Great overall, a bit tight on the ears.",
                    true,
                    now,
                ),
            ],
        ),
        product(
            "SKU1002",
            "Mechanical Keyboard",
            8999,
            ["peripherals", "keyboard"],
            vec![review(
                "r1002-1",
                "u102",
                5,
                "Amazing typing feel.",
                false,
                now,
            )],
        ),
        product(
            "SKU1003",
            "4K Monitor",
            32999,
            ["display", "monitor"],
            vec![review(
                "r1003-1",
                "u103",
                3,
                "Good picture, but the stand is wobbly.",
                true,
                now,
            )],
        ),
        product(
            "SKU1004",
            "USB-C Docking Station",
            7499,
            ["peripherals", "dock"],
            Vec::new(),
        ),
    ]
}

impl Db {
    /// Replace the entire contents of the catalog with `products`.
    ///
    /// Runs as one transaction: either every existing product is removed and
    /// every given product inserted, or nothing changes.
    ///
    /// # Returns
    ///
    /// The number of products inserted.
    pub async fn reseed(&self, products: &[Product]) -> Result<usize, sqlx::Error> {
        let mut tx = self.writer.begin().await?;

        let removed = sqlx::query("delete from product")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        event!(Level::INFO, removed, "cleared product collection");

        for product in products {
            sqlx::query(
                r#"
                insert into
                    product (sku, document)
                values
                    ($1, jsonb($2))
                "#,
            )
            .bind(product.sku.as_str())
            .bind(Json(product))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(products.len())
    }
}
