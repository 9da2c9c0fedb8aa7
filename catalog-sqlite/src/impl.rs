//! Repository trait implementations for the SQLite database.
//!
//! This module contains the implementations of all repository traits defined in
//! `catalog-core` for the SQLite document store.

use crate::Db;
use catalog_core::{
    models::{Product, Sku},
    ports::Repository,
};
use sqlx::{SqliteConnection, types::Json};

mod product;
mod review;

impl Repository for Db {
    type Error = sqlx::Error;
}

/// Read a product document through `conn`.
async fn fetch_document(
    conn: &mut SqliteConnection,
    sku: &Sku,
) -> Result<Option<Product>, sqlx::Error> {
    let document = sqlx::query_scalar::<_, Json<Product>>(
        r#"
        select
            json(document)
        from
            product
        where
            sku = $1
        "#,
    )
    .bind(sku.as_str())
    .fetch_optional(conn)
    .await?;

    Ok(document.map(|Json(product)| product))
}

/// Overwrite a product document through `conn`.
async fn store_document(conn: &mut SqliteConnection, product: &Product) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        update
            product
        set
            document = jsonb($2)
        where
            sku = $1
        "#,
    )
    .bind(product.sku.as_str())
    .bind(Json(product))
    .execute(conn)
    .await?;

    Ok(())
}
