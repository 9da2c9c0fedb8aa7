use super::{fetch_document, store_document};
use crate::Db;
use catalog_core::{
    models::{Product, ProductFailure, ProductPatch, Sku},
    ports::ProductRepository,
};
use sqlx::types::Json;

impl ProductRepository for Db {
    async fn create_product(
        &self,
        product: Product,
    ) -> Result<Result<Product, ProductFailure>, Self::Error> {
        let inserted = sqlx::query(
            r#"
            insert into
                product (sku, document)
            values
                ($1, jsonb($2))
            on conflict
                do nothing
            "#,
        )
        .bind(product.sku.as_str())
        .bind(Json(&product))
        .execute(&self.writer)
        .await?
        .rows_affected();

        if inserted == 0 {
            Ok(Err(ProductFailure::SkuConflict(product.sku)))
        } else {
            Ok(Ok(product))
        }
    }

    async fn get_product(&self, sku: &Sku) -> Result<Option<Product>, Self::Error> {
        let mut conn = self.reader.acquire().await?;
        fetch_document(&mut conn, sku).await
    }

    async fn product_exists(&self, sku: &Sku) -> Result<bool, Self::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            select exists (
                select 1 from product where sku = $1
            )
            "#,
        )
        .bind(sku.as_str())
        .fetch_one(&self.reader)
        .await
    }

    async fn list_products(&self) -> Result<Vec<Product>, Self::Error> {
        let documents = sqlx::query_scalar::<_, Json<Product>>(
            r#"
            select
                json(document)
            from
                product
            order by
                rowid
            "#,
        )
        .fetch_all(&self.reader)
        .await?;

        Ok(documents.into_iter().map(|Json(product)| product).collect())
    }

    async fn update_product(
        &self,
        sku: &Sku,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, Self::Error> {
        let mut tx = self.writer.begin().await?;

        let Some(mut product) = fetch_document(&mut tx, sku).await? else {
            return Ok(None);
        };
        if product.merge(patch) {
            store_document(&mut tx, &product).await?;
        }

        tx.commit().await?;
        Ok(Some(product))
    }

    async fn delete_product(&self, sku: &Sku) -> Result<bool, Self::Error> {
        let deleted = sqlx::query(
            r#"
            delete from
                product
            where
                sku = $1
            "#,
        )
        .bind(sku.as_str())
        .execute(&self.writer)
        .await?
        .rows_affected();

        Ok(deleted > 0)
    }
}
