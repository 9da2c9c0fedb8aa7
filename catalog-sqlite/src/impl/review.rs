use super::{fetch_document, store_document};
use crate::Db;
use catalog_core::{
    models::{
        Product, Review, ReviewPatch, ReviewSelector, Sku, UpdateOutcome, apply_review_update,
    },
    ports::ReviewRepository,
};
use sqlx::types::Json;

impl ReviewRepository for Db {
    async fn add_review(&self, sku: &Sku, review: Review) -> Result<Option<Product>, Self::Error> {
        // `$.reviews[#]` addresses one past the last element, i.e. an append
        let document = sqlx::query_scalar::<_, Json<Product>>(
            r#"
            update
                product
            set
                document = jsonb_insert(document, '$.reviews[#]', json($2))
            where
                sku = $1
            returning
                json(document)
            "#,
        )
        .bind(sku.as_str())
        .bind(Json(&review))
        .fetch_optional(&self.writer)
        .await?;

        Ok(document.map(|Json(product)| product))
    }

    async fn update_reviews(
        &self,
        sku: &Sku,
        selector: &ReviewSelector,
        patch: &ReviewPatch,
    ) -> Result<UpdateOutcome<Product>, Self::Error> {
        // The single writer connection serializes this transaction against
        // every other write, so the match and the merge see the same document.
        let mut tx = self.writer.begin().await?;

        let Some(mut product) = fetch_document(&mut tx, sku).await? else {
            return Ok(UpdateOutcome::unmatched());
        };

        let elements = apply_review_update(&mut product.reviews, selector, patch);
        let modified = elements.modified > 0;
        if modified {
            store_document(&mut tx, &product).await?;
        }

        tx.commit().await?;

        Ok(UpdateOutcome {
            matched_count: 1,
            modified_count: u64::from(modified),
            elements,
            document: Some(product),
        })
    }
}
