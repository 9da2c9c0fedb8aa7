use catalog_core::ReviewEngine;
use catalog_sqlite::{Db, config::SqliteConfig, seed::sample_products};

/// Open a fresh in-memory database loaded with the sample products.
pub async fn seeded() -> anyhow::Result<ReviewEngine<Db>> {
    let db = Db::open(&SqliteConfig::default()).await?;
    db.reseed(&sample_products()).await?;
    Ok(ReviewEngine::new(db))
}

/// The stored document for `sku`, exactly as persisted.
#[allow(dead_code)]
pub async fn raw_document(db: &Db, sku: &str) -> anyhow::Result<Option<String>> {
    let raw = sqlx::query_scalar::<_, String>("select json(document) from product where sku = $1")
        .bind(sku)
        .fetch_optional(&db.reader)
        .await?;
    Ok(raw)
}
