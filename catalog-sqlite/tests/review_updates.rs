mod common;

use catalog_core::{
    NoChangeCause, ReviewFailure,
    models::{ReviewFilter, ReviewPatch, ReviewSelector, Sku},
    ports::{ProductRepository as _, ReviewRepository as _},
};
use common::{raw_document, seeded};
use serde_json::json;

fn rating(value: u8) -> ReviewPatch {
    ReviewPatch {
        rating: Some(Some(value)),
        ..Default::default()
    }
}

fn verified(value: bool) -> ReviewFilter {
    ReviewFilter {
        verified: Some(Some(value)),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_update_by_key_changes_one_review() -> anyhow::Result<()> {
    let engine = seeded().await?;
    let sku = Sku::from("SKU1001");

    let product = engine
        .update_review_by_key(&sku, "r1001-2", rating(5))
        .await??;

    let ids: Vec<&str> = product.reviews.iter().map(|r| r.review_id.as_str()).collect();
    assert_eq!(ids, vec!["r1001-1", "r1001-2"]);
    assert_eq!(product.reviews[0].rating, 5);
    assert_eq!(product.reviews[1].rating, 5);

    // the returned document is what was stored
    let stored = engine.repository().get_product(&sku).await?.unwrap();
    assert_eq!(stored, product);
    Ok(())
}

#[tokio::test]
async fn test_update_by_key_is_isolated() -> anyhow::Result<()> {
    let engine = seeded().await?;
    let sku = Sku::from("SKU1001");
    let before = engine.repository().get_product(&sku).await?.unwrap();

    let patch = ReviewPatch {
        comment: Some(Some("x".into())),
        ..Default::default()
    };
    let after = engine
        .update_review_by_key(&sku, "r1001-1", patch)
        .await??;

    let mut expected = before.clone();
    expected.reviews[0].comment = Some("x".into());
    assert_eq!(after, expected);
    Ok(())
}

#[tokio::test]
async fn test_update_by_key_unknown_review() -> anyhow::Result<()> {
    let engine = seeded().await?;
    let db = engine.repository();
    let before = raw_document(db, "SKU1001").await?;

    let result = engine
        .update_review_by_key(&Sku::from("SKU1001"), "r9999-9", rating(1))
        .await?;
    assert_eq!(
        result,
        Err(ReviewFailure::ReviewNotFound {
            sku: "SKU1001".into(),
            review_id: "r9999-9".into()
        })
    );

    assert_eq!(raw_document(db, "SKU1001").await?, before);
    Ok(())
}

#[tokio::test]
async fn test_update_by_key_unknown_product() -> anyhow::Result<()> {
    let engine = seeded().await?;
    let result = engine
        .update_review_by_key(&Sku::from("SKU9999"), "r1-1", rating(1))
        .await?;
    assert_eq!(result, Err(ReviewFailure::ProductNotFound("SKU9999".into())));
    Ok(())
}

#[tokio::test]
async fn test_update_by_key_is_idempotent() -> anyhow::Result<()> {
    let engine = seeded().await?;
    let db = engine.repository();
    let sku = Sku::from("SKU1002");
    let patch = ReviewPatch {
        comment: Some(Some("Still amazing a year later.".into())),
        ..Default::default()
    };

    engine
        .update_review_by_key(&sku, "r1002-1", patch.clone())
        .await??;
    let first = raw_document(db, "SKU1002").await?;

    // matched but unchanged is still a success for a keyed update
    let second = engine.update_review_by_key(&sku, "r1002-1", patch).await?;
    assert!(second.is_ok());
    assert_eq!(raw_document(db, "SKU1002").await?, first);
    Ok(())
}

#[tokio::test]
async fn test_update_by_key_with_duplicate_ids_updates_first() -> anyhow::Result<()> {
    let engine = seeded().await?;
    let db = engine.repository();
    let sku = Sku::from("SKU1003");

    let duplicate = serde_json::from_value(json!({
        "review_id": "r1003-1",
        "rating": 2,
        "created_at": "2024-06-01T00:00:00Z",
    }))?;
    db.add_review(&sku, duplicate).await?.unwrap();

    let product = engine
        .update_review_by_key(&sku, "r1003-1", rating(4))
        .await??;
    assert_eq!(product.reviews.len(), 2);
    assert_eq!(product.reviews[0].rating, 4);
    assert_eq!(product.reviews[1].rating, 2);
    Ok(())
}

#[tokio::test]
async fn test_update_by_predicate_updates_all_matches() -> anyhow::Result<()> {
    let engine = seeded().await?;
    let db = engine.repository();
    let sku = Sku::from("SKU1001");
    let patch = ReviewPatch {
        verified: Some(Some(false)),
        ..Default::default()
    };

    // the primitive reports how many elements were touched
    let outcome = db
        .update_reviews(&sku, &ReviewSelector::All(verified(true)), &patch)
        .await?;
    assert_eq!(outcome.matched_count, 1);
    assert_eq!(outcome.modified_count, 1);
    assert_eq!(outcome.elements.matched, 2);
    assert_eq!(outcome.elements.modified, 2);

    let product = outcome.document.unwrap();
    assert!(product.reviews.iter().all(|r| r.verified == Some(false)));
    Ok(())
}

#[tokio::test]
async fn test_update_by_predicate_through_engine() -> anyhow::Result<()> {
    let engine = seeded().await?;
    let sku = Sku::from("SKU1001");
    let patch = ReviewPatch {
        verified: Some(Some(false)),
        ..Default::default()
    };

    let product = engine
        .update_reviews_by_predicate(&sku, verified(true), patch)
        .await??;
    let flags: Vec<Option<bool>> = product.reviews.iter().map(|r| r.verified).collect();
    assert_eq!(flags, vec![Some(false), Some(false)]);
    Ok(())
}

#[tokio::test]
async fn test_update_by_predicate_no_match() -> anyhow::Result<()> {
    let engine = seeded().await?;
    let db = engine.repository();
    let before = raw_document(db, "SKU1001").await?;

    let filter = ReviewFilter {
        rating: Some(Some(1)),
        ..Default::default()
    };
    let result = engine
        .update_reviews_by_predicate(&Sku::from("SKU1001"), filter, rating(2))
        .await?;
    assert_eq!(
        result,
        Err(ReviewFailure::NoMatchOrNoChange {
            sku: "SKU1001".into(),
            cause: NoChangeCause::NoMatch
        })
    );
    assert_eq!(raw_document(db, "SKU1001").await?, before);
    Ok(())
}

#[tokio::test]
async fn test_update_by_predicate_empty_reviews() -> anyhow::Result<()> {
    let engine = seeded().await?;
    let filter = ReviewFilter {
        rating: Some(Some(5)),
        ..Default::default()
    };
    let result = engine
        .update_reviews_by_predicate(&Sku::from("SKU1004"), filter, rating(4))
        .await?;
    assert_eq!(
        result,
        Err(ReviewFailure::NoMatchOrNoChange {
            sku: "SKU1004".into(),
            cause: NoChangeCause::NoMatch
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_update_by_predicate_unchanged() -> anyhow::Result<()> {
    let engine = seeded().await?;
    let filter = ReviewFilter {
        review_id: Some(Some("r1002-1".into())),
        ..Default::default()
    };
    let result = engine
        .update_reviews_by_predicate(&Sku::from("SKU1002"), filter, rating(5))
        .await?;
    assert_eq!(
        result,
        Err(ReviewFailure::NoMatchOrNoChange {
            sku: "SKU1002".into(),
            cause: NoChangeCause::Unchanged
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_update_by_predicate_unknown_product() -> anyhow::Result<()> {
    let engine = seeded().await?;
    let result = engine
        .update_reviews_by_predicate(&Sku::from("SKU9999"), ReviewFilter::default(), rating(3))
        .await?;
    assert_eq!(result, Err(ReviewFailure::ProductNotFound("SKU9999".into())));
    Ok(())
}

#[tokio::test]
async fn test_update_by_predicate_empty_filter_matches_all() -> anyhow::Result<()> {
    let engine = seeded().await?;
    let product = engine
        .update_reviews_by_predicate(&Sku::from("SKU1001"), ReviewFilter::default(), rating(3))
        .await??;
    assert!(product.reviews.iter().all(|r| r.rating == 3));
    Ok(())
}

#[tokio::test]
async fn test_update_by_predicate_on_extra_fields() -> anyhow::Result<()> {
    let engine = seeded().await?;
    let sku = Sku::from("SKU1001");

    let patch: ReviewPatch = serde_json::from_value(json!({ "flagged": true }))?;
    engine
        .update_review_by_key(&sku, "r1001-2", patch)
        .await??;

    let filter: ReviewFilter = serde_json::from_value(json!({ "flagged": true }))?;
    let patch = ReviewPatch {
        comment: Some(Some("[hidden]".into())),
        ..Default::default()
    };
    let product = engine
        .update_reviews_by_predicate(&sku, filter, patch)
        .await??;

    assert_ne!(product.reviews[0].comment.as_deref(), Some("[hidden]"));
    assert_eq!(product.reviews[1].comment.as_deref(), Some("[hidden]"));
    assert_eq!(product.reviews[1].extra.get("flagged"), Some(&json!(true)));
    Ok(())
}

#[tokio::test]
async fn test_concurrent_updates_to_one_product() -> anyhow::Result<()> {
    let engine = seeded().await?;
    let sku = Sku::from("SKU1001");

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let engine = engine.clone();
            let sku = sku.clone();
            tokio::spawn(async move {
                let review_id = if i % 2 == 0 { "r1001-1" } else { "r1001-2" };
                let mut patch = ReviewPatch::default();
                patch.extra.assign(&format!("note_{i}"), &json!(i));
                engine.update_review_by_key(&sku, review_id, patch).await
            })
        })
        .collect();

    for task in tasks {
        task.await???;
    }

    // every merge landed; none was lost to an interleaved write
    let product = engine.repository().get_product(&sku).await?.unwrap();
    assert_eq!(product.reviews[0].extra.len(), 4);
    assert_eq!(product.reviews[1].extra.len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_null_condition_selects_only_missing_fields() -> anyhow::Result<()> {
    let engine = seeded().await?;
    let sku = Sku::from("SKU1001");

    // both sample reviews carry a comment, so nothing may match
    let filter: ReviewFilter = serde_json::from_value(json!({ "comment": null }))?;
    let result = engine
        .update_reviews_by_predicate(&sku, filter.clone(), rating(1))
        .await?;
    assert_eq!(
        result,
        Err(ReviewFailure::NoMatchOrNoChange {
            sku: sku.clone(),
            cause: NoChangeCause::NoMatch
        })
    );

    // clear one comment, then only that review is selected
    let clear: ReviewPatch = serde_json::from_value(json!({ "comment": null }))?;
    let product = engine
        .update_review_by_key(&sku, "r1001-2", clear)
        .await??;
    assert_eq!(product.reviews[1].comment, None);

    let product = engine
        .update_reviews_by_predicate(&sku, filter, rating(1))
        .await??;
    let ratings: Vec<u8> = product.reviews.iter().map(|r| r.rating).collect();
    assert_eq!(ratings, vec![5, 1]);
    Ok(())
}

#[tokio::test]
async fn test_store_failure_propagates() -> anyhow::Result<()> {
    let engine = seeded().await?;
    let db = engine.repository();
    db.writer.close().await;
    db.reader.close().await;

    let sku = Sku::from("SKU1001");
    assert!(
        engine
            .update_review_by_key(&sku, "r1001-1", rating(1))
            .await
            .is_err()
    );
    assert!(
        engine
            .update_reviews_by_predicate(&sku, verified(true), rating(1))
            .await
            .is_err()
    );
    Ok(())
}
