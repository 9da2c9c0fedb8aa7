//! REST API endpoints for the reviews embedded in a product.
//!
//! Reviews have no address of their own outside their product, so every
//! route here is nested under `/products/{sku}/reviews`. Updates go through
//! the [`ReviewEngine`](catalog_core::ReviewEngine).

use crate::{ApiApplication, ApiError, product_routes::Key, store_unavailable, validate};
use aide::{
    axum::{
        ApiRouter,
        routing::{patch_with, post_with},
    },
    transform::TransformOperation,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use catalog_core::{
    ReviewFailure,
    models::{Product, Review, ReviewFilter, ReviewPatch, Sku},
    ports::{Application, ReviewRepository as _},
};
use serde::Deserialize;
use tracing::{Level, event};

/// Path parameters addressing a single review.
#[derive(Deserialize, schemars::JsonSchema)]
#[schemars(inline)]
struct ReviewKey {
    /// The sku of the product holding the review
    sku: Sku,
    /// The id of the review within the product
    review_id: String,
}

/// Request body for a filtered update.
#[derive(Deserialize, schemars::JsonSchema)]
struct PredicateUpdate {
    /// Conditions a review must meet; every condition must hold, and an
    /// empty filter selects every review
    #[serde(default)]
    filter: ReviewFilter,
    /// The fields to write into each selected review
    set: ReviewPatch,
}

/// Creates a router with review-related endpoints.
pub fn router<T: ApiApplication>() -> ApiRouter<T> {
    ApiRouter::new()
        .api_route_with(
            "/{sku}/reviews",
            post_with(add_review::<T>, add_review_docs)
                .patch_with(update_matching_reviews::<T>, update_matching_reviews_docs),
            |route| route.tag("reviews"),
        )
        .api_route_with(
            "/{sku}/reviews/{review_id}",
            patch_with(update_review::<T>, update_review_docs),
            |route| route.tag("reviews"),
        )
}

/// Every domain failure of a review update is a "not found" of some kind.
fn not_found(failure: ReviewFailure) -> ApiError {
    (StatusCode::NOT_FOUND, failure.to_string())
}

/// Append a review to a product.
///
/// # Returns
///
/// - `201 Created`: the product with the new review last in its list
/// - `404 Not Found`: product does not exist
/// - `422 Unprocessable Entity`: the review failed validation
/// - `503 Service Unavailable`: database operation failed
async fn add_review<T: ApiApplication>(
    State(app): State<T>,
    Path(Key { sku }): Path<Key>,
    Json(review): Json<Review>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    validate::review(&review)?;

    let review_id = review.review_id.clone();
    let product = app
        .database()
        .add_review(&sku, review)
        .await
        .map_err(store_unavailable(format!(
            "failed to add review to product {sku}"
        )))?
        .ok_or_else(|| not_found(ReviewFailure::ProductNotFound(sku.clone())))?;

    event!(Level::INFO, %sku, %review_id, "added review");
    Ok((StatusCode::CREATED, Json(product)))
}

fn add_review_docs(op: TransformOperation) -> TransformOperation<'_> {
    op.summary("Add review")
        .description("Append a review to the end of the product's review list.")
        .response_with::<404, String, _>(|res| res.description("Product not found"))
        .response_with::<422, String, _>(|res| res.description("Invalid review"))
        .response_with::<503, String, _>(|res| res.description("Database unavailable"))
}

/// Update a single review, addressed by its id.
///
/// Only the first review carrying the id is updated. A patch that changes
/// nothing still succeeds.
///
/// # Returns
///
/// - `200 OK`: the whole product after the update
/// - `404 Not Found`: product does not exist, or has no review with this id
/// - `422 Unprocessable Entity`: empty or invalid patch
/// - `503 Service Unavailable`: database operation failed
async fn update_review<T: ApiApplication>(
    State(app): State<T>,
    Path(ReviewKey { sku, review_id }): Path<ReviewKey>,
    Json(patch): Json<ReviewPatch>,
) -> Result<Json<Product>, ApiError> {
    validate::review_patch(&patch)?;

    app.reviews()
        .update_review_by_key(&sku, &review_id, patch)
        .await
        .map_err(store_unavailable(format!(
            "failed to update review {review_id} of product {sku}"
        )))?
        .map(Json)
        .map_err(not_found)
}

fn update_review_docs(op: TransformOperation) -> TransformOperation<'_> {
    op.summary("Update review")
        .description("Merge the given fields into one review. Fields not named in the body keep their values.")
        .response_with::<404, String, _>(|res| res.description("Product or review not found"))
        .response_with::<422, String, _>(|res| res.description("Invalid patch"))
        .response_with::<503, String, _>(|res| res.description("Database unavailable"))
}

/// Update every review matching a filter.
///
/// # Returns
///
/// - `200 OK`: the whole product, when at least one review changed
/// - `404 Not Found`: product does not exist, no review matched, or every
///   matching review already held the given values
/// - `422 Unprocessable Entity`: empty or invalid patch
/// - `503 Service Unavailable`: database operation failed
async fn update_matching_reviews<T: ApiApplication>(
    State(app): State<T>,
    Path(Key { sku }): Path<Key>,
    Json(PredicateUpdate { filter, set }): Json<PredicateUpdate>,
) -> Result<Json<Product>, ApiError> {
    validate::review_patch(&set)?;

    app.reviews()
        .update_reviews_by_predicate(&sku, filter, set)
        .await
        .map_err(store_unavailable(format!(
            "failed to update reviews of product {sku}"
        )))?
        .map(Json)
        .map_err(not_found)
}

fn update_matching_reviews_docs(op: TransformOperation) -> TransformOperation<'_> {
    op.summary("Update matching reviews")
        .description(
            r#"
            Merge the fields in `set` into every review satisfying `filter`.

            The filter is a set of exact-equality conditions, all of which must
            hold. Succeeds only if at least one review actually changed.
            "#,
        )
        .response_with::<404, String, _>(|res| res.description("Product not found, or no review changed"))
        .response_with::<422, String, _>(|res| res.description("Invalid patch"))
        .response_with::<503, String, _>(|res| res.description("Database unavailable"))
}
