//! REST API endpoints for whole-product operations.
//!
//! Products are read and written as complete documents here. The reviews
//! embedded in a product are only ever changed through the review routes.

use crate::{ApiApplication, ApiError, store_unavailable, validate};
use aide::{
    axum::{ApiRouter, routing::get_with},
    transform::TransformOperation,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use catalog_core::{
    models::{Product, ProductFailure, ProductPatch, Sku},
    ports::{Application, ProductRepository as _},
};
use tracing::{Level, event};

/// Path parameter for product-specific endpoints.
#[derive(serde::Deserialize, schemars::JsonSchema)]
#[schemars(inline)]
pub(crate) struct Key {
    /// The sku of the product
    pub(crate) sku: Sku,
}

/// Creates a router with product-related endpoints.
pub fn router<T: ApiApplication>() -> ApiRouter<T> {
    ApiRouter::new()
        .api_route_with(
            "/",
            get_with(list_products::<T>, list_products_docs)
                .post_with(create_product::<T>, create_product_docs),
            |route| route.tag("products"),
        )
        .api_route_with(
            "/{sku}",
            get_with(get_product::<T>, get_product_docs)
                .patch_with(update_product::<T>, update_product_docs)
                .delete_with(delete_product::<T>, delete_product_docs),
            |route| route.tag("products"),
        )
}

fn not_found(sku: &Sku) -> ApiError {
    (StatusCode::NOT_FOUND, format!("unknown product {sku}"))
}

async fn list_products<T: ApiApplication>(
    State(app): State<T>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = app
        .database()
        .list_products()
        .await
        .map_err(store_unavailable("failed to list products".to_string()))?;
    Ok(Json(products))
}

fn list_products_docs(op: TransformOperation) -> TransformOperation<'_> {
    op.summary("List products")
        .description("Every product in the catalog, in the order they were created.")
        .response_with::<503, String, _>(|res| res.description("Database unavailable"))
}

/// Create a new product.
///
/// # Returns
///
/// - `201 Created`: the stored product
/// - `409 Conflict`: a product with this sku already exists
/// - `422 Unprocessable Entity`: the product failed validation
/// - `503 Service Unavailable`: database operation failed
async fn create_product<T: ApiApplication>(
    State(app): State<T>,
    Json(product): Json<Product>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    validate::product(&product)?;

    let db = app.database();
    let sku = product.sku.clone();
    let conflict = || {
        (
            StatusCode::CONFLICT,
            format!("product with sku {sku} already exists"),
        )
    };

    let exists = db
        .product_exists(&sku)
        .await
        .map_err(store_unavailable(format!("failed to check product {sku}")))?;
    if exists {
        return Err(conflict());
    }

    // a concurrent create can still win the race, so the insert reports
    // conflicts as well
    match db
        .create_product(product)
        .await
        .map_err(store_unavailable(format!("failed to create product {sku}")))?
    {
        Ok(created) => {
            event!(Level::INFO, %sku, "created product");
            Ok((StatusCode::CREATED, Json(created)))
        }
        Err(ProductFailure::SkuConflict(_)) => Err(conflict()),
    }
}

fn create_product_docs(op: TransformOperation) -> TransformOperation<'_> {
    op.summary("Create product")
        .description("Store a new product. The sku must not already be in use.")
        .response_with::<409, String, _>(|res| res.description("Sku already in use"))
        .response_with::<422, String, _>(|res| res.description("Invalid product"))
        .response_with::<503, String, _>(|res| res.description("Database unavailable"))
}

async fn get_product<T: ApiApplication>(
    State(app): State<T>,
    Path(Key { sku }): Path<Key>,
) -> Result<Json<Product>, ApiError> {
    app.database()
        .get_product(&sku)
        .await
        .map_err(store_unavailable(format!("failed to get product {sku}")))?
        .map(Json)
        .ok_or_else(|| not_found(&sku))
}

fn get_product_docs(op: TransformOperation) -> TransformOperation<'_> {
    op.summary("Get product")
        .response_with::<404, String, _>(|res| res.description("Product not found"))
        .response_with::<503, String, _>(|res| res.description("Database unavailable"))
}

/// Replace some of a product's top-level fields.
///
/// # Returns
///
/// - `200 OK`: the product after the update
/// - `404 Not Found`: product does not exist
/// - `422 Unprocessable Entity`: empty or invalid patch
/// - `503 Service Unavailable`: database operation failed
async fn update_product<T: ApiApplication>(
    State(app): State<T>,
    Path(Key { sku }): Path<Key>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>, ApiError> {
    validate::product_patch(&patch)?;

    app.database()
        .update_product(&sku, &patch)
        .await
        .map_err(store_unavailable(format!("failed to update product {sku}")))?
        .map(Json)
        .ok_or_else(|| not_found(&sku))
}

fn update_product_docs(op: TransformOperation) -> TransformOperation<'_> {
    op.summary("Update product")
        .description("Merge the given fields into the product. Reviews cannot be changed here.")
        .response_with::<404, String, _>(|res| res.description("Product not found"))
        .response_with::<422, String, _>(|res| res.description("Invalid patch"))
        .response_with::<503, String, _>(|res| res.description("Database unavailable"))
}

async fn delete_product<T: ApiApplication>(
    State(app): State<T>,
    Path(Key { sku }): Path<Key>,
) -> Result<StatusCode, ApiError> {
    let deleted = app
        .database()
        .delete_product(&sku)
        .await
        .map_err(store_unavailable(format!("failed to delete product {sku}")))?;

    if deleted {
        event!(Level::INFO, %sku, "deleted product");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&sku))
    }
}

fn delete_product_docs(op: TransformOperation) -> TransformOperation<'_> {
    op.summary("Delete product")
        .response_with::<204, (), _>(|res| res.description("Product deleted"))
        .response_with::<404, String, _>(|res| res.description("Product not found"))
        .response_with::<503, String, _>(|res| res.description("Database unavailable"))
}
