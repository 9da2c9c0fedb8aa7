//! Request validation shared by the route handlers.
//!
//! The core accepts any well-typed value; the bounds below are enforced only
//! at the HTTP boundary, and every violation answers `422 Unprocessable Entity`.

use crate::ApiError;
use axum::http::StatusCode;
use catalog_core::models::{Product, ProductPatch, Review, ReviewPatch};
use rust_decimal::Decimal;

/// Prices are stored with at most this many decimal places.
const PRICE_SCALE: u32 = 2;

/// Exclusive upper bound on a price.
const PRICE_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

fn invalid(message: impl Into<String>) -> ApiError {
    (StatusCode::UNPROCESSABLE_ENTITY, message.into())
}

fn non_empty(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(invalid(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

fn price(value: Decimal) -> Result<(), ApiError> {
    if value.is_sign_negative() {
        return Err(invalid("price must not be negative"));
    }
    if value.normalize().scale() > PRICE_SCALE {
        return Err(invalid(format!(
            "price must have at most {PRICE_SCALE} decimal places"
        )));
    }
    if value >= PRICE_LIMIT {
        return Err(invalid(format!("price must be less than {PRICE_LIMIT}")));
    }
    Ok(())
}

fn rating(value: u8) -> Result<(), ApiError> {
    if (1..=5).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("rating must be between 1 and 5, got {value}")))
    }
}

pub(crate) fn product(product: &Product) -> Result<(), ApiError> {
    non_empty("sku", product.sku.as_str())?;
    non_empty("name", &product.name)?;
    price(product.price)?;
    product.reviews.iter().try_for_each(review)
}

pub(crate) fn product_patch(patch: &ProductPatch) -> Result<(), ApiError> {
    if patch.is_empty() {
        return Err(invalid("patch must set at least one field"));
    }
    if let Some(name) = &patch.name {
        non_empty("name", name)?;
    }
    patch.price.map_or(Ok(()), price)
}

pub(crate) fn review(review: &Review) -> Result<(), ApiError> {
    non_empty("review_id", &review.review_id)?;
    rating(review.rating)
}

pub(crate) fn review_patch(patch: &ReviewPatch) -> Result<(), ApiError> {
    if patch.is_empty() {
        return Err(invalid("patch must set at least one field"));
    }
    if patch.extra.contains_key("review_id") {
        return Err(invalid("review_id cannot be changed"));
    }
    if let Some(field) = patch.nulled_required_fields().first() {
        return Err(invalid(format!("{field} cannot be null")));
    }
    patch.rating.flatten().map_or(Ok(()), rating)
}
