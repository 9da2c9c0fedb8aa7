use crate::models::{Product, Review, ReviewPatch, ReviewSelector, Sku, UpdateOutcome};
use std::future::Future;

/// Repository interface for updates scoped to a product's review array.
pub trait ReviewRepository: super::Repository {
    /// Append a review to the end of a product's review array.
    ///
    /// This is not idempotent; callers must not retry it blindly.
    ///
    /// # Returns
    ///
    /// - Ok(Some(product)) with the updated document
    /// - Ok(None) if the product does not exist
    /// - Err otherwise
    fn add_review(
        &self,
        sku: &Sku,
        review: Review,
    ) -> impl Future<Output = Result<Option<Product>, Self::Error>> + Send;

    /// Merge `patch` into the reviews of one product chosen by `selector`.
    ///
    /// The document is addressed by `sku` alone. Within it, the reviews are
    /// matched and merged following [`crate::models::apply_review_update`].
    /// Implementations must apply the whole match-and-merge atomically with
    /// respect to other writers of the same document, and must leave the
    /// stored document untouched when no element changed.
    ///
    /// The outcome always reports whether the document was matched and
    /// modified, plus the element-level counts and the post-update document.
    fn update_reviews(
        &self,
        sku: &Sku,
        selector: &ReviewSelector,
        patch: &ReviewPatch,
    ) -> impl Future<Output = Result<UpdateOutcome<Product>, Self::Error>> + Send;
}
