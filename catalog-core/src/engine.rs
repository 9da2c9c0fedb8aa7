use crate::{
    models::{Product, ReviewFilter, ReviewPatch, ReviewSelector, Sku, UpdateOutcome},
    ports::ReviewRepository,
};
use tracing::{Level, event};

/// Why a predicate update reported [`ReviewFailure::NoMatchOrNoChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoChangeCause {
    /// No review satisfied the filter
    NoMatch,
    /// Reviews matched, but every one already held the proposed values
    Unchanged,
}

impl std::fmt::Display for NoChangeCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMatch => f.write_str("no review matched the filter"),
            Self::Unchanged => f.write_str("matching reviews already hold these values"),
        }
    }
}

/// The ways a review mutation can fail, other than a storage error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewFailure {
    /// No product has the requested sku
    #[error("product with sku '{0}' not found")]
    ProductNotFound(Sku),

    /// The product exists but has no review with the requested id
    #[error("review '{review_id}' not found in product '{sku}'")]
    ReviewNotFound {
        /// The product that was searched
        sku: Sku,
        /// The review id that was not found
        review_id: String,
    },

    /// A predicate update matched nothing, or matched only reviews that
    /// already held the proposed values
    #[error("no review of product '{sku}' was changed: {cause}")]
    NoMatchOrNoChange {
        /// The product that was searched
        sku: Sku,
        /// Which of the two situations occurred
        cause: NoChangeCause,
    },
}

/// Applies targeted, partial updates to the reviews embedded in a product.
///
/// The engine is stateless apart from the repository it is constructed with,
/// so it may be cloned freely and used concurrently. Atomicity of each
/// update is delegated to [`ReviewRepository::update_reviews`].
///
/// Results follow the nested convention used by the ports: the outer
/// `Result` carries storage errors, the inner one the domain outcome.
#[derive(Debug, Clone)]
pub struct ReviewEngine<R> {
    repository: R,
}

impl<R> ReviewEngine<R> {
    /// Build an engine on top of `repository`.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// The repository this engine writes to
    pub fn repository(&self) -> &R {
        &self.repository
    }
}

impl<R: ReviewRepository + Sync> ReviewEngine<R> {
    /// Merge `patch` into the review whose id is `review_id`.
    ///
    /// Only the first review with that id (in array order) is considered, so a
    /// product holding duplicate ids has only its earliest one updated.
    /// Finding the review is enough for success: a patch that leaves the
    /// review exactly as it was still returns the product.
    ///
    /// # Returns
    ///
    /// - Ok(Ok(product)) with the product after the update
    /// - Ok(Err(ReviewFailure::ProductNotFound)) if the sku is unknown
    /// - Ok(Err(ReviewFailure::ReviewNotFound)) if no review has this id
    /// - Err(repository_error) if the store failed
    pub async fn update_review_by_key(
        &self,
        sku: &Sku,
        review_id: &str,
        patch: ReviewPatch,
    ) -> Result<Result<Product, ReviewFailure>, R::Error> {
        let selector = ReviewSelector::First(ReviewFilter::by_id(review_id));
        let outcome = self
            .repository
            .update_reviews(sku, &selector, &patch)
            .await?;

        event!(
            Level::DEBUG,
            %sku,
            review_id,
            ?patch,
            matched = outcome.elements.matched,
            modified = outcome.elements.modified,
            "update review by key"
        );

        Ok(by_key_result(sku, review_id, outcome))
    }

    /// Merge `patch` into every review satisfying `filter`.
    ///
    /// # Returns
    ///
    /// - Ok(Ok(product)) if at least one review changed
    /// - Ok(Err(ReviewFailure::ProductNotFound)) if the sku is unknown
    /// - Ok(Err(ReviewFailure::NoMatchOrNoChange)) if no review changed, with
    ///   the cause telling an empty match apart from an identical one
    /// - Err(repository_error) if the store failed
    pub async fn update_reviews_by_predicate(
        &self,
        sku: &Sku,
        filter: ReviewFilter,
        patch: ReviewPatch,
    ) -> Result<Result<Product, ReviewFailure>, R::Error> {
        let selector = ReviewSelector::All(filter);
        let outcome = self
            .repository
            .update_reviews(sku, &selector, &patch)
            .await?;

        event!(
            Level::INFO,
            %sku,
            filter = ?selector.filter(),
            ?patch,
            matched_count = outcome.matched_count,
            modified_count = outcome.modified_count,
            elements_matched = outcome.elements.matched,
            elements_modified = outcome.elements.modified,
            "update reviews by predicate"
        );

        Ok(by_predicate_result(sku, outcome))
    }
}

fn by_key_result(
    sku: &Sku,
    review_id: &str,
    outcome: UpdateOutcome<Product>,
) -> Result<Product, ReviewFailure> {
    let Some(product) = outcome.document else {
        return Err(ReviewFailure::ProductNotFound(sku.clone()));
    };
    if outcome.elements.matched == 0 {
        return Err(ReviewFailure::ReviewNotFound {
            sku: sku.clone(),
            review_id: review_id.to_owned(),
        });
    }
    Ok(product)
}

fn by_predicate_result(
    sku: &Sku,
    outcome: UpdateOutcome<Product>,
) -> Result<Product, ReviewFailure> {
    let Some(product) = outcome.document else {
        return Err(ReviewFailure::ProductNotFound(sku.clone()));
    };
    let cause = if outcome.elements.matched == 0 {
        NoChangeCause::NoMatch
    } else if outcome.modified_count == 0 {
        NoChangeCause::Unchanged
    } else {
        return Ok(product);
    };
    Err(ReviewFailure::NoMatchOrNoChange {
        sku: sku.clone(),
        cause,
    })
}
