use super::{Review, ReviewFilter, ReviewPatch};

/// Which elements of a product's review array an update applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewSelector {
    /// Only the first review (in array order) satisfying the filter.
    First(ReviewFilter),
    /// Every review satisfying the filter.
    All(ReviewFilter),
}

impl ReviewSelector {
    /// The filter reviews are matched against
    pub fn filter(&self) -> &ReviewFilter {
        match self {
            Self::First(filter) | Self::All(filter) => filter,
        }
    }
}

/// Element-level counts from applying a patch to a review array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementCounts {
    /// Reviews selected by the filter
    pub matched: u64,
    /// Selected reviews whose stored values actually changed
    pub modified: u64,
}

/// The result of a single-document partial update.
///
/// Document-level and element-level counts are reported separately: the
/// document selector is the product key alone, so `matched_count` is 1
/// whenever the product exists, regardless of how many of its reviews the
/// element filter selected.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome<T> {
    /// Documents matched by the document selector (0 or 1)
    pub matched_count: u64,
    /// Documents whose stored state changed (0 or 1)
    pub modified_count: u64,
    /// Element-level counts within the matched document
    pub elements: ElementCounts,
    /// The document as it stands after the update, if one was matched
    pub document: Option<T>,
}

impl<T> UpdateOutcome<T> {
    /// The outcome when no document has the requested key.
    pub fn unmatched() -> Self {
        Self {
            matched_count: 0,
            modified_count: 0,
            elements: ElementCounts::default(),
            document: None,
        }
    }
}

/// Apply `patch` to the reviews chosen by `selector`, in place.
///
/// Reviews are visited in array order. With [`ReviewSelector::First`] the scan
/// stops at the first match, so if several reviews share a `review_id` only
/// the earliest one is updated. Unselected reviews are never touched.
pub fn apply_review_update(
    reviews: &mut [Review],
    selector: &ReviewSelector,
    patch: &ReviewPatch,
) -> ElementCounts {
    let filter = selector.filter();
    let limit = match selector {
        ReviewSelector::First(_) => 1,
        ReviewSelector::All(_) => usize::MAX,
    };

    let mut counts = ElementCounts::default();
    for review in reviews
        .iter_mut()
        .filter(|review| review.matches(filter))
        .take(limit)
    {
        counts.matched += 1;
        if review.merge(patch) {
            counts.modified += 1;
        }
    }
    counts
}
