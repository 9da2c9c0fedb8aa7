use super::{DateTime, FieldMap, product::replace};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;

/// A review embedded in a product's `reviews` array.
///
/// Reviews have no identity outside of their product; `review_id` is unique
/// only within the enclosing array (by convention, the core does not enforce
/// it). Fields the catalog does not know about are kept in `extra` and
/// survive every update untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Review {
    /// Identifier of the review within its product
    pub review_id: String,
    /// The reviewing user, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Display name of the author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Star rating, 1 through 5
    pub rating: u8,
    /// Free-text body of the review
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Whether the purchase behind the review was verified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    /// When the review was written
    #[serde(default = "DateTime::now")]
    pub created_at: DateTime,
    /// Any additional fields
    #[serde(flatten)]
    pub extra: FieldMap,
}

/// A partial update to a review.
///
/// Each field that is present is written into the matched review(s);
/// everything else keeps its prior value. An explicit `null` clears an
/// optional field. A review's `review_id` cannot be changed, and `rating`
/// and `created_at` cannot be cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct ReviewPatch {
    /// New reviewing user
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[cfg_attr(feature = "schemars", schemars(with = "Option<String>"))]
    pub user_id: Option<Option<String>>,
    /// New author
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[cfg_attr(feature = "schemars", schemars(with = "Option<String>"))]
    pub author: Option<Option<String>>,
    /// New rating
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[cfg_attr(feature = "schemars", schemars(with = "Option<u8>"))]
    pub rating: Option<Option<u8>>,
    /// New comment
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[cfg_attr(feature = "schemars", schemars(with = "Option<String>"))]
    pub comment: Option<Option<String>>,
    /// New verification flag
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[cfg_attr(feature = "schemars", schemars(with = "Option<bool>"))]
    pub verified: Option<Option<bool>>,
    /// New creation time
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[cfg_attr(feature = "schemars", schemars(with = "Option<DateTime>"))]
    pub created_at: Option<Option<DateTime>>,
    /// Additional fields to set
    #[serde(flatten)]
    pub extra: FieldMap,
}

impl ReviewPatch {
    /// Whether the patch would not touch any field
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.author.is_none()
            && self.rating.is_none()
            && self.comment.is_none()
            && self.verified.is_none()
            && self.created_at.is_none()
            && self.extra.is_empty()
    }

    /// The names of the fields that can never hold `null` but are set to it
    pub fn nulled_required_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if matches!(self.rating, Some(None)) {
            fields.push("rating");
        }
        if matches!(self.created_at, Some(None)) {
            fields.push("created_at");
        }
        fields
    }
}

/// A conjunction of exact-equality conditions over review fields.
///
/// A review matches when every present field (and every entry of `extra`)
/// equals the review's value for that field. A `null` condition matches a
/// review where the field is missing or null, the same rule `extra` follows.
/// There are no ranges and no partial string matches. The empty filter
/// matches every review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct ReviewFilter {
    /// Required review id
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[cfg_attr(feature = "schemars", schemars(with = "Option<String>"))]
    pub review_id: Option<Option<String>>,
    /// Required reviewing user
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[cfg_attr(feature = "schemars", schemars(with = "Option<String>"))]
    pub user_id: Option<Option<String>>,
    /// Required author
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[cfg_attr(feature = "schemars", schemars(with = "Option<String>"))]
    pub author: Option<Option<String>>,
    /// Required rating
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[cfg_attr(feature = "schemars", schemars(with = "Option<u8>"))]
    pub rating: Option<Option<u8>>,
    /// Required comment
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[cfg_attr(feature = "schemars", schemars(with = "Option<String>"))]
    pub comment: Option<Option<String>>,
    /// Required verification flag
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[cfg_attr(feature = "schemars", schemars(with = "Option<bool>"))]
    pub verified: Option<Option<bool>>,
    /// Required creation time
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[cfg_attr(feature = "schemars", schemars(with = "Option<DateTime>"))]
    pub created_at: Option<Option<DateTime>>,
    /// Required values of additional fields; `null` also matches a missing field
    #[serde(flatten)]
    pub extra: FieldMap,
}

impl ReviewFilter {
    /// A filter selecting reviews by id.
    pub fn by_id(review_id: impl Into<String>) -> Self {
        Self {
            review_id: Some(Some(review_id.into())),
            ..Default::default()
        }
    }

    /// Whether the filter has no conditions (and so matches everything)
    pub fn is_empty(&self) -> bool {
        self.review_id.is_none()
            && self.user_id.is_none()
            && self.author.is_none()
            && self.rating.is_none()
            && self.comment.is_none()
            && self.verified.is_none()
            && self.created_at.is_none()
            && self.extra.is_empty()
    }
}

/// The names of the typed review fields; these never live in `extra`.
const REVIEW_FIELDS: [&str; 7] = [
    "review_id",
    "user_id",
    "author",
    "rating",
    "comment",
    "verified",
    "created_at",
];

impl Review {
    /// Whether this review satisfies every condition of `filter`.
    pub fn matches(&self, filter: &ReviewFilter) -> bool {
        // a null condition on a field every review carries matches nothing
        fn required<T: PartialEq>(want: &Option<Option<T>>, have: &T) -> bool {
            want.as_ref()
                .is_none_or(|want| want.as_ref() == Some(have))
        }

        fn optional<T: PartialEq>(want: &Option<Option<T>>, have: &Option<T>) -> bool {
            want.as_ref().is_none_or(|want| want == have)
        }

        required(&filter.review_id, &self.review_id)
            && optional(&filter.user_id, &self.user_id)
            && optional(&filter.author, &self.author)
            && required(&filter.rating, &self.rating)
            && optional(&filter.comment, &self.comment)
            && optional(&filter.verified, &self.verified)
            && required(&filter.created_at, &self.created_at)
            && filter
                .extra
                .iter()
                .all(|(name, value)| self.extra.holds(name, value))
    }

    /// Merge the present fields of `patch` into this review, reporting whether
    /// any stored value changed.
    ///
    /// A `null` clears an optional field; on `rating` and `created_at` it is
    /// ignored.
    pub fn merge(&mut self, patch: &ReviewPatch) -> bool {
        fn set<T: PartialEq + Clone>(slot: &mut Option<T>, value: &Option<Option<T>>) -> bool {
            value.as_ref().is_some_and(|value| replace(slot, value))
        }

        fn set_required<T: PartialEq + Clone>(slot: &mut T, value: &Option<Option<T>>) -> bool {
            match value {
                Some(Some(value)) => replace(slot, value),
                _ => false,
            }
        }

        let mut changed = false;
        changed |= set(&mut self.user_id, &patch.user_id);
        changed |= set(&mut self.author, &patch.author);
        changed |= set_required(&mut self.rating, &patch.rating);
        changed |= set(&mut self.comment, &patch.comment);
        changed |= set(&mut self.verified, &patch.verified);
        changed |= set_required(&mut self.created_at, &patch.created_at);
        for (name, value) in patch.extra.iter() {
            // typed fields (notably the identifying `review_id`) are never set
            // through the open map
            if REVIEW_FIELDS.contains(&name.as_str()) {
                continue;
            }
            changed |= self.extra.assign(name, value);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn review(id: &str, rating: u8, verified: bool) -> Review {
        serde_json::from_value(json!({
            "review_id": id,
            "user_id": "u100",
            "rating": rating,
            "comment": "Excellent sound and battery life!",
            "verified": verified,
            "created_at": "2024-03-01T09:30:00Z",
        }))
        .unwrap()
    }

    #[test]
    fn test_created_at_defaults_to_now() {
        let before = DateTime::now();
        let review: Review =
            serde_json::from_value(json!({ "review_id": "r1", "rating": 4 })).unwrap();
        assert!(review.created_at >= before);
        assert!(review.extra.is_empty());
    }

    #[test]
    fn test_unknown_fields_survive() {
        let raw = json!({
            "review_id": "r1",
            "rating": 4,
            "created_at": "2024-03-01T09:30:00Z",
            "helpful_votes": 12,
        });
        let review: Review = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(review.extra.get("helpful_votes"), Some(&json!(12)));
        assert_eq!(serde_json::to_value(&review).unwrap(), raw);
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(review("r1", 5, true).matches(&ReviewFilter::default()));
    }

    #[test]
    fn test_filter_is_a_conjunction() {
        let r = review("r1", 5, true);

        let both = ReviewFilter {
            rating: Some(Some(5)),
            verified: Some(Some(true)),
            ..Default::default()
        };
        assert!(r.matches(&both));

        let one_wrong = ReviewFilter {
            rating: Some(Some(5)),
            verified: Some(Some(false)),
            ..Default::default()
        };
        assert!(!r.matches(&one_wrong));
    }

    #[test]
    fn test_filter_on_absent_optional_field() {
        let mut r = review("r1", 5, true);
        r.author = None;
        let filter = ReviewFilter {
            author: Some(Some("Ada".into())),
            ..Default::default()
        };
        assert!(!r.matches(&filter));
    }

    #[test]
    fn test_filter_on_extra_fields() {
        let mut r = review("r1", 5, true);
        r.extra.assign("locale", &json!("en-CA"));

        let filter: ReviewFilter = serde_json::from_value(json!({ "locale": "en-CA" })).unwrap();
        assert!(r.matches(&filter));

        let filter: ReviewFilter = serde_json::from_value(json!({ "locale": "fr-CA" })).unwrap();
        assert!(!r.matches(&filter));

        let filter: ReviewFilter = serde_json::from_value(json!({ "flagged": null })).unwrap();
        assert!(r.matches(&filter));
    }

    #[test]
    fn test_merge_is_partial() {
        let mut r = review("r1", 5, true);
        let before = r.clone();

        let patch = ReviewPatch {
            comment: Some(Some("x".into())),
            ..Default::default()
        };
        assert!(r.merge(&patch));
        assert_eq!(r.comment.as_deref(), Some("x"));
        assert_eq!(
            Review {
                comment: before.comment.clone(),
                ..r.clone()
            },
            before
        );
    }

    #[test]
    fn test_merge_identical_values_is_not_a_change() {
        let mut r = review("r1", 5, true);
        let patch = ReviewPatch {
            rating: Some(Some(5)),
            verified: Some(Some(true)),
            ..Default::default()
        };
        assert!(!r.merge(&patch));
    }

    #[test]
    fn test_merge_never_rewrites_review_id() {
        let mut r = review("r1", 5, true);
        let patch: ReviewPatch = serde_json::from_value(json!({ "review_id": "r2" })).unwrap();
        assert!(!r.merge(&patch));
        assert_eq!(r.review_id, "r1");
        assert!(r.extra.is_empty());
    }

    #[test]
    fn test_null_condition_matches_missing_field() {
        let filter: ReviewFilter = serde_json::from_value(json!({ "comment": null })).unwrap();
        assert_eq!(filter.comment, Some(None));
        assert!(!filter.is_empty());

        let mut r = review("r1", 5, true);
        assert!(!r.matches(&filter));
        r.comment = None;
        assert!(r.matches(&filter));
    }

    #[test]
    fn test_null_condition_on_required_field_matches_nothing() {
        let filter: ReviewFilter = serde_json::from_value(json!({ "rating": null })).unwrap();
        assert!(!review("r1", 5, true).matches(&filter));

        let filter: ReviewFilter = serde_json::from_value(json!({ "review_id": null })).unwrap();
        assert!(!review("r1", 5, true).matches(&filter));
    }

    #[test]
    fn test_null_in_patch_clears_optional_field() {
        let patch: ReviewPatch =
            serde_json::from_value(json!({ "comment": null, "user_id": null })).unwrap();
        assert!(!patch.is_empty());
        assert!(patch.nulled_required_fields().is_empty());

        let mut r = review("r1", 5, true);
        assert!(r.merge(&patch));
        assert_eq!(r.comment, None);
        assert_eq!(r.user_id, None);
        assert_eq!(r.verified, Some(true));

        // already cleared
        assert!(!r.merge(&patch));
    }

    #[test]
    fn test_null_in_patch_leaves_required_fields() {
        let patch: ReviewPatch =
            serde_json::from_value(json!({ "rating": null, "created_at": null })).unwrap();
        assert_eq!(patch.nulled_required_fields(), vec!["rating", "created_at"]);

        let mut r = review("r1", 5, true);
        let before = r.clone();
        assert!(!r.merge(&patch));
        assert_eq!(r, before);
    }

    #[test]
    fn test_absent_and_null_serialize_differently() {
        let patch = ReviewPatch {
            author: Some(None),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "author": null }));
        assert_eq!(
            serde_json::to_value(ReviewPatch::default()).unwrap(),
            json!({})
        );
    }
}
