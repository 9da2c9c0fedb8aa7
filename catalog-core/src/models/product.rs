use super::Review;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The unique, immutable key of a product (its stock keeping unit).
#[derive(Debug, Hash, PartialEq, Eq, Clone, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(transparent)]
#[repr(transparent)]
pub struct Sku(String);

impl Sku {
    /// View the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Sku {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Sku {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<Sku> for String {
    fn from(value: Sku) -> Self {
        value.0
    }
}

impl std::ops::Deref for Sku {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for Sku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A catalog product, stored as a single document.
///
/// The `reviews` array is owned entirely by the product: reviews are created,
/// modified and removed only as part of an update to their product, and their
/// order is the order in which they were added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Product {
    /// Unique identifier for the product
    pub sku: Sku,
    /// Display name
    pub name: String,
    /// Unit price, non-negative with at most two decimal places
    #[serde(with = "rust_decimal::serde::float")]
    #[cfg_attr(feature = "schemars", schemars(with = "f64"))]
    pub price: Decimal,
    /// An optional category the product is listed under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Free-form labels
    #[serde(default)]
    pub tags: Vec<String>,
    /// Reviews, in insertion order
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// A partial update to the top-level fields of a product.
///
/// Only the fields that are `Some` are replaced. Reviews are not part of this
/// patch; they are modified through the review operations instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct ProductPatch {
    /// Replacement display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement price
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    #[cfg_attr(feature = "schemars", schemars(with = "Option<f64>"))]
    pub price: Option<Decimal>,
    /// Replacement category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Replacement tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl ProductPatch {
    /// Whether the patch would not touch any field
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.category.is_none() && self.tags.is_none()
    }
}

impl Product {
    /// Merge the `Some` fields of `patch` into this product, reporting whether
    /// anything changed.
    pub fn merge(&mut self, patch: &ProductPatch) -> bool {
        let mut changed = false;
        if let Some(name) = &patch.name {
            changed |= replace(&mut self.name, name);
        }
        if let Some(price) = &patch.price {
            changed |= replace(&mut self.price, price);
        }
        if let Some(category) = &patch.category {
            changed |= replace(&mut self.category, &Some(category.clone()));
        }
        if let Some(tags) = &patch.tags {
            changed |= replace(&mut self.tags, tags);
        }
        changed
    }
}

pub(super) fn replace<T: PartialEq + Clone>(slot: &mut T, value: &T) -> bool {
    if slot == value {
        false
    } else {
        *slot = value.clone();
        true
    }
}

/// The ways creating a product can fail, other than a storage error
#[derive(Debug, thiserror::Error)]
pub enum ProductFailure {
    /// A product with this sku already exists
    #[error("product with sku '{0}' already exists")]
    SkuConflict(Sku),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn keyboard() -> Product {
        serde_json::from_str(
            r#"{
                "sku": "SKU1002",
                "name": "Mechanical Keyboard",
                "price": 89.99,
                "tags": ["peripherals", "keyboard"]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_deserialize_defaults() {
        let product = keyboard();
        assert_eq!(product.price, Decimal::from_str("89.99").unwrap());
        assert_eq!(product.category, None);
        assert!(product.reviews.is_empty());
    }

    #[test]
    fn test_merge_only_touches_given_fields() {
        let mut product = keyboard();
        let patch = ProductPatch {
            price: Some(Decimal::from_str("79.99").unwrap()),
            ..Default::default()
        };
        assert!(product.merge(&patch));
        assert_eq!(product.name, "Mechanical Keyboard");
        assert_eq!(product.price, Decimal::from_str("79.99").unwrap());
        assert_eq!(product.tags, vec!["peripherals", "keyboard"]);

        // the second application is a no-op
        assert!(!product.merge(&patch));
    }
}
