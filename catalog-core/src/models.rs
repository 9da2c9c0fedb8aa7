mod datetime;
mod fields;
mod product;
mod review;
mod update;

pub use datetime::DateTime;
pub use fields::FieldMap;
pub use product::{Product, ProductFailure, ProductPatch, Sku};
pub use review::{Review, ReviewFilter, ReviewPatch};
pub use update::{ElementCounts, ReviewSelector, UpdateOutcome, apply_review_update};
