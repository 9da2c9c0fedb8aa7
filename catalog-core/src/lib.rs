#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

/// Core domain models for the product catalog.
///
/// This module contains the data structures stored by the catalog (products and
/// their embedded reviews), together with the typed patches and filters used to
/// address and modify individual reviews.
///
/// The matching and merging rules for reviews live here as plain functions over
/// these structures, so that every storage backend applies exactly the same
/// semantics inside its own atomic update.
pub mod models;

/// Interface traits for the product catalog.
///
/// This module contains the "ports" in the hexagonal architecture pattern.
///
/// These traits define the contract between the domain logic and external adapters
/// (such as databases or HTTP servers) without specifying implementation details.
pub mod ports;

mod engine;
pub use engine::{NoChangeCause, ReviewEngine, ReviewFailure};
