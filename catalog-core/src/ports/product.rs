use crate::models::{Product, ProductFailure, ProductPatch, Sku};
use std::future::Future;

/// Repository interface for whole-document product operations.
///
/// Each product is a single document keyed by its sku. These operations
/// treat the document as a unit; see [`super::ReviewRepository`] for updates
/// that address individual reviews inside it.
pub trait ProductRepository: super::Repository {
    /// Insert a new product.
    ///
    /// # Returns
    ///
    /// - Ok(Ok(product)) with the stored document
    /// - Ok(Err(ProductFailure::SkuConflict)) if the sku is already taken
    /// - Err otherwise
    fn create_product(
        &self,
        product: Product,
    ) -> impl Future<Output = Result<Result<Product, ProductFailure>, Self::Error>> + Send;

    /// Fetch a product by sku, returning Option::None if it does not exist.
    fn get_product(
        &self,
        sku: &Sku,
    ) -> impl Future<Output = Result<Option<Product>, Self::Error>> + Send;

    /// Whether a product with this sku exists.
    fn product_exists(&self, sku: &Sku) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Fetch every product, in insertion order.
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, Self::Error>> + Send;

    /// Merge `patch` into the top-level fields of a product.
    ///
    /// # Returns
    ///
    /// - Ok(Some(product)) with the updated document
    /// - Ok(None) if the product does not exist
    /// - Err otherwise
    fn update_product(
        &self,
        sku: &Sku,
        patch: &ProductPatch,
    ) -> impl Future<Output = Result<Option<Product>, Self::Error>> + Send;

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// - Ok(true) if the product was deleted
    /// - Ok(false) if no such product exists
    /// - Err otherwise
    fn delete_product(&self, sku: &Sku) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}
