mod product;
mod review;

pub use product::ProductRepository;
pub use review::ReviewRepository;

use crate::ReviewEngine;

/// The base trait every repository builds upon.
///
/// Storage backends report their own infrastructure failures through
/// `Error`. Domain outcomes (a missing product, a conflicting sku, ...) are
/// never expressed through this type; operations return them as values.
pub trait Repository {
    /// The error type for infrastructure failures (connection loss, timeouts, ...)
    type Error: std::error::Error + Send + Sync + 'static;
}

/// A repository offering everything the catalog needs
pub trait CatalogRepository: ProductRepository + ReviewRepository {}

impl<T: ProductRepository + ReviewRepository> CatalogRepository for T {}

/// The application-level seam between the HTTP surface and the rest of the
/// system.
///
/// An application owns its repository (opened once, at startup) and the
/// review engine built around it; request handlers only ever borrow them.
pub trait Application {
    /// The storage backend
    type Repository: CatalogRepository;

    /// Get a handle to the repository
    fn database(&self) -> &Self::Repository;

    /// Get a handle to the review mutation engine
    fn reviews(&self) -> &ReviewEngine<Self::Repository>;
}
