//! The concrete application the server runs.

use catalog_core::{ReviewEngine, ports::Application};
use catalog_sqlite::Db;

/// The catalog backed by SQLite.
///
/// The database is opened once at startup and shared, through the review
/// engine, by every request handler.
#[derive(Clone, Debug)]
pub struct CatalogApp {
    engine: ReviewEngine<Db>,
}

impl CatalogApp {
    /// Build the application around an open database.
    pub fn new(db: Db) -> Self {
        Self {
            engine: ReviewEngine::new(db),
        }
    }
}

impl Application for CatalogApp {
    type Repository = Db;

    fn database(&self) -> &Self::Repository {
        self.engine.repository()
    }

    fn reviews(&self) -> &ReviewEngine<Self::Repository> {
        &self.engine
    }
}
