use catalog_core::{ReviewEngine, ports::Application};
use catalog_sqlite::{Db, config::SqliteConfig, seed::sample_products};

// Every test gets its own in-memory database, loaded with the sample
// products, so tests may freely mutate it.
#[derive(Clone)]
pub struct TestApp(pub ReviewEngine<Db>);

impl Application for TestApp {
    type Repository = Db;

    fn database(&self) -> &Self::Repository {
        self.0.repository()
    }

    fn reviews(&self) -> &ReviewEngine<Self::Repository> {
        &self.0
    }
}

pub async fn seeded_app() -> TestApp {
    let db = Db::open(&SqliteConfig::default()).await.unwrap();
    db.reseed(&sample_products()).await.unwrap();
    TestApp(ReviewEngine::new(db))
}
