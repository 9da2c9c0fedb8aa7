use catalog_axum::start_server;
use catalog_sqlite::{Db, seed::sample_products};
use catalogd::{AppConfig, CatalogApp, Cli, Commands, log_filter};
use tracing::{Level, event};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Replace the catalog with the sample products, logging each document.
async fn seed(db: &Db) -> anyhow::Result<()> {
    let products = sample_products();
    let inserted = db.reseed(&products).await?;
    for product in &products {
        let document = serde_json::to_string(product)?;
        event!(
            Level::INFO,
            sku = %product.sku,
            document = %document,
            "inserted sample product"
        );
    }
    event!(Level::INFO, inserted, "seeded catalog");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Every crate in the workspace reports through `tracing`; write those
    // events to stdout, filtered by RUST_LOG (info when unset).
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::registry()
        .with(log_filter(rust_log.as_deref()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::import()?;
    let AppConfig { server, database } = AppConfig::load(&cli)?;

    // The one and only handle to the store, shared by everything below
    let db = Db::open(&database).await?;

    match cli.command() {
        Commands::Seed => seed(&db).await,
        Commands::Serve { seed: with_seed } => {
            if with_seed {
                seed(&db).await?;
            }
            start_server(server, CatalogApp::new(db)).await?;
            Ok(())
        }
    }
}
