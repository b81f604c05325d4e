//! LocalLibrary catalog provisioning tool.
//!
//! Loads the configuration, applies the schema migrations and prints a
//! short summary of the catalog contents.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use locallibrary_catalog::{config::AppConfig, db, repository::Repository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("locallibrary_catalog={}", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("LocalLibrary catalog v{}", env!("CARGO_PKG_VERSION"));

    let pool = db::connect(&config.database).await?;
    tracing::info!("Connected to database");

    db::migrate(&pool).await?;
    tracing::info!("Database migrations completed");

    let repository = Repository::new(pool);

    let books = repository.books.list().await?;
    let authors = repository.authors.list().await?;
    let genres = repository.genres.list().await?;
    let copies = repository.book_instances.list().await?;

    tracing::info!(
        "Catalog: {} books, {} authors, {} genres, {} copies",
        books.len(),
        authors.len(),
        genres.len(),
        copies.len()
    );

    Ok(())
}
