//! Zoo registry - HTTP service for validated zoo animal records
//!
//! Loads configuration from the environment, connects to PostgreSQL, runs
//! the schema migrations and serves the animal API until shutdown.

use std::sync::Arc;

use zoo_registry::{
    config::Config,
    db::{self, PgAnimalRepository},
    error::{Error, Result},
    logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Arc::new(Config::from_env()?);

    // Validate configuration
    config.validate()?;

    // Initialize logging/tracing
    logging::init_tracing(&config.server)?;

    // Log configuration (with sensitive data masked)
    config.log_config();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting zoo registry");

    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool)
        .await
        .map_err(|e| Error::database(format!("Failed to run migrations: {}", e)))?;

    let animals = Arc::new(PgAnimalRepository::new(pool));

    zoo_registry::create_server(config, animals).await?;

    tracing::info!("Zoo registry shutdown complete");
    Ok(())
}
