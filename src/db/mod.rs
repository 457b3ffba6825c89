//! PostgreSQL persistence for animal records

pub mod animal_repo;
pub mod pool;
pub mod repository;

pub use animal_repo::{AnimalRepository, PgAnimalRepository};
pub use pool::{create_pool, DbPool};
pub use repository::{Repository, RepositoryError, RepositoryResult, RetryPolicy};

use sqlx::migrate::{MigrateError, Migrator};

/// Schema migrations embedded from `migrations/`
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Bring the schema up to date; already-applied migrations are skipped
pub async fn run_migrations(pool: &DbPool) -> Result<(), MigrateError> {
    tracing::info!(available = MIGRATOR.iter().count(), "Running database migrations");
    MIGRATOR.run(pool).await
}
