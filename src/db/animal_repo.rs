//! PostgreSQL storage for animal records
//!
//! Reads are retried on transient failures. Inserts run exactly once.

use async_trait::async_trait;
use backoff::future::retry;
use futures::future::BoxFuture;
use sqlx::Row;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    db::{
        repository::{Repository, RepositoryError, RepositoryResult, RetryPolicy},
        DbPool,
    },
    logging::Timer,
    models::{Animal, NewAnimal, Sex},
};

const SELECT_BY_ID: &str = "SELECT id, name, sex, weight, height, age, arrival_date, mother_id, father_id \
     FROM animals WHERE id = $1";
const SELECT_ALL: &str = "SELECT id, name, sex, weight, height, age, arrival_date, mother_id, father_id \
     FROM animals ORDER BY name, id";
const EXISTS_BY_ID: &str = "SELECT EXISTS(SELECT 1 FROM animals WHERE id = $1)";
const COUNT_ALL: &str = "SELECT COUNT(*) FROM animals";
const INSERT: &str = "INSERT INTO animals \
     (id, name, sex, weight, height, age, arrival_date, mother_id, father_id) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)";

/// Persistence collaborator for the animal endpoints
#[async_trait]
pub trait AnimalRepository: Repository<Entity = Animal, Id = Uuid> {
    /// Persist a validated animal, assigning its identifier
    async fn save(&self, animal: NewAnimal) -> RepositoryResult<Animal>;

    /// All stored animals ordered by name
    async fn find_all(&self) -> RepositoryResult<Vec<Animal>>;
}

pub struct PgAnimalRepository {
    pool: DbPool,
    retry: RetryPolicy,
}

impl PgAnimalRepository {
    pub fn new(pool: DbPool) -> Self {
        Self::with_retry_policy(pool, RetryPolicy::default())
    }

    pub fn with_retry_policy(pool: DbPool, retry: RetryPolicy) -> Self {
        Self { pool, retry }
    }

    /// Run a read, retrying transient failures up to `max_retries` times
    async fn read_with_retry<F, T>(&self, operation: &'static str, read: F) -> RepositoryResult<T>
    where
        F: Fn() -> BoxFuture<'static, RepositoryResult<T>>,
    {
        let max_retries = self.retry.max_retries;
        let mut attempt = 0u32;

        retry(self.retry.backoff(), || {
            attempt += 1;
            let current = attempt;
            let fut = read();
            async move {
                fut.await.map_err(|e| {
                    if e.is_retryable() && current <= max_retries {
                        tracing::warn!(operation, attempt = current, error = %e, "Retrying read");
                        backoff::Error::transient(e)
                    } else {
                        backoff::Error::permanent(e)
                    }
                })
            }
        })
        .await
    }

    fn row_to_animal(row: &sqlx::postgres::PgRow) -> RepositoryResult<Animal> {
        let sex: String = row.try_get("sex")?;
        let sex = Sex::parse(&sex)
            .ok_or_else(|| RepositoryError::Corrupt(format!("unknown sex {:?}", sex)))?;

        Ok(Animal {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            sex,
            weight: row.try_get("weight")?,
            height: row.try_get("height")?,
            age: row.try_get("age")?,
            arrival_date: row.try_get("arrival_date")?,
            mother_id: row.try_get("mother_id")?,
            father_id: row.try_get("father_id")?,
        })
    }
}

#[async_trait]
impl Repository for PgAnimalRepository {
    type Entity = Animal;
    type Id = Uuid;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Animal>> {
        let pool = self.pool.clone();
        self.read_with_retry("find_animal", move || {
            let pool = pool.clone();
            Box::pin(async move {
                let row = sqlx::query(SELECT_BY_ID).bind(id).fetch_optional(&pool).await?;
                row.as_ref().map(Self::row_to_animal).transpose()
            })
        })
        .await
    }

    async fn exists(&self, id: Uuid) -> RepositoryResult<bool> {
        let pool = self.pool.clone();
        self.read_with_retry("animal_exists", move || {
            let pool = pool.clone();
            Box::pin(async move {
                Ok(sqlx::query_scalar::<_, bool>(EXISTS_BY_ID)
                    .bind(id)
                    .fetch_one(&pool)
                    .await?)
            })
        })
        .await
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let pool = self.pool.clone();
        self.read_with_retry("count_animals", move || {
            let pool = pool.clone();
            Box::pin(async move {
                Ok(sqlx::query_scalar::<_, i64>(COUNT_ALL).fetch_one(&pool).await?)
            })
        })
        .await
    }

    async fn health_check(&self) -> RepositoryResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(drop)
            .map_err(|e| RepositoryError::Unavailable(format!("health check failed: {}", e)))
    }
}

#[async_trait]
impl AnimalRepository for PgAnimalRepository {
    async fn save(&self, animal: NewAnimal) -> RepositoryResult<Animal> {
        let id = Uuid::new_v4();
        let span = crate::db_span!("insert_animal");
        span.record("animal_id", tracing::field::display(id));
        let timer = Timer::start("insert_animal");

        let done = sqlx::query(INSERT)
            .bind(id)
            .bind(&animal.name)
            .bind(animal.sex.as_str())
            .bind(animal.weight)
            .bind(animal.height)
            .bind(animal.age)
            .bind(animal.arrival_date)
            .bind(animal.mother_id)
            .bind(animal.father_id)
            .execute(&self.pool)
            .instrument(span.clone())
            .await?;

        span.record("rows_affected", done.rows_affected());
        span.in_scope(|| timer.stop());

        Ok(animal.into_animal(id))
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Animal>> {
        let pool = self.pool.clone();
        self.read_with_retry("list_animals", move || {
            let pool = pool.clone();
            Box::pin(async move {
                let rows = sqlx::query(SELECT_ALL).fetch_all(&pool).await?;
                rows.iter().map(Self::row_to_animal).collect()
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selects_read_every_mapped_column() {
        for column in [
            "id", "name", "sex", "weight", "height", "age", "arrival_date", "mother_id", "father_id",
        ] {
            assert!(SELECT_BY_ID.contains(column), "missing {}", column);
            assert!(SELECT_ALL.contains(column), "missing {}", column);
            assert!(INSERT.contains(column), "missing {}", column);
        }
    }

    #[test]
    fn test_listing_is_ordered_by_name() {
        assert!(SELECT_ALL.ends_with("ORDER BY name, id"));
    }
}
