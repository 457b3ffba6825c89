//! Storage abstractions shared by every repository
//!
//! `RepositoryError` classifies driver failures once, at the boundary, so
//! callers only need to ask whether a failure is worth retrying.

use async_trait::async_trait;
use backoff::ExponentialBackoff;
use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The database could not be reached
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Database operation timed out: {0}")]
    Timeout(String),

    /// Unique constraint violation
    #[error("Conflicting record: {0}")]
    Conflict(String),

    #[error("Query failed: {0}")]
    Query(String),

    /// A stored row does not map to a domain value
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

const UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => {
                RepositoryError::Timeout("no connection available in time".to_string())
            },
            e @ (sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_)) => {
                RepositoryError::Unavailable(e.to_string())
            },
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                RepositoryError::Conflict(db.message().to_string())
            },
            sqlx::Error::ColumnDecode { index, source } => {
                RepositoryError::Corrupt(format!("column {}: {}", index, source))
            },
            other => RepositoryError::Query(other.to_string()),
        }
    }
}

impl RepositoryError {
    /// Transient failures that may succeed on a later attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, RepositoryError::Unavailable(_) | RepositoryError::Timeout(_))
    }
}

impl From<RepositoryError> for crate::error::Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Timeout(msg) => crate::error::Error::Timeout(msg),
            other => crate::error::Error::database(other.to_string()),
        }
    }
}

/// Lookups every stored entity supports
#[async_trait]
pub trait Repository: Send + Sync {
    type Entity: Send + Sync;
    type Id: Send + Sync + Debug;

    async fn find_by_id(&self, id: Self::Id) -> RepositoryResult<Option<Self::Entity>>;

    async fn exists(&self, id: Self::Id) -> RepositoryResult<bool>;

    async fn count(&self) -> RepositoryResult<i64>;

    /// Cheap round trip used by the readiness probe
    async fn health_check(&self) -> RepositoryResult<()>;
}

/// How often and how patiently reads are retried
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    /// Upper bound on the total time spent retrying one read
    pub max_elapsed: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            max_elapsed: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn attempts(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Exponential schedule for one retried read
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.initial_delay,
            current_interval: self.initial_delay,
            max_interval: self.max_delay,
            multiplier: self.multiplier,
            max_elapsed_time: Some(self.max_elapsed),
            ..ExponentialBackoff::default()
        }
    }
}
