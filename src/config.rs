//! Environment-driven configuration
//!
//! Every setting has a default except `POSTGRES_URL`. A `.env` file in the
//! working directory is honored for local runs.

use envconfig::Envconfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::models::{AnimalValidator, SpeciesBounds};

#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct Config {
    #[serde(flatten)]
    #[envconfig(nested = true)]
    pub server: ServerConfig,

    #[serde(flatten)]
    #[envconfig(nested = true)]
    pub database: DatabaseConfig,

    /// Species bounds and name limits
    #[serde(flatten)]
    #[envconfig(nested = true)]
    pub species: SpeciesConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct ServerConfig {
    #[envconfig(from = "HOST", default = "0.0.0.0")]
    pub host: String,

    #[envconfig(from = "PORT", default = "8080")]
    pub port: u16,

    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: String,

    /// development, staging or production
    #[envconfig(from = "ENVIRONMENT", default = "development")]
    pub environment: String,

    #[envconfig(from = "REQUEST_TIMEOUT_SECS", default = "30")]
    pub request_timeout_secs: u64,

    #[envconfig(from = "SHUTDOWN_TIMEOUT_SECS", default = "30")]
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    #[envconfig(from = "POSTGRES_URL")]
    pub url: String,

    #[envconfig(from = "DATABASE_POOL_MAX_SIZE", default = "10")]
    pub pool_max_size: u32,

    #[envconfig(from = "DATABASE_POOL_MIN_IDLE", default = "1")]
    pub pool_min_idle: u32,

    #[envconfig(from = "DATABASE_POOL_TIMEOUT_SECONDS", default = "30")]
    pub pool_timeout_seconds: u64,

    #[envconfig(from = "DATABASE_POOL_IDLE_TIMEOUT_SECONDS", default = "600")]
    pub pool_idle_timeout_seconds: u64,
}

impl DatabaseConfig {
    pub fn pool_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_timeout_seconds)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_idle_timeout_seconds)
    }

    /// URL with the credentials replaced, safe to log
    pub fn masked_url(&self) -> String {
        match (self.url.split_once("://"), self.url.rfind('@')) {
            (Some((scheme, _)), Some(at)) => format!("{}://***{}", scheme, &self.url[at..]),
            _ => "***".to_string(),
        }
    }
}

/// Plausibility bounds for the species housed by this registry
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct SpeciesConfig {
    /// Species name, for logs
    #[envconfig(from = "SPECIES_NAME", default = "Burmese python")]
    pub name: String,

    /// Maximum age in years
    #[envconfig(from = "SPECIES_MAX_AGE", default = "30")]
    pub max_age: f64,

    /// Maximum height in meters
    #[envconfig(from = "SPECIES_MAX_HEIGHT", default = "8")]
    pub max_height: f64,

    /// Maximum weight in kilograms
    #[envconfig(from = "SPECIES_MAX_WEIGHT", default = "180")]
    pub max_weight: f64,

    /// Maximum animal name length in characters
    #[envconfig(from = "ANIMAL_NAME_MAX_LENGTH", default = "120")]
    pub name_max_length: usize,
}

impl SpeciesConfig {
    /// Bounds applied to age, height and weight
    pub fn bounds(&self) -> SpeciesBounds {
        SpeciesBounds::new(&self.name, self.max_age, self.max_height, self.max_weight)
    }

    /// Validator for animal creation requests
    pub fn validator(&self) -> AnimalValidator {
        AnimalValidator::new(self.bounds()).with_name_max_length(self.name_max_length)
    }
}

impl Default for SpeciesConfig {
    fn default() -> Self {
        let bounds = SpeciesBounds::burmese_python();
        Self {
            name: bounds.species,
            max_age: bounds.max_age,
            max_height: bounds.max_height,
            max_weight: bounds.max_weight,
            name_max_length: crate::models::validation::DEFAULT_NAME_MAX_LENGTH,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenv::dotenv().ok();

        // Parse configuration from environment
        Config::init_from_env().map_err(Error::from)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::config("Server port cannot be 0"));
        }

        if self.database.url.is_empty() {
            return Err(Error::config("Database URL cannot be empty"));
        }

        let species = &self.species;
        let bounds = [species.max_age, species.max_height, species.max_weight];
        if bounds.iter().any(|b| !b.is_finite() || *b <= 0.0) {
            return Err(Error::config(format!(
                "Species bounds for {} must be positive numbers",
                species.name
            )));
        }

        if species.name_max_length == 0 {
            return Err(Error::config("Animal name max length must be at least 1"));
        }

        Ok(())
    }

    /// Log configuration (with sensitive data masked)
    pub fn log_config(&self) {
        tracing::info!(
            server_address = %self.server.address(),
            environment = %self.server.environment,
            log_level = %self.server.log_level,
            "Server configuration"
        );

        tracing::info!(
            url = %self.database.masked_url(),
            pool_size = %self.database.pool_max_size,
            "Database configuration"
        );

        tracing::info!(
            species = %self.species.name,
            max_age = %self.species.max_age,
            max_height = %self.species.max_height,
            max_weight = %self.species.max_weight,
            name_max_length = %self.species.name_max_length,
            "Species configuration"
        );
    }
}
