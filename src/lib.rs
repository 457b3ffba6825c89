//! Zoo registry library
//!
//! This library exposes the core modules of the zoo registry for use in
//! integration tests and by the server binary.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export commonly used types at the crate root
pub use config::Config;
pub use error::{Error, Result};

// Re-export model types
pub use models::{
    Animal, AnimalDto, AnimalError, AnimalErrorCode, AnimalValidator, NewAnimal, Sex,
    SpeciesBounds, Violation,
};

// Re-export API server functions
pub use api::server::{create_router, create_server, shutdown_signal};
pub use api::AppState;

// Re-export health check types
pub use api::{BuildInfo, ComponentHealth, HealthResponse, HealthState, HealthStatus, ReadyResponse};
