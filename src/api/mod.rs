//! HTTP surface of the zoo registry

pub mod animals;
pub mod health;
pub mod server;

use axum::extract::FromRef;
use std::sync::Arc;

use crate::config::Config;
use crate::db::AnimalRepository;
use crate::models::AnimalValidator;

pub use animals::{create_animal, get_animal, list_animals};
pub use health::{
    build_info, health_check, ready_check, BuildInfo, ComponentHealth, HealthResponse, HealthState,
    HealthStatus, ReadyResponse, BUILD_INFO,
};
pub use server::{create_router, create_server, shutdown_signal};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub animals: Arc<dyn AnimalRepository>,
    /// Rules configured for the housed species
    pub validator: Arc<AnimalValidator>,
    pub health: Arc<HealthState>,
}

impl AppState {
    /// State with the validator described by `config.species`
    pub fn new(config: &Config, animals: Arc<dyn AnimalRepository>) -> Self {
        Self::with_validator(config.species.validator(), animals)
    }

    pub fn with_validator(validator: AnimalValidator, animals: Arc<dyn AnimalRepository>) -> Self {
        Self {
            animals,
            validator: Arc::new(validator),
            health: Arc::new(HealthState::new()),
        }
    }
}

impl FromRef<AppState> for Arc<HealthState> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.health)
    }
}
