//! Animal endpoints
//!
//! `POST /animals` validates the payload and stores it, `GET /animals` lists
//! every stored animal and `GET /animals/:id` looks one up.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::Utc;

use crate::api::AppState;
use crate::error::Result;
use crate::logging::Timer;
use crate::models::{parse_id, Animal, AnimalDto, Violation};

/// Validate and store a new animal
///
/// Exactly one persistence call is made when validation passes and none
/// when it fails. Only the first violation is returned to the client.
pub async fn create_animal(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AnimalDto>, JsonRejection>,
) -> Result<Json<Animal>> {
    let Json(dto) = payload?;
    let now = Utc::now().naive_utc();

    let new_animal = match state.validator.accept_at(dto.clone(), now) {
        Ok(animal) => animal,
        Err(error) => {
            let violations = state.validator.validate_all_at(&dto, now);
            tracing::warn!(
                name = %dto.name,
                code = %error.code(),
                violations = %violations,
                "Animal rejected"
            );
            return Err(error.into());
        },
    };

    let timer = Timer::start("save_animal");
    let animal = state.animals.save(new_animal).await?;
    timer.stop();

    tracing::info!(animal_id = %animal.id, name = %animal.name, "Animal created");
    Ok(Json(animal))
}

/// List every stored animal
pub async fn list_animals(State(state): State<AppState>) -> Result<Json<Vec<Animal>>> {
    let animals = state.animals.find_all().await?;
    tracing::debug!(count = animals.len(), "Animals listed");
    Ok(Json(animals))
}

/// Look up a single animal by identifier
pub async fn get_animal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Animal>> {
    let id = parse_id(&id)?;

    match state.animals.find_by_id(id).await? {
        Some(animal) => Ok(Json(animal)),
        None => Err(Violation::NotFound.into()),
    }
}
