//! Animal data models
//!
//! `AnimalDto` is the creation payload exactly as received on the wire.
//! `NewAnimal` is the same data after validation, with parsed types, and
//! `Animal` is the stored record returned to clients.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{AnimalError, Violation};

/// Wire format for arrival dates: local date-time, whole seconds, no offset
pub const ARRIVAL_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Sex of an animal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Parse sex from its stored representation
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "MALE" => Some(Sex::Male),
            "FEMALE" => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "MALE",
            Sex::Female => "FEMALE",
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Animal creation request as received from clients
///
/// The date and parent identifiers stay as raw strings so that their
/// format can be reported with the proper error code instead of a
/// deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalDto {
    pub name: String,
    pub sex: Sex,
    /// Kilograms
    pub weight: f64,
    /// Meters
    pub height: f64,
    /// Years
    pub age: f64,
    /// ISO 8601 date-time
    pub arrival_date: String,
    #[serde(default)]
    pub mother_id: Option<String>,
    #[serde(default)]
    pub father_id: Option<String>,
}

/// A validated animal that has not been persisted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnimal {
    pub name: String,
    pub sex: Sex,
    pub weight: f64,
    pub height: f64,
    pub age: f64,
    pub arrival_date: NaiveDateTime,
    pub mother_id: Option<Uuid>,
    pub father_id: Option<Uuid>,
}

impl NewAnimal {
    /// Attach the identifier assigned by the store
    pub fn into_animal(self, id: Uuid) -> Animal {
        Animal {
            id,
            name: self.name,
            sex: self.sex,
            weight: self.weight,
            height: self.height,
            age: self.age,
            arrival_date: self.arrival_date,
            mother_id: self.mother_id,
            father_id: self.father_id,
        }
    }
}

/// A stored animal record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    pub id: Uuid,
    pub name: String,
    pub sex: Sex,
    pub weight: f64,
    pub height: f64,
    pub age: f64,
    /// Serialized without offset, e.g. `2022-01-01T00:00:00`
    pub arrival_date: NaiveDateTime,
    pub mother_id: Option<Uuid>,
    pub father_id: Option<Uuid>,
}

/// Parse an identifier taken from a path or payload
pub fn parse_id(raw: &str) -> Result<Uuid, AnimalError> {
    if !super::validation::is_uuid_shaped(raw) {
        return Err(Violation::InvalidId.into_error());
    }
    Uuid::parse_str(raw).map_err(|_| Violation::InvalidId.into_error())
}
