//! Data models for the zoo registry
//!
//! This module contains the animal records, the error taxonomy reported to
//! clients and the validation rules applied before persistence.

pub mod animal;
pub mod error;
pub mod species;
pub mod validation;

// Re-export commonly used types
pub use animal::{parse_id, Animal, AnimalDto, NewAnimal, Sex};
pub use error::{AnimalError, AnimalErrorCode, Violation, Violations};
pub use species::SpeciesBounds;
pub use validation::{AnimalValidator, RULES};
