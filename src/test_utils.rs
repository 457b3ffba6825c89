//! Test utilities for the zoo registry
//!
//! This module provides an in-memory animal repository with failure
//! injection, plus builders for test records.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use uuid::Uuid;

use crate::db::repository::{Repository, RepositoryError, RepositoryResult};
use crate::db::AnimalRepository;
use crate::models::{Animal, NewAnimal, Sex};

/// In-memory implementation of AnimalRepository for testing
#[derive(Debug, Clone)]
pub struct MockAnimalRepository {
    animals: Arc<Mutex<Vec<Animal>>>,
    fail_next: Arc<Mutex<Option<String>>>,
    save_calls: Arc<AtomicUsize>,
}

impl Default for MockAnimalRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAnimalRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            animals: Arc::new(Mutex::new(Vec::new())),
            fail_next: Arc::new(Mutex::new(None)),
            save_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Configure the mock to fail on the next operation
    pub fn fail_next_operation(&self, error_message: &str) {
        *self.fail_next.lock().unwrap() = Some(error_message.to_string());
    }

    /// Get all stored animals
    pub fn get_all_animals(&self) -> Vec<Animal> {
        self.animals.lock().unwrap().clone()
    }

    /// Add an animal directly, bypassing validation
    pub fn add_animal(&self, animal: Animal) {
        self.animals.lock().unwrap().push(animal);
    }

    /// Number of times `save` was called, including failed calls
    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> RepositoryResult<()> {
        match self.fail_next.lock().unwrap().take() {
            Some(msg) => Err(RepositoryError::Query(msg)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Repository for MockAnimalRepository {
    type Entity = Animal;
    type Id = Uuid;

    async fn find_by_id(&self, id: Self::Id) -> RepositoryResult<Option<Self::Entity>> {
        self.check_failure()?;
        let animals = self.animals.lock().unwrap();
        Ok(animals.iter().find(|a| a.id == id).cloned())
    }

    async fn exists(&self, id: Self::Id) -> RepositoryResult<bool> {
        self.check_failure()?;
        let animals = self.animals.lock().unwrap();
        Ok(animals.iter().any(|a| a.id == id))
    }

    async fn count(&self) -> RepositoryResult<i64> {
        self.check_failure()?;
        let animals = self.animals.lock().unwrap();
        Ok(animals.len() as i64)
    }

    async fn health_check(&self) -> RepositoryResult<()> {
        self.check_failure()
    }
}

#[async_trait]
impl AnimalRepository for MockAnimalRepository {
    async fn save(&self, animal: NewAnimal) -> RepositoryResult<Animal> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let animal = animal.into_animal(Uuid::new_v4());
        self.animals.lock().unwrap().push(animal.clone());
        Ok(animal)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Animal>> {
        self.check_failure()?;
        let mut animals = self.animals.lock().unwrap().clone();
        animals.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(animals)
    }
}

/// Create a validated animal with reference-species values
pub fn create_test_new_animal() -> NewAnimal {
    NewAnimal {
        name: "Test".to_string(),
        sex: Sex::Male,
        weight: 50.0,
        height: 2.0,
        age: 5.0,
        arrival_date: NaiveDate::from_ymd_opt(2022, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid reference date"),
        mother_id: None,
        father_id: None,
    }
}

/// Create a stored animal with a fresh identifier
pub fn create_test_animal() -> Animal {
    create_test_new_animal().into_animal(Uuid::new_v4())
}
