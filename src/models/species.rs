//! Species-specific plausibility bounds

use serde::{Deserialize, Serialize};

/// Upper limits on the physical characteristics of one species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesBounds {
    /// Species these bounds describe, used in logs only
    pub species: String,
    /// Maximum age in years
    pub max_age: f64,
    /// Maximum height in meters
    pub max_height: f64,
    /// Maximum weight in kilograms
    pub max_weight: f64,
}

impl SpeciesBounds {
    pub fn new(species: impl Into<String>, max_age: f64, max_height: f64, max_weight: f64) -> Self {
        Self {
            species: species.into(),
            max_age,
            max_height,
            max_weight,
        }
    }

    /// Reference species for the registry
    pub fn burmese_python() -> Self {
        Self::new("Burmese python", 30.0, 8.0, 180.0)
    }

    /// Whether age, height and weight are all plausible for this species
    pub fn admits(&self, age: f64, height: f64, weight: f64) -> bool {
        within(age, self.max_age) && within(height, self.max_height) && within(weight, self.max_weight)
    }
}

impl Default for SpeciesBounds {
    fn default() -> Self {
        Self::burmese_python()
    }
}

fn within(value: f64, max: f64) -> bool {
    value.is_finite() && value >= 0.0 && value <= max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burmese_python_bounds() {
        let bounds = SpeciesBounds::burmese_python();

        assert!(bounds.admits(5.0, 2.0, 50.0));
        assert!(bounds.admits(30.0, 8.0, 180.0));

        assert!(!bounds.admits(31.0, 2.0, 50.0));
        assert!(!bounds.admits(5.0, 9.0, 50.0));
        assert!(!bounds.admits(5.0, 2.0, 181.0));
    }

    #[test]
    fn test_rejects_negative_and_non_finite() {
        let bounds = SpeciesBounds::burmese_python();

        assert!(!bounds.admits(-1.0, 2.0, 50.0));
        assert!(!bounds.admits(f64::NAN, 2.0, 50.0));
        assert!(!bounds.admits(5.0, f64::INFINITY, 50.0));
    }

    #[test]
    fn test_custom_species() {
        let bounds = SpeciesBounds::new("Galapagos tortoise", 180.0, 1.5, 400.0);
        assert!(bounds.admits(100.0, 1.0, 250.0));
        assert!(!bounds.admits(100.0, 2.0, 250.0));
    }
}
