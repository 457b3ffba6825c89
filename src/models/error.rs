//! Animal error taxonomy
//!
//! Every rejected request is reported as a single `(code, message)` pair.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Message constants surfaced to API clients
pub mod messages {
    pub const WRONG_NAME_FORMAT: &str = "wrong name format";
    pub const WRONG_DATE_FORMAT: &str = "wrong date format";
    pub const IMPOSSIBLE_DATE: &str = "impossible date";
    pub const WRONG_CHARACTERISTICS: &str = "wrong characteristics";
    pub const ANIMAL_NOT_FOUND: &str = "animal not found";
    pub const INVALID_ID: &str = "invalid id";
}

/// Discriminator returned to clients alongside the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimalErrorCode {
    /// Name format or length
    #[serde(rename = "CODE_01")]
    Code01,
    /// Arrival date format or plausibility
    #[serde(rename = "CODE_02")]
    Code02,
    /// Age, height or weight outside species bounds
    #[serde(rename = "CODE_03")]
    Code03,
    /// Animal does not exist
    #[serde(rename = "CODE_04")]
    Code04,
    /// Malformed identifier
    #[serde(rename = "CODE_06")]
    Code06,
}

impl AnimalErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimalErrorCode::Code01 => "CODE_01",
            AnimalErrorCode::Code02 => "CODE_02",
            AnimalErrorCode::Code03 => "CODE_03",
            AnimalErrorCode::Code04 => "CODE_04",
            AnimalErrorCode::Code06 => "CODE_06",
        }
    }
}

impl fmt::Display for AnimalErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kinds of failure an animal request can hit
///
/// Each kind maps to exactly one code and one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Violation {
    NameFormat,
    NameLength,
    DateFormat,
    ImpossibleDate,
    Characteristics,
    NotFound,
    InvalidId,
}

impl Violation {
    /// Error code reported for this violation
    pub fn code(&self) -> AnimalErrorCode {
        match self {
            Violation::NameFormat | Violation::NameLength => AnimalErrorCode::Code01,
            Violation::DateFormat | Violation::ImpossibleDate => AnimalErrorCode::Code02,
            Violation::Characteristics => AnimalErrorCode::Code03,
            Violation::NotFound => AnimalErrorCode::Code04,
            Violation::InvalidId => AnimalErrorCode::Code06,
        }
    }

    /// Message reported for this violation
    pub fn message(&self) -> &'static str {
        match self {
            Violation::NameFormat | Violation::NameLength => messages::WRONG_NAME_FORMAT,
            Violation::DateFormat => messages::WRONG_DATE_FORMAT,
            Violation::ImpossibleDate => messages::IMPOSSIBLE_DATE,
            Violation::Characteristics => messages::WRONG_CHARACTERISTICS,
            Violation::NotFound => messages::ANIMAL_NOT_FOUND,
            Violation::InvalidId => messages::INVALID_ID,
        }
    }

    /// Build the client-facing error for this violation
    pub fn into_error(self) -> AnimalError {
        AnimalError::new(self.message(), self.code())
    }
}

/// Client-facing rejection, serialized as `{"message": ..., "code": ...}`
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct AnimalError {
    message: String,
    code: AnimalErrorCode,
}

impl AnimalError {
    pub fn new(message: impl Into<String>, code: AnimalErrorCode) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> AnimalErrorCode {
        self.code
    }
}

impl From<Violation> for AnimalError {
    fn from(violation: Violation) -> Self {
        violation.into_error()
    }
}

/// Every violation found by a collect-all validation pass, in rule order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }

    /// The violation that would be reported to the client
    pub fn first(&self) -> Option<AnimalError> {
        self.violations.first().map(|v| v.into_error())
    }

    /// Convert to a Result
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            return write!(f, "no violations");
        }
        let rendered: Vec<String> = self
            .violations
            .iter()
            .map(|v| format!("{} ({})", v.message(), v.code()))
            .collect();
        write!(f, "{}", rendered.join(", "))
    }
}

impl From<AnimalError> for crate::error::Error {
    fn from(err: AnimalError) -> Self {
        crate::error::Error::Animal(err)
    }
}

impl From<Violation> for crate::error::Error {
    fn from(violation: Violation) -> Self {
        crate::error::Error::Animal(violation.into_error())
    }
}
