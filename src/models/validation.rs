//! Validation rules for animal creation requests
//!
//! Rules run in a fixed order and the first failing rule determines the
//! error reported to the client:
//!
//! 1. name format
//! 2. name length
//! 3. arrival date format
//! 4. arrival date not in the future
//! 5. age, height and weight within species bounds
//! 6. parent identifiers are UUIDs
//!
//! The order is defined once, in [`RULES`].

use chrono::{NaiveDateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

use super::animal::{AnimalDto, NewAnimal, ARRIVAL_DATE_FORMAT};
use super::error::{AnimalError, Violation, Violations};
use super::species::SpeciesBounds;

/// Default maximum name length, in characters
pub const DEFAULT_NAME_MAX_LENGTH: usize = 120;

static UUID_REGEX: OnceLock<Regex> = OnceLock::new();
static NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn uuid_regex() -> &'static Regex {
    UUID_REGEX.get_or_init(|| {
        Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
            .expect("Invalid UUID regex pattern")
    })
}

/// Letters, optionally followed by letters, spaces, apostrophes or periods
fn name_regex() -> &'static Regex {
    NAME_REGEX.get_or_init(|| {
        Regex::new(r"^\p{L}[\p{L} .']*$").expect("Invalid name regex pattern")
    })
}

/// Whether a string is a hyphenated UUID
pub fn is_uuid_shaped(value: &str) -> bool {
    uuid_regex().is_match(value)
}

/// Whether a name uses only allowed characters
pub fn is_valid_name(name: &str) -> bool {
    name_regex().is_match(name)
}

/// Parse an ISO 8601 arrival date in the `YYYY-MM-DDTHH:MM:SS` form
///
/// Only the exact form a stored record serializes to is accepted, so an
/// accepted date is echoed back unchanged. Offsets, `Z`, fractional
/// seconds, a space separator and unpadded fields are all rejected.
pub fn parse_arrival_date(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, ARRIVAL_DATE_FORMAT)
        .ok()
        .filter(|date| date.format(ARRIVAL_DATE_FORMAT).to_string() == raw)
}

/// Inputs a rule may consult besides the request itself
#[derive(Debug)]
pub struct RuleContext<'a> {
    pub bounds: &'a SpeciesBounds,
    pub name_max_length: usize,
    pub now: NaiveDateTime,
}

/// A single validation rule: if `holds` is false, `violation` is reported
pub struct Rule {
    pub name: &'static str,
    pub holds: fn(&AnimalDto, &RuleContext<'_>) -> bool,
    pub violation: Violation,
}

/// All rules, in precedence order
pub static RULES: &[Rule] = &[
    Rule {
        name: "name_format",
        holds: name_format,
        violation: Violation::NameFormat,
    },
    Rule {
        name: "name_length",
        holds: name_length,
        violation: Violation::NameLength,
    },
    Rule {
        name: "arrival_date_format",
        holds: arrival_date_format,
        violation: Violation::DateFormat,
    },
    Rule {
        name: "arrival_date_not_future",
        holds: arrival_date_not_future,
        violation: Violation::ImpossibleDate,
    },
    Rule {
        name: "characteristics",
        holds: characteristics,
        violation: Violation::Characteristics,
    },
    Rule {
        name: "parent_ids",
        holds: parent_ids,
        violation: Violation::InvalidId,
    },
];

fn name_format(dto: &AnimalDto, _: &RuleContext<'_>) -> bool {
    is_valid_name(&dto.name)
}

fn name_length(dto: &AnimalDto, ctx: &RuleContext<'_>) -> bool {
    dto.name.chars().count() <= ctx.name_max_length
}

fn arrival_date_format(dto: &AnimalDto, _: &RuleContext<'_>) -> bool {
    parse_arrival_date(&dto.arrival_date).is_some()
}

// An unparseable date is reported by the format rule
fn arrival_date_not_future(dto: &AnimalDto, ctx: &RuleContext<'_>) -> bool {
    parse_arrival_date(&dto.arrival_date).map_or(true, |date| date <= ctx.now)
}

fn characteristics(dto: &AnimalDto, ctx: &RuleContext<'_>) -> bool {
    ctx.bounds.admits(dto.age, dto.height, dto.weight)
}

fn parent_ids(dto: &AnimalDto, _: &RuleContext<'_>) -> bool {
    [&dto.mother_id, &dto.father_id]
        .into_iter()
        .flatten()
        .all(|id| is_uuid_shaped(id))
}

/// Validates animal creation requests against one species' bounds
#[derive(Debug, Clone)]
pub struct AnimalValidator {
    bounds: SpeciesBounds,
    name_max_length: usize,
}

impl AnimalValidator {
    pub fn new(bounds: SpeciesBounds) -> Self {
        Self {
            bounds,
            name_max_length: DEFAULT_NAME_MAX_LENGTH,
        }
    }

    pub fn with_name_max_length(mut self, max: usize) -> Self {
        self.name_max_length = max;
        self
    }

    pub fn bounds(&self) -> &SpeciesBounds {
        &self.bounds
    }

    pub fn name_max_length(&self) -> usize {
        self.name_max_length
    }

    fn context(&self, now: NaiveDateTime) -> RuleContext<'_> {
        RuleContext {
            bounds: &self.bounds,
            name_max_length: self.name_max_length,
            now,
        }
    }

    /// Validate against the current instant, stopping at the first failure
    ///
    /// Arrival dates carry no offset and are compared with the current UTC
    /// time, not the server's local clock.
    pub fn validate(&self, dto: &AnimalDto) -> Result<(), AnimalError> {
        self.validate_at(dto, Utc::now().naive_utc())
    }

    /// Validate against a fixed instant, stopping at the first failure
    pub fn validate_at(&self, dto: &AnimalDto, now: NaiveDateTime) -> Result<(), AnimalError> {
        let ctx = self.context(now);
        match RULES.iter().find(|rule| !(rule.holds)(dto, &ctx)) {
            Some(rule) => {
                tracing::debug!(rule = rule.name, code = %rule.violation.code(), "Validation rule failed");
                Err(rule.violation.into_error())
            },
            None => Ok(()),
        }
    }

    /// Run every rule and collect all violations in precedence order
    pub fn validate_all(&self, dto: &AnimalDto) -> Violations {
        self.validate_all_at(dto, Utc::now().naive_utc())
    }

    pub fn validate_all_at(&self, dto: &AnimalDto, now: NaiveDateTime) -> Violations {
        let ctx = self.context(now);
        let mut violations = Violations::new();
        for rule in RULES.iter().filter(|rule| !(rule.holds)(dto, &ctx)) {
            violations.add(rule.violation);
        }
        violations
    }

    /// Validate and convert into a typed record ready for persistence
    pub fn accept(&self, dto: AnimalDto) -> Result<NewAnimal, AnimalError> {
        self.accept_at(dto, Utc::now().naive_utc())
    }

    pub fn accept_at(&self, dto: AnimalDto, now: NaiveDateTime) -> Result<NewAnimal, AnimalError> {
        self.validate_at(&dto, now)?;

        let arrival_date =
            parse_arrival_date(&dto.arrival_date).ok_or_else(|| Violation::DateFormat.into_error())?;
        let mother_id = parse_parent_id(dto.mother_id.as_deref())?;
        let father_id = parse_parent_id(dto.father_id.as_deref())?;

        Ok(NewAnimal {
            name: dto.name,
            sex: dto.sex,
            weight: dto.weight,
            height: dto.height,
            age: dto.age,
            arrival_date,
            mother_id,
            father_id,
        })
    }
}

impl Default for AnimalValidator {
    fn default() -> Self {
        Self::new(SpeciesBounds::default())
    }
}

fn parse_parent_id(raw: Option<&str>) -> Result<Option<Uuid>, AnimalError> {
    raw.map(|id| Uuid::parse_str(id).map_err(|_| Violation::InvalidId.into_error()))
        .transpose()
}
