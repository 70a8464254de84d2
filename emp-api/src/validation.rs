//! Field-level validation rules shared by the department and employee stores.
//!
//! Every rule is a pure function. Store operations collect rule failures into
//! a [`FieldErrors`] map keyed by the client-facing field name, which is the
//! shape returned to clients on HTTP 400.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Longest name accepted for departments and employees.
pub const MAX_NAME_LENGTH: usize = 100;
/// Longest stored photo filename.
pub const MAX_PHOTO_FILE_NAME_LENGTH: usize = 100;
pub const MAX_EMAIL_LENGTH: usize = 254;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const DATE_FORMAT_MESSAGE: &str = "Use DD/MM/YYYY or YYYY-MM-DD format";

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("valid name pattern"));

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"));

/// A single rule failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("{0}")]
    InvalidFormat(String),

    #[error("Date of joining cannot be in the future.")]
    FutureDate,

    #[error("Ensure this field has no more than {max} characters.")]
    TooLong { max: usize },

    #[error("This field may not be blank.")]
    Blank,
}

/// Validation failures grouped by field name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Records `result` under `field` when it is an error.
    pub fn check(&mut self, field: &str, result: Result<(), RuleError>) {
        if let Err(e) = result {
            self.add(field, e.to_string());
        }
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Checks that `value` contains only ASCII letters and whitespace.
///
/// `entity` is used to build the message, e.g. "Department name must contain
/// only letters and spaces."
pub fn validate_name(entity: &str, value: &str) -> Result<(), RuleError> {
    validate_max_length(value, MAX_NAME_LENGTH)?;
    if NAME_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(RuleError::InvalidFormat(format!(
            "{} name must contain only letters and spaces.",
            entity
        )))
    }
}

/// Trims surrounding whitespace and validates what is left with
/// [`validate_name`]. Returns the value to store.
pub fn clean_name(entity: &str, value: &str) -> Result<String, RuleError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(RuleError::Blank);
    }
    validate_name(entity, value)?;
    Ok(value.to_string())
}

pub fn validate_email(value: &str) -> Result<(), RuleError> {
    validate_max_length(value, MAX_EMAIL_LENGTH)?;
    if EMAIL_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(RuleError::InvalidFormat(
            "Enter a valid email address.".to_string(),
        ))
    }
}

pub fn validate_max_length(value: &str, max: usize) -> Result<(), RuleError> {
    if value.chars().count() > max {
        Err(RuleError::TooLong { max })
    } else {
        Ok(())
    }
}

/// Fails when `date` is strictly after the server's current local date.
pub fn validate_date_of_joining(date: NaiveDate) -> Result<(), RuleError> {
    validate_not_after(date, Local::now().date_naive())
}

/// Fails when `date` is strictly after `today`. Equal dates are accepted.
pub fn validate_not_after(date: NaiveDate, today: NaiveDate) -> Result<(), RuleError> {
    if date > today {
        Err(RuleError::FutureDate)
    } else {
        Ok(())
    }
}

/// Parses a date given either as `YYYY-MM-DD` or, when it contains a `/`,
/// as `DD/MM/YYYY`.
pub fn parse_date(value: &str) -> Result<NaiveDate, RuleError> {
    let value = value.trim();
    let invalid = || RuleError::InvalidFormat(DATE_FORMAT_MESSAGE.to_string());

    if value.contains('/') {
        let parts: Vec<&str> = value.split('/').collect();
        let [day, month, year] = parts.as_slice() else {
            return Err(invalid());
        };
        let day: u32 = day.trim().parse().map_err(|_| invalid())?;
        let month: u32 = month.trim().parse().map_err(|_| invalid())?;
        let year: i32 = year.trim().parse().map_err(|_| invalid())?;
        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
    } else {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())
    }
}
