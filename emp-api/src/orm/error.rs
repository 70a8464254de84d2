use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::validation::FieldErrors;

/// Failure of an entity store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),

    /// A uniqueness rule was violated on `field`.
    #[error("duplicate value for {field}: {message}")]
    DuplicateKey {
        field: &'static str,
        message: String,
    },

    #[error("record not found")]
    NotFound,

    #[error("invalid page")]
    InvalidPage,

    #[error("database error: {0}")]
    Database(#[from] DieselError),
}

impl StoreError {
    /// Field-level errors for the client, if this is a validation failure.
    /// Duplicate keys are reported on the conflicting field.
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            StoreError::Validation(errors) => Some(errors.clone()),
            StoreError::DuplicateKey { field, message } => {
                let mut errors = FieldErrors::new();
                errors.add(field, message.clone());
                Some(errors)
            }
            _ => None,
        }
    }

    /// Maps a `UNIQUE` constraint failure from the database onto
    /// [`StoreError::DuplicateKey`]; anything else stays a database error.
    pub(crate) fn from_unique(err: DieselError, field: &'static str, message: &str) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                StoreError::DuplicateKey {
                    field,
                    message: message.to_string(),
                }
            }
            other => StoreError::Database(other),
        }
    }
}
