//! Core use-case services.
//!
//! # Responsibility
//! - Validate raw inputs, then orchestrate repository calls.
//! - Translate repository failures into use-case level `ServiceError`s.
//! - Keep request/presentation layers decoupled from storage details.

pub mod career_service;
pub mod education_service;
pub mod person_service;

use crate::model::person::PersonId;
use crate::model::validate::ValidationError;
use crate::repo::{RecordKind, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error shared by all record services.
#[derive(Debug)]
pub enum ServiceError {
    /// Submitted input was rejected before any write.
    Validation(ValidationError),
    /// Target record does not exist.
    NotFound { kind: RecordKind, id: i64 },
    /// Phone or email is already used by another person.
    Duplicate { field: &'static str },
    /// Dependent record points at a person that does not exist.
    MissingOwner(PersonId),
    /// Storage or connection failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Duplicate { field } => write!(f, "a person with this {field} already exists"),
            Self::MissingOwner(person_id) => write!(f, "person not found: {person_id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            RepoError::Duplicate { field } => Self::Duplicate { field },
            RepoError::MissingOwner(person_id) => Self::MissingOwner(person_id),
            other => Self::Repo(other),
        }
    }
}

impl ServiceError {
    /// Stable, value-free code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.code(),
            Self::NotFound { .. } => "not_found",
            Self::Duplicate { .. } => "duplicate",
            Self::MissingOwner(_) => "missing_owner",
            Self::Repo(_) => "storage_error",
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result of an edit that may be skipped when nothing changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// Submitted values equal stored values; no write was issued.
    Unchanged,
}

#[cfg(test)]
mod tests {
    use super::ServiceError;
    use crate::repo::RepoError;
    use rusqlite::ffi;

    #[test]
    fn storage_failure_code_omits_sqlite_message() {
        let raw = rusqlite::Error::SqliteFailure(
            ffi::Error::new(ffi::SQLITE_IOERR),
            Some("disk I/O error reading /home/alice/people.db".to_string()),
        );
        let err = ServiceError::from(RepoError::from(raw));

        assert!(matches!(err, ServiceError::Repo(_)));
        assert_eq!(err.code(), "storage_error");
        assert!(err.to_string().contains("alice"));
    }
}
