//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per record kind.
//! - Isolate SQLite query details from service orchestration.
//! - Translate SQLite constraint failures into semantic errors.
//!
//! # Invariants
//! - Repositories only accept validated model values.
//! - Repositories take connections from `db::open_db` or `db::open_db_in_memory`;
//!   the schema version is checked there, once per connection.
//! - Multi-statement writes run inside one immediate transaction.

pub mod career_repo;
pub mod education_repo;
pub mod person_repo;

use crate::db::DbError;
use crate::model::person::PersonId;
use rusqlite::{ffi, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Record kinds stored by the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Person,
    Career,
    Education,
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Person => "person",
            Self::Career => "career",
            Self::Education => "education",
        };
        f.write_str(label)
    }
}

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound {
        kind: RecordKind,
        id: i64,
    },
    /// A unique column already holds the submitted value.
    Duplicate {
        field: &'static str,
    },
    /// The referenced owner person does not exist.
    MissingOwner(PersonId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Duplicate { field } => write!(f, "a person with this {field} already exists"),
            Self::MissingOwner(person_id) => write!(f, "owner person not found: {person_id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Maps a write failure, classifying constraint violations by extended code.
pub(crate) fn write_error(err: rusqlite::Error, owner: Option<PersonId>) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, message) = &err {
        match failure.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE => {
                return RepoError::Duplicate {
                    field: unique_field(message.as_deref()),
                };
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                if let Some(person_id) = owner {
                    return RepoError::MissingOwner(person_id);
                }
            }
            _ => {}
        }
    }
    RepoError::from(err)
}

// SQLite reports `UNIQUE constraint failed: persons.phone`.
fn unique_field(message: Option<&str>) -> &'static str {
    match message.and_then(|text| text.rsplit('.').next()) {
        Some("phone") => "phone",
        Some("email") => "email",
        _ => "value",
    }
}

/// Reads a nullable text column, mapping `NULL` to an empty string.
pub(crate) fn text_column(row: &Row<'_>, column: &str) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
}
