//! Core domain logic for the personal info manager.
//! This crate is the single source of truth for record invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, DatabaseConfig, LimitsConfig, LoggingConfig};
pub use db::{ensure_schema, open_db, open_db_in_memory, Database, DbError};
pub use logging::{default_log_level, init_logging, init_logging_from, logging_status, LoggingError};
pub use model::career::{Career, CareerId, CareerInput, CareerListItem};
pub use model::education::{
    Education, EducationId, EducationInput, EducationListItem, PassingYearRange,
};
pub use model::person::{ContactInput, Person, PersonDetail, PersonId, PersonInput, PersonSummary};
pub use model::validate::ValidationError;
pub use repo::career_repo::{CareerRepository, SqliteCareerRepository};
pub use repo::education_repo::{EducationRepository, SqliteEducationRepository};
pub use repo::person_repo::{PersonRepository, SqlitePersonRepository};
pub use repo::{RecordKind, RepoError, RepoResult};
pub use service::career_service::CareerService;
pub use service::education_service::EducationService;
pub use service::person_service::{PersonSearch, PersonService};
pub use service::{ServiceError, ServiceResult, UpdateOutcome};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
