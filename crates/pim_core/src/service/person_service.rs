//! Person use-case service.
//!
//! # Invariants
//! - Create/update inputs are validated before any SQL runs.
//! - Search text is trimmed; blank text lists everyone.
//! - Log events carry identifiers only, never personal field values.

use crate::model::person::{
    ContactInput, Person, PersonDetail, PersonId, PersonInput, PersonSummary,
};
use crate::model::validate::today;
use crate::repo::person_repo::PersonRepository;
use crate::repo::RecordKind;
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};

/// List result that echoes the applied search text.
///
/// An empty `persons` with an empty `query` means "no data"; with a
/// non-empty `query` it means "no match".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonSearch {
    pub persons: Vec<Person>,
    pub query: String,
}

/// Person service facade over repository implementations.
pub struct PersonService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> PersonService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists everyone, or those whose name/email/phone contains `query`.
    pub fn search_persons(&self, query: Option<&str>) -> ServiceResult<PersonSearch> {
        let query = query.map(str::trim).unwrap_or_default();
        let search = if query.is_empty() { None } else { Some(query) };
        let persons = self.repo.list_persons(search)?;
        Ok(PersonSearch {
            persons,
            query: query.to_string(),
        })
    }

    pub fn get_person(&self, person_id: PersonId) -> ServiceResult<Person> {
        self.repo
            .get_person(person_id)?
            .ok_or(ServiceError::NotFound {
                kind: RecordKind::Person,
                id: person_id,
            })
    }

    /// Gets a person with career (newest first) and education (latest year
    /// first) history.
    pub fn get_person_detail(&self, person_id: PersonId) -> ServiceResult<PersonDetail> {
        self.repo
            .get_person_detail(person_id)?
            .ok_or(ServiceError::NotFound {
                kind: RecordKind::Person,
                id: person_id,
            })
    }

    /// Lists owner choices for career/education forms.
    pub fn list_owner_choices(&self) -> ServiceResult<Vec<PersonSummary>> {
        Ok(self.repo.list_person_summaries()?)
    }

    /// Validates and inserts a person.
    ///
    /// Duplicate phone/email surfaces as `ServiceError::Duplicate` with no row
    /// written.
    pub fn create_person(&self, input: &PersonInput) -> ServiceResult<PersonId> {
        let result = input
            .validate(today())
            .map_err(ServiceError::from)
            .and_then(|person| self.repo.create_person(&person).map_err(ServiceError::from));

        match &result {
            Ok(person_id) => {
                info!("event=person_create module=service status=ok person_id={person_id}")
            }
            Err(err) => warn!(
                "event=person_create module=service status=rejected error_code={}",
                err.code()
            ),
        }
        result
    }

    /// Replaces contact fields; name and date of birth stay as created.
    pub fn update_contact(&self, person_id: PersonId, input: &ContactInput) -> ServiceResult<()> {
        let result = input
            .validate()
            .map_err(ServiceError::from)
            .and_then(|update| {
                self.repo
                    .update_contact(person_id, &update)
                    .map_err(ServiceError::from)
            });

        match &result {
            Ok(()) => info!("event=person_update module=service status=ok person_id={person_id}"),
            Err(err) => warn!(
                "event=person_update module=service status=rejected person_id={person_id} error_code={}",
                err.code()
            ),
        }
        result
    }

    /// Deletes a person; storage removes dependent history in the same
    /// statement.
    pub fn delete_person(&self, person_id: PersonId) -> ServiceResult<()> {
        let result = self
            .repo
            .delete_person(person_id)
            .map_err(ServiceError::from);

        match &result {
            Ok(()) => info!("event=person_delete module=service status=ok person_id={person_id}"),
            Err(err) => warn!(
                "event=person_delete module=service status=error person_id={person_id} error_code={}",
                err.code()
            ),
        }
        result
    }
}
