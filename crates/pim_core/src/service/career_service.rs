//! Career use-case service.
//!
//! # Invariants
//! - A career row is only created for an existing person.
//! - Edits that match stored values issue no write (`UpdateOutcome::Unchanged`).
//! - Delete reports the former owner so callers can return to that person.

use crate::model::career::{Career, CareerId, CareerInput, CareerListItem};
use crate::model::person::PersonId;
use crate::repo::career_repo::CareerRepository;
use crate::repo::RecordKind;
use crate::service::{ServiceError, ServiceResult, UpdateOutcome};
use log::{debug, info, warn};

/// Career service facade over repository implementations.
pub struct CareerService<R: CareerRepository> {
    repo: R,
}

impl<R: CareerRepository> CareerService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all career rows with owner names, newest first.
    pub fn list_careers(&self) -> ServiceResult<Vec<CareerListItem>> {
        Ok(self.repo.list_careers()?)
    }

    pub fn get_career(&self, career_id: CareerId) -> ServiceResult<Career> {
        self.repo
            .get_career(career_id)?
            .ok_or(ServiceError::NotFound {
                kind: RecordKind::Career,
                id: career_id,
            })
    }

    /// Adds a career row to an existing person.
    pub fn create_career(&self, person_id: PersonId, input: &CareerInput) -> ServiceResult<CareerId> {
        let result = input
            .validate()
            .map_err(ServiceError::from)
            .and_then(|fields| {
                self.repo
                    .create_career(person_id, &fields)
                    .map_err(ServiceError::from)
            });

        match &result {
            Ok(career_id) => info!(
                "event=career_create module=service status=ok person_id={person_id} career_id={career_id}"
            ),
            Err(err) => warn!(
                "event=career_create module=service status=rejected person_id={person_id} error_code={}",
                err.code()
            ),
        }
        result
    }

    /// Applies an edit, skipping the write when nothing differs.
    pub fn update_career(
        &self,
        career_id: CareerId,
        person_id: PersonId,
        input: &CareerInput,
    ) -> ServiceResult<UpdateOutcome> {
        let fields = input.validate().inspect_err(|err| {
            warn!(
                "event=career_update module=service status=rejected career_id={career_id} error_code={}",
                err.code()
            );
        })?;

        let stored = self.get_career(career_id)?;
        if stored.person_id == person_id && stored.fields() == fields {
            debug!("event=career_update module=service status=unchanged career_id={career_id}");
            return Ok(UpdateOutcome::Unchanged);
        }

        self.repo
            .update_career(career_id, person_id, &fields)
            .map_err(ServiceError::from)
            .inspect_err(|err| {
                warn!(
                    "event=career_update module=service status=error career_id={career_id} error_code={}",
                    err.code()
                );
            })?;
        info!("event=career_update module=service status=ok career_id={career_id}");
        Ok(UpdateOutcome::Updated)
    }

    /// Deletes one row and returns the person it belonged to.
    pub fn delete_career(&self, career_id: CareerId) -> ServiceResult<PersonId> {
        let result = self
            .repo
            .delete_career(career_id)
            .map_err(ServiceError::from);

        match &result {
            Ok(person_id) => info!(
                "event=career_delete module=service status=ok career_id={career_id} person_id={person_id}"
            ),
            Err(err) => warn!(
                "event=career_delete module=service status=error career_id={career_id} error_code={}",
                err.code()
            ),
        }
        result
    }
}
