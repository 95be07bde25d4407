//! Education use-case service.
//!
//! Same contract as the career service; years of passing are additionally
//! checked against the configured range.

use crate::model::education::{
    Education, EducationId, EducationInput, EducationListItem, PassingYearRange,
};
use crate::model::person::PersonId;
use crate::repo::education_repo::EducationRepository;
use crate::repo::RecordKind;
use crate::service::{ServiceError, ServiceResult, UpdateOutcome};
use log::{debug, info, warn};

pub struct EducationService<R: EducationRepository> {
    repo: R,
    years: PassingYearRange,
}

impl<R: EducationRepository> EducationService<R> {
    pub fn new(repo: R, years: PassingYearRange) -> Self {
        Self { repo, years }
    }

    /// Allowed year-of-passing range, for form hints.
    pub fn passing_years(&self) -> PassingYearRange {
        self.years
    }

    pub fn list_education(&self) -> ServiceResult<Vec<EducationListItem>> {
        Ok(self.repo.list_education()?)
    }

    pub fn get_education(&self, edu_id: EducationId) -> ServiceResult<Education> {
        self.repo
            .get_education(edu_id)?
            .ok_or(ServiceError::NotFound {
                kind: RecordKind::Education,
                id: edu_id,
            })
    }

    pub fn create_education(
        &self,
        person_id: PersonId,
        input: &EducationInput,
    ) -> ServiceResult<EducationId> {
        let result = input
            .validate(self.years)
            .map_err(ServiceError::from)
            .and_then(|fields| {
                self.repo
                    .create_education(person_id, &fields)
                    .map_err(ServiceError::from)
            });

        match &result {
            Ok(edu_id) => info!(
                "event=education_create module=service status=ok person_id={person_id} edu_id={edu_id}"
            ),
            Err(err) => warn!(
                "event=education_create module=service status=rejected person_id={person_id} error_code={}",
                err.code()
            ),
        }
        result
    }

    pub fn update_education(
        &self,
        edu_id: EducationId,
        person_id: PersonId,
        input: &EducationInput,
    ) -> ServiceResult<UpdateOutcome> {
        let fields = input.validate(self.years).inspect_err(|err| {
            warn!(
                "event=education_update module=service status=rejected edu_id={edu_id} error_code={}",
                err.code()
            );
        })?;

        let stored = self.get_education(edu_id)?;
        if stored.person_id == person_id && stored.fields() == fields {
            debug!("event=education_update module=service status=unchanged edu_id={edu_id}");
            return Ok(UpdateOutcome::Unchanged);
        }

        self.repo
            .update_education(edu_id, person_id, &fields)
            .map_err(ServiceError::from)
            .inspect_err(|err| {
                warn!(
                    "event=education_update module=service status=error edu_id={edu_id} error_code={}",
                    err.code()
                );
            })?;
        info!("event=education_update module=service status=ok edu_id={edu_id}");
        Ok(UpdateOutcome::Updated)
    }

    pub fn delete_education(&self, edu_id: EducationId) -> ServiceResult<PersonId> {
        let result = self
            .repo
            .delete_education(edu_id)
            .map_err(ServiceError::from);

        match &result {
            Ok(person_id) => info!(
                "event=education_delete module=service status=ok edu_id={edu_id} person_id={person_id}"
            ),
            Err(err) => warn!(
                "event=education_delete module=service status=error edu_id={edu_id} error_code={}",
                err.code()
            ),
        }
        result
    }
}
