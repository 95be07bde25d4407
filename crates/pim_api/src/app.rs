//! Request entry points.
//!
//! # Responsibility
//! - Parse form input, call one use-case service, and classify the result
//!   into a `Response`.
//! - Open one database session per request and drop it before returning.
//!
//! # Invariants
//! - Entry points never panic and never return `Err`; every failure becomes
//!   a notice.
//! - A non-positive identifier is handled as not-found without touching
//!   storage.
//! - Not-found redirects to the owning list view.

use crate::error::ApiError;
use crate::form::Form;
use crate::response::{Notice, NoticeLevel, Response, Route, View};
use log::{error, info, warn};
use pim_core::model::validate::today;
use pim_core::{
    AppConfig, CareerId, CareerInput, CareerService, ContactInput, Database, DbError,
    EducationId, EducationInput, EducationService, PassingYearRange, Person, PersonId,
    PersonInput, PersonService, PersonSummary, RecordKind, ServiceError, SqliteCareerRepository,
    SqliteEducationRepository, SqlitePersonRepository, UpdateOutcome,
};
use rusqlite::Connection;

/// Request handler bound to one database and its limits.
#[derive(Debug, Clone)]
pub struct App {
    db: Database,
    years: PassingYearRange,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        Self::from_parts(
            Database::new(config.database.path.clone()),
            config.limits.passing_years(),
        )
    }

    pub fn from_parts(db: Database, years: PassingYearRange) -> Self {
        Self { db, years }
    }

    /// Creates or migrates the schema. Call once before serving requests; on
    /// failure every later request reports a connection error.
    pub fn startup(&self) -> Result<(), DbError> {
        self.db.ensure_schema()
    }

    // Persons

    /// Lists everyone, or persons matching `query` on name, email or phone.
    pub fn person_list(&self, query: Option<&str>) -> Response {
        let result =
            self.with_connection(|conn| Ok(person_service(conn).search_persons(query)?));
        match result {
            Ok(search) => {
                let is_empty = search.persons.is_empty();
                Response::render(View::PersonList {
                    persons: search.persons,
                    query: search.query,
                    is_empty,
                })
            }
            Err(err) => {
                log_failure("person_list", &err);
                Response::render(View::PersonList {
                    persons: Vec::new(),
                    query: query.map(str::trim).unwrap_or_default().to_string(),
                    is_empty: true,
                })
                .with_notice(err.notice())
            }
        }
    }

    pub fn person_detail(&self, person_id: PersonId) -> Response {
        let result = checked_id(RecordKind::Person, person_id).and_then(|person_id| {
            self.with_connection(|conn| Ok(person_service(conn).get_person_detail(person_id)?))
        });
        match result {
            Ok(detail) => Response::render(View::PersonDetail { detail }),
            Err(err) => reject("person_detail", err, Route::PersonList),
        }
    }

    pub fn add_person_form(&self) -> Response {
        Response::render(View::AddPersonForm {
            current_date: today(),
        })
    }

    pub fn add_person(&self, form: &Form) -> Response {
        let result = person_input(form).and_then(|input| {
            self.with_connection(|conn| Ok(person_service(conn).create_person(&input)?))
        });
        match result {
            Ok(person_id) => {
                log_success("add_person", person_id);
                Response::redirect(Route::PersonList)
                    .with_notice(Notice::success("Person added successfully"))
            }
            Err(err) => {
                let route = retry_or(&err, Route::AddPerson, Route::PersonList);
                reject("add_person", err, route)
            }
        }
    }

    pub fn edit_person_form(&self, person_id: PersonId) -> Response {
        let result = checked_id(RecordKind::Person, person_id).and_then(|person_id| {
            self.with_connection(|conn| Ok(person_service(conn).get_person(person_id)?))
        });
        match result {
            Ok(person) => Response::render(View::EditPersonForm { person }),
            Err(err) => reject("edit_person_form", err, Route::PersonList),
        }
    }

    /// Replaces contact fields; name and date of birth are not editable.
    pub fn update_person(&self, person_id: PersonId, form: &Form) -> Response {
        let result = checked_id(RecordKind::Person, person_id).and_then(|person_id| {
            let input = contact_input(form)?;
            self.with_connection(|conn| {
                Ok(person_service(conn).update_contact(person_id, &input)?)
            })
        });
        match result {
            Ok(()) => {
                log_success("update_person", person_id);
                Response::redirect(Route::PersonDetail(person_id))
                    .with_notice(Notice::success("Person updated successfully"))
            }
            Err(err) => {
                let route = retry_or(&err, Route::EditPerson(person_id), Route::PersonList);
                reject("update_person", err, route)
            }
        }
    }

    /// Deletes a person together with all career and education rows.
    pub fn delete_person(&self, person_id: PersonId) -> Response {
        let result = checked_id(RecordKind::Person, person_id).and_then(|person_id| {
            self.with_connection(|conn| Ok(person_service(conn).delete_person(person_id)?))
        });
        match result {
            Ok(()) => {
                log_success("delete_person", person_id);
                Response::redirect(Route::PersonList)
                    .with_notice(Notice::success("Person deleted successfully"))
            }
            Err(err) => reject("delete_person", err, Route::PersonList),
        }
    }

    // Career

    pub fn career_list(&self) -> Response {
        match self.with_connection(|conn| Ok(career_service(conn).list_careers()?)) {
            Ok(items) => Response::render(View::CareerList { items }),
            Err(err) => {
                log_failure("career_list", &err);
                Response::render(View::CareerList { items: Vec::new() }).with_notice(err.notice())
            }
        }
    }

    pub fn add_career_form(&self, person_id: PersonId) -> Response {
        match self.owner_summary(person_id) {
            Ok(person) => Response::render(View::AddCareerForm { person }),
            Err(err) => reject("add_career_form", err, Route::PersonList),
        }
    }

    pub fn add_career(&self, person_id: PersonId, form: &Form) -> Response {
        let result = checked_id(RecordKind::Person, person_id).and_then(|person_id| {
            let input = career_input(form)?;
            self.with_connection(|conn| {
                Ok(career_service(conn).create_career(person_id, &input)?)
            })
        });
        match result {
            Ok(career_id) => {
                log_success("add_career", career_id);
                Response::redirect(Route::PersonDetail(person_id))
                    .with_notice(Notice::success("Career added successfully"))
            }
            Err(err) => {
                let route = retry_or(&err, Route::AddCareer(person_id), Route::PersonList);
                reject("add_career", err, route)
            }
        }
    }

    pub fn edit_career_form(&self, career_id: CareerId) -> Response {
        let result = checked_id(RecordKind::Career, career_id).and_then(|career_id| {
            self.with_connection(|conn| {
                let career = career_service(conn).get_career(career_id)?;
                let owners = person_service(conn).list_owner_choices()?;
                Ok((career, owners))
            })
        });
        match result {
            Ok((career, owners)) => Response::render(View::EditCareerForm { career, owners }),
            Err(err) => reject("edit_career_form", err, Route::CareerList),
        }
    }

    /// Applies a career edit. Identical values redirect without a write or a
    /// notice.
    pub fn update_career(&self, career_id: CareerId, form: &Form) -> Response {
        let result = checked_id(RecordKind::Career, career_id).and_then(|career_id| {
            let person_id = form.require_id("person_id")?;
            let input = career_input(form)?;
            self.with_connection(|conn| {
                Ok(career_service(conn).update_career(career_id, person_id, &input)?)
            })
        });
        match result {
            Ok(UpdateOutcome::Updated) => {
                log_success("update_career", career_id);
                Response::redirect(Route::CareerList)
                    .with_notice(Notice::success("Career updated successfully"))
            }
            Ok(UpdateOutcome::Unchanged) => Response::redirect(Route::CareerList),
            Err(err) => {
                let route = retry_or(&err, Route::EditCareer(career_id), Route::CareerList);
                reject("update_career", err, route)
            }
        }
    }

    /// Deletes one career row and returns to its former owner.
    pub fn delete_career(&self, career_id: CareerId) -> Response {
        let result = checked_id(RecordKind::Career, career_id).and_then(|career_id| {
            self.with_connection(|conn| Ok(career_service(conn).delete_career(career_id)?))
        });
        match result {
            Ok(person_id) => {
                log_success("delete_career", career_id);
                Response::redirect(Route::PersonDetail(person_id))
                    .with_notice(Notice::success("Career deleted successfully"))
            }
            Err(err) => reject("delete_career", err, Route::CareerList),
        }
    }

    // Education

    pub fn education_list(&self) -> Response {
        match self.with_connection(|conn| Ok(self.education_service(conn).list_education()?)) {
            Ok(items) => Response::render(View::EducationList { items }),
            Err(err) => {
                log_failure("education_list", &err);
                Response::render(View::EducationList { items: Vec::new() })
                    .with_notice(err.notice())
            }
        }
    }

    pub fn add_education_form(&self, person_id: PersonId) -> Response {
        match self.owner_summary(person_id) {
            Ok(person) => Response::render(View::AddEducationForm {
                person,
                min_year: self.years.min,
                max_year: self.years.max,
            }),
            Err(err) => reject("add_education_form", err, Route::PersonList),
        }
    }

    pub fn add_education(&self, person_id: PersonId, form: &Form) -> Response {
        let result = checked_id(RecordKind::Person, person_id).and_then(|person_id| {
            let input = education_input(form)?;
            self.with_connection(|conn| {
                Ok(self
                    .education_service(conn)
                    .create_education(person_id, &input)?)
            })
        });
        match result {
            Ok(edu_id) => {
                log_success("add_education", edu_id);
                Response::redirect(Route::EducationList)
                    .with_notice(Notice::success("Education added successfully"))
            }
            Err(err) => {
                let route = retry_or(&err, Route::AddEducation(person_id), Route::PersonList);
                reject("add_education", err, route)
            }
        }
    }

    pub fn edit_education_form(&self, edu_id: EducationId) -> Response {
        let result = checked_id(RecordKind::Education, edu_id).and_then(|edu_id| {
            self.with_connection(|conn| {
                let education = self.education_service(conn).get_education(edu_id)?;
                let owners = person_service(conn).list_owner_choices()?;
                Ok((education, owners))
            })
        });
        match result {
            Ok((education, owners)) => Response::render(View::EditEducationForm {
                education,
                owners,
                min_year: self.years.min,
                max_year: self.years.max,
            }),
            Err(err) => reject("edit_education_form", err, Route::EducationList),
        }
    }

    pub fn update_education(&self, edu_id: EducationId, form: &Form) -> Response {
        let result = checked_id(RecordKind::Education, edu_id).and_then(|edu_id| {
            let person_id = form.require_id("person_id")?;
            let input = education_input(form)?;
            self.with_connection(|conn| {
                Ok(self
                    .education_service(conn)
                    .update_education(edu_id, person_id, &input)?)
            })
        });
        match result {
            Ok(UpdateOutcome::Updated) => {
                log_success("update_education", edu_id);
                Response::redirect(Route::EducationList)
                    .with_notice(Notice::success("Education updated successfully"))
            }
            Ok(UpdateOutcome::Unchanged) => Response::redirect(Route::EducationList),
            Err(err) => {
                let route = retry_or(&err, Route::EditEducation(edu_id), Route::EducationList);
                reject("update_education", err, route)
            }
        }
    }

    pub fn delete_education(&self, edu_id: EducationId) -> Response {
        let result = checked_id(RecordKind::Education, edu_id).and_then(|edu_id| {
            self.with_connection(|conn| {
                Ok(self.education_service(conn).delete_education(edu_id)?)
            })
        });
        match result {
            Ok(person_id) => {
                log_success("delete_education", edu_id);
                Response::redirect(Route::PersonDetail(person_id))
                    .with_notice(Notice::success("Education deleted successfully"))
            }
            Err(err) => reject("delete_education", err, Route::EducationList),
        }
    }

    /// Runs `f` against a fresh session that is closed on every exit path.
    fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let conn = self.db.connect().map_err(ApiError::Connection)?;
        f(&conn)
    }

    fn education_service<'conn>(
        &self,
        conn: &'conn Connection,
    ) -> EducationService<SqliteEducationRepository<'conn>> {
        EducationService::new(SqliteEducationRepository::new(conn), self.years)
    }

    fn owner_summary(&self, person_id: PersonId) -> Result<PersonSummary, ApiError> {
        let person_id = checked_id(RecordKind::Person, person_id)?;
        let person = self.with_connection(|conn| Ok(person_service(conn).get_person(person_id)?))?;
        Ok(summary(person))
    }
}

fn person_service(conn: &Connection) -> PersonService<SqlitePersonRepository<'_>> {
    PersonService::new(SqlitePersonRepository::new(conn))
}

fn career_service(conn: &Connection) -> CareerService<SqliteCareerRepository<'_>> {
    CareerService::new(SqliteCareerRepository::new(conn))
}

fn checked_id(kind: RecordKind, id: i64) -> Result<i64, ApiError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(ApiError::Service(ServiceError::NotFound { kind, id }))
    }
}

fn person_input(form: &Form) -> Result<PersonInput, ApiError> {
    Ok(PersonInput {
        name: form.require("name")?,
        dob: form.get("dob").map(str::to_string),
        gender: form.text("gender"),
        phone: form.require("phone")?,
        email: form.require("email")?,
        address: form.text("address"),
    })
}

fn contact_input(form: &Form) -> Result<ContactInput, ApiError> {
    Ok(ContactInput {
        gender: form.text("gender"),
        phone: form.require("phone")?,
        email: form.require("email")?,
        address: form.text("address"),
    })
}

fn career_input(form: &Form) -> Result<CareerInput, ApiError> {
    Ok(CareerInput {
        job_title: form.require("job_title")?,
        company: form.require("company")?,
        years_experience: form.require("years_experience")?,
        skills: form.require("skills")?,
    })
}

fn education_input(form: &Form) -> Result<EducationInput, ApiError> {
    Ok(EducationInput {
        degree: form.require("degree")?,
        institution: form.require("institution")?,
        year_of_passing: form.require("year_of_passing")?,
    })
}

fn summary(person: Person) -> PersonSummary {
    PersonSummary {
        person_id: person.person_id,
        name: person.name,
    }
}

/// Sends fixable input, and edits naming a missing owner, back to the form.
fn retry_or(err: &ApiError, form_route: Route, fallback: Route) -> Route {
    let back_to_form = err.level() == NoticeLevel::Warning
        || matches!(err, ApiError::Service(ServiceError::MissingOwner(_)));
    if back_to_form {
        form_route
    } else {
        fallback
    }
}

fn reject(op: &'static str, err: ApiError, route: Route) -> Response {
    log_failure(op, &err);
    Response::redirect(route).with_notice(err.notice())
}

fn log_success(op: &'static str, id: i64) {
    info!("event=api_request module=api status=ok op={op} id={id}");
}

fn log_failure(op: &'static str, err: &ApiError) {
    match err.level() {
        NoticeLevel::Danger => error!(
            "event=api_request module=api status=error op={op} error_code={}",
            err.code()
        ),
        _ => warn!(
            "event=api_request module=api status=rejected op={op} error_code={}",
            err.code()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{checked_id, retry_or};
    use crate::error::ApiError;
    use crate::form::FormError;
    use crate::response::Route;
    use pim_core::{RecordKind, ServiceError};

    #[test]
    fn checked_id_treats_non_positive_as_not_found() {
        assert_eq!(checked_id(RecordKind::Career, 1).unwrap(), 1);
        for id in [0, -4] {
            let err = checked_id(RecordKind::Career, id).unwrap_err();
            assert!(err.is_not_found());
        }
    }

    #[test]
    fn retry_or_returns_form_for_fixable_errors() {
        let missing = ApiError::Form(FormError::MissingField("company"));
        assert_eq!(
            retry_or(&missing, Route::EditCareer(2), Route::CareerList),
            Route::EditCareer(2)
        );

        let owner = ApiError::Service(ServiceError::MissingOwner(9));
        assert_eq!(
            retry_or(&owner, Route::EditCareer(2), Route::CareerList),
            Route::EditCareer(2)
        );

        let gone = ApiError::Service(ServiceError::NotFound {
            kind: RecordKind::Career,
            id: 2,
        });
        assert_eq!(
            retry_or(&gone, Route::EditCareer(2), Route::CareerList),
            Route::CareerList
        );
    }
}
