//! Career history record.
//!
//! # Invariants
//! - Every career row is owned by an existing person; it disappears with its
//!   owner through the storage-level cascade.

use crate::model::person::PersonId;
use crate::model::validate::{parse_integer, required_text, ValidationError};
use serde::{Deserialize, Serialize};

pub type CareerId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Career {
    pub career_id: CareerId,
    pub person_id: PersonId,
    pub job_title: String,
    pub company: String,
    pub years_experience: i64,
    pub skills: String,
}

impl Career {
    /// Editable fields, for change detection against submitted input.
    pub fn fields(&self) -> CareerFields {
        CareerFields {
            job_title: self.job_title.clone(),
            company: self.company.clone(),
            years_experience: self.years_experience,
            skills: self.skills.clone(),
        }
    }
}

/// Career row joined with its owner's name, as shown on the list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerListItem {
    pub career_id: CareerId,
    pub person_id: PersonId,
    pub person_name: String,
    pub job_title: String,
    pub company: String,
    pub years_experience: i64,
    pub skills: String,
}

/// Raw career form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CareerInput {
    pub job_title: String,
    pub company: String,
    pub years_experience: String,
    pub skills: String,
}

/// Validated career values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CareerFields {
    pub job_title: String,
    pub company: String,
    pub years_experience: i64,
    pub skills: String,
}

impl CareerInput {
    /// Years of experience is only coerced to an integer; no range is imposed.
    pub fn validate(&self) -> Result<CareerFields, ValidationError> {
        Ok(CareerFields {
            job_title: required_text("job_title", &self.job_title)?,
            company: required_text("company", &self.company)?,
            years_experience: parse_integer("years_experience", &self.years_experience)?,
            skills: self.skills.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Career, CareerInput};
    use crate::model::validate::ValidationError;

    #[test]
    fn validate_coerces_years_and_trims_text() {
        let fields = CareerInput {
            job_title: " Engineer ".to_string(),
            company: "Acme".to_string(),
            years_experience: " 4 ".to_string(),
            skills: " rust, sql ".to_string(),
        }
        .validate()
        .unwrap();
        assert_eq!(fields.job_title, "Engineer");
        assert_eq!(fields.years_experience, 4);
        assert_eq!(fields.skills, "rust, sql");
    }

    #[test]
    fn validate_rejects_non_integer_years() {
        let err = CareerInput {
            job_title: "Engineer".to_string(),
            company: "Acme".to_string(),
            years_experience: "four".to_string(),
            skills: String::new(),
        }
        .validate()
        .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidInteger {
                field: "years_experience",
                ..
            }
        ));
    }

    #[test]
    fn fields_mirror_stored_values() {
        let career = Career {
            career_id: 3,
            person_id: 1,
            job_title: "Analyst".to_string(),
            company: "Initech".to_string(),
            years_experience: 2,
            skills: "excel".to_string(),
        };
        let same = CareerInput {
            job_title: "Analyst".to_string(),
            company: "Initech".to_string(),
            years_experience: "2".to_string(),
            skills: "excel".to_string(),
        };
        assert_eq!(career.fields(), same.validate().unwrap());
    }
}
