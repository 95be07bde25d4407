//! Education history record.
//!
//! # Invariants
//! - Every education row is owned by an existing person and is removed with
//!   it.
//! - `year_of_passing` lies inside the configured `PassingYearRange`.

use crate::model::person::PersonId;
use crate::model::validate::{parse_integer, required_text, ValidationError};
use serde::{Deserialize, Serialize};

pub type EducationId = i64;

/// Inclusive bounds for a year of passing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassingYearRange {
    pub min: i32,
    pub max: i32,
}

impl PassingYearRange {
    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

impl Default for PassingYearRange {
    fn default() -> Self {
        Self {
            min: 1901,
            max: 2050,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub edu_id: EducationId,
    pub person_id: PersonId,
    pub degree: String,
    pub institution: String,
    pub year_of_passing: i32,
}

impl Education {
    pub fn fields(&self) -> EducationFields {
        EducationFields {
            degree: self.degree.clone(),
            institution: self.institution.clone(),
            year_of_passing: self.year_of_passing,
        }
    }
}

/// Education row joined with its owner's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationListItem {
    pub edu_id: EducationId,
    pub person_id: PersonId,
    pub person_name: String,
    pub degree: String,
    pub institution: String,
    pub year_of_passing: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EducationInput {
    pub degree: String,
    pub institution: String,
    pub year_of_passing: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EducationFields {
    pub degree: String,
    pub institution: String,
    pub year_of_passing: i32,
}

impl EducationInput {
    pub fn validate(&self, years: PassingYearRange) -> Result<EducationFields, ValidationError> {
        let degree = required_text("degree", &self.degree)?;
        let institution = required_text("institution", &self.institution)?;
        let year_of_passing: i32 = parse_integer("year_of_passing", &self.year_of_passing)?;
        if !years.contains(year_of_passing) {
            return Err(ValidationError::YearOutOfRange {
                year: year_of_passing,
                min: years.min,
                max: years.max,
            });
        }

        Ok(EducationFields {
            degree,
            institution,
            year_of_passing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{EducationInput, PassingYearRange};
    use crate::model::validate::ValidationError;

    fn input(year: &str) -> EducationInput {
        EducationInput {
            degree: "B.Tech".to_string(),
            institution: "IIT Madras".to_string(),
            year_of_passing: year.to_string(),
        }
    }

    #[test]
    fn year_bounds_are_inclusive() {
        let years = PassingYearRange::default();
        assert_eq!(input("2050").validate(years).unwrap().year_of_passing, 2050);
        assert_eq!(input("1901").validate(years).unwrap().year_of_passing, 1901);
    }

    #[test]
    fn year_above_configured_maximum_is_rejected() {
        let years = PassingYearRange {
            min: 1950,
            max: 2030,
        };
        assert_eq!(
            input("2031").validate(years),
            Err(ValidationError::YearOutOfRange {
                year: 2031,
                min: 1950,
                max: 2030
            })
        );
    }

    #[test]
    fn missing_degree_is_reported_by_name() {
        let mut raw = input("2010");
        raw.degree = String::new();
        assert_eq!(
            raw.validate(PassingYearRange::default()),
            Err(ValidationError::MissingField("degree"))
        );
    }
}
