//! Person record and its validated inputs.
//!
//! # Invariants
//! - `phone` is exactly 10 ASCII digits and `email` matches the basic
//!   `local@domain.tld` pattern for every persisted person.
//! - `dob`, when set, is not after the date it was validated against.
//! - `name` and `dob` are fixed at creation; only contact fields change.

use crate::model::career::Career;
use crate::model::education::Education;
use crate::model::validate::{
    is_valid_email, is_valid_phone, normalize_phone, parse_past_date, required_text,
    ValidationError,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Auto-assigned storage identifier of a person.
pub type PersonId = i64;

/// Persisted person row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub person_id: PersonId,
    pub name: String,
    pub dob: Option<NaiveDate>,
    pub gender: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

/// Minimal projection used to pick an owner for career/education rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub person_id: PersonId,
    pub name: String,
}

/// Person with dependent history, as shown on the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDetail {
    pub person: Person,
    /// Newest identifier first.
    pub careers: Vec<Career>,
    /// Latest year of passing first.
    pub education: Vec<Education>,
}

/// Raw create-form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonInput {
    pub name: String,
    /// Empty or absent means "no date of birth".
    pub dob: Option<String>,
    pub gender: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

/// Validated values for inserting a person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub name: String,
    pub dob: Option<NaiveDate>,
    pub gender: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl PersonInput {
    /// Validates create input against `today`.
    ///
    /// Check order: required fields, date of birth, phone shape, email shape.
    pub fn validate(&self, today: NaiveDate) -> Result<NewPerson, ValidationError> {
        let name = required_text("name", &self.name)?;
        let phone = normalize_phone(&self.phone);
        if phone.is_empty() {
            return Err(ValidationError::MissingField("phone"));
        }
        let email = required_text("email", &self.email)?;

        let dob = match self.dob.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => Some(parse_past_date("dob", value, today)?),
            _ => None,
        };

        if !is_valid_phone(&phone) {
            return Err(ValidationError::InvalidPhone);
        }
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(NewPerson {
            name,
            dob,
            gender: self.gender.trim().to_string(),
            phone,
            email,
            address: self.address.trim().to_string(),
        })
    }
}

/// Raw update-form input; name and date of birth are not editable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInput {
    pub gender: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

/// Validated contact fields for updating a person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactUpdate {
    pub gender: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl ContactInput {
    pub fn validate(&self) -> Result<ContactUpdate, ValidationError> {
        let phone = normalize_phone(&self.phone);
        if !is_valid_phone(&phone) {
            return Err(ValidationError::InvalidPhone);
        }
        let email = self.email.trim().to_string();
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(ContactUpdate {
            gender: self.gender.trim().to_string(),
            phone,
            email,
            address: self.address.trim().to_string(),
        })
    }
}
