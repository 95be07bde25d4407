//! Key/value form input.
//!
//! # Invariants
//! - A missing required key is a rejected input, never a panic.
//! - Identifier fields must parse to a positive integer.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Submitted form fields keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    MissingField(&'static str),
    InvalidId { field: &'static str, value: String },
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::InvalidId { field, value } => {
                write!(f, "{field} must be a positive identifier, got `{value}`")
            }
        }
    }
}

impl Error for FormError {}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Value of an optional field; absent reads as empty.
    pub fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    /// Value of a field that must be submitted. Blank values pass through so
    /// domain validation can report them.
    pub fn require(&self, key: &'static str) -> Result<String, FormError> {
        self.get(key)
            .map(str::to_string)
            .ok_or(FormError::MissingField(key))
    }

    pub fn require_id(&self, key: &'static str) -> Result<i64, FormError> {
        let raw = self.require(key)?;
        match raw.trim().parse::<i64>() {
            Ok(id) if id > 0 => Ok(id),
            _ => Err(FormError::InvalidId {
                field: key,
                value: raw,
            }),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Form {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = Self::new();
        for (key, value) in iter {
            form.insert(key, value);
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::{Form, FormError};

    #[test]
    fn require_reports_missing_key_but_keeps_blank_value() {
        let form = Form::new().with("name", "  ");
        assert_eq!(form.require("name").unwrap(), "  ");
        assert_eq!(
            form.require("phone"),
            Err(FormError::MissingField("phone"))
        );
        assert_eq!(form.text("address"), "");
    }

    #[test]
    fn require_id_accepts_only_positive_integers() {
        let form: Form = [("person_id", " 7 "), ("zero", "0"), ("word", "abc")]
            .into_iter()
            .collect();
        assert_eq!(form.require_id("person_id").unwrap(), 7);
        assert!(matches!(
            form.require_id("zero"),
            Err(FormError::InvalidId { field: "zero", .. })
        ));
        assert!(matches!(
            form.require_id("word"),
            Err(FormError::InvalidId { .. })
        ));
    }
}
