//! Pure input validation helpers shared by all record inputs.
//!
//! # Responsibility
//! - Canonicalize phone numbers to the 10-digit domestic form.
//! - Check email syntax and calendar-date inputs.
//! - Describe rejected input with a typed `ValidationError`.
//!
//! # Invariants
//! - Helpers never touch storage and never panic on user input.
//! - `normalize_phone` is best-effort; callers check `is_valid_phone` before
//!   persisting.

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PHONE_DIGITS: usize = 10;
const COUNTRY_PREFIX: &str = "91";
const TRUNK_PREFIX: char = '0';
const DATE_FORMAT: &str = "%Y-%m-%d";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").expect("valid email regex"));

/// Rejected-input reasons. Each is recoverable by resubmitting the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent or blank after trimming.
    MissingField(&'static str),
    /// Phone is not exactly 10 digits after normalization.
    InvalidPhone,
    /// Email does not match `local@domain.tld`.
    InvalidEmail,
    /// Date does not parse as `YYYY-MM-DD`.
    InvalidDate { field: &'static str, value: String },
    /// Date lies after the current date.
    FutureDate { field: &'static str, date: NaiveDate },
    /// Numeric field does not coerce to an integer.
    InvalidInteger { field: &'static str, value: String },
    /// Year lies outside the configured range.
    YearOutOfRange { year: i32, min: i32, max: i32 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::InvalidPhone => write!(f, "phone must be exactly {PHONE_DIGITS} digits"),
            Self::InvalidEmail => write!(f, "invalid email format"),
            Self::InvalidDate { field, value } => {
                write!(f, "invalid {field} `{value}`; expected YYYY-MM-DD")
            }
            Self::FutureDate { field, date } => {
                write!(f, "{field} cannot be in the future ({date})")
            }
            Self::InvalidInteger { field, value } => {
                write!(f, "{field} must be a whole number, got `{value}`")
            }
            Self::YearOutOfRange { year, min, max } => {
                write!(f, "year {year} is outside the allowed range {min}..={max}")
            }
        }
    }
}

impl ValidationError {
    /// Stable, value-free code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "missing_field",
            Self::InvalidPhone => "invalid_phone",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidDate { .. } => "invalid_date",
            Self::FutureDate { .. } => "future_date",
            Self::InvalidInteger { .. } => "invalid_integer",
            Self::YearOutOfRange { .. } => "year_out_of_range",
        }
    }
}

impl Error for ValidationError {}

/// Canonicalizes a user-entered phone number.
///
/// Rules, in order:
/// - strip every non-digit character;
/// - drop a leading `91` country code, or else one leading `0`, when more
///   than 10 digits remain;
/// - keep the trailing 10 digits, or return a shorter result unchanged.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    let stripped = if digits.len() > PHONE_DIGITS && digits.starts_with(COUNTRY_PREFIX) {
        &digits[COUNTRY_PREFIX.len()..]
    } else if digits.len() > PHONE_DIGITS && digits.starts_with(TRUNK_PREFIX) {
        &digits[1..]
    } else {
        digits.as_str()
    };

    if stripped.len() >= PHONE_DIGITS {
        stripped[stripped.len() - PHONE_DIGITS..].to_string()
    } else {
        stripped.to_string()
    }
}

/// Returns whether a normalized phone is persistable.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == PHONE_DIGITS && phone.chars().all(|c| c.is_ascii_digit())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Parses a `YYYY-MM-DD` date that must not lie after `today`.
pub fn parse_past_date(
    field: &'static str,
    value: &str,
    today: NaiveDate,
) -> Result<NaiveDate, ValidationError> {
    let date = NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidDate {
            field,
            value: value.to_string(),
        }
    })?;
    if date > today {
        return Err(ValidationError::FutureDate { field, date });
    }
    Ok(date)
}

/// Boolean form of [`parse_past_date`] against the local current date.
pub fn is_valid_date(value: &str) -> bool {
    parse_past_date("date", value, today()).is_ok()
}

/// Current local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn required_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn parse_integer<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> Result<T, ValidationError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ValidationError::InvalidInteger {
            field,
            value: value.to_string(),
        })
}
