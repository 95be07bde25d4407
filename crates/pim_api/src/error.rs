//! Request-level error and its notice classification.

use crate::form::FormError;
use crate::response::{Notice, NoticeLevel};
use pim_core::{DbError, ServiceError};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ApiError {
    /// No usable database session could be opened.
    Connection(DbError),
    Form(FormError),
    Service(ServiceError),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(_) => f.write_str("Cannot connect to DB"),
            Self::Form(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection(err) => Some(err),
            Self::Form(err) => Some(err),
            Self::Service(err) => Some(err),
        }
    }
}

impl From<FormError> for ApiError {
    fn from(value: FormError) -> Self {
        Self::Form(value)
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl ApiError {
    /// Warning for input the user can fix and resubmit, danger otherwise.
    pub fn level(&self) -> NoticeLevel {
        match self {
            Self::Form(_)
            | Self::Service(ServiceError::Validation(_))
            | Self::Service(ServiceError::Duplicate { .. }) => NoticeLevel::Warning,
            Self::Connection(_)
            | Self::Service(ServiceError::NotFound { .. })
            | Self::Service(ServiceError::MissingOwner(_))
            | Self::Service(ServiceError::Repo(_)) => NoticeLevel::Danger,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Service(ServiceError::NotFound { .. }))
    }

    pub fn notice(&self) -> Notice {
        Notice {
            level: self.level(),
            message: self.to_string(),
        }
    }

    /// Stable, value-free code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Connection(_) => "db_unavailable",
            Self::Form(FormError::MissingField(_)) => "missing_form_field",
            Self::Form(FormError::InvalidId { .. }) => "invalid_form_id",
            Self::Service(err) => err.code(),
        }
    }
}
