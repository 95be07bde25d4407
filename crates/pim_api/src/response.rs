//! Response envelope returned by every request entry point.
//!
//! A response either renders a view or redirects to a route, and may carry
//! one classified notice for the presentation layer.

use chrono::NaiveDate;
use pim_core::{
    Career, CareerId, CareerListItem, Education, EducationId, EducationListItem, Person,
    PersonDetail, PersonId, PersonSummary,
};
use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    /// Recoverable input problem; the user may resubmit.
    Warning,
    /// The operation failed or its target is gone.
    Danger,
}

impl Display for NoticeLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        };
        f.write_str(label)
    }
}

/// Human-readable status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Danger,
            message: message.into(),
        }
    }
}

/// Redirect targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    PersonList,
    PersonDetail(PersonId),
    AddPerson,
    EditPerson(PersonId),
    CareerList,
    AddCareer(PersonId),
    EditCareer(CareerId),
    EducationList,
    AddEducation(PersonId),
    EditEducation(EducationId),
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PersonList => f.write_str("/"),
            Self::PersonDetail(id) => write!(f, "/person/{id}"),
            Self::AddPerson => f.write_str("/add"),
            Self::EditPerson(id) => write!(f, "/update/{id}"),
            Self::CareerList => f.write_str("/career/view"),
            Self::AddCareer(person_id) => write!(f, "/career/add/{person_id}"),
            Self::EditCareer(id) => write!(f, "/career/edit/{id}"),
            Self::EducationList => f.write_str("/education/view"),
            Self::AddEducation(person_id) => write!(f, "/education/add/{person_id}"),
            Self::EditEducation(id) => write!(f, "/education/edit/{id}"),
        }
    }
}

/// Data for one rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    PersonList {
        persons: Vec<Person>,
        /// Applied search text, empty when listing everyone.
        query: String,
        is_empty: bool,
    },
    PersonDetail {
        detail: PersonDetail,
    },
    AddPersonForm {
        /// Upper bound for the date-of-birth picker.
        current_date: NaiveDate,
    },
    EditPersonForm {
        person: Person,
    },
    CareerList {
        items: Vec<CareerListItem>,
    },
    AddCareerForm {
        person: PersonSummary,
    },
    EditCareerForm {
        career: Career,
        owners: Vec<PersonSummary>,
    },
    EducationList {
        items: Vec<EducationListItem>,
    },
    AddEducationForm {
        person: PersonSummary,
        min_year: i32,
        max_year: i32,
    },
    EditEducationForm {
        education: Education,
        owners: Vec<PersonSummary>,
        min_year: i32,
        max_year: i32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum Outcome {
    Render(View),
    Redirect(Route),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub outcome: Outcome,
    pub notice: Option<Notice>,
}

impl Response {
    pub fn render(view: View) -> Self {
        Self {
            outcome: Outcome::Render(view),
            notice: None,
        }
    }

    pub fn redirect(route: Route) -> Self {
        Self {
            outcome: Outcome::Redirect(route),
            notice: None,
        }
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }

    pub fn notice_level(&self) -> Option<NoticeLevel> {
        self.notice.as_ref().map(|notice| notice.level)
    }

    pub fn is_danger(&self) -> bool {
        self.notice_level() == Some(NoticeLevel::Danger)
    }

    /// Redirect target, if this response redirects.
    pub fn redirect_target(&self) -> Option<Route> {
        match &self.outcome {
            Outcome::Redirect(route) => Some(*route),
            Outcome::Render(_) => None,
        }
    }

    pub fn view(&self) -> Option<&View> {
        match &self.outcome {
            Outcome::Render(view) => Some(view),
            Outcome::Redirect(_) => None,
        }
    }
}
