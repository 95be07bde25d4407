//! Domain model for people and their career/education history.
//!
//! # Responsibility
//! - Define persisted record shapes and their list/detail projections.
//! - Turn loosely-typed form input into validated values before any SQL runs.
//!
//! # Invariants
//! - Identifiers are storage-assigned positive integers.
//! - Only validated values (`NewPerson`, `ContactUpdate`, `CareerFields`,
//!   `EducationFields`) reach the repository layer.

pub mod career;
pub mod education;
pub mod person;
pub mod validate;
