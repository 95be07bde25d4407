//! Education repository contract and SQLite implementation.
//!
//! Mirrors the career repository: owner checked on insert, owner returned on
//! delete, list ordered newest identifier first.

use crate::model::education::{Education, EducationFields, EducationId, EducationListItem};
use crate::model::person::PersonId;
use crate::repo::career_repo::person_exists;
use crate::repo::{text_column, write_error, RecordKind, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const EDUCATION_SELECT_SQL: &str = "SELECT
    edu_id,
    person_id,
    degree,
    institution,
    year_of_passing
FROM education";

/// Repository interface for education history rows.
pub trait EducationRepository {
    fn list_education(&self) -> RepoResult<Vec<EducationListItem>>;
    fn get_education(&self, edu_id: EducationId) -> RepoResult<Option<Education>>;
    fn create_education(
        &self,
        person_id: PersonId,
        fields: &EducationFields,
    ) -> RepoResult<EducationId>;
    fn update_education(
        &self,
        edu_id: EducationId,
        person_id: PersonId,
        fields: &EducationFields,
    ) -> RepoResult<()>;
    /// Deletes one row and returns the person that owned it.
    fn delete_education(&self, edu_id: EducationId) -> RepoResult<PersonId>;
}

/// SQLite-backed education repository.
pub struct SqliteEducationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEducationRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EducationRepository for SqliteEducationRepository<'_> {
    fn list_education(&self) -> RepoResult<Vec<EducationListItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                e.edu_id,
                e.person_id,
                p.name,
                e.degree,
                e.institution,
                e.year_of_passing
             FROM education e
             INNER JOIN persons p ON e.person_id = p.person_id
             ORDER BY e.edu_id DESC;",
        )?;
        let items = stmt
            .query_map([], |row| {
                Ok(EducationListItem {
                    edu_id: row.get("edu_id")?,
                    person_id: row.get("person_id")?,
                    person_name: text_column(row, "name")?,
                    degree: text_column(row, "degree")?,
                    institution: text_column(row, "institution")?,
                    year_of_passing: row.get::<_, Option<i32>>("year_of_passing")?.unwrap_or(0),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn get_education(&self, edu_id: EducationId) -> RepoResult<Option<Education>> {
        let education = self
            .conn
            .query_row(
                &format!("{EDUCATION_SELECT_SQL} WHERE edu_id = ?1;"),
                [edu_id],
                parse_education_row,
            )
            .optional()?;
        Ok(education)
    }

    fn create_education(
        &self,
        person_id: PersonId,
        fields: &EducationFields,
    ) -> RepoResult<EducationId> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !person_exists(&tx, person_id)? {
            return Err(RepoError::NotFound {
                kind: RecordKind::Person,
                id: person_id,
            });
        }

        tx.execute(
            "INSERT INTO education (person_id, degree, institution, year_of_passing)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                person_id,
                fields.degree.as_str(),
                fields.institution.as_str(),
                fields.year_of_passing,
            ],
        )
        .map_err(|err| write_error(err, Some(person_id)))?;
        let edu_id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(edu_id)
    }

    fn update_education(
        &self,
        edu_id: EducationId,
        person_id: PersonId,
        fields: &EducationFields,
    ) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE education
                 SET
                    person_id = ?2,
                    degree = ?3,
                    institution = ?4,
                    year_of_passing = ?5
                 WHERE edu_id = ?1;",
                params![
                    edu_id,
                    person_id,
                    fields.degree.as_str(),
                    fields.institution.as_str(),
                    fields.year_of_passing,
                ],
            )
            .map_err(|err| write_error(err, Some(person_id)))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Education,
                id: edu_id,
            });
        }

        Ok(())
    }

    fn delete_education(&self, edu_id: EducationId) -> RepoResult<PersonId> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let owner: Option<PersonId> = tx
            .query_row(
                "SELECT person_id FROM education WHERE edu_id = ?1;",
                [edu_id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(person_id) = owner else {
            return Err(RepoError::NotFound {
                kind: RecordKind::Education,
                id: edu_id,
            });
        };

        tx.execute("DELETE FROM education WHERE edu_id = ?1;", [edu_id])
            .map_err(|err| write_error(err, None))?;
        tx.commit()?;

        Ok(person_id)
    }
}

/// Loads one person's education rows, latest year of passing first.
pub(crate) fn load_education_for_person(
    conn: &Connection,
    person_id: PersonId,
) -> RepoResult<Vec<Education>> {
    let mut stmt = conn.prepare(&format!(
        "{EDUCATION_SELECT_SQL} WHERE person_id = ?1 ORDER BY year_of_passing DESC, edu_id DESC;"
    ))?;
    let education = stmt
        .query_map([person_id], parse_education_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(education)
}

fn parse_education_row(row: &Row<'_>) -> rusqlite::Result<Education> {
    Ok(Education {
        edu_id: row.get("edu_id")?,
        person_id: row.get("person_id")?,
        degree: text_column(row, "degree")?,
        institution: text_column(row, "institution")?,
        year_of_passing: row.get::<_, Option<i32>>("year_of_passing")?.unwrap_or(0),
    })
}
