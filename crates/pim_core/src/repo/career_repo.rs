//! Career repository contract and SQLite implementation.
//!
//! # Invariants
//! - Inserts verify the owner inside the same immediate transaction.
//! - Delete resolves the owner before removing the row and reports it back.
//! - List order is newest identifier first.

use crate::model::career::{Career, CareerFields, CareerId, CareerListItem};
use crate::model::person::PersonId;
use crate::repo::{text_column, write_error, RecordKind, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const CAREER_SELECT_SQL: &str = "SELECT
    career_id,
    person_id,
    job_title,
    company,
    years_experience,
    skills
FROM career";

/// Repository interface for career history rows.
pub trait CareerRepository {
    /// Lists all rows joined with the owner's name.
    fn list_careers(&self) -> RepoResult<Vec<CareerListItem>>;
    fn get_career(&self, career_id: CareerId) -> RepoResult<Option<Career>>;
    /// Inserts a row for an existing person.
    fn create_career(&self, person_id: PersonId, fields: &CareerFields) -> RepoResult<CareerId>;
    /// Rewrites all editable columns and the owner reference.
    fn update_career(
        &self,
        career_id: CareerId,
        person_id: PersonId,
        fields: &CareerFields,
    ) -> RepoResult<()>;
    /// Deletes one row and returns the person that owned it.
    fn delete_career(&self, career_id: CareerId) -> RepoResult<PersonId>;
}

/// SQLite-backed career repository.
pub struct SqliteCareerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCareerRepository<'conn> {
    /// Wraps a connection handed out by `db::open_db` or `db::open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CareerRepository for SqliteCareerRepository<'_> {
    fn list_careers(&self) -> RepoResult<Vec<CareerListItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                c.career_id,
                c.person_id,
                p.name,
                c.job_title,
                c.company,
                c.years_experience,
                c.skills
             FROM career c
             INNER JOIN persons p ON c.person_id = p.person_id
             ORDER BY c.career_id DESC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(CareerListItem {
                career_id: row.get("career_id")?,
                person_id: row.get("person_id")?,
                person_name: text_column(row, "name")?,
                job_title: text_column(row, "job_title")?,
                company: text_column(row, "company")?,
                years_experience: row.get::<_, Option<i64>>("years_experience")?.unwrap_or(0),
                skills: text_column(row, "skills")?,
            });
        }
        Ok(items)
    }

    fn get_career(&self, career_id: CareerId) -> RepoResult<Option<Career>> {
        let career = self
            .conn
            .query_row(
                &format!("{CAREER_SELECT_SQL} WHERE career_id = ?1;"),
                [career_id],
                parse_career_row,
            )
            .optional()?;
        Ok(career)
    }

    fn create_career(&self, person_id: PersonId, fields: &CareerFields) -> RepoResult<CareerId> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !person_exists(&tx, person_id)? {
            return Err(RepoError::NotFound {
                kind: RecordKind::Person,
                id: person_id,
            });
        }

        tx.execute(
            "INSERT INTO career (person_id, job_title, company, years_experience, skills)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                person_id,
                fields.job_title.as_str(),
                fields.company.as_str(),
                fields.years_experience,
                fields.skills.as_str(),
            ],
        )
        .map_err(|err| write_error(err, Some(person_id)))?;
        let career_id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(career_id)
    }

    fn update_career(
        &self,
        career_id: CareerId,
        person_id: PersonId,
        fields: &CareerFields,
    ) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE career
                 SET
                    person_id = ?2,
                    job_title = ?3,
                    company = ?4,
                    years_experience = ?5,
                    skills = ?6
                 WHERE career_id = ?1;",
                params![
                    career_id,
                    person_id,
                    fields.job_title.as_str(),
                    fields.company.as_str(),
                    fields.years_experience,
                    fields.skills.as_str(),
                ],
            )
            .map_err(|err| write_error(err, Some(person_id)))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Career,
                id: career_id,
            });
        }

        Ok(())
    }

    fn delete_career(&self, career_id: CareerId) -> RepoResult<PersonId> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let owner: Option<PersonId> = tx
            .query_row(
                "SELECT person_id FROM career WHERE career_id = ?1;",
                [career_id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(person_id) = owner else {
            return Err(RepoError::NotFound {
                kind: RecordKind::Career,
                id: career_id,
            });
        };

        tx.execute("DELETE FROM career WHERE career_id = ?1;", [career_id])
            .map_err(|err| write_error(err, None))?;
        tx.commit()?;

        Ok(person_id)
    }
}

/// Loads one person's career rows, newest identifier first.
pub(crate) fn load_careers_for_person(
    conn: &Connection,
    person_id: PersonId,
) -> RepoResult<Vec<Career>> {
    let mut stmt = conn.prepare(&format!(
        "{CAREER_SELECT_SQL} WHERE person_id = ?1 ORDER BY career_id DESC;"
    ))?;
    let careers = stmt
        .query_map([person_id], parse_career_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(careers)
}

pub(crate) fn person_exists(conn: &Connection, person_id: PersonId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM persons WHERE person_id = ?1);",
        [person_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_career_row(row: &Row<'_>) -> rusqlite::Result<Career> {
    Ok(Career {
        career_id: row.get("career_id")?,
        person_id: row.get("person_id")?,
        job_title: text_column(row, "job_title")?,
        company: text_column(row, "company")?,
        years_experience: row.get::<_, Option<i64>>("years_experience")?.unwrap_or(0),
        skills: text_column(row, "skills")?,
    })
}
