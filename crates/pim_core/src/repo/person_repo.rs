//! Person repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/search, detail, create, contact update and delete over
//!   `persons`.
//! - Load dependent career/education history for the detail view.
//!
//! # Invariants
//! - Phone/email uniqueness is enforced by storage and surfaced as
//!   `RepoError::Duplicate`.
//! - Deleting a person relies on `ON DELETE CASCADE`; dependents are never
//!   deleted row by row here.
//! - Search matches `%` and `_` literally.

use crate::model::person::{
    ContactUpdate, NewPerson, Person, PersonDetail, PersonId, PersonSummary,
};
use crate::repo::career_repo::load_careers_for_person;
use crate::repo::education_repo::load_education_for_person;
use crate::repo::{text_column, write_error, RecordKind, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const PERSON_SELECT_SQL: &str = "SELECT
    person_id,
    name,
    dob,
    gender,
    phone,
    email,
    address
FROM persons";

const DOB_FORMAT: &str = "%Y-%m-%d";

/// Repository interface for person records.
pub trait PersonRepository {
    /// Lists all persons, or those whose name/email/phone contains `search`.
    fn list_persons(&self, search: Option<&str>) -> RepoResult<Vec<Person>>;
    fn get_person(&self, person_id: PersonId) -> RepoResult<Option<Person>>;
    /// Gets one person with career and education history.
    fn get_person_detail(&self, person_id: PersonId) -> RepoResult<Option<PersonDetail>>;
    /// Lists `(id, name)` pairs sorted by name.
    fn list_person_summaries(&self) -> RepoResult<Vec<PersonSummary>>;
    fn create_person(&self, person: &NewPerson) -> RepoResult<PersonId>;
    /// Replaces gender, phone, email and address.
    fn update_contact(&self, person_id: PersonId, update: &ContactUpdate) -> RepoResult<()>;
    /// Deletes one person; dependents go with it.
    fn delete_person(&self, person_id: PersonId) -> RepoResult<()>;
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Wraps a connection handed out by `db::open_db` or `db::open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn list_persons(&self, search: Option<&str>) -> RepoResult<Vec<Person>> {
        let mut persons = Vec::new();
        match search {
            Some(text) => {
                let pattern = format!("%{}%", escape_like(text));
                let mut stmt = self.conn.prepare(&format!(
                    "{PERSON_SELECT_SQL}
                     WHERE name LIKE ?1 ESCAPE '\\'
                        OR email LIKE ?1 ESCAPE '\\'
                        OR phone LIKE ?1 ESCAPE '\\'
                     ORDER BY person_id ASC;"
                ))?;
                let mut rows = stmt.query([pattern])?;
                while let Some(row) = rows.next()? {
                    persons.push(parse_person_row(row)?);
                }
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("{PERSON_SELECT_SQL} ORDER BY person_id ASC;"))?;
                let mut rows = stmt.query([])?;
                while let Some(row) = rows.next()? {
                    persons.push(parse_person_row(row)?);
                }
            }
        }
        Ok(persons)
    }

    fn get_person(&self, person_id: PersonId) -> RepoResult<Option<Person>> {
        load_person(self.conn, person_id)
    }

    fn get_person_detail(&self, person_id: PersonId) -> RepoResult<Option<PersonDetail>> {
        // One read transaction keeps the person and its history consistent.
        let tx = self.conn.unchecked_transaction()?;
        let Some(person) = load_person(&tx, person_id)? else {
            return Ok(None);
        };
        let careers = load_careers_for_person(&tx, person_id)?;
        let education = load_education_for_person(&tx, person_id)?;
        tx.commit()?;

        Ok(Some(PersonDetail {
            person,
            careers,
            education,
        }))
    }

    fn list_person_summaries(&self) -> RepoResult<Vec<PersonSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT person_id, name
             FROM persons
             ORDER BY name COLLATE NOCASE ASC, person_id ASC;",
        )?;
        let summaries = stmt
            .query_map([], |row| {
                Ok(PersonSummary {
                    person_id: row.get("person_id")?,
                    name: text_column(row, "name")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(summaries)
    }

    fn create_person(&self, person: &NewPerson) -> RepoResult<PersonId> {
        self.conn
            .execute(
                "INSERT INTO persons (name, dob, gender, phone, email, address)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    person.name.as_str(),
                    person.dob.map(|dob| dob.format(DOB_FORMAT).to_string()),
                    person.gender.as_str(),
                    person.phone.as_str(),
                    person.email.as_str(),
                    person.address.as_str(),
                ],
            )
            .map_err(|err| write_error(err, None))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_contact(&self, person_id: PersonId, update: &ContactUpdate) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE persons
                 SET
                    gender = ?2,
                    phone = ?3,
                    email = ?4,
                    address = ?5
                 WHERE person_id = ?1;",
                params![
                    person_id,
                    update.gender.as_str(),
                    update.phone.as_str(),
                    update.email.as_str(),
                    update.address.as_str(),
                ],
            )
            .map_err(|err| write_error(err, None))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Person,
                id: person_id,
            });
        }

        Ok(())
    }

    fn delete_person(&self, person_id: PersonId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM persons WHERE person_id = ?1;", [person_id])
            .map_err(|err| write_error(err, None))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Person,
                id: person_id,
            });
        }

        Ok(())
    }
}

fn load_person(conn: &Connection, person_id: PersonId) -> RepoResult<Option<Person>> {
    let mut stmt = conn.prepare(&format!("{PERSON_SELECT_SQL} WHERE person_id = ?1;"))?;
    let mut rows = stmt.query([person_id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_person_row(row)?));
    }

    Ok(None)
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let dob = match row.get::<_, Option<String>>("dob")? {
        Some(text) => Some(NaiveDate::parse_from_str(&text, DOB_FORMAT).map_err(|_| {
            RepoError::InvalidData(format!("invalid date `{text}` in persons.dob"))
        })?),
        None => None,
    };

    Ok(Person {
        person_id: row.get("person_id")?,
        name: text_column(row, "name")?,
        dob,
        gender: text_column(row, "gender")?,
        phone: text_column(row, "phone")?,
        email: text_column(row, "email")?,
        address: text_column(row, "address")?,
    })
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
