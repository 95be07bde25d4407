//! Connection provider and schema initializer for SQLite.
//!
//! # Responsibility
//! - Create the database file and apply pending migrations (`ensure_schema`).
//! - Open configured connections to an initialized database (`open_db`).
//!
//! # Invariants
//! - `ensure_schema` is idempotent and safe to re-run.
//! - `open_db` never creates files and never migrates.
//! - Returned connections have `foreign_keys=ON` and a busy timeout.

use super::migrations::{apply_migrations, latest_version};
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection provider bound to one database file.
///
/// Each call to [`Database::connect`] returns a fresh owned connection; it is
/// closed when the caller drops it, on every exit path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Runs the idempotent schema initializer against this database.
    pub fn ensure_schema(&self) -> DbResult<()> {
        ensure_schema(&self.path)
    }

    /// Opens one session against the initialized database.
    pub fn connect(&self) -> DbResult<Connection> {
        open_db(&self.path)
    }
}

/// Creates the database file when absent and applies all pending migrations.
///
/// # Side effects
/// - Creates missing parent directories.
/// - Emits `schema_init` logging events with duration and status.
pub fn ensure_schema(path: impl AsRef<Path>) -> DbResult<()> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=schema_init module=db status=start");

    let result = create_parent_dir(path)
        .and_then(|()| Connection::open(path).map_err(DbError::from))
        .and_then(|mut conn| {
            configure_connection(&conn)?;
            apply_migrations(&mut conn)
        });

    match result {
        Ok(()) => {
            info!(
                "event=schema_init module=db status=ok duration_ms={} schema_version={}",
                started_at.elapsed().as_millis(),
                latest_version()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=schema_init module=db status=error duration_ms={} error_code=schema_init_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens a connection to an existing, fully migrated database file.
///
/// A missing file or an out-of-date schema is a connection failure.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;

    let result = Connection::open_with_flags(path, flags)
        .map_err(DbError::from)
        .and_then(|conn| {
            configure_connection(&conn)?;
            ensure_schema_current(&conn)?;
            Ok(conn)
        });

    if let Err(err) = &result {
        error!(
            "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed error={}",
            started_at.elapsed().as_millis(),
            err
        );
    }
    result
}

/// Opens an in-memory database with the schema applied.
///
/// An in-memory database has no separate startup step, so this both creates
/// and migrates.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let mut conn = Connection::open_in_memory()?;
    configure_connection(&conn)?;
    apply_migrations(&mut conn)?;
    info!("event=db_open module=db status=ok mode=memory");
    Ok(conn)
}

fn create_parent_dir(path: &Path) -> DbResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| DbError::Io {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

fn configure_connection(conn: &Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}

fn ensure_schema_current(conn: &Connection) -> DbResult<()> {
    let db_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if db_version > expected_version {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported: expected_version,
        });
    }
    if db_version < expected_version {
        return Err(DbError::SchemaNotInitialized {
            db_version,
            expected_version,
        });
    }
    Ok(())
}
