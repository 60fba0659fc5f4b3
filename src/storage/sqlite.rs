//! SQLite repository
//!
//! One `technology` table, ids from `INTEGER PRIMARY KEY AUTOINCREMENT`.
//! Connections come from an r2d2 pool, so readers and writers on a file
//! database do not queue behind each other; SQLite's own locking (with a
//! busy timeout) orders concurrent writes. Every statement is a single-row
//! operation.
//!
//! An in-memory database lives inside its one connection, so that pool is
//! capped at a single connection that is never recycled.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use r2d2::{ManageConnection, Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension};

use crate::log_event;
use crate::observability::Event;
use crate::schema::Technology;

use super::errors::{StorageError, StorageResult};
use super::migrations::apply_migrations;
use super::repository::TechnologyRepository;

const DATE_FORMAT: &str = "%Y-%m-%d";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SELECT_SQL: &str = "SELECT id, name, description, date FROM technology";

/// Raw row as stored, before date decoding
type RawRow = (i64, String, Option<String>, String);

/// Technology store backed by SQLite.
pub struct SqliteTechnologyRepository {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl fmt::Debug for SqliteTechnologyRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteTechnologyRepository")
            .field("pool_size", &self.pool.max_size())
            .finish()
    }
}

impl SqliteTechnologyRepository {
    /// Open (or create) a database file and apply pending migrations.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let manager = SqliteConnectionManager::file(path).with_init(configure);

        // fail fast on an unreachable file instead of waiting out the pool timeout
        manager.connect().map_err(|e| {
            StorageError::Unavailable(format!("cannot open {}: {}", path.display(), e))
        })?;

        let pool = Pool::builder().build(manager)?;
        Self::bootstrap(pool, &path.display().to_string())
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> StorageResult<Self> {
        let pool = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(SqliteConnectionManager::memory())?;
        Self::bootstrap(pool, ":memory:")
    }

    fn bootstrap(pool: Pool<SqliteConnectionManager>, location: &str) -> StorageResult<Self> {
        let started = Instant::now();
        let applied = {
            let mut conn = pool.get()?;
            apply_migrations(&mut conn)?
        };

        log_event!(
            Event::StorageOpened,
            backend = "sqlite",
            location,
            pool_size = pool.max_size(),
            duration_ms = started.elapsed().as_millis() as u64
        );
        if applied > 0 {
            log_event!(Event::MigrationsApplied, count = applied);
        }

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    fn conn(&self) -> StorageResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    fn decode((id, name, description, date): RawRow) -> StorageResult<Technology> {
        let date = NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|e| {
            StorageError::CorruptRow {
                id,
                reason: format!("invalid date '{}': {}", date, e),
            }
        })?;
        Ok(Technology {
            id: Some(id),
            name,
            description,
            date,
        })
    }
}

fn configure(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)
}

impl TechnologyRepository for SqliteTechnologyRepository {
    fn save(&self, mut technology: Technology) -> StorageResult<Technology> {
        let conn = self.conn()?;
        let date = technology.date.format(DATE_FORMAT).to_string();

        match technology.id {
            None => {
                conn.execute(
                    "INSERT INTO technology (name, description, date) VALUES (?1, ?2, ?3)",
                    params![technology.name, technology.description, date],
                )?;
                technology.id = Some(conn.last_insert_rowid());
            }
            Some(id) => {
                let updated = conn.execute(
                    "UPDATE technology SET name = ?2, description = ?3, date = ?4 WHERE id = ?1",
                    params![id, technology.name, technology.description, date],
                )?;
                // no row under that id: the record is stored under a fresh one
                if updated == 0 {
                    conn.execute(
                        "INSERT INTO technology (name, description, date) VALUES (?1, ?2, ?3)",
                        params![technology.name, technology.description, date],
                    )?;
                    technology.id = Some(conn.last_insert_rowid());
                }
            }
        }

        Ok(technology)
    }

    fn find_by_id(&self, id: i64) -> StorageResult<Option<Technology>> {
        let conn = self.conn()?;
        let raw: Option<RawRow> = conn
            .query_row(&format!("{SELECT_SQL} WHERE id = ?1"), params![id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })
            .optional()?;

        raw.map(Self::decode).transpose()
    }

    fn find_all(&self) -> StorageResult<Vec<Technology>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{SELECT_SQL} ORDER BY id ASC"))?;
        let raws = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<Result<Vec<RawRow>, _>>()?;

        raws.into_iter().map(Self::decode).collect()
    }

    fn delete_by_id(&self, id: i64) -> StorageResult<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM technology WHERE id = ?1", params![id])?;
        Ok(())
    }
}
