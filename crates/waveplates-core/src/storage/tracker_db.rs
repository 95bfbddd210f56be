//! SQLite-based storage for trackers.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{data_dir, migrations, TrackerStore};
use crate::error::{CoreError, DatabaseError, Result};
use crate::stamina::{NewTracker, Tracker};

const TRACKER_COLUMNS: &str =
    "id, name, cap_time, max_capacity, minutes_per_unit, created_at, updated_at";

fn parse_timestamp(idx: usize, value: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn row_to_tracker(row: &rusqlite::Row) -> Result<Tracker, rusqlite::Error> {
    let cap_time: String = row.get(2)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;
    Ok(Tracker {
        id: row.get(0)?,
        name: row.get(1)?,
        cap_time: parse_timestamp(2, &cap_time)?,
        max_capacity: row.get(3)?,
        minutes_per_unit: row.get(4)?,
        created_at: parse_timestamp(5, &created_at)?,
        updated_at: parse_timestamp(6, &updated_at)?,
    })
}

fn map_row_error(err: rusqlite::Error) -> CoreError {
    match err {
        rusqlite::Error::FromSqlConversionFailure(..) | rusqlite::Error::InvalidColumnType(..) => {
            DatabaseError::CorruptRow {
                table: "trackers".to_string(),
                message: err.to_string(),
            }
            .into()
        }
        other => other.into(),
    }
}

/// SQLite database holding the tracker collection.
pub struct TrackerDb {
    conn: Connection,
}

impl TrackerDb {
    #[cfg(test)]
    fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/waveplates.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("waveplates.db"))
    }

    /// Open (or create) a database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened tracker database");
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.busy_timeout(std::time::Duration::from_secs(2))?;
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }
}

impl TrackerStore for TrackerDb {
    fn list_trackers(&self) -> Result<Vec<Tracker>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TRACKER_COLUMNS} FROM trackers ORDER BY name COLLATE NOCASE, id"
        ))?;
        let trackers = stmt
            .query_map([], row_to_tracker)?
            .collect::<Result<Vec<Tracker>, _>>()
            .map_err(map_row_error)?;
        tracing::debug!(count = trackers.len(), "listed trackers");
        Ok(trackers)
    }

    fn get_tracker(&self, id: &str) -> Result<Option<Tracker>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TRACKER_COLUMNS} FROM trackers WHERE id = ?1"))?;
        stmt.query_row(params![id], row_to_tracker)
            .optional()
            .map_err(map_row_error)
    }

    fn insert_tracker(&self, tracker: NewTracker) -> Result<Tracker> {
        let tracker = tracker.into_tracker(Uuid::new_v4().to_string(), Utc::now());
        tracker.validate()?;
        self.conn.execute(
            "INSERT INTO trackers (id, name, cap_time, max_capacity, minutes_per_unit, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                tracker.id,
                tracker.name,
                tracker.cap_time.to_rfc3339(),
                tracker.max_capacity,
                tracker.minutes_per_unit,
                tracker.created_at.to_rfc3339(),
                tracker.updated_at.to_rfc3339(),
            ],
        )?;
        tracing::info!(id = %tracker.id, name = %tracker.name, "inserted tracker");
        Ok(tracker)
    }

    fn update_tracker(&self, tracker: &Tracker) -> Result<Tracker> {
        tracker.validate()?;
        let mut stored = tracker.clone();
        stored.updated_at = Utc::now();
        let changed = self.conn.execute(
            "UPDATE trackers
             SET name = ?1, cap_time = ?2, max_capacity = ?3, minutes_per_unit = ?4, updated_at = ?5
             WHERE id = ?6",
            params![
                stored.name,
                stored.cap_time.to_rfc3339(),
                stored.max_capacity,
                stored.minutes_per_unit,
                stored.updated_at.to_rfc3339(),
                stored.id,
            ],
        )?;
        if changed == 0 {
            return Err(CoreError::NotFound { id: stored.id });
        }
        tracing::info!(id = %stored.id, cap_time = %stored.cap_time, "updated tracker");
        Ok(stored)
    }

    fn delete_tracker(&self, id: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM trackers WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(CoreError::NotFound { id: id.to_string() });
        }
        tracing::info!(id, "deleted tracker");
        Ok(())
    }
}
