//! Dispatch history recording in SQLite.
//!
//! The `dispatch_log` table records every notification send attempt,
//! including whether it succeeded. This gives operators an audit trail for
//! delivery reliability, queryable via `vigil history`.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use vigil_types::VigilError;

/// SQL to create the dispatch_log table.
pub const CREATE_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS dispatch_log (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        dispatch_id TEXT NOT NULL,
        event_type  TEXT NOT NULL,
        priority    TEXT NOT NULL,
        header      TEXT,
        fired_at    TEXT NOT NULL,
        success     INTEGER NOT NULL DEFAULT 0,
        error       TEXT,
        created_at  TEXT NOT NULL DEFAULT (datetime('now'))
    );
";

/// A single dispatch record from the log.
#[derive(Debug, Clone)]
pub struct DispatchLogEntry {
    pub id: i64,
    pub dispatch_id: String,
    pub event_type: String,
    pub priority: String,
    pub header: Option<String>,
    pub fired_at: String,
    pub success: bool,
    pub error: Option<String>,
    pub created_at: String,
}

/// Initialize the dispatch_log table.
pub fn init_table(conn: &Connection) -> Result<(), VigilError> {
    conn.execute_batch(CREATE_TABLE_SQL)
        .map_err(|e| VigilError::Store(e.to_string()))
}

/// Record a dispatch attempt.
pub fn record_dispatch(
    conn: &Connection,
    dispatch_id: &str,
    event_type: &str,
    priority: &str,
    header: Option<&str>,
    fired_at: DateTime<Utc>,
    success: bool,
    error: Option<&str>,
) -> Result<(), VigilError> {
    conn.execute(
        "INSERT INTO dispatch_log (dispatch_id, event_type, priority, header, fired_at, success, error)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            dispatch_id,
            event_type,
            priority,
            header,
            fired_at.to_rfc3339(),
            success as i32,
            error
        ],
    )
    .map(|_| ())
    .map_err(|e| VigilError::Store(e.to_string()))
}

/// Fetch the most recent dispatch records, newest first.
pub fn recent(conn: &Connection, limit: u32) -> Result<Vec<DispatchLogEntry>, VigilError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, dispatch_id, event_type, priority, header, fired_at, success, error, created_at
             FROM dispatch_log ORDER BY id DESC LIMIT ?1",
        )
        .map_err(|e| VigilError::Store(e.to_string()))?;

    let rows = stmt
        .query_map(params![limit], |row| {
            Ok(DispatchLogEntry {
                id: row.get(0)?,
                dispatch_id: row.get(1)?,
                event_type: row.get(2)?,
                priority: row.get(3)?,
                header: row.get(4)?,
                fired_at: row.get(5)?,
                success: row.get::<_, i32>(6)? != 0,
                error: row.get(7)?,
                created_at: row.get(8)?,
            })
        })
        .map_err(|e| VigilError::Store(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| VigilError::Store(e.to_string()))
}
