//! Connection bootstrap for the SQLite event store.
//!
//! Every returned connection has a busy timeout set and the schema applied.
//! Applying the schema to an initialized database is a no-op.

use std::path::Path;
use std::time::{Duration, Instant};

use log::{error, info};
use rusqlite::Connection;

use crate::error::CalStoreResult;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Other `calstore` processes may hold the write lock briefly.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (or create) the database file at `path`.
///
/// Missing parent directories are created.
pub(crate) fn open_file(path: &Path) -> CalStoreResult<Connection> {
    let started_at = Instant::now();
    info!(
        "event=db_open module=store status=start mode=file path={}",
        path.display()
    );

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path).map_err(|err| {
        error!(
            "event=db_open module=store status=error mode=file duration_ms={} error_code=db_open_failed error={}",
            started_at.elapsed().as_millis(),
            err
        );
        err
    })?;

    finish(conn, "file", started_at)
}

pub(crate) fn open_memory() -> CalStoreResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=store status=start mode=memory");
    let conn = Connection::open_in_memory()?;
    finish(conn, "memory", started_at)
}

fn finish(conn: Connection, mode: &str, started_at: Instant) -> CalStoreResult<Connection> {
    match bootstrap_connection(&conn) {
        Ok(()) => {
            info!(
                "event=db_open module=store status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=store status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err.into())
        }
    }
}

fn bootstrap_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
