//! SQLite event storage.
//!
//! An `EventStore` owns one connection for the duration of one logical
//! operation. Dropping the store releases the connection, so every exit
//! path (including errors) closes it.
//!
//! Uniqueness of `(event_identifier, start_date, end_date)` is enforced by
//! a unique index; a violation surfaces as `CalStoreError::DuplicateEvent`.

mod open;

use std::path::Path;

use chrono::NaiveDateTime;
use log::debug;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, Transaction, TransactionBehavior, params};

use crate::error::{CalStoreError, CalStoreResult};
use crate::event::{Event, EventDate, ValidatedEvent};

const EVENT_SELECT_SQL: &str = "SELECT
    id,
    summary,
    start_date,
    end_date,
    all_day,
    event_identifier,
    created_at
FROM events";

/// SQLite `CURRENT_TIMESTAMP` format.
const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct EventStore {
    conn: Connection,
}

impl EventStore {
    /// Open the store at `path`, creating the file and schema if needed.
    pub fn open(path: impl AsRef<Path>) -> CalStoreResult<Self> {
        let conn = open::open_file(path.as_ref())?;
        Ok(EventStore { conn })
    }

    pub fn open_in_memory() -> CalStoreResult<Self> {
        let conn = open::open_memory()?;
        Ok(EventStore { conn })
    }

    /// True iff an event with this dedup key and date pair is stored.
    pub fn exists(&self, dedup_key: &str, start_date: &str, end_date: &str) -> CalStoreResult<bool> {
        exists_in(&self.conn, dedup_key, start_date, end_date)
    }

    /// Append an event and return its id.
    ///
    /// Does not look for an existing row first; the unique index rejects a
    /// second row with the same key and the rejection becomes `DuplicateEvent`.
    pub fn insert(&self, event: &ValidatedEvent) -> CalStoreResult<i64> {
        insert_into(&self.conn, event)
    }

    pub fn get(&self, id: i64) -> CalStoreResult<Option<Event>> {
        get_in(&self.conn, id)
    }

    /// All events ordered by start date. Ties keep insertion order.
    pub fn scan_all(&self) -> CalStoreResult<Vec<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} ORDER BY start_date ASC, id ASC"))?;

        let events = stmt
            .query_map([], parse_event_row)?
            .collect::<Result<Vec<_>, _>>()?;

        debug!("event=scan_all module=store status=ok count={}", events.len());
        Ok(events)
    }

    pub fn count(&self) -> CalStoreResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Begin a write transaction that takes the database write lock up front,
    /// so a check followed by an insert cannot interleave with another writer.
    pub(crate) fn immediate_transaction(&mut self) -> CalStoreResult<Transaction<'_>> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }
}

pub(crate) fn exists_in(
    conn: &Connection,
    dedup_key: &str,
    start_date: &str,
    end_date: &str,
) -> CalStoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM events
            WHERE event_identifier = ?1 AND start_date = ?2 AND end_date = ?3
        )",
        params![dedup_key, start_date, end_date],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn insert_into(conn: &Connection, event: &ValidatedEvent) -> CalStoreResult<i64> {
    let start_date = event.start.to_string();
    let end_date = event.end.to_string();

    let result = conn.execute(
        "INSERT INTO events (
            summary,
            start_date,
            end_date,
            all_day,
            event_identifier
        ) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            event.name.as_str(),
            start_date.as_str(),
            end_date.as_str(),
            event.all_day,
            event.dedup_key.as_str(),
        ],
    );

    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(err) if is_unique_violation(&err) => Err(CalStoreError::DuplicateEvent {
            name: event.name.clone(),
            start_date,
            end_date,
        }),
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn get_in(conn: &Connection, id: i64) -> CalStoreResult<Option<Event>> {
    let event = conn
        .query_row(
            &format!("{EVENT_SELECT_SQL} WHERE id = ?1"),
            params![id],
            parse_event_row,
        )
        .optional()?;
    Ok(event)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}

fn parse_event_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    let start: String = row.get(2)?;
    let end: String = row.get(3)?;
    let created_at: String = row.get(6)?;

    Ok(Event {
        id: row.get(0)?,
        name: row.get(1)?,
        start: parse_date_column(2, &start)?,
        end: parse_date_column(3, &end)?,
        all_day: row.get(4)?,
        dedup_key: row.get(5)?,
        created_at: NaiveDateTime::parse_from_str(&created_at, CREATED_AT_FORMAT)
            .map_err(|e| conversion_error(6, e))?,
    })
}

fn parse_date_column(idx: usize, value: &str) -> rusqlite::Result<EventDate> {
    value.parse::<EventDate>().map_err(|e| conversion_error(idx, e))
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NewEvent;

    fn valid(name: &str, start: &str, end: &str) -> ValidatedEvent {
        NewEvent::all_day(name, start, end).validate().unwrap()
    }

    #[test]
    fn test_unique_index_rejects_second_insert() {
        let store = EventStore::open_in_memory().unwrap();
        let event = valid("Herbstferien", "2024-10-14", "2024-10-25");

        store.insert(&event).unwrap();
        let err = store.insert(&event).unwrap_err();

        assert!(err.is_duplicate(), "expected duplicate, got {err:?}");
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store = EventStore::open_in_memory().unwrap();
        assert!(store.get(42).unwrap().is_none());
    }

    #[test]
    fn test_invalid_persisted_date_is_a_store_error() {
        let store = EventStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO events (summary, start_date, end_date, all_day, event_identifier)
                 VALUES ('Broken', 'not-a-date', '2024-01-01', 1, 'Broken_x')",
                [],
            )
            .unwrap();

        let err = store.scan_all().unwrap_err();
        assert!(matches!(err, CalStoreError::Store(_)));
    }
}
