//! Validated insert with a uniqueness check.
//!
//! This is the only way events enter the store, for single adds and for
//! bulk imports alike.

use log::{debug, info};

use crate::error::{CalStoreError, CalStoreResult};
use crate::event::{Event, NewEvent};
use crate::store::{self, EventStore};

/// Validate `new` and store it unless an event with the same dedup key and
/// dates already exists.
///
/// The existence check and the insert run inside one immediate transaction,
/// and the unique index backs it up: a concurrent process that slips in a
/// matching row still yields `DuplicateEvent`, never a second row.
pub fn ingest(store: &mut EventStore, new: &NewEvent) -> CalStoreResult<Event> {
    let event = new.validate()?;
    let start_date = event.start.to_string();
    let end_date = event.end.to_string();

    let tx = store.immediate_transaction()?;

    if store::exists_in(&tx, &event.dedup_key, &start_date, &end_date)? {
        debug!(
            "event=ingest module=ingest status=duplicate key={}",
            event.dedup_key
        );
        return Err(CalStoreError::DuplicateEvent {
            name: event.name,
            start_date,
            end_date,
        });
    }

    let id = store::insert_into(&tx, &event)?;
    let stored = store::get_in(&tx, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
    tx.commit()?;

    info!(
        "event=ingest module=ingest status=ok id={} key={}",
        stored.id, stored.dedup_key
    );
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_duplicate_leaves_store_unchanged() {
        let mut store = EventStore::open_in_memory().unwrap();
        ingest(&mut store, &NewEvent::all_day("Ostern", "2025-04-14", "2025-04-25")).unwrap();

        let err = ingest(&mut store, &NewEvent::all_day("Ostern", "2025-04-14", "2025-04-25"))
            .unwrap_err();

        assert!(err.is_duplicate());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_validation_failure_inserts_nothing() {
        let mut store = EventStore::open_in_memory().unwrap();
        let err = ingest(&mut store, &NewEvent::all_day("", "2025-04-14", "2025-04-25"))
            .unwrap_err();

        assert!(matches!(err, CalStoreError::Validation(_)));
        assert_eq!(store.count().unwrap(), 0);
    }
}
