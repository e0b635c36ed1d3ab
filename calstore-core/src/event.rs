//! Event types.
//!
//! `NewEvent` is what an operator or an import document hands in.
//! `ValidatedEvent` has passed ingest validation and carries its dedup key.
//! `Event` is a stored row.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::error::{CalStoreError, CalStoreResult};
use crate::identifier;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATETIME_SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Start or end of an event.
///
/// All-day events are bounded by bare dates. Timed events carry a floating
/// local date-time; there is no time-zone handling beyond ambient local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventDate {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl EventDate {
    pub fn is_date(&self) -> bool {
        matches!(self, EventDate::Date(_))
    }

    /// Calendar date of this boundary.
    pub fn date(&self) -> NaiveDate {
        match self {
            EventDate::Date(d) => *d,
            EventDate::DateTime(dt) => dt.date(),
        }
    }

    /// Compare as points in time; a bare date counts as its midnight.
    fn as_datetime(&self) -> NaiveDateTime {
        match self {
            EventDate::Date(d) => d.and_time(chrono::NaiveTime::MIN),
            EventDate::DateTime(dt) => *dt,
        }
    }
}

impl FromStr for EventDate {
    type Err = CalStoreError;

    /// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM` and `YYYY-MM-DDTHH:MM:SS`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || {
            CalStoreError::Validation(format!(
                "invalid date '{}'. Expected YYYY-MM-DD or YYYY-MM-DDTHH:MM",
                s
            ))
        };

        // chrono's %Y also takes signed and 5+ digit years
        if !has_four_digit_year(s) {
            return Err(invalid());
        }

        if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
            return Ok(EventDate::Date(d));
        }
        NaiveDateTime::parse_from_str(s, DATETIME_SECONDS_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(s, DATETIME_FORMAT))
            .map(EventDate::DateTime)
            .map_err(|_| invalid())
    }
}

/// `YYYY-MM-DD` prefix, optionally followed by `T...`.
fn has_four_digit_year(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 10
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && matches!(bytes.get(10), None | Some(b'T'))
}

/// Canonical text form. This is what gets stored and what enters the dedup key.
impl fmt::Display for EventDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventDate::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            EventDate::DateTime(dt) if dt.second() == 0 => {
                write!(f, "{}", dt.format(DATETIME_FORMAT))
            }
            EventDate::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_SECONDS_FORMAT)),
        }
    }
}

/// An event as entered, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub name: String,
    pub start: String,
    pub end: String,
    pub all_day: bool,
}

impl NewEvent {
    pub fn new(
        name: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
        all_day: bool,
    ) -> Self {
        NewEvent {
            name: name.into(),
            start: start.into(),
            end: end.into(),
            all_day,
        }
    }

    /// All-day event, the default kind.
    pub fn all_day(name: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self::new(name, start, end, true)
    }

    /// Check the event and compute its dedup key.
    ///
    /// Rules: the name is non-empty, both boundaries parse, all-day events use
    /// bare dates while timed events use date-times, and the end is not
    /// before the start.
    pub fn validate(&self) -> CalStoreResult<ValidatedEvent> {
        if self.name.trim().is_empty() {
            return Err(CalStoreError::Validation("event name must not be empty".into()));
        }

        let start: EventDate = self.start.parse()?;
        let end: EventDate = self.end.parse()?;

        if self.all_day && !(start.is_date() && end.is_date()) {
            return Err(CalStoreError::Validation(format!(
                "all-day event '{}' must use dates without a time of day",
                self.name
            )));
        }
        if !self.all_day && (start.is_date() || end.is_date()) {
            return Err(CalStoreError::Validation(format!(
                "timed event '{}' needs a start and end time (YYYY-MM-DDTHH:MM)",
                self.name
            )));
        }
        if end.as_datetime() < start.as_datetime() {
            return Err(CalStoreError::Validation(format!(
                "event '{}' ends ({}) before it starts ({})",
                self.name, end, start
            )));
        }

        let dedup_key = identifier::derive(&self.name, &start.to_string(), &end.to_string());

        Ok(ValidatedEvent {
            name: self.name.clone(),
            start,
            end,
            all_day: self.all_day,
            dedup_key,
        })
    }
}

/// An event that passed validation and is ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEvent {
    pub name: String,
    pub start: EventDate,
    pub end: EventDate,
    pub all_day: bool,
    pub dedup_key: String,
}

/// A stored event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub start: EventDate,
    pub end: EventDate,
    pub all_day: bool,
    pub dedup_key: String,
    pub created_at: NaiveDateTime,
}

impl Event {
    /// Name without the detail text after the en-dash.
    pub fn base_title(&self) -> &str {
        identifier::base_title(&self.name)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
