//! ICS document generation.

use chrono::{Days, Utc};
use icalendar::{Calendar, Component, EventLike, Property, ValueType};

use super::CalendarMetadata;
use crate::error::{CalStoreError, CalStoreResult};
use crate::event::{Event, EventDate};
use crate::identifier;

/// RFC 5545 content lines are at most 75 octets, excluding the line break.
const MAX_LINE_OCTETS: usize = 75;

/// Generate one .ics document holding every event, in the given order.
///
/// DTSTAMP is the generation time, not the event's creation time.
pub fn generate_ics(events: &[Event], metadata: &CalendarMetadata) -> CalStoreResult<String> {
    let mut cal = Calendar::new();
    cal.append_property(Property::new("X-WR-CALNAME", &metadata.calendar_name));

    let dtstamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

    for event in events {
        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&identifier::external_uid(&event.dedup_key));
        ics_event.add_property("DTSTAMP", &dtstamp);
        ics_event.summary(&event.name);

        add_datetime_property(&mut ics_event, "DTSTART", &event.start);
        add_datetime_property(&mut ics_event, "DTEND", &exclusive_end(event)?);

        cal.push(ics_event.done());
    }

    let cal = cal.done();
    Ok(replace_product_id(&cal.to_string(), &metadata.product_id))
}

/// Stored all-day ranges are inclusive; DTEND of an all-day VEVENT is the
/// first day after the event.
fn exclusive_end(event: &Event) -> CalStoreResult<EventDate> {
    match event.end {
        EventDate::Date(d) => d
            .checked_add_days(Days::new(1))
            .map(EventDate::Date)
            .ok_or_else(|| {
                CalStoreError::Encoding(format!(
                    "event '{}' ends on the last representable date",
                    event.name
                ))
            }),
        timed => Ok(timed),
    }
}

/// The icalendar crate always writes its own PRODID; swap in ours.
fn replace_product_id(ics: &str, product_id: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            push_folded(&mut result, &format!("PRODID:{product_id}"));
        } else {
            result.push_str(line);
            result.push_str("\r\n");
        }
    }

    result
}

/// Append `line` folded into physical lines of at most 75 octets. Continuation
/// lines start with a single space, which counts toward the limit. Folds never
/// split a UTF-8 sequence.
fn push_folded(out: &mut String, line: &str) {
    let mut width = 0;
    for ch in line.chars() {
        if width + ch.len_utf8() > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(ch);
        width += ch.len_utf8();
    }
    out.push_str("\r\n");
}

fn add_datetime_property(ics_event: &mut icalendar::Event, name: &str, time: &EventDate) {
    match time {
        EventDate::Date(d) => {
            let mut prop = Property::new(name, d.format("%Y%m%d").to_string());
            prop.append_parameter(ValueType::Date);
            ics_event.append_property(prop);
        }
        EventDate::DateTime(dt) => {
            // Floating local time (no Z, no TZID)
            ics_event.add_property(name, dt.format("%Y%m%dT%H%M%S").to_string());
        }
    }
}
