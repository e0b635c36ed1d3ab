use anyhow::Result;
use calstore_core::{Event, EventDate};
use chrono::Datelike;
use owo_colors::OwoColorize;

use super::Settings;

pub fn run(settings: &Settings) -> Result<()> {
    let store = settings.open_store()?;
    let events = store.scan_all()?;

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    // Group by year, then one line per event
    let mut current_year: Option<i32> = None;

    for event in &events {
        let year = event.start.date().year();
        if current_year != Some(year) {
            if current_year.is_some() {
                println!();
            }
            println!("{}", year.to_string().bold());
            current_year = Some(year);
        }

        println!("  {} {}", format_range(event).dimmed(), event.name);
    }

    Ok(())
}

/// Format an event's range (e.g. "Dec 23 – Jan 6" or "Nov 5 19:00–21:00")
fn format_range(event: &Event) -> String {
    match (event.start, event.end) {
        (EventDate::Date(start), EventDate::Date(end)) if start == end => {
            format!("{:<22}", start.format("%a %b %-d").to_string())
        }
        (EventDate::Date(start), EventDate::Date(end)) => {
            format!("{:<22}", format!("{} – {}", start.format("%b %-d"), end.format("%b %-d")))
        }
        (EventDate::DateTime(start), EventDate::DateTime(end)) if start.date() == end.date() => {
            format!(
                "{:<22}",
                format!("{} {}–{}", start.format("%b %-d"), start.format("%H:%M"), end.format("%H:%M"))
            )
        }
        (start, end) => format!("{:<22}", format!("{} – {}", start, end)),
    }
}
