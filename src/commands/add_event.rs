use anyhow::Result;
use calstore_core::{NewEvent, ingest};
use owo_colors::OwoColorize;

use super::Settings;

pub fn run(settings: &Settings, name: String, start: String, end: String, all_day: bool) -> Result<()> {
    let mut store = settings.open_store()?;

    let event = ingest(&mut store, &NewEvent::new(name, start, end, all_day))?;

    println!(
        "{} {} ({} to {})",
        "Added:".green(),
        event.name,
        event.start,
        event.end
    );

    Ok(())
}
