use std::path::Path;

use anyhow::{Context, Result};
use calstore_core::import_json;
use owo_colors::OwoColorize;

use super::{Settings, pluralize};

pub fn run(settings: &Settings, input: &Path) -> Result<()> {
    let mut store = settings.open_store()?;

    let summary = import_json(&mut store, input)
        .with_context(|| format!("Failed to import {}", input.display()))?;

    println!(
        "{}",
        format!(
            "Imported {} {}",
            summary.imported,
            pluralize("event", summary.imported)
        )
        .green()
    );
    if summary.skipped > 0 {
        println!(
            "{}",
            format!(
                "Skipped {} {} already in the calendar",
                summary.skipped,
                pluralize("event", summary.skipped)
            )
            .dimmed()
        );
    }

    Ok(())
}
