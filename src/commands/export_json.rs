use std::path::Path;

use anyhow::{Context, Result};
use calstore_core::export_json;
use owo_colors::OwoColorize;

use super::{Settings, pluralize};

pub fn run(settings: &Settings, output: &Path) -> Result<()> {
    let store = settings.open_store()?;

    let count = export_json(&store, output, &settings.config.calendar_name)
        .with_context(|| format!("Failed to export JSON to {}", output.display()))?;

    println!(
        "{}",
        format!(
            "Exported {} {} to {}",
            count,
            pluralize("event", count),
            output.display()
        )
        .green()
    );

    Ok(())
}
