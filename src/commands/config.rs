use anyhow::Result;
use owo_colors::OwoColorize;

use super::Settings;

pub fn run(settings: &Settings) -> Result<()> {
    println!("{}", "Paths".bold());
    match &settings.config_path {
        Some(path) => println!("  Config:    {}", path.display()),
        None => println!("  Config:    {}", "(unknown)".dimmed()),
    }
    println!("  Database:  {}", settings.database.display());

    println!();
    println!("{}", "Settings".bold());
    for line in settings.config.to_toml()?.lines() {
        println!("  {}", line);
    }

    Ok(())
}
