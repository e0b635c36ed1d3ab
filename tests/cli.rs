use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::{fs, process::Command};
use tempfile::TempDir;

fn calstore(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("calstore").unwrap();
    cmd.env_remove("CALSTORE_DATABASE_PATH")
        .env_remove("CALSTORE_CALENDAR_NAME")
        .env_remove("CALSTORE_PRODUCT_ID")
        .args([
            "--config",
            dir.path().join("config.toml").to_str().unwrap(),
            "--database",
            dir.path().join("events.db").to_str().unwrap(),
        ]);
    cmd
}

fn add(dir: &TempDir, name: &str, start: &str, end: &str) -> assert_cmd::assert::Assert {
    calstore(dir)
        .args(["add-event", "--name", name, "--start", start, "--end", end])
        .assert()
}

#[test]
fn add_event_then_duplicate_fails() {
    let dir = TempDir::new().unwrap();

    add(&dir, "Winterferien", "2024-12-23", "2025-01-06")
        .success()
        .stdout(predicate::str::contains("Winterferien"));

    add(
        &dir,
        "Winterferien – Schule geschlossen",
        "2024-12-23",
        "2025-01-06",
    )
    .failure()
    .stderr(predicate::str::contains("already exists"));
}

#[test]
fn add_event_with_invalid_date_fails() {
    let dir = TempDir::new().unwrap();

    add(&dir, "Kaputt", "23.12.2024", "2025-01-06")
        .failure()
        .stderr(predicate::str::contains("invalid date"));
}

#[test]
fn partial_day_event_needs_times() {
    let dir = TempDir::new().unwrap();

    calstore(&dir)
        .args([
            "add-event",
            "--name",
            "Elternabend",
            "--start",
            "2024-11-05",
            "--end",
            "2024-11-05",
            "--partial-day",
        ])
        .assert()
        .failure();

    calstore(&dir)
        .args([
            "add-event",
            "--name",
            "Elternabend",
            "--start",
            "2024-11-05T19:00",
            "--end",
            "2024-11-05T21:00",
            "--partial-day",
        ])
        .assert()
        .success();
}

#[test]
fn export_empty_calendar_reports_zero_events() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("backup.json");

    calstore(&dir)
        .args(["export-json", "--output", output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 0 events"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["events"], serde_json::json!([]));
    assert_eq!(json["format_version"], "1.0");
}

#[test]
fn export_ics_writes_calendar() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("calendar.ics");

    add(&dir, "Herbstferien", "2024-10-14", "2024-10-25").success();

    calstore(&dir)
        .args(["export", "--output", output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 event "));

    let ics = fs::read_to_string(&output).unwrap();
    assert!(ics.contains("BEGIN:VCALENDAR"));
    assert!(ics.contains("SUMMARY:Herbstferien"));
}

#[test]
fn json_backup_restores_into_fresh_database() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let backup = source.path().join("backup.json");

    add(&source, "Herbstferien", "2024-10-14", "2024-10-25").success();
    add(&source, "Winterferien", "2024-12-23", "2025-01-06").success();

    calstore(&source)
        .args(["export-json", "--output", backup.to_str().unwrap()])
        .assert()
        .success();

    calstore(&target)
        .args(["import-json", "--input", backup.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 events"));

    calstore(&target)
        .args(["import-json", "--input", backup.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 0 events"))
        .stdout(predicate::str::contains("Skipped 2 events"));

    calstore(&target)
        .arg("events")
        .assert()
        .success()
        .stdout(predicate::str::contains("Herbstferien"))
        .stdout(predicate::str::contains("Winterferien"));
}

#[test]
fn import_without_events_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.json");
    fs::write(&input, r#"{"format_version": "1.0"}"#).unwrap();

    calstore(&dir)
        .args(["import-json", "--input", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required field `events`"));
}

#[test]
fn events_on_empty_database() {
    let dir = TempDir::new().unwrap();

    calstore(&dir)
        .arg("events")
        .assert()
        .success()
        .stdout(predicate::str::contains("No events found"));
}

#[test]
fn config_shows_database_override() {
    let dir = TempDir::new().unwrap();

    let database = dir.path().join("events.db");

    calstore(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Database:  {}",
            database.display()
        )))
        .stdout(predicate::str::contains("calendar_name"));
}
