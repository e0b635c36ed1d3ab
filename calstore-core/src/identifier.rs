//! Dedup key derivation.
//!
//! Two entries are the same logical event when their base titles and date
//! ranges match. The base title is the part of the name before the first
//! en-dash (U+2013), so "Ferien – Sommer" and "Ferien" collide on equal dates.

use uuid::Uuid;

/// Separator between a base title and trailing detail text.
/// Only the en-dash counts; an ASCII hyphen is part of the title.
pub const TITLE_SEPARATOR: char = '\u{2013}';

/// The portion of `name` before the first en-dash, trimmed.
pub fn base_title(name: &str) -> &str {
    name.split(TITLE_SEPARATOR).next().unwrap_or_default().trim()
}

/// Derive the dedup key for an event.
///
/// Never fails: any input (including an empty name) yields a key.
pub fn derive(name: &str, start_date: &str, end_date: &str) -> String {
    format!("{}_{}_{}", base_title(name), start_date, end_date)
}

/// Stable external identifier for a dedup key, used as the iCalendar UID.
pub fn external_uid(dedup_key: &str) -> String {
    let uuid = Uuid::new_v5(&Uuid::NAMESPACE_URL, dedup_key.as_bytes());
    format!("{}@calstore", uuid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_is_deterministic() {
        let a = derive("Sommerfest", "2024-06-21", "2024-06-21");
        let b = derive("Sommerfest", "2024-06-21", "2024-06-21");
        assert_eq!(a, b);
        assert_eq!(a, "Sommerfest_2024-06-21_2024-06-21");
    }

    #[test]
    fn test_derive_ignores_text_after_en_dash() {
        assert_eq!(
            derive("Ferien – Sommer", "2024-07-01", "2024-07-31"),
            derive("Ferien", "2024-07-01", "2024-07-31"),
        );
    }

    #[test]
    fn test_derive_splits_on_first_en_dash_only() {
        assert_eq!(
            derive("A – B – C", "2024-01-01", "2024-01-02"),
            "A_2024-01-01_2024-01-02"
        );
    }

    #[test]
    fn test_ascii_hyphen_is_part_of_title() {
        assert_eq!(
            derive("Ferien - Sommer", "2024-07-01", "2024-07-31"),
            "Ferien - Sommer_2024-07-01_2024-07-31"
        );
    }

    #[test]
    fn test_derive_trims_whitespace() {
        assert_eq!(
            derive("  Ferien  ", "2024-07-01", "2024-07-31"),
            "Ferien_2024-07-01_2024-07-31"
        );
    }

    #[test]
    fn test_empty_name_yields_empty_base_segment() {
        assert_eq!(derive("", "2024-07-01", "2024-07-31"), "_2024-07-01_2024-07-31");
        assert_eq!(base_title("– only detail"), "");
    }

    #[test]
    fn test_dates_are_part_of_identity() {
        assert_ne!(
            derive("Ferien", "2024-07-01", "2024-07-31"),
            derive("Ferien", "2024-07-02", "2024-07-31"),
        );
    }

    #[test]
    fn test_external_uid_is_stable() {
        let key = derive("Ferien", "2024-07-01", "2024-07-31");
        assert_eq!(external_uid(&key), external_uid(&key));
        assert!(external_uid(&key).ends_with("@calstore"));
        assert_ne!(
            external_uid(&key),
            external_uid(&derive("Ferien", "2024-07-01", "2024-08-01"))
        );
    }
}
