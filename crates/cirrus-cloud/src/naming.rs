//! Timestamp-suffixed resource names

use chrono::{DateTime, Local};

/// Returns `<prefix>-YYYYMMDDHHMMSS` from the local clock.
///
/// Second resolution only; two calls inside the same second produce the
/// same name, which is not handled.
pub fn generate_name(prefix: &str) -> String {
    name_at(prefix, Local::now())
}

fn name_at(prefix: &str, at: DateTime<Local>) -> String {
    format!("{}-{}", prefix, at.format("%Y%m%d%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn name_has_prefix_and_14_digit_suffix() {
        let name = generate_name("auto-key");
        let suffix = name
            .strip_prefix("auto-key-")
            .expect("name should start with the prefix and a dash");
        assert_eq!(suffix.len(), 14);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn names_from_different_seconds_never_collide() {
        let base = Local.with_ymd_and_hms(2026, 8, 29, 10, 15, 42).unwrap();
        assert_ne!(
            name_at("auto-key", base),
            name_at("auto-key", base + chrono::Duration::seconds(1))
        );
        // Rolling over a minute boundary still changes the suffix.
        assert_ne!(
            name_at("auto-key", base + chrono::Duration::seconds(17)),
            name_at("auto-key", base + chrono::Duration::seconds(18))
        );
    }

    #[test]
    fn empty_prefix_still_yields_timestamp() {
        let name = generate_name("");
        assert!(name.starts_with('-'));
        assert_eq!(name.len(), 15);
    }
}
