//! Registration number generation.

use chrono::{Datelike, Utc};
use rand::Rng;

/// Prefix on every registration number issued by this system.
pub const REGISTRATION_PREFIX: &str = "VTR";

/// Generate a registration number: `VTR-YYYY-NNNNNNNNN`.
///
/// The nine digits are a six-digit millisecond-derived sequence followed
/// by a three-digit random suffix. The format is human-checkable, not a
/// uniqueness guarantee; the store's unique constraint is.
pub fn generate() -> String {
    let now = Utc::now();
    let sequence = now.timestamp_millis().rem_euclid(1_000_000);
    let suffix: u32 = rand::rng().random_range(0..1000);

    format!(
        "{}-{}-{:06}{:03}",
        REGISTRATION_PREFIX,
        now.year(),
        sequence,
        suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_number_shape() {
        let number = generate();
        let parts: Vec<&str> = number.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "VTR");
        assert_eq!(parts[1].len(), 4);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_registration_number_uses_current_year() {
        let number = generate();
        let year = Utc::now().year().to_string();
        assert!(number.starts_with(&format!("VTR-{}-", year)));
    }
}
