//! Document number formatting.
//!
//! The persisted format `CODE-DEPT-SECT-YYYY-MM-NNNN` is externally visible
//! and must stay stable for compatibility with existing records.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Format a document number from its parts.
///
/// The sequence is zero-padded to four digits but not truncated, so a
/// month with more than 9999 documents still yields unique numbers.
pub fn format_document_number(
    company_code: &str,
    department_code: &str,
    section_code: &str,
    year: i32,
    month: u32,
    sequence: i64,
) -> String {
    format!("{company_code}-{department_code}-{section_code}-{year}-{month:02}-{sequence:04}")
}

/// A guaranteed-unique synthetic number used when sequence allocation fails.
///
/// Creation must never block on numbering; these stand out visually
/// (`AUTO-` prefix) so operators can spot and renumber them.
pub fn fallback_document_number(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("AUTO-{}-{}", now.format("%Y%m%d%H%M%S"), &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(
            format_document_number("AKM", "IT", "DEV", 2025, 8, 7),
            "AKM-IT-DEV-2025-08-0007"
        );
    }

    #[test]
    fn test_sequence_not_truncated() {
        assert_eq!(
            format_document_number("AKM", "IT", "DEV", 2025, 12, 12345),
            "AKM-IT-DEV-2025-12-12345"
        );
    }

    #[test]
    fn test_fallback_shape() {
        let number = fallback_document_number(Utc::now());
        assert!(number.starts_with("AUTO-"));
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].len(), 14);
        assert_eq!(parts[2].len(), 8);
    }

    #[test]
    fn test_fallback_unique() {
        let now = Utc::now();
        assert_ne!(fallback_document_number(now), fallback_document_number(now));
    }
}
