//! Phone number extraction and normalization.

use super::patterns::{PHONE_BARE, PHONE_LOOSE};
use super::{ExtractionMatch, FieldExtractor};

/// Accepted digit count range for a phone number.
pub const MIN_PHONE_DIGITS: usize = 10;
pub const MAX_PHONE_DIGITS: usize = 13;

/// Phone candidate extractor.
///
/// Loosely phone-shaped runs (`+880 1712-345678`, `(017) 1234 5678`) are
/// tried first, then bare 10-13 digit runs not already found. Candidates
/// are not de-duplicated among the loose matches.
pub struct PhoneExtractor;

impl PhoneExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PhoneExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PhoneExtractor {
    type Output = ExtractionMatch<String>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for m in PHONE_LOOSE.find_iter(text) {
            if let Some(phone) = normalize_phone(m.as_str()) {
                results.push(
                    ExtractionMatch::new(phone, m.as_str()).with_position(m.start(), m.end()),
                );
            }
        }

        for m in PHONE_BARE.find_iter(text) {
            if results.iter().any(|r| r.value == m.as_str()) {
                continue;
            }
            results.push(
                ExtractionMatch::new(m.as_str().to_string(), m.as_str())
                    .with_position(m.start(), m.end()),
            );
        }

        results
    }
}

/// Strip everything but digits; accept 10-13 digit results.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS)
        .contains(&digits.len())
        .then_some(digits)
}

/// Extract normalized phone candidates from text.
pub fn extract_phones(text: &str) -> Vec<String> {
    PhoneExtractor::new()
        .extract_all(text)
        .into_iter()
        .map(|m| m.value)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashed_number_is_normalized() {
        assert_eq!(extract_phones("Phone: 017-123-45678"), vec!["01712345678"]);
    }

    #[test]
    fn test_international_and_parenthesized() {
        assert_eq!(extract_phones("Number: +880 1712-345678"), vec!["8801712345678"]);
        assert_eq!(extract_phones("call (017) 1234 5678"), vec!["01712345678"]);
    }

    #[test]
    fn test_fourteen_digits_rejected() {
        assert!(extract_phones("Phone: 01712345678901").is_empty());
    }

    #[test]
    fn test_nine_digits_rejected() {
        assert!(extract_phones("Phone: 017123456").is_empty());
    }

    #[test]
    fn test_bare_ten_digit_run() {
        assert_eq!(extract_phones("0171234567"), vec!["0171234567"]);
    }

    #[test]
    fn test_bare_runs_recover_merged_numbers() {
        // The loose pattern swallows both numbers into one 22-digit run.
        assert_eq!(
            extract_phones("Phone 01712345678 01812345678"),
            vec!["01712345678", "01812345678"]
        );
    }

    #[test]
    fn test_loose_duplicates_are_kept() {
        assert_eq!(
            extract_phones("017-1234-5678, 017-1234-5678"),
            vec!["01712345678", "01712345678"]
        );
    }

    #[test]
    fn test_bare_run_not_repeated_after_loose_match() {
        assert_eq!(extract_phones("Phone: 01712345678"), vec!["01712345678"]);
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("+88 017-1234-5678"), Some("8801712345678".to_string()));
        assert_eq!(normalize_phone("12-34"), None);
    }
}
