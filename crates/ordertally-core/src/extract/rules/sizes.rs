//! Size token extraction.

use super::patterns::{SIZE_LINE, SIZE_TOKEN};
use super::{lines_with_offsets, ExtractionMatch, FieldExtractor};

/// Extracts 2-3 digit tokens from lines mentioning "size".
///
/// Tokens are taken greedily left to right, so `"1234"` yields `"123"`.
/// Nothing is validated against a list of known sizes.
pub struct SizeExtractor;

impl SizeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SizeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for SizeExtractor {
    type Output = ExtractionMatch<String>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for (offset, line) in lines_with_offsets(text) {
            if !SIZE_LINE.is_match(line) {
                continue;
            }

            for m in SIZE_TOKEN.find_iter(line) {
                results.push(
                    ExtractionMatch::new(m.as_str().to_string(), line)
                        .with_position(offset + m.start(), offset + m.end()),
                );
            }
        }

        results
    }
}

/// Extract size tokens from text.
pub fn extract_sizes(text: &str) -> Vec<String> {
    SizeExtractor::new()
        .extract_all(text)
        .into_iter()
        .map(|m| m.value)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_in_order() {
        assert_eq!(extract_sizes("Size: 34, 36, 38"), vec!["34", "36", "38"]);
    }

    #[test]
    fn test_size_must_be_a_whole_word() {
        assert!(extract_sizes("Size5").is_empty());
        assert!(extract_sizes("Sizes 36 and 38").is_empty());
        assert!(extract_sizes("Oversized 40").is_empty());
        assert_eq!(extract_sizes("SIZE-40"), vec!["40"]);
    }

    #[test]
    fn test_only_size_lines_are_scanned() {
        let text = "Name: Rahim\nPhone: 01712345678\nsize 42 (2 pcs)\nBill: 1200";
        assert_eq!(extract_sizes(text), vec!["42"]);
    }

    #[test]
    fn test_long_runs_are_split_greedily() {
        assert_eq!(extract_sizes("Size 1234 5"), vec!["123"]);
        assert_eq!(extract_sizes("Size 12345"), vec!["123", "45"]);
    }

    #[test]
    fn test_positions_point_into_source() {
        let text = "Name: A\nSize 36";
        let matches = SizeExtractor::new().extract_all(text);
        let (start, end) = matches[0].position.unwrap();
        assert_eq!(&text[start..end], "36");
        assert_eq!(matches[0].source, "Size 36");
    }
}
