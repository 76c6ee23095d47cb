//! Splitting normalized text into per-record blocks.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    // A line that starts a record: "Name", "Name:", "Name -", "Name Rahim".
    static ref NAME_LINE: Regex = Regex::new(r"(?im)^[ \t]*name(?:[:\-]|\s|$)").unwrap();

    // Two or more consecutive line breaks, blank lines may hold spaces.
    static ref BLANK_RUN: Regex = Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)*").unwrap();
}

/// A contiguous slice of normalized text believed to be one order record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    /// Position in document order.
    pub index: usize,
    pub text: &'a str,
}

/// A strategy that proposes record boundaries.
pub trait BlockSegmenter: Send + Sync {
    /// Strategy name for logging.
    fn name(&self) -> &'static str;

    /// Split text into non-empty segments in document order.
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Splits immediately before every line starting with a "Name" label.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameLabelSegmenter;

impl BlockSegmenter for NameLabelSegmenter {
    fn name(&self) -> &'static str {
        "name-label"
    }

    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut segments = Vec::new();
        let mut start = 0;

        for m in NAME_LINE.find_iter(text) {
            segments.push(&text[start..m.start()]);
            start = m.start();
        }
        segments.push(&text[start..]);

        non_empty(segments)
    }
}

/// Splits on runs of two or more line breaks.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankLineSegmenter;

impl BlockSegmenter for BlankLineSegmenter {
    fn name(&self) -> &'static str {
        "blank-line"
    }

    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        non_empty(BLANK_RUN.split(text))
    }
}

fn non_empty<'a>(segments: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    segments
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Ordered list of segmentation strategies.
///
/// The first strategy that finds more than one block wins. When none does,
/// the whole text is a single block.
pub struct SegmentationPipeline {
    strategies: Vec<Box<dyn BlockSegmenter>>,
}

impl SegmentationPipeline {
    /// Create a pipeline from explicit strategies.
    pub fn new(strategies: Vec<Box<dyn BlockSegmenter>>) -> Self {
        Self { strategies }
    }

    /// Append a fallback strategy.
    pub fn with_strategy(mut self, strategy: impl BlockSegmenter + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Segment text into blocks.
    pub fn segment<'a>(&self, text: &'a str) -> Vec<Block<'a>> {
        for strategy in &self.strategies {
            let segments = strategy.split(text);
            if segments.len() > 1 {
                debug!("Segmented into {} blocks by {}", segments.len(), strategy.name());
                return into_blocks(segments);
            }
        }

        let whole = text.trim();
        if whole.is_empty() {
            Vec::new()
        } else {
            debug!("No split point found, using whole text as one block");
            into_blocks(vec![whole])
        }
    }
}

impl Default for SegmentationPipeline {
    fn default() -> Self {
        Self::new(Vec::new())
            .with_strategy(NameLabelSegmenter)
            .with_strategy(BlankLineSegmenter)
    }
}

fn into_blocks(segments: Vec<&str>) -> Vec<Block<'_>> {
    segments
        .into_iter()
        .enumerate()
        .map(|(index, text)| Block { index, text })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts<'a>(blocks: &[Block<'a>]) -> Vec<&'a str> {
        blocks.iter().map(|b| b.text).collect()
    }

    #[test]
    fn test_split_on_name_labels() {
        let text = "Orders March\nName: Rahim\nSize 36\nname - Karim\nSize 40\nNAME Sumi\nBill 300";
        let blocks = SegmentationPipeline::default().segment(text);

        assert_eq!(
            texts(&blocks),
            vec![
                "Orders March",
                "Name: Rahim\nSize 36",
                "name - Karim\nSize 40",
                "NAME Sumi\nBill 300",
            ]
        );
        assert_eq!(blocks[3].index, 3);
    }

    #[test]
    fn test_name_must_be_a_word_at_line_start() {
        let text = "Names list\nSize 36\nCustomer Name: A\nNamely 40";
        assert_eq!(NameLabelSegmenter.split(text).len(), 1);
    }

    #[test]
    fn test_single_name_falls_back_to_blank_lines() {
        let text = "Name: Rahim\nSize 36\n\nPhone 01712345678\n \n\nBill 500";
        let blocks = SegmentationPipeline::default().segment(text);

        assert_eq!(
            texts(&blocks),
            vec!["Name: Rahim\nSize 36", "Phone 01712345678", "Bill 500"]
        );
    }

    #[test]
    fn test_no_split_point_yields_whole_text() {
        let text = "Size 36\nPhone 01712345678\nBill 500";
        let blocks = SegmentationPipeline::default().segment(text);
        assert_eq!(texts(&blocks), vec![text]);
    }

    #[test]
    fn test_empty_text_yields_no_blocks() {
        assert!(SegmentationPipeline::default().segment("  \n ").is_empty());
    }

    struct DashRule;

    impl BlockSegmenter for DashRule {
        fn name(&self) -> &'static str {
            "dash-rule"
        }

        fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
            non_empty(text.split("\n---\n"))
        }
    }

    #[test]
    fn test_custom_strategy() {
        let pipeline = SegmentationPipeline::new(Vec::new()).with_strategy(DashRule);
        let blocks = pipeline.segment("Size 36\n---\nSize 38");
        assert_eq!(texts(&blocks), vec!["Size 36", "Size 38"]);
    }
}
