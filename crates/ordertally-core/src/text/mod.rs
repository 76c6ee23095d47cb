//! Text normalization and block segmentation.

mod normalizer;
mod segment;

pub use normalizer::{flatten, normalize, normalize_document};
pub use segment::{
    BlankLineSegmenter, Block, BlockSegmenter, NameLabelSegmenter, SegmentationPipeline,
};
