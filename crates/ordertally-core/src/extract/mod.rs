//! Fact extraction module.

mod extractor;
pub mod rules;

pub use extractor::{Attribution, FactExtractor};
