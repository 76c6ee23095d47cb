//! Core library for order-sheet analytics.
//!
//! This crate provides:
//! - DOCX reading (paragraphs and tables)
//! - Text normalization and block segmentation
//! - Fact extraction (sizes, phone numbers, bill amounts)
//! - Cross-document aggregation into a report

pub mod error;
pub mod models;
pub mod document;
pub mod text;
pub mod extract;
pub mod report;

pub use error::{DocumentError, EvalError, Result, TallyError};
pub use models::config::TallyConfig;
pub use models::observation::{
    AmountObservation, CustomerFileObservation, CustomerKey, ExtractionResult, PhoneObservation,
    SizeObservation,
};
pub use models::report::{AnalysisReport, CustomerSummary, FileSummary, PredictedSize, SizeCount};
pub use document::{DocumentSource, DocxDocument, Table, TableCell, TableRow};
pub use text::{Block, BlockSegmenter, SegmentationPipeline};
pub use extract::FactExtractor;
pub use report::{analyze_documents, Aggregator, UploadedDocument};
