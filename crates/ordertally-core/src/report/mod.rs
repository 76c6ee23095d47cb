//! Cross-document aggregation.

mod aggregate;

pub use aggregate::{rank_by_frequency, Aggregator};

use rayon::prelude::*;
use tracing::info;

use crate::error::TallyError;
use crate::extract::FactExtractor;
use crate::models::config::ReportConfig;
use crate::models::observation::ExtractionResult;
use crate::models::report::AnalysisReport;

/// An uploaded file held in memory.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    /// Provenance tag, never interpreted.
    pub filename: String,
    pub data: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

/// Extract every document and build the batch report.
///
/// Documents are extracted in parallel; results keep input order. The first
/// document that cannot be opened fails the whole batch.
pub fn analyze_documents(
    documents: &[UploadedDocument],
    extractor: &FactExtractor,
    config: &ReportConfig,
) -> crate::Result<AnalysisReport> {
    let results = documents
        .par_iter()
        .map(|doc| {
            extractor
                .extract_bytes(&doc.data, &doc.filename)
                .map_err(|e| match e {
                    TallyError::Document(source) => TallyError::Unreadable {
                        filename: doc.filename.clone(),
                        source,
                    },
                    other => other,
                })
        })
        .collect::<crate::Result<Vec<ExtractionResult>>>()?;

    let report = Aggregator::new(config.clone()).build(&results);
    info!(
        "Analyzed {} documents: {} size observations, {} customers reported",
        documents.len(),
        report.total_orders,
        report.top_customers.len()
    );

    Ok(report)
}
