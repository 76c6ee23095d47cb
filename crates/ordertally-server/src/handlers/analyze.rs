//! `POST /analyze`: multipart upload of order sheets.

use axum::extract::{Multipart, State};
use axum::response::Json;
use tracing::{debug, info};

use ordertally_core::{analyze_documents, AnalysisReport, UploadedDocument};

use crate::error::ApiError;
use crate::AppState;

/// Multipart field carrying the documents. May repeat.
pub const FILES_FIELD: &str = "files";

/// Provenance tag for parts sent without a filename.
pub const DEFAULT_FILENAME: &str = "unknown.docx";

pub async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, ApiError> {
    let mut documents = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILES_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let filename = field.file_name().unwrap_or(DEFAULT_FILENAME).to_string();
        let data = field.bytes().await?;
        debug!("Received {} ({} bytes)", filename, data.len());
        documents.push(UploadedDocument::new(filename, data.to_vec()));
    }

    if documents.is_empty() {
        return Err(ApiError::NoFiles);
    }

    let count = documents.len();
    let report = tokio::task::spawn_blocking(move || {
        analyze_documents(&documents, &state.extractor, &state.config.report)
    })
    .await??;

    info!(
        "Analyzed {} uploads: {} orders, {} customers",
        count,
        report.total_orders,
        report.top_customers.len()
    );

    Ok(Json(report))
}
