//! Mapping of failures to HTTP responses.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use ordertally_core::TallyError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no files uploaded, send one or more DOCX files in the \"files\" field")]
    NoFiles,

    #[error("failed to read upload: {0}")]
    Upload(#[from] MultipartError),

    #[error(transparent)]
    Analysis(#[from] TallyError),

    #[error("analysis worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoFiles => StatusCode::BAD_REQUEST,
            Self::Upload(e) => e.status(),
            Self::Analysis(TallyError::Unreadable { .. } | TallyError::Document(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Analysis(_) | Self::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Rejected request: {}", self);
        }

        let mut body = json!({ "error": self.to_string() });
        if let Self::Analysis(e) = &self {
            if let Some(filename) = e.filename() {
                body["filename"] = json!(filename);
            }
        }

        (status, Json(body)).into_response()
    }
}
