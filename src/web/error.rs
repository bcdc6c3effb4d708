//! Error responses for the web application.

use crate::report::ReportError;
use crate::sheets::SheetError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failure of a request handler.
#[derive(Debug, Error)]
pub enum WebError {
    /// The addressed row does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The spreadsheet could not be reached or rejected the call.
    #[error(transparent)]
    Sheet(#[from] SheetError),

    /// An export or image failed to render.
    #[error(transparent)]
    Report(#[from] ReportError),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Sheet(_) | WebError::Report(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            WebError::NotFound("Baris tidak ditemukan".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            WebError::from(SheetError::MissingCredentials).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_message_passes_through() {
        let err = WebError::from(SheetError::Unavailable("no key".to_string()));
        assert_eq!(err.to_string(), "cannot access Google Sheets: no key");
    }
}
