//! Spreadsheet data source.
//!
//! The rest of the application only sees the [`DataSource`] trait: fetch
//! the whole worksheet, overwrite one row, delete one row. Row numbers
//! passed to the trait are 1-based sheet rows (row 1 is the header).

pub mod auth;
pub mod client;
#[cfg(test)]
pub mod memory;

pub use client::GoogleSheetsClient;

use crate::models::Table;
use std::future::Future;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while talking to the spreadsheet.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("service account credentials are not configured (set CERIA_SKM_SERVICE_ACCOUNT_JSON)")]
    MissingCredentials,

    #[error("invalid service account credentials: {0}")]
    InvalidCredentials(String),

    #[error("failed to read credentials file {path}: {source}")]
    CredentialsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to sign token request: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Google API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("worksheet not found: {0}")]
    WorksheetNotFound(String),

    #[error("unexpected response: {0}")]
    Malformed(String),

    #[error("cannot access Google Sheets: {0}")]
    Unavailable(String),
}

/// Remote table that can be read whole and edited row by row.
pub trait DataSource: Send + Sync + 'static {
    /// Fetch every row of the worksheet; row 0 is the header.
    fn fetch_all(&self) -> impl Future<Output = Result<Table, SheetError>> + Send;

    /// Overwrite the cells of an A1 range (e.g. `A3:K3`) with one row.
    fn update_row(
        &self,
        range: &str,
        values: Vec<String>,
    ) -> impl Future<Output = Result<(), SheetError>> + Send;

    /// Delete a 1-based sheet row.
    fn delete_row(&self, sheet_row: usize) -> impl Future<Output = Result<(), SheetError>> + Send;
}

/// Outcome of building a data source at startup.
///
/// A failed connection is kept instead of aborting, and reported by
/// every request that needs the sheet.
#[derive(Debug)]
pub struct Connection<S> {
    state: Result<S, SheetError>,
}

impl<S> Connection<S> {
    pub fn ready(source: S) -> Self {
        Self { state: Ok(source) }
    }

    pub fn failed(error: SheetError) -> Self {
        Self { state: Err(error) }
    }

    /// Returns the data source, or the recorded initialization failure.
    pub fn source(&self) -> Result<&S, SheetError> {
        self.state
            .as_ref()
            .map_err(|e| SheetError::Unavailable(e.to_string()))
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ok()
    }
}

/// Column letters for a 1-based column number (1 → A, 27 → AA).
pub fn column_letter(mut column: usize) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push(b'A' + rem as u8);
        column = (column - 1) / 26;
    }
    if letters.is_empty() {
        return "A".to_string();
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// A1 range covering `columns` cells of one sheet row.
pub fn row_range(sheet_row: usize, columns: usize) -> String {
    format!("A{}:{}{}", sheet_row, column_letter(columns), sheet_row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(52), "AZ");
        assert_eq!(column_letter(703), "AAA");
        assert_eq!(column_letter(0), "A");
    }

    #[test]
    fn test_row_range() {
        assert_eq!(row_range(3, 11), "A3:K3");
        assert_eq!(row_range(12, 30), "A12:AD12");
    }

    #[test]
    fn test_failed_connection_reports_cause() {
        let conn: Connection<()> = Connection::failed(SheetError::MissingCredentials);
        assert!(!conn.is_ready());
        let err = conn.source().unwrap_err();
        assert!(matches!(err, SheetError::Unavailable(_)));
        assert!(err.to_string().contains("CERIA_SKM_SERVICE_ACCOUNT_JSON"));

        let ok = Connection::ready(5u8);
        assert_eq!(ok.source().copied().unwrap(), 5);
    }
}
