//! Report generation modules.
//!
//! This module turns aggregate figures and raw tables into the CSV, PNG
//! and HTML artifacts served by the web application and written by the
//! snapshot generator.

pub mod cache;
pub mod csv;
pub mod html;
pub mod qr;

pub use self::cache::{Clock, SystemClock, TtlCache};
pub use self::csv::{full_csv, summary_csv};
pub use self::qr::render_qr_png;

use thiserror::Error;

/// Errors raised while rendering an artifact.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode QR code: {0}")]
    Qr(#[from] qrcode::types::QrError),

    #[error("failed to encode PNG: {0}")]
    Image(#[from] image::ImageError),
}
