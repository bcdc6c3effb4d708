//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and environment variable fallbacks.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CERIA SKM - survey satisfaction dashboard
///
/// Reads survey responses from Google Sheets, scores Likert answers and
/// reports per-question and per-Puskesmas averages. Serve them live or
/// freeze them into a static snapshot.
///
/// Examples:
///   ceria-skm serve
///   ceria-skm serve --bind 0.0.0.0:8080 --threshold 3.25
///   ceria-skm snapshot --out-dir docs
///   ceria-skm --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .ceria-skm.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Spreadsheet key holding the form responses
    #[arg(long, value_name = "ID", env = "CERIA_SKM_SPREADSHEET_ID", global = true)]
    pub spreadsheet_id: Option<String>,

    /// Worksheet (tab) name
    #[arg(long, value_name = "NAME", env = "CERIA_SKM_WORKSHEET_NAME", global = true)]
    pub worksheet: Option<String>,

    /// Averages below this value are flagged "Evaluasi Diperlukan"
    #[arg(long, value_name = "SCORE", env = "CERIA_SKM_THRESHOLD", global = true)]
    pub threshold: Option<f64>,

    /// Survey form URL shown on the landing page and encoded in the QR code
    #[arg(long, value_name = "URL", env = "CERIA_SKM_FORM_URL", global = true)]
    pub form_url: Option<String>,

    /// Inline service account JSON
    #[arg(
        long,
        value_name = "JSON",
        env = "CERIA_SKM_SERVICE_ACCOUNT_JSON",
        hide_env_values = true,
        global = true
    )]
    pub credentials_json: Option<String>,

    /// Service account key file, used when no inline JSON is given
    #[arg(
        long,
        value_name = "FILE",
        env = "CERIA_SKM_SERVICE_ACCOUNT_FILE",
        global = true
    )]
    pub credentials_file: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generate a default .ceria-skm.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// What to run.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the live web application
    Serve {
        /// Address to listen on
        #[arg(long, value_name = "ADDR", env = "CERIA_SKM_BIND")]
        bind: Option<String>,
    },
    /// Fetch once and write a static read-only snapshot
    Snapshot {
        /// Output directory (default: docs)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.command.is_none() {
            return Err("A subcommand is required: serve or snapshot".to_string());
        }

        if let Some(ref id) = self.spreadsheet_id {
            if id.trim().is_empty() {
                return Err("Spreadsheet id must not be empty".to_string());
            }
        }

        if let Some(ref url) = self.form_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Form URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(threshold) = self.threshold {
            if !threshold.is_finite() {
                return Err("Threshold must be a finite number".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref path) = self.credentials_file {
            if self.credentials_json.is_none() && !path.is_file() {
                return Err(format!(
                    "Credentials file does not exist: {}",
                    path.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
