//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.ceria-skm.toml` files. Command-line flags and `CERIA_SKM_*`
//! environment variables override file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".ceria-skm.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Spreadsheet settings.
    #[serde(default)]
    pub sheet: SheetConfig,

    /// Scoring and grouping rules.
    #[serde(default)]
    pub survey: SurveyConfig,

    /// Web server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Page colours.
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Static snapshot settings.
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

/// Google Sheets source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Spreadsheet key (the id in the sheet URL).
    #[serde(default = "default_spreadsheet_id")]
    pub spreadsheet_id: String,

    /// Worksheet (tab) holding the form responses.
    #[serde(default = "default_worksheet")]
    pub worksheet: String,

    /// Public form URL, encoded in the QR code.
    #[serde(default = "default_form_url")]
    pub form_url: String,

    /// Path to a service account key file.
    ///
    /// Only used when no inline JSON is provided.
    #[serde(default)]
    pub credentials_file: Option<PathBuf>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: default_spreadsheet_id(),
            worksheet: default_worksheet(),
            form_url: default_form_url(),
            credentials_file: None,
        }
    }
}

fn default_spreadsheet_id() -> String {
    "1MuNz33zko8kk-OTWz8lR_Lug9kkeJ-UgRkJmNz1TtfU".to_string()
}

fn default_worksheet() -> String {
    "Form Responses 2".to_string()
}

fn default_form_url() -> String {
    "https://forms.gle/9wdnAW4BkxVRGcKp7".to_string()
}

/// Column classification and remark settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    /// Averages below this value get "Evaluasi Diperlukan".
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Number of leading metadata columns (timestamp, identity, ...).
    #[serde(default = "default_meta_offset")]
    pub meta_offset: usize,

    /// Free-text column names that are never scored.
    #[serde(default = "default_exclude_by_name")]
    pub exclude_by_name: Vec<String>,

    /// Question texts that are never scored.
    #[serde(default = "default_exclude_by_question")]
    pub exclude_by_question: Vec<String>,

    /// Header of the facility column used for grouping.
    #[serde(default = "default_group_column")]
    pub group_column: String,

    /// Group label for rows with a blank facility.
    #[serde(default = "default_unnamed_group")]
    pub unnamed_group: String,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            meta_offset: default_meta_offset(),
            exclude_by_name: default_exclude_by_name(),
            exclude_by_question: default_exclude_by_question(),
            group_column: default_group_column(),
            unnamed_group: default_unnamed_group(),
        }
    }
}

fn default_threshold() -> f64 {
    3.0
}

fn default_meta_offset() -> usize {
    8
}

fn default_exclude_by_name() -> Vec<String> {
    vec![
        "Saran",
        "Saran/masukan",
        "Komentar",
        "Feedback",
        "Umpan Balik",
        "Kritik",
        "Catatan",
        "Saran Bapak/Ibu untuk peningkatan pelayanan Puskesmas ini",
        "Puskesmas",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_exclude_by_question() -> Vec<String> {
    vec![
        "Sarana Bayak/buruk untuk peningkatan pelayanan Puskesmas ini",
        "Petugas kurang sabar, ramah, dan menghargai pasien",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_group_column() -> String {
    "Puskesmas".to_string()
}

fn default_unnamed_group() -> String {
    "<Tanpa Nama>".to_string()
}

/// Web server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// How long a rendered QR image is reused, in seconds.
    #[serde(default = "default_qr_ttl")]
    pub qr_ttl_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            qr_ttl_seconds: default_qr_ttl(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_qr_ttl() -> u64 {
    300
}

/// Colours injected into every HTML page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "default_primary")]
    pub primary: String,
    #[serde(default = "default_secondary")]
    pub secondary: String,
    #[serde(default = "default_info")]
    pub info: String,
    #[serde(default = "default_background")]
    pub background: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            secondary: default_secondary(),
            info: default_info(),
            background: default_background(),
        }
    }
}

fn default_primary() -> String {
    "#ff8c42".to_string()
}

fn default_secondary() -> String {
    "#1e3a8a".to_string()
}

fn default_info() -> String {
    "#247ba0".to_string()
}

fn default_background() -> String {
    "#f9fafb".to_string()
}

/// Static snapshot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Directory the snapshot is written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("docs")
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values explicitly given on the command line or through the
    /// environment override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref id) = args.spreadsheet_id {
            self.sheet.spreadsheet_id = id.clone();
        }
        if let Some(ref worksheet) = args.worksheet {
            self.sheet.worksheet = worksheet.clone();
        }
        if let Some(ref form_url) = args.form_url {
            self.sheet.form_url = form_url.clone();
        }
        if let Some(ref path) = args.credentials_file {
            self.sheet.credentials_file = Some(path.clone());
        }
        if let Some(threshold) = args.threshold {
            self.survey.threshold = threshold;
        }

        match args.command {
            Some(crate::cli::Command::Serve { ref bind }) => {
                if let Some(bind) = bind {
                    self.server.bind = bind.clone();
                }
            }
            Some(crate::cli::Command::Snapshot { ref out_dir }) => {
                if let Some(dir) = out_dir {
                    self.snapshot.output_dir = dir.clone();
                }
            }
            None => {}
        }
    }

    /// Check the merged configuration.
    ///
    /// File values bypass the CLI checks, so the same rules run again here
    /// after `merge_with_args`.
    pub fn validate(&self) -> Result<()> {
        if self.sheet.spreadsheet_id.trim().is_empty() {
            anyhow::bail!("Spreadsheet id must not be empty");
        }
        if self.sheet.worksheet.trim().is_empty() {
            anyhow::bail!("Worksheet name must not be empty");
        }
        let url = &self.sheet.form_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("Form URL must start with 'http://' or 'https://': {}", url);
        }
        if !self.survey.threshold.is_finite() {
            anyhow::bail!("Threshold must be a finite number");
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sheet.worksheet, "Form Responses 2");
        assert_eq!(config.survey.threshold, 3.0);
        assert_eq!(config.survey.meta_offset, 8);
        assert_eq!(config.server.qr_ttl_seconds, 300);
        assert!(config.survey.exclude_by_name.contains(&"Komentar".to_string()));
        assert_eq!(config.snapshot.output_dir, PathBuf::from("docs"));
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[sheet]
spreadsheet_id = "abc123"
worksheet = "Responses"

[survey]
threshold = 3.5
exclude_by_name = ["Saran"]

[server]
bind = "0.0.0.0:8080"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.sheet.spreadsheet_id, "abc123");
        assert_eq!(config.sheet.worksheet, "Responses");
        assert_eq!(config.sheet.form_url, "https://forms.gle/9wdnAW4BkxVRGcKp7");
        assert_eq!(config.survey.threshold, 3.5);
        assert_eq!(config.survey.exclude_by_name, vec!["Saran"]);
        assert_eq!(config.survey.meta_offset, 8);
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.theme.primary, "#ff8c42");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[survey]\nthreshold = 2.0\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.survey.threshold, 2.0);

        std::fs::write(&path, "[survey\nthreshold = ").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_file_values() {
        assert!(Config::default().validate().is_ok());

        let config: Config = toml::from_str("[survey]\nthreshold = nan\n").unwrap();
        assert!(config.survey.threshold.is_nan());
        assert!(config.validate().is_err());

        let config: Config = toml::from_str("[sheet]\nform_url = \"forms.gle/abc\"\n").unwrap();
        assert!(config.validate().is_err());

        let config: Config = toml::from_str("[sheet]\nspreadsheet_id = \"  \"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_values_are_validated_after_merge() {
        use clap::Parser;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[survey]\nthreshold = nan\n").unwrap();

        let mut config = Config::load(&path).unwrap();
        assert!(config.validate().is_err());

        let args = crate::cli::Args::try_parse_from([
            "ceria-skm",
            "--threshold",
            "3.5",
            "serve",
        ])
        .unwrap();
        config.merge_with_args(&args);
        assert!(config.validate().is_ok());
        assert_eq!(config.survey.threshold, 3.5);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[sheet]"));
        assert!(toml_str.contains("[survey]"));
        assert!(toml_str.contains("[server]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.survey.exclude_by_name.len(), 9);
    }
}
