//! Static read-only snapshot.
//!
//! Fetches the worksheet once, runs the shared aggregation and writes a
//! self-contained directory that can be published as static pages.

use crate::config::Config;
use crate::models::{DashboardData, Table};
use crate::report::{self, html};
use crate::sheets::DataSource;
use crate::survey::{self, SurveyRules};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What a snapshot run produced.
#[derive(Debug)]
pub struct SnapshotSummary {
    pub output_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub data: DashboardData,
}

/// Fetch the worksheet and write the snapshot.
pub async fn generate<S: DataSource>(source: &S, config: &Config) -> Result<SnapshotSummary> {
    let table = source
        .fetch_all()
        .await
        .context("Failed to fetch worksheet")?;
    info!(
        "Fetched {} rows from worksheet '{}'",
        table.row_count(),
        config.sheet.worksheet
    );

    write_snapshot(&config.snapshot.output_dir, &table, config)
}

/// Compute the figures for `table` and write every artifact into `dir`.
pub fn write_snapshot(dir: &Path, table: &Table, config: &Config) -> Result<SnapshotSummary> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let rules = SurveyRules::from(&config.survey);
    let data = survey::dashboard_data(table, &rules);

    let json = serde_json::to_string_pretty(&data).context("Failed to serialize data.json")?;
    let contents: [(&str, Vec<u8>); 7] = [
        ("data.json", json.into_bytes()),
        ("summary.csv", report::summary_csv(&data)?),
        ("full.csv", report::full_csv(table)?),
        ("qr.png", report::render_qr_png(&config.sheet.form_url)?),
        ("style.css", html::stylesheet(&config.theme).into_bytes()),
        (
            "index.html",
            html::snapshot_index(&data, &config.sheet.form_url).into_bytes(),
        ),
        ("dashboard.html", html::snapshot_dashboard().into_bytes()),
    ];

    let mut files = Vec::with_capacity(contents.len());
    for (name, bytes) in contents {
        let path = dir.join(name);
        std::fs::write(&path, &bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
        files.push(path);
    }

    Ok(SnapshotSummary {
        output_dir: dir.to_path_buf(),
        files,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::memory::MemorySheet;

    const ARTIFACTS: [&str; 7] = [
        "data.json",
        "summary.csv",
        "full.csv",
        "qr.png",
        "style.css",
        "index.html",
        "dashboard.html",
    ];

    fn sheet() -> MemorySheet {
        MemorySheet::new(&[
            &["t", "m1", "m2", "m3", "m4", "m5", "m6", "m7", "Q1", "Komentar", "Puskesmas"],
            &["", "", "", "", "", "", "", "", "sangat baik", "mantap", "Puskesmas Ceria"],
            &["", "", "", "", "", "", "", "", "tidak baik", "", ""],
        ])
    }

    #[tokio::test]
    async fn test_generate_writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.snapshot.output_dir = dir.path().join("docs");

        let summary = generate(&sheet(), &config).await.unwrap();

        assert_eq!(summary.files.len(), ARTIFACTS.len());
        for name in ARTIFACTS {
            assert!(summary.output_dir.join(name).is_file(), "missing {}", name);
        }
        assert_eq!(summary.data.averages, vec![2.5]);
        assert_eq!(summary.data.overall, 2.5);
    }

    #[test]
    fn test_data_json_matches_live_schema() {
        let dir = tempfile::tempdir().unwrap();
        let table = Table::from_values(sheet().values());
        let summary = write_snapshot(dir.path(), &table, &Config::default()).unwrap();

        let text = std::fs::read_to_string(dir.path().join("data.json")).unwrap();
        let parsed: DashboardData = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, summary.data);

        let raw: serde_json::Value = serde_json::from_str(&text).unwrap();
        for key in [
            "labels",
            "averages",
            "overall",
            "overall_remark",
            "grouped",
            "threshold",
            "puskesmas_list",
        ] {
            assert!(raw.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(raw["puskesmas_list"][1], "Puskesmas Ceria");
        assert_eq!(raw["grouped"][1]["avg"].as_f64().unwrap(), 4.0);
        assert_eq!(raw["grouped"][0]["remark"], "Evaluasi Diperlukan");
    }

    #[test]
    fn test_summary_csv_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let table = Table::from_values(sheet().values());
        write_snapshot(dir.path(), &table, &Config::default()).unwrap();

        let csv = std::fs::read_to_string(dir.path().join("summary.csv")).unwrap();
        assert!(csv.contains("Q1,2.50,Evaluasi Diperlukan"));
        assert!(csv.ends_with("Rata-rata Keseluruhan,2.50,Evaluasi Diperlukan\r\n"));

        let index = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains("2.50 – Evaluasi Diperlukan"));
    }
}
