//! Data models for the survey dashboard.
//!
//! This module contains the core data structures shared by the live
//! web application and the static snapshot generator: the raw response
//! table, the aggregate figures and the remark verdicts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict attached to an average when compared against the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Remark {
    /// Average is at or above the threshold.
    #[serde(rename = "OK")]
    Ok,
    /// Average is strictly below the threshold.
    #[serde(rename = "Evaluasi Diperlukan")]
    NeedsEvaluation,
}

impl Remark {
    /// Derive the remark for an average. `avg == threshold` is `Ok`.
    pub fn from_average(avg: f64, threshold: f64) -> Self {
        if avg < threshold {
            Remark::NeedsEvaluation
        } else {
            Remark::Ok
        }
    }

    /// Returns the label as written into CSV and HTML output.
    pub fn label(&self) -> &'static str {
        match self {
            Remark::Ok => "OK",
            Remark::NeedsEvaluation => "Evaluasi Diperlukan",
        }
    }

    /// CSS badge class used by the HTML pages.
    pub fn css_class(&self) -> &'static str {
        match self {
            Remark::Ok => "ok",
            Remark::NeedsEvaluation => "warn",
        }
    }
}

impl fmt::Display for Remark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Rectangular-ish table fetched from the spreadsheet.
///
/// Row 0 of the source becomes `headers`; everything after it is a data
/// row. Data rows may be shorter than the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Column names, in sheet order.
    pub headers: Vec<String>,
    /// Data rows (header excluded), in sheet order.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Split raw sheet values into header and data rows.
    pub fn from_values(mut values: Vec<Vec<String>>) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let rows = values.split_off(1);
        let headers = values.pop().unwrap_or_default();
        Self { headers, rows }
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether `rownum` (1-based over data rows) addresses an existing row.
    pub fn contains_row(&self, rownum: usize) -> bool {
        rownum >= 1 && rownum <= self.rows.len()
    }

    /// Returns the values at a 1-based spreadsheet row number (row 1 is
    /// the header), right-padded to the header width.
    pub fn sheet_row(&self, sheet_row: usize) -> Vec<String> {
        let values = match sheet_row {
            0 => Vec::new(),
            1 => self.headers.clone(),
            n => self.rows.get(n - 2).cloned().unwrap_or_default(),
        };
        self.pad_row(&values)
    }

    /// Right-pad a row with empty strings up to the header width.
    pub fn pad_row(&self, row: &[String]) -> Vec<String> {
        let mut padded = row.to_vec();
        if padded.len() < self.headers.len() {
            padded.resize(self.headers.len(), String::new());
        }
        padded
    }
}

/// One facility's overall average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAverage {
    /// Group key (facility name or the no-name sentinel).
    pub name: String,
    /// Overall average computed over the group's rows only.
    pub average: f64,
}

/// Output of one aggregation pass over a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Question labels, parallel to `averages`.
    pub labels: Vec<String>,
    /// Per-question averages (0.0 when a question has no scored answers).
    pub averages: Vec<f64>,
    /// Unweighted mean of `averages`.
    pub overall: f64,
    /// Per-group overall averages, sorted by name.
    pub groups: Vec<GroupAverage>,
}

/// Grouped entry in the dashboard payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub name: String,
    pub avg: f64,
    pub remark: Remark,
}

/// Payload served by `/api/dashboard-data` and written as `data.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub labels: Vec<String>,
    pub averages: Vec<f64>,
    pub overall: f64,
    pub overall_remark: Remark,
    pub grouped: Vec<GroupSummary>,
    pub threshold: f64,
    pub puskesmas_list: Vec<String>,
}

impl DashboardData {
    /// Attach remarks and the group name list to an aggregate result.
    pub fn new(result: AggregateResult, group_names: Vec<String>, threshold: f64) -> Self {
        let grouped = result
            .groups
            .into_iter()
            .map(|g| GroupSummary {
                remark: Remark::from_average(g.average, threshold),
                name: g.name,
                avg: g.average,
            })
            .collect();

        Self {
            overall_remark: Remark::from_average(result.overall, threshold),
            labels: result.labels,
            averages: result.averages,
            overall: result.overall,
            grouped,
            threshold,
            puskesmas_list: group_names,
        }
    }

    /// Iterate over `(label, average, remark)` per question.
    pub fn questions(&self) -> impl Iterator<Item = (&str, f64, Remark)> + '_ {
        self.labels
            .iter()
            .zip(self.averages.iter())
            .map(|(label, avg)| (label.as_str(), *avg, Remark::from_average(*avg, self.threshold)))
    }
}
