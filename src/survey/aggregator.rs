//! Per-question, overall and per-group averages.
//!
//! Unscored cells (score 0.0) are left out of both the sum and the count
//! of a question. The overall figure weighs every question equally.

use super::{classifier, scoring, SurveyRules};
use crate::models::{AggregateResult, DashboardData, GroupAverage, Table};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Aggregate a full table.
pub fn aggregate(table: &Table, rules: &SurveyRules) -> AggregateResult {
    let columns = classifier::question_columns(&table.headers, rules);
    debug!(
        "Aggregating {} rows over {} question columns",
        table.rows.len(),
        columns.len()
    );

    let averages = question_averages(&columns, table.rows.iter().map(Vec::as_slice));
    let overall = overall_average(&averages);
    let labels = columns.iter().map(|&c| table.headers[c].clone()).collect();
    let groups = group_averages(table, &columns, rules);

    AggregateResult {
        labels,
        averages,
        overall,
        groups,
    }
}

/// Aggregate a table and attach remarks for presentation.
pub fn dashboard_data(table: &Table, rules: &SurveyRules) -> DashboardData {
    DashboardData::new(
        aggregate(table, rules),
        group_names(table, rules),
        rules.threshold,
    )
}

/// Average score per question column, in column order.
pub fn question_averages<'a>(
    columns: &[usize],
    rows: impl IntoIterator<Item = &'a [String]>,
) -> Vec<f64> {
    let mut sums = vec![0.0; columns.len()];
    let mut counts = vec![0usize; columns.len()];

    for row in rows {
        for (j, &col) in columns.iter().enumerate() {
            let Some(cell) = row.get(col) else {
                continue;
            };
            let s = scoring::score(cell);
            if s > 0.0 {
                sums[j] += s;
                counts[j] += 1;
            }
        }
    }

    sums.iter()
        .zip(&counts)
        .map(|(&sum, &count)| if count > 0 { sum / count as f64 } else { 0.0 })
        .collect()
}

/// Unweighted mean of per-question averages; 0.0 when there are none.
pub fn overall_average(averages: &[f64]) -> f64 {
    if averages.is_empty() {
        0.0
    } else {
        averages.iter().sum::<f64>() / averages.len() as f64
    }
}

/// Index of the grouping column, if the header row has one.
pub fn group_column(headers: &[String], rules: &SurveyRules) -> Option<usize> {
    headers.iter().position(|h| rules.is_group_column(h))
}

/// Group key of a row: the trimmed group cell, or the no-name sentinel.
pub fn group_key<'a>(row: &'a [String], column: usize, rules: &'a SurveyRules) -> &'a str {
    match row.get(column).map(|cell| cell.trim()) {
        Some(name) if !name.is_empty() => name,
        _ => &rules.unnamed_group,
    }
}

/// Partition rows by group key. Every row lands in exactly one group.
pub fn partition<'a>(
    rows: &'a [Vec<String>],
    column: usize,
    rules: &'a SurveyRules,
) -> BTreeMap<&'a str, Vec<&'a [String]>> {
    let mut groups: BTreeMap<&str, Vec<&[String]>> = BTreeMap::new();
    for row in rows {
        groups
            .entry(group_key(row, column, rules))
            .or_default()
            .push(row.as_slice());
    }
    groups
}

/// Overall average per group, sorted by group name.
pub fn group_averages(table: &Table, columns: &[usize], rules: &SurveyRules) -> Vec<GroupAverage> {
    let Some(column) = group_column(&table.headers, rules) else {
        debug!("No grouping column found; skipping grouped averages");
        return Vec::new();
    };

    partition(&table.rows, column, rules)
        .into_iter()
        .map(|(name, rows)| GroupAverage {
            name: name.to_string(),
            average: overall_average(&question_averages(columns, rows)),
        })
        .collect()
}

/// Sorted distinct group keys over all rows.
pub fn group_names(table: &Table, rules: &SurveyRules) -> Vec<String> {
    let Some(column) = group_column(&table.headers, rules) else {
        return Vec::new();
    };

    table
        .rows
        .iter()
        .map(|row| group_key(row, column, rules).to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta_headers(questions: &[&str]) -> Vec<String> {
        let mut all: Vec<String> = (0..8).map(|i| format!("m{}", i)).collect();
        all.extend(questions.iter().map(|s| s.to_string()));
        all
    }

    /// Build a data row with empty metadata and the given tail cells.
    fn row(cells: &[&str]) -> Vec<String> {
        let mut all = vec![String::new(); 8];
        all.extend(cells.iter().map(|s| s.to_string()));
        all
    }

    #[test]
    fn test_scenario_two_answers() {
        let table = Table {
            headers: meta_headers(&["Q1", "Komentar", "Puskesmas"]),
            rows: vec![row(&["sangat baik"]), row(&["tidak baik"])],
        };
        let result = aggregate(&table, &SurveyRules::default());

        assert_eq!(result.labels, vec!["Q1".to_string()]);
        assert_eq!(result.averages, vec![2.5]);
        assert_eq!(result.overall, 2.5);
    }

    #[test]
    fn test_blank_cells_do_not_drag_average_down() {
        let table = Table {
            headers: meta_headers(&["Q1"]),
            rows: vec![row(&["baik"]), row(&[""]), row(&["baik"]), row(&["???"])],
        };
        let result = aggregate(&table, &SurveyRules::default());
        assert_eq!(result.averages, vec![3.0]);
    }

    #[test]
    fn test_short_rows_are_skipped_per_column() {
        let table = Table {
            headers: meta_headers(&["Q1", "Q2"]),
            rows: vec![row(&["4", "2"]), row(&["2"]), vec!["only-meta".to_string()]],
        };
        let result = aggregate(&table, &SurveyRules::default());
        assert_eq!(result.averages, vec![3.0, 2.0]);
    }

    #[test]
    fn test_overall_weights_questions_equally() {
        let mut rows = vec![row(&["1", "4"])];
        for _ in 0..99 {
            rows.push(row(&["", "2"]));
        }
        let table = Table {
            headers: meta_headers(&["Q1", "Q2"]),
            rows,
        };
        let result = aggregate(&table, &SurveyRules::default());

        assert_eq!(result.averages[0], 1.0);
        let q2 = (4.0 + 99.0 * 2.0) / 100.0;
        assert!((result.averages[1] - q2).abs() < 1e-12);
        assert_eq!(result.overall, overall_average(&result.averages));
        assert!((result.overall - (1.0 + q2) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_question_without_answers_averages_zero() {
        let table = Table {
            headers: meta_headers(&["Q1", "Q2"]),
            rows: vec![row(&["sangat mudah", ""])],
        };
        let result = aggregate(&table, &SurveyRules::default());
        assert_eq!(result.averages, vec![4.0, 0.0]);
        assert_eq!(result.overall, 2.0);
    }

    #[test]
    fn test_numeric_outlier_is_averaged_in() {
        let table = Table {
            headers: meta_headers(&["Q1"]),
            rows: vec![row(&["7"]), row(&["baik"])],
        };
        let result = aggregate(&table, &SurveyRules::default());
        assert_eq!(result.averages, vec![5.0]);
    }

    #[test]
    fn test_non_finite_cells_keep_payload_numeric() {
        let table = Table {
            headers: meta_headers(&["Q1"]),
            rows: vec![row(&["inf"]), row(&["baik"]), row(&["NaN"])],
        };
        let data = dashboard_data(&table, &SurveyRules::default());
        assert_eq!(data.averages, vec![3.0]);
        assert_eq!(data.overall, 3.0);

        let json = serde_json::to_string(&data).unwrap();
        assert!(!json.contains("null"));
        let parsed: DashboardData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_degenerate_tables() {
        let rules = SurveyRules::default();

        let empty = aggregate(&Table::default(), &rules);
        assert_eq!(empty, AggregateResult::default());

        let no_questions = Table {
            headers: vec!["Timestamp".to_string(), "Puskesmas".to_string()],
            rows: vec![vec!["t".to_string(), "A".to_string()]],
        };
        let result = aggregate(&no_questions, &rules);
        assert!(result.labels.is_empty());
        assert_eq!(result.overall, 0.0);
        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].average, 0.0);
    }

    #[test]
    fn test_groups_partition_all_rows() {
        let mut headers = meta_headers(&["Q1"]);
        headers[1] = "PUSKESMAS".to_string();
        let mut rows = vec![row(&["4"]), row(&["2"]), row(&["3"]), row(&["1"])];
        rows[0][1] = "Beta".to_string();
        rows[1][1] = " Alpha ".to_string();
        rows[2][1] = "   ".to_string();
        rows[3][1] = "Alpha".to_string();
        let table = Table { headers, rows };
        let rules = SurveyRules::default();

        let column = group_column(&table.headers, &rules).unwrap();
        let groups = partition(&table.rows, column, &rules);
        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, table.rows.len());

        let result = aggregate(&table, &rules);
        let names: Vec<_> = result.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["<Tanpa Nama>", "Alpha", "Beta"]);
        assert_eq!(result.groups[0].average, 3.0);
        assert_eq!(result.groups[1].average, 1.5);
        assert_eq!(result.groups[2].average, 4.0);
    }

    #[test]
    fn test_missing_cell_in_group_column_uses_sentinel() {
        let mut headers = meta_headers(&["Q1"]);
        headers.push("Puskesmas".to_string());
        let table = Table {
            headers,
            rows: vec![row(&["4", "A"]), row(&["2"])],
        };
        let rules = SurveyRules::default();

        let result = aggregate(&table, &rules);
        assert_eq!(result.labels, vec!["Q1".to_string()]);
        assert_eq!(result.groups.len(), 2);
        assert_eq!(result.groups[0].name, "<Tanpa Nama>");
        assert_eq!(result.groups[1].name, "A");
        assert_eq!(group_names(&table, &rules), vec!["<Tanpa Nama>", "A"]);
    }

    #[test]
    fn test_no_group_column_disables_grouping() {
        let table = Table {
            headers: meta_headers(&["Q1"]),
            rows: vec![row(&["4"])],
        };
        let rules = SurveyRules::default();
        assert!(aggregate(&table, &rules).groups.is_empty());
        assert!(group_names(&table, &rules).is_empty());
    }

    #[test]
    fn test_dashboard_data_group_remarks() {
        let mut headers = meta_headers(&["Q1"]);
        headers.push("Puskesmas".to_string());
        let table = Table {
            headers,
            rows: vec![
                row(&["2.9", "A"]),
                row(&["3", "B"]),
            ],
        };
        let data = dashboard_data(&table, &SurveyRules::default());

        assert_eq!(data.grouped[0].name, "A");
        assert_eq!(data.grouped[0].remark.label(), "Evaluasi Diperlukan");
        assert_eq!(data.grouped[1].name, "B");
        assert_eq!(data.grouped[1].remark.label(), "OK");
        assert_eq!(data.threshold, 3.0);
        assert_eq!(data.puskesmas_list, vec!["A", "B"]);
    }
}
