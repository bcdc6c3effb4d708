//! Survey aggregation engine.
//!
//! This module is the single implementation of column classification,
//! answer scoring and averaging. Both the live web application and the
//! static snapshot generator go through it.

pub mod aggregator;
pub mod classifier;
pub mod scoring;

pub use aggregator::dashboard_data;

use crate::config::SurveyConfig;
use std::collections::HashSet;

/// Column filtering and grouping rules, normalized for lookups.
#[derive(Debug, Clone)]
pub struct SurveyRules {
    /// Columns before this index are respondent metadata.
    pub meta_offset: usize,
    /// Lower-cased free-text/comment column names.
    exclude_by_name: HashSet<String>,
    /// Lower-cased question texts that are never scored.
    exclude_by_question: HashSet<String>,
    /// Lower-cased name of the grouping column.
    group_column: String,
    /// Label for rows whose group cell is blank.
    pub unnamed_group: String,
    /// Remark threshold.
    pub threshold: f64,
}

impl SurveyRules {
    /// Whether a header matches the by-name exclusion set.
    pub fn is_excluded_name(&self, header: &str) -> bool {
        self.exclude_by_name.contains(&normalize(header))
    }

    /// Whether a header matches either exclusion set.
    pub fn is_excluded(&self, header: &str) -> bool {
        let name = normalize(header);
        self.exclude_by_name.contains(&name) || self.exclude_by_question.contains(&name)
    }

    /// Whether a header is the grouping column.
    pub fn is_group_column(&self, header: &str) -> bool {
        normalize(header) == self.group_column
    }
}

impl From<&SurveyConfig> for SurveyRules {
    fn from(config: &SurveyConfig) -> Self {
        Self {
            meta_offset: config.meta_offset,
            exclude_by_name: config.exclude_by_name.iter().map(|n| normalize(n)).collect(),
            exclude_by_question: config
                .exclude_by_question
                .iter()
                .map(|n| normalize(n))
                .collect(),
            group_column: normalize(&config.group_column),
            unnamed_group: config.unnamed_group.clone(),
            threshold: config.threshold,
        }
    }
}

impl Default for SurveyRules {
    fn default() -> Self {
        Self::from(&SurveyConfig::default())
    }
}

/// Trim and lower-case a header or cell for comparisons.
fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
