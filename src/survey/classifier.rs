//! Question column selection.

use super::SurveyRules;

/// Returns the indices of scorable question columns, ascending.
///
/// Metadata columns before `meta_offset` are skipped. A trailing column
/// whose name is in the by-name exclusion set is dropped first, then every
/// remaining candidate is checked against both exclusion sets.
pub fn question_columns(headers: &[String], rules: &SurveyRules) -> Vec<usize> {
    let mut candidates: Vec<usize> = (rules.meta_offset..headers.len()).collect();

    if let Some(last) = headers.last() {
        if rules.is_excluded_name(last) {
            candidates.pop();
        }
    }

    candidates
        .into_iter()
        .filter(|&i| !rules.is_excluded(&headers[i]))
        .collect()
}
