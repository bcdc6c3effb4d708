//! Answer scoring.
//!
//! A cell is scored either as a bare number or through the Likert
//! vocabulary used by the survey form. Anything else scores 0.0, which
//! the aggregator treats as "no answer".

/// Adjectives of the five answer scales (quality, ease, suitability,
/// friendliness, responsiveness).
const SCALES: [&str; 5] = ["baik", "mudah", "sesuai", "ramah", "ditanggapi"];

/// Score returned for blank, unparseable or unknown answers.
pub const UNSCORED: f64 = 0.0;

/// Convert one raw cell into a score.
///
/// Finite numeric answers are returned as-is, without clamping to the
/// 1..=4 range. `inf` and `NaN` spellings score as unscored.
pub fn score(raw: &str) -> f64 {
    let value = raw.trim().to_lowercase();

    if let Ok(number) = value.parse::<f64>() {
        return if number.is_finite() { number } else { UNSCORED };
    }

    likert_level(&value).unwrap_or(UNSCORED)
}

/// Map "tidak/kurang/<bare>/sangat" + adjective to 1/2/3/4.
fn likert_level(phrase: &str) -> Option<f64> {
    let (level, adjective) = match phrase.split_once(' ') {
        None => (3.0, phrase),
        Some(("tidak", rest)) => (1.0, rest),
        Some(("kurang", rest)) => (2.0, rest),
        Some(("sangat", rest)) => (4.0, rest),
        Some(_) => return None,
    };

    SCALES.contains(&adjective).then_some(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_levels() {
        for adjective in SCALES {
            assert_eq!(score(&format!("tidak {}", adjective)), 1.0);
            assert_eq!(score(&format!("kurang {}", adjective)), 2.0);
            assert_eq!(score(adjective), 3.0);
            assert_eq!(score(&format!("sangat {}", adjective)), 4.0);
        }
    }

    #[test]
    fn test_trim_and_case() {
        assert_eq!(score("  Sangat Baik "), 4.0);
        assert_eq!(score("KURANG RAMAH"), 2.0);
    }

    #[test]
    fn test_numeric_is_not_clamped() {
        assert_eq!(score("7"), 7.0);
        assert_eq!(score(" 2.5 "), 2.5);
        assert_eq!(score("-1"), -1.0);
    }

    #[test]
    fn test_unscored_fallback() {
        assert_eq!(score(""), UNSCORED);
        assert_eq!(score("   "), UNSCORED);
        assert_eq!(score("lumayan"), UNSCORED);
        assert_eq!(score("sangat"), UNSCORED);
        assert_eq!(score("agak baik"), UNSCORED);
        assert_eq!(score("tidak  baik"), UNSCORED);
        assert_eq!(score("sangat baik sekali"), UNSCORED);
    }

    #[test]
    fn test_total_over_arbitrary_input() {
        let inputs = ["🙂", "3,5", "baik!", "\t\n", "1e1", "nilai 4", "1e999"];
        for input in inputs {
            assert!(score(input).is_finite(), "input {:?}", input);
        }
        assert_eq!(score("1e1"), 10.0);
        assert_eq!(score("3,5"), UNSCORED);
    }

    #[test]
    fn test_non_finite_numbers_are_unscored() {
        for input in ["inf", "Infinity", "-inf", "NaN", " nan "] {
            assert_eq!(score(input), UNSCORED, "input {:?}", input);
        }
    }
}
