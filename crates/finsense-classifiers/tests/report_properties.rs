//! Property tests for the decision reporter

use finsense_classifiers::{make_report, CONFIDENCE_THRESHOLD, MARGIN_THRESHOLD};
use finsense_core::{Error, SentimentClass};
use proptest::prelude::*;

/// Three non-negative weights normalised into a probability vector
fn probability_vector() -> impl Strategy<Value = Vec<f32>> {
    prop::array::uniform3(0u32..1000)
        .prop_filter("at least one non-zero weight", |w| w.iter().any(|&x| x > 0))
        .prop_map(|w| {
            let total: u32 = w.iter().sum();
            w.iter().map(|&x| x as f32 / total as f32).collect()
        })
}

fn first_max_index(values: &[f32]) -> usize {
    let mut idx = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[idx] {
            idx = i;
        }
    }
    idx
}

proptest! {
    #[test]
    fn primary_is_first_maximum(probs in probability_vector()) {
        let report = make_report(&probs).unwrap();
        let idx = first_max_index(&probs);
        prop_assert_eq!(report.primary, SentimentClass::ALL[idx]);
        prop_assert_eq!(report.confidence, probs[idx]);
    }

    #[test]
    fn margin_is_gap_between_top_two(probs in probability_vector()) {
        let report = make_report(&probs).unwrap();
        let mut sorted = probs.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        prop_assert_eq!(report.margin, sorted[0] - sorted[1]);
        prop_assert!(report.margin >= 0.0);
    }

    #[test]
    fn borderline_matches_rule(probs in probability_vector()) {
        let report = make_report(&probs).unwrap();
        let expected = report.margin < MARGIN_THRESHOLD || report.confidence < CONFIDENCE_THRESHOLD;
        prop_assert_eq!(report.is_borderline, expected);
        prop_assert_eq!(
            report.summary.contains("Borderline"),
            expected
        );
    }

    #[test]
    fn report_is_deterministic(probs in probability_vector()) {
        prop_assert_eq!(make_report(&probs).unwrap(), make_report(&probs).unwrap());
    }

    #[test]
    fn distribution_mirrors_input(probs in probability_vector()) {
        let report = make_report(&probs).unwrap();
        let values: Vec<f32> = report.distribution.iter().map(|s| s.probability).collect();
        prop_assert_eq!(values, probs);
    }

    #[test]
    fn wrong_length_is_rejected(len in (0usize..8).prop_filter("not three", |l| *l != 3)) {
        let probs = vec![1.0 / len.max(1) as f32; len];
        prop_assert!(matches!(make_report(&probs), Err(Error::InvalidInput(_))));
    }
}
