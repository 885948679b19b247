//! Confidence-margin decision reporting
//!
//! Turns a probability vector into the primary decision plus a borderline
//! flag for predictions that warrant manual review. A prediction is
//! borderline when the gap between its two most likely classes is below
//! [`MARGIN_THRESHOLD`] or when its top probability is below
//! [`CONFIDENCE_THRESHOLD`].
//!
//! Everything here is pure: no I/O, no shared state, safe to call from any
//! number of tasks at once.

use finsense_core::{ProbabilityVector, Result, SentimentClass};
use serde::Serialize;
use std::fmt;

/// Minimum gap between the top two probabilities for a confident decision
pub const MARGIN_THRESHOLD: f32 = 0.23;

/// Minimum top-class probability for a confident decision
pub const CONFIDENCE_THRESHOLD: f32 = 0.60;

/// Borderline rule. Values exactly at a threshold do not trigger it.
pub fn is_borderline(margin: f32, confidence: f32) -> bool {
    margin < MARGIN_THRESHOLD || confidence < CONFIDENCE_THRESHOLD
}

/// Review status of a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DecisionStatus {
    #[serde(rename = "High Confidence")]
    HighConfidence,
    #[serde(rename = "Borderline – Review Needed")]
    Borderline,
}

impl DecisionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HighConfidence => "High Confidence",
            Self::Borderline => "Borderline – Review Needed",
        }
    }

    /// Marker shown in front of the status in the text report
    pub fn icon(self) -> &'static str {
        match self {
            Self::HighConfidence => "✅",
            Self::Borderline => "⚠️",
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the label distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassScore {
    pub label: &'static str,
    pub probability: f32,
}

/// Derived view of a single prediction, consumed once by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionReport {
    /// Class with the highest probability (first one on ties)
    pub primary: SentimentClass,

    /// Probability of the primary class
    pub confidence: f32,

    /// Gap between the two highest probabilities, never negative
    pub margin: f32,

    pub is_borderline: bool,

    pub status: DecisionStatus,

    /// Display label to probability, in class order
    pub distribution: Vec<ClassScore>,

    /// Markdown summary
    pub summary: String,
}

impl DecisionReport {
    /// Build a report from an already validated vector
    pub fn from_probabilities(probabilities: &ProbabilityVector) -> Self {
        let values = probabilities.as_slice();

        // Strict comparison keeps the first maximum.
        let mut idx = 0;
        for (i, &p) in values.iter().enumerate().skip(1) {
            if p > values[idx] {
                idx = i;
            }
        }
        let primary = SentimentClass::ALL[idx];
        let confidence = values[idx];

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| b.total_cmp(a));
        let margin = sorted[0] - sorted[1];

        let is_borderline = is_borderline(margin, confidence);
        let status = if is_borderline {
            DecisionStatus::Borderline
        } else {
            DecisionStatus::HighConfidence
        };

        let distribution = probabilities
            .iter()
            .map(|(class, probability)| ClassScore {
                label: class.display_label(),
                probability,
            })
            .collect();

        let summary = format!(
            "### Analysis Result\n\
             - **Primary Decision**: {}\n\
             - **System Status**: {} {}\n\
             - **Certainty Margin**: {:.2} (Confidence: {:.2}%)",
            primary.display_label(),
            status.icon(),
            status.as_str(),
            margin,
            confidence * 100.0
        );

        Self {
            primary,
            confidence,
            margin,
            is_borderline,
            status,
            distribution,
            summary,
        }
    }
}

/// Validate a raw probability sequence and build its report.
///
/// Fails with [`finsense_core::Error::InvalidInput`] when the sequence does
/// not hold exactly three finite values in `[0, 1]` summing to 1.
pub fn make_report(probabilities: &[f32]) -> Result<DecisionReport> {
    let probabilities = ProbabilityVector::new(probabilities)?;
    Ok(DecisionReport::from_probabilities(&probabilities))
}

#[cfg(test)]
mod tests {
    use super::*;
    use finsense_core::Error;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_high_confidence_positive() {
        let report = make_report(&[0.05, 0.10, 0.85]).unwrap();

        assert_eq!(report.primary, SentimentClass::Positive);
        assert!(approx(report.confidence, 0.85));
        assert!(approx(report.margin, 0.75));
        assert!(!report.is_borderline);
        assert_eq!(report.status, DecisionStatus::HighConfidence);
        assert_eq!(report.status.as_str(), "High Confidence");
    }

    #[test]
    fn test_both_rules_trigger() {
        let report = make_report(&[0.40, 0.35, 0.25]).unwrap();

        assert_eq!(report.primary, SentimentClass::Negative);
        assert!(approx(report.confidence, 0.40));
        assert!(approx(report.margin, 0.05));
        assert!(report.is_borderline);
        assert_eq!(report.status.as_str(), "Borderline – Review Needed");
    }

    #[test]
    fn test_tie_break_first_maximum() {
        let report = make_report(&[0.34, 0.33, 0.33]).unwrap();
        assert_eq!(report.primary, SentimentClass::Negative);
        assert!(approx(report.margin, 0.01));
        assert!(report.is_borderline);

        let report = make_report(&[0.2, 0.4, 0.4]).unwrap();
        assert_eq!(report.primary, SentimentClass::Neutral);
        assert_eq!(report.margin, 0.0);
    }

    #[test]
    fn test_margin_rule_alone() {
        // Confident top class, but the runner-up is close
        let report = make_report(&[0.0, 0.39, 0.61]).unwrap();
        assert!(report.confidence >= CONFIDENCE_THRESHOLD);
        assert!(report.margin < MARGIN_THRESHOLD);
        assert!(report.is_borderline);
    }

    #[test]
    fn test_confidence_rule_alone() {
        // Wide margin over a split remainder, but low top probability
        let report = make_report(&[0.55, 0.30, 0.15]).unwrap();
        assert!(report.margin >= MARGIN_THRESHOLD);
        assert!(report.is_borderline);
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        assert!(!is_borderline(MARGIN_THRESHOLD, CONFIDENCE_THRESHOLD));
        assert!(!is_borderline(MARGIN_THRESHOLD, 0.9));
        assert!(!is_borderline(0.5, CONFIDENCE_THRESHOLD));
        assert!(is_borderline(0.2299, 0.9));
        assert!(is_borderline(0.5, 0.5999));

        let report = make_report(&[0.6, 0.2, 0.2]).unwrap();
        assert_eq!(report.confidence, CONFIDENCE_THRESHOLD);
        assert!(!report.is_borderline);
    }

    #[test]
    fn test_distribution_in_class_order() {
        let report = make_report(&[0.1, 0.7, 0.2]).unwrap();
        let labels: Vec<_> = report.distribution.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["Negative 🔴", "Neutral 🟡", "Positive 🟢"]);
        assert_eq!(report.distribution[1].probability, 0.7);
    }

    #[test]
    fn test_summary_format() {
        let report = make_report(&[0.05, 0.10, 0.85]).unwrap();
        assert_eq!(
            report.summary,
            "### Analysis Result\n\
             - **Primary Decision**: Positive 🟢\n\
             - **System Status**: ✅ High Confidence\n\
             - **Certainty Margin**: 0.75 (Confidence: 85.00%)"
        );

        let report = make_report(&[0.40, 0.35, 0.25]).unwrap();
        assert!(report
            .summary
            .contains("- **System Status**: ⚠️ Borderline – Review Needed"));
        assert!(report.summary.contains("(Confidence: 40.00%)"));
    }

    #[test]
    fn test_invalid_length() {
        let err = make_report(&[0.5, 0.5]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(make_report(&[]).is_err());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            make_report(&[f32::NAN, 0.5, 0.5]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            make_report(&[0.7, 0.7, 0.7]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_status_serialization() {
        let report = make_report(&[0.05, 0.10, 0.85]).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "High Confidence");
        assert_eq!(json["primary"], "positive");
        assert_eq!(json["distribution"][2]["label"], "Positive 🟢");
    }
}
