//! Core types for FinSense

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of sentiment classes produced by the model head
pub const NUM_CLASSES: usize = 3;

/// Allowed absolute deviation of a probability vector's sum from 1.0
pub const SUM_TOLERANCE: f32 = 1e-3;

/// Sentiment category, in the order of the model's output head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentClass {
    Negative,
    Neutral,
    Positive,
}

impl SentimentClass {
    /// All classes in output-head order
    pub const ALL: [SentimentClass; NUM_CLASSES] = [Self::Negative, Self::Neutral, Self::Positive];

    /// Class for a model output index
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    /// Position of this class in the model output
    pub fn index(self) -> usize {
        match self {
            Self::Negative => 0,
            Self::Neutral => 1,
            Self::Positive => 2,
        }
    }

    /// Lowercase machine name
    pub fn name(self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Positive => "positive",
        }
    }

    /// Label shown in the UI distribution and report
    pub fn display_label(self) -> &'static str {
        match self {
            Self::Negative => "Negative 🔴",
            Self::Neutral => "Neutral 🟡",
            Self::Positive => "Positive 🟢",
        }
    }
}

impl fmt::Display for SentimentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_label())
    }
}

/// Probabilities over [`SentimentClass::ALL`], one per class.
///
/// A value of this type has been checked to hold exactly [`NUM_CLASSES`]
/// finite entries in `[0, 1]` whose sum is within [`SUM_TOLERANCE`] of 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProbabilityVector([f32; NUM_CLASSES]);

impl ProbabilityVector {
    /// Validate a raw model output
    pub fn new(probabilities: &[f32]) -> Result<Self> {
        if probabilities.len() != NUM_CLASSES {
            return Err(Error::invalid_input(format!(
                "expected {} probabilities, got {}",
                NUM_CLASSES,
                probabilities.len()
            )));
        }

        let mut values = [0.0f32; NUM_CLASSES];
        for (idx, &p) in probabilities.iter().enumerate() {
            if !p.is_finite() {
                return Err(Error::invalid_input(format!(
                    "probability at index {} is not finite ({})",
                    idx, p
                )));
            }
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::invalid_input(format!(
                    "probability at index {} is outside [0, 1] ({})",
                    idx, p
                )));
            }
            values[idx] = p;
        }

        let sum: f32 = values.iter().sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(Error::invalid_input(format!(
                "probabilities sum to {}, expected 1.0",
                sum
            )));
        }

        Ok(Self(values))
    }

    /// Probability assigned to a class
    pub fn get(&self, class: SentimentClass) -> f32 {
        self.0[class.index()]
    }

    /// Raw values in class order
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Iterate `(class, probability)` pairs in class order
    pub fn iter(&self) -> impl Iterator<Item = (SentimentClass, f32)> + '_ {
        SentimentClass::ALL.iter().map(move |&c| (c, self.get(c)))
    }
}

impl TryFrom<&[f32]> for ProbabilityVector {
    type Error = Error;

    fn try_from(value: &[f32]) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<Vec<f32>> for ProbabilityVector {
    type Error = Error;

    fn try_from(value: Vec<f32>) -> Result<Self> {
        Self::new(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_order_matches_head() {
        for (idx, class) in SentimentClass::ALL.iter().enumerate() {
            assert_eq!(class.index(), idx);
            assert_eq!(SentimentClass::from_index(idx), Some(*class));
        }
        assert_eq!(SentimentClass::from_index(3), None);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(SentimentClass::Negative.to_string(), "Negative 🔴");
        assert_eq!(SentimentClass::Neutral.display_label(), "Neutral 🟡");
        assert_eq!(SentimentClass::Positive.name(), "positive");
    }

    #[test]
    fn test_valid_vector() {
        let probs = ProbabilityVector::new(&[0.05, 0.10, 0.85]).unwrap();
        assert_eq!(probs.get(SentimentClass::Positive), 0.85);
        assert_eq!(probs.as_slice().len(), NUM_CLASSES);

        let pairs: Vec<_> = probs.iter().collect();
        assert_eq!(pairs[0], (SentimentClass::Negative, 0.05));
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = ProbabilityVector::new(&[0.5, 0.5]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = ProbabilityVector::try_from(vec![0.25; 4]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_nan_and_out_of_range() {
        assert!(matches!(
            ProbabilityVector::new(&[f32::NAN, 0.5, 0.5]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            ProbabilityVector::new(&[f32::INFINITY, 0.0, 0.0]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            ProbabilityVector::new(&[-0.1, 0.6, 0.5]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            ProbabilityVector::new(&[1.2, 0.0, 0.0]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_bad_sum() {
        let err = ProbabilityVector::new(&[0.2, 0.2, 0.2]).unwrap_err();
        assert!(err.to_string().contains("sum"));
    }

    #[test]
    fn test_serializes_as_array() {
        let probs = ProbabilityVector::new(&[0.25, 0.25, 0.5]).unwrap();
        assert_eq!(serde_json::to_string(&probs).unwrap(), "[0.25,0.25,0.5]");
    }
}
