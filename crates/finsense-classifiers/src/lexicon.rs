//! Keyword sentiment classifier
//!
//! Deterministic stand-in for the BERT model, used when the service runs
//! without weights. Counts financial polarity terms and turns the counts into
//! probabilities with a softmax that includes a fixed neutral prior, so text
//! without any hits leans neutral.

use crate::classifier::Classifier;
use aho_corasick::{AhoCorasick, MatchKind};
use finsense_core::{Error, ProbabilityVector, Result};

/// Logit given to the neutral class regardless of the text
const NEUTRAL_PRIOR: f32 = 0.5;

// Terms only count as whole words, so inflected forms are listed explicitly.
const POSITIVE_TERMS: &[&str] = &[
    "record",
    "growth",
    "grew",
    "increase",
    "increased",
    "profit",
    "profits",
    "profitable",
    "beat",
    "beats",
    "surge",
    "surged",
    "rally",
    "rallied",
    "gain",
    "gains",
    "gained",
    "strong",
    "stronger",
    "upgrade",
    "upgraded",
    "outperform",
    "outperformed",
    "dividend",
    "expansion",
    "bullish",
    "soar",
    "soared",
];

const NEGATIVE_TERMS: &[&str] = &[
    "bankruptcy",
    "fraud",
    "loss",
    "losses",
    "decline",
    "declined",
    "warn",
    "warned",
    "warning",
    "disruption",
    "disruptions",
    "downgrade",
    "downgraded",
    "lawsuit",
    "layoff",
    "layoffs",
    "default",
    "plunge",
    "plunged",
    "slid",
    "slump",
    "slumped",
    "miss",
    "missed",
    "catastrophic",
    "bearish",
    "investigation",
];

pub struct LexiconClassifier {
    positive: AhoCorasick,
    negative: AhoCorasick,
}

impl LexiconClassifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            positive: build_matcher(POSITIVE_TERMS, "positive")?,
            negative: build_matcher(NEGATIVE_TERMS, "negative")?,
        })
    }

    /// Raw `(negative, positive)` whole-word hit counts
    pub fn hits(&self, text: &str) -> (usize, usize) {
        (
            count_words(&self.negative, text),
            count_words(&self.positive, text),
        )
    }
}

fn build_matcher(terms: &[&str], kind: &str) -> Result<AhoCorasick> {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::LeftmostLongest)
        .build(terms)
        .map_err(|e| Error::internal(format!("Failed to build {} term matcher: {e}", kind)))
}

/// Count matches not embedded in a longer word ("gain" in "against")
fn count_words(matcher: &AhoCorasick, text: &str) -> usize {
    matcher
        .find_iter(text)
        .filter(|m| {
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        })
        .count()
}

fn softmax(logits: [f32; 3]) -> [f32; 3] {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps = logits.map(|l| (l - max).exp());
    let sum: f32 = exps.iter().sum();
    exps.map(|e| e / sum)
}

#[async_trait::async_trait]
impl Classifier for LexiconClassifier {
    async fn infer(&self, text: &str) -> Result<ProbabilityVector> {
        let (negative, positive) = self.hits(text);
        let probs = softmax([negative as f32, NEUTRAL_PRIOR, positive as f32]);
        ProbabilityVector::new(&probs)
    }

    fn name(&self) -> &str {
        "finsense-lexicon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finsense_core::SentimentClass;

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax([3.0, 1.0, 0.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[0] > probs[1] && probs[1] > probs[2]);
    }

    #[test]
    fn test_hits_are_case_insensitive() {
        let classifier = LexiconClassifier::new().unwrap();
        assert_eq!(classifier.hits("FRAUD and Bankruptcy"), (2, 0));
        assert_eq!(classifier.hits("Record growth"), (0, 2));
    }

    #[test]
    fn test_terms_inside_longer_words_are_ignored() {
        let classifier = LexiconClassifier::new().unwrap();
        let text = "Shares slid against the dollar again after the commission hearing.";
        assert_eq!(classifier.hits(text), (1, 0));

        assert_eq!(classifier.hits("regained misstep defaulted"), (0, 0));
        assert_eq!(classifier.hits("record-breaking (profit), loss."), (1, 2));
    }

    #[tokio::test]
    async fn test_substring_matches_do_not_flip_polarity() {
        let engine = crate::SentimentEngine::new(std::sync::Arc::new(
            LexiconClassifier::new().unwrap(),
        ));
        let analysis = engine
            .analyze("Shares slid against the dollar again after the commission hearing.")
            .await
            .unwrap();
        assert_eq!(analysis.report.primary, SentimentClass::Negative);
    }

    #[tokio::test]
    async fn test_no_hits_is_neutral() {
        let classifier = LexiconClassifier::new().unwrap();
        let probs = classifier
            .infer("The new entity will be headquartered in Singapore.")
            .await
            .unwrap();
        let (top, _) = probs
            .iter()
            .fold((SentimentClass::Negative, -1.0), |best, (c, p)| {
                if p > best.1 {
                    (c, p)
                } else {
                    best
                }
            });
        assert_eq!(top, SentimentClass::Neutral);
        assert_eq!(classifier.name(), "finsense-lexicon");
    }
}
