//! Inference context: one loaded classifier plus the decision reporter

use crate::classifier::Classifier;
use crate::lexicon::LexiconClassifier;
use crate::model_config::{Backend, ModelConfig};
use crate::report::DecisionReport;
use finsense_core::{Error, Result};
use std::sync::Arc;
use std::time::Instant;

/// Outcome of analysing one input
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Name of the classifier that produced the probabilities
    pub model: String,

    pub report: DecisionReport,

    /// Inference plus reporting time in microseconds
    pub latency_us: u64,
}

/// Owns the classifier for the lifetime of the process.
///
/// Built once at startup and handed to whoever serves requests; cloning is
/// cheap and shares the same loaded model.
#[derive(Clone)]
pub struct SentimentEngine {
    classifier: Arc<dyn Classifier>,
}

impl SentimentEngine {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    /// Build the configured backend, failing if it cannot be loaded
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        let classifier: Arc<dyn Classifier> = match config.backend {
            Backend::Lexicon => Arc::new(LexiconClassifier::new()?),
            Backend::Bert => load_bert(config)?,
        };

        tracing::info!(
            model = classifier.name(),
            backend = ?config.backend,
            "Sentiment engine ready"
        );
        Ok(Self::new(classifier))
    }

    pub fn model_name(&self) -> &str {
        self.classifier.name()
    }

    /// Run inference on `text` and build its decision report
    pub async fn analyze(&self, text: &str) -> Result<Analysis> {
        let start = Instant::now();

        let probabilities = self.classifier.infer(text).await?;
        let report = DecisionReport::from_probabilities(&probabilities);

        Ok(Analysis {
            model: self.classifier.name().to_string(),
            report,
            latency_us: start.elapsed().as_micros() as u64,
        })
    }
}

#[cfg(feature = "ml-models")]
fn load_bert(config: &ModelConfig) -> Result<Arc<dyn Classifier>> {
    Ok(Arc::new(crate::bert::BertSentimentClassifier::load(config)?))
}

#[cfg(not(feature = "ml-models"))]
fn load_bert(_config: &ModelConfig) -> Result<Arc<dyn Classifier>> {
    Err(Error::config(
        "BERT backend requires the 'ml-models' feature",
    ))
}

impl std::fmt::Debug for SentimentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentEngine")
            .field("model", &self.classifier.name())
            .finish()
    }
}

/// Reject blank input before it reaches the model
pub fn validate_text(text: &str) -> Result<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_input("text must not be empty"));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_text() {
        assert_eq!(validate_text("  NVIDIA beats  \n").unwrap(), "NVIDIA beats");
        assert!(matches!(validate_text(" \t\n"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_bert_backend_fails_fast_without_weights() {
        let config = ModelConfig::from_local("/nonexistent/finsense/weights");
        assert!(SentimentEngine::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_lexicon_engine() {
        let engine = SentimentEngine::from_config(&ModelConfig::lexicon()).unwrap();
        assert_eq!(engine.model_name(), "finsense-lexicon");

        let analysis = engine
            .analyze("The company filed for bankruptcy after a catastrophic fraud investigation.")
            .await
            .unwrap();
        assert_eq!(analysis.model, "finsense-lexicon");
        assert_eq!(
            analysis.report.primary,
            finsense_core::SentimentClass::Negative
        );
    }
}
