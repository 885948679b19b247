//! FinSense Classifiers
//!
//! Sentiment inference for financial news text and the confidence-margin
//! decision report built on top of it.
//!
//! Backends:
//! - `bert`: a pretrained BERT sequence classifier run with Candle
//!   (requires the `ml-models` feature, on by default)
//! - `lexicon`: a keyword classifier that needs no weights
//!
//! All backends produce a [`finsense_core::ProbabilityVector`] which
//! [`report::make_report`] turns into a [`report::DecisionReport`].

#[cfg(feature = "ml-models")]
pub mod bert;
pub mod classifier;
pub mod engine;
pub mod lexicon;
pub mod model_config;
pub mod report;

#[cfg(feature = "ml-models")]
pub use bert::BertSentimentClassifier;
pub use classifier::Classifier;
pub use engine::{validate_text, Analysis, SentimentEngine};
pub use lexicon::LexiconClassifier;
pub use model_config::{Backend, DeviceSpec, ModelConfig, ModelSource};
pub use report::{
    is_borderline, make_report, ClassScore, DecisionReport, DecisionStatus,
    CONFIDENCE_THRESHOLD, MARGIN_THRESHOLD,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::Classifier;
    pub use crate::engine::SentimentEngine;
    pub use crate::lexicon::LexiconClassifier;
    pub use crate::model_config::ModelConfig;
    pub use crate::report::{make_report, DecisionReport, DecisionStatus};
}
