//! Classifier trait

use async_trait::async_trait;
use finsense_core::{ProbabilityVector, Result};

/// Trait for all sentiment backends.
///
/// Implementations turn raw text into a validated probability vector over
/// [`finsense_core::SentimentClass::ALL`]. They hold no per-request state and
/// are shared across concurrent requests.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Score the given text
    async fn infer(&self, text: &str) -> Result<ProbabilityVector>;

    /// Get the classifier name
    fn name(&self) -> &str;
}
