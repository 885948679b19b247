//! FinSense Core
//!
//! Types and error handling shared across FinSense components.
//!
//! This crate provides:
//! - The fixed, ordered set of sentiment classes
//! - A validated probability vector over those classes
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ProbabilityVector, SentimentClass, NUM_CLASSES, SUM_TOLERANCE};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ProbabilityVector, SentimentClass};
}
