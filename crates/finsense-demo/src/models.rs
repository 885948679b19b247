//! Request and response bodies of the HTTP API

use chrono::{DateTime, Utc};
use finsense_classifiers::{
    Analysis, ClassScore, DecisionStatus, CONFIDENCE_THRESHOLD, MARGIN_THRESHOLD,
};
use finsense_core::SentimentClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

/// Distribution and decision report for one input
#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub id: String,
    pub model: String,
    pub analyzed_at: DateTime<Utc>,
    pub latency_us: u64,
    pub primary: SentimentClass,
    pub primary_label: &'static str,
    pub confidence: f32,
    pub margin: f32,
    pub is_borderline: bool,
    pub status: DecisionStatus,
    pub distribution: Vec<ClassScore>,
    /// Markdown decision report
    pub report: String,
}

impl PredictResponse {
    pub fn new(id: Uuid, analysis: Analysis) -> Self {
        let report = analysis.report;
        Self {
            id: id.to_string(),
            model: analysis.model,
            analyzed_at: Utc::now(),
            latency_us: analysis.latency_us,
            primary: report.primary,
            primary_label: report.primary.display_label(),
            confidence: report.confidence,
            margin: report.margin,
            is_borderline: report.is_borderline,
            status: report.status,
            distribution: report.distribution,
            report: report.summary,
        }
    }
}

/// Page content and decision policy, for the UI
#[derive(Debug, Clone, Serialize)]
pub struct InfoResponse {
    pub title: String,
    pub description: String,
    pub input_label: String,
    pub placeholder: String,
    pub examples: Vec<String>,
    pub model: String,
    pub labels: Vec<&'static str>,
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Thresholds {
    pub margin: f32,
    pub confidence: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            margin: MARGIN_THRESHOLD,
            confidence: CONFIDENCE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
