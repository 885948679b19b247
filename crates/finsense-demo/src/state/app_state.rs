use crate::config::UiConfig;
use finsense_classifiers::SentimentEngine;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Loaded model and decision reporter
    pub engine: SentimentEngine,

    /// Page content served to the UI
    pub ui: Arc<UiConfig>,

    /// Prometheus renderer, absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(engine: SentimentEngine, ui: UiConfig) -> Self {
        Self {
            engine,
            ui: Arc::new(ui),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
