use crate::models::{
    HealthResponse, InfoResponse, PredictRequest, PredictResponse, Thresholds,
};
use crate::server::ApiError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use finsense_classifiers::validate_text;
use finsense_core::SentimentClass;
use uuid::Uuid;

// ============================================================================
// Health and page info
// ============================================================================

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        model: state.engine.model_name().to_string(),
    })
}

pub async fn info(State(state): State<AppState>) -> impl IntoResponse {
    let ui = &state.ui;
    Json(InfoResponse {
        title: ui.title.clone(),
        description: ui.description.clone(),
        input_label: ui.input_label.clone(),
        placeholder: ui.placeholder.clone(),
        examples: ui.examples.clone(),
        model: state.engine.model_name().to_string(),
        labels: SentimentClass::ALL
            .iter()
            .map(|c| c.display_label())
            .collect(),
        thresholds: Thresholds::default(),
    })
}

// ============================================================================
// Prediction
// ============================================================================

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        metrics::counter!("finsense_errors_total", "kind" => "bad_request").increment(1);
        ApiError::BadRequest(rejection.body_text())
    })?;

    let text = validate_text(&req.text).map_err(|_| {
        metrics::counter!("finsense_errors_total", "kind" => "bad_request").increment(1);
        ApiError::BadRequest("text must not be empty".to_string())
    })?;

    let id = Uuid::new_v4();
    let analysis = match state.engine.analyze(text).await {
        Ok(analysis) => analysis,
        Err(e) => {
            metrics::counter!("finsense_errors_total", "kind" => e.kind()).increment(1);
            return Err(e.into());
        }
    };

    let report = &analysis.report;
    metrics::counter!(
        "finsense_predictions_total",
        "status" => if report.is_borderline { "borderline" } else { "high_confidence" }
    )
    .increment(1);
    metrics::histogram!("finsense_inference_latency_us").record(analysis.latency_us as f64);

    tracing::info!(
        %id,
        primary = report.primary.name(),
        confidence = report.confidence,
        margin = report.margin,
        borderline = report.is_borderline,
        latency_us = analysis.latency_us,
        "Prediction"
    );

    Ok(Json(PredictResponse::new(id, analysis)))
}

// ============================================================================
// Metrics
// ============================================================================

pub async fn render_metrics(State(state): State<AppState>) -> String {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}
