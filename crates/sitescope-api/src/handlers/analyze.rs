use std::sync::Arc;

use axum::extract::{Multipart, Query, State};
use axum::Json;

use super::upload::extract_file;
use crate::dto::{AnalysisResponse, AnalyzeQuery};
use crate::error::ApiError;
use crate::services::AnalysisService;
use crate::state::AppState;

/// POST /api/v1/analyze - Enrich an uploaded CSV and return a summary
pub async fn handle_analyze(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyzeQuery>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, ApiError> {
    tracing::info!("Processing analyze request");

    let (filename, data) = extract_file(&mut multipart).await?;

    tracing::info!(filename = %filename, size = data.len(), "Received file for analysis");

    let output = AnalysisService::analyze(&state, &query, &filename, data).await?;

    Ok(Json(AnalysisResponse::from_output(output, state.preview_rows)))
}
