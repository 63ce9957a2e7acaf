use std::sync::Arc;

use axum::extract::{Multipart, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use sitescope_core::table_io::to_csv_bytes;

use super::upload::extract_file;
use crate::dto::AnalyzeQuery;
use crate::error::ApiError;
use crate::services::AnalysisService;
use crate::state::AppState;

/// Attachment name of the enriched CSV
pub const DOWNLOAD_FILENAME: &str = "analysis_results.csv";

/// POST /api/v1/download - Enrich an uploaded CSV and return it as an attachment
pub async fn handle_download(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyzeQuery>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (filename, data) = extract_file(&mut multipart).await?;

    tracing::info!(filename = %filename, size = data.len(), "Received file for download");

    let output = AnalysisService::analyze(&state, &query, &filename, data).await?;
    let csv = to_csv_bytes(&output.table)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", DOWNLOAD_FILENAME),
            ),
        ],
        csv,
    ))
}
