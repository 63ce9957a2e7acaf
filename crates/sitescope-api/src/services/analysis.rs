use sitescope_analysis::{PipelineOutput, SitePipeline};
use sitescope_core::table_io::read_csv_bytes;
use sitescope_core::Result;

use crate::dto::AnalyzeQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// Service running the site pipeline over uploaded CSV files
pub struct AnalysisService;

impl AnalysisService {
    /// Parse, check and enrich an uploaded CSV.
    ///
    /// The pipeline runs on the blocking thread pool. Results with no valid
    /// rows are rejected so callers never receive an empty table.
    pub async fn analyze(
        state: &AppState,
        query: &AnalyzeQuery,
        filename: &str,
        data: Vec<u8>,
    ) -> std::result::Result<PipelineOutput, ApiError> {
        if !filename.to_ascii_lowercase().ends_with(".csv") {
            return Err(ApiError::bad_request("File must be a CSV file")
                .with_details(format!("Received '{}'", filename)));
        }

        let pipeline = SitePipeline::new(query.to_params(&state.defaults)?)?;

        let output = tokio::task::spawn_blocking(move || -> Result<Option<PipelineOutput>> {
            let raw = read_csv_bytes(&data)?;
            if raw.is_empty() {
                return Ok(None);
            }
            pipeline.run(&raw).map(Some)
        })
        .await??;

        let output = output.ok_or_else(|| ApiError::bad_request("CSV file is empty"))?;

        if output.is_empty() {
            return Err(ApiError::bad_request(
                "No valid rows after processing. Check CSV format and data quality.",
            )
            .with_details(output.messages.join("; ")));
        }

        tracing::info!(
            filename = %filename,
            rows = output.table.len(),
            "Analysis complete"
        );

        Ok(output)
    }
}
