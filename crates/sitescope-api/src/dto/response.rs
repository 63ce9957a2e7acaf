use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use sitescope_analysis::PipelineOutput;
use sitescope_core::models::{AreaSummary, EnrichedSite, EnrichedTable};

/// Where clients re-submit the same upload for the full CSV
pub const DOWNLOAD_URL: &str = "/api/v1/download";

/// Analysis response: class counts, a preview and pipeline messages
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub summary: AreaSummary,
    pub preview: Vec<Map<String, JsonValue>>,
    pub total_rows: usize,
    pub messages: Vec<String>,
    pub download_url: String,
}

impl AnalysisResponse {
    /// Build a response showing at most `preview_rows` enriched rows
    pub fn from_output(output: PipelineOutput, preview_rows: usize) -> Self {
        let table = &output.table;
        Self {
            summary: table.summary(),
            preview: table.iter().take(preview_rows).map(|record| preview_row(table, record)).collect(),
            total_rows: table.len(),
            messages: output.messages,
            download_url: DOWNLOAD_URL.to_string(),
        }
    }
}

/// One enriched row as a JSON object keyed by column name, in column order
fn preview_row(table: &EnrichedTable, record: &EnrichedSite) -> Map<String, JsonValue> {
    let site = &record.site;
    let mut row = Map::new();

    row.insert("site_id".to_string(), JsonValue::from(site.site_id.clone()));
    row.insert("lat".to_string(), JsonValue::from(site.lat));
    row.insert("lon".to_string(), JsonValue::from(site.lon));
    row.insert("cluster_id".to_string(), JsonValue::from(site.cluster_id.clone()));

    for (i, column) in table.extra_columns.iter().enumerate() {
        let value = site.extra.get(i).cloned().unwrap_or_default();
        row.insert(column.clone(), JsonValue::from(value));
    }

    row.insert("density".to_string(), JsonValue::from(record.density));
    row.insert("group_id".to_string(), JsonValue::from(record.group_id.clone()));
    row.insert("group_size".to_string(), JsonValue::from(record.group_size));
    row.insert("area_class".to_string(), JsonValue::from(record.area_class.as_str()));

    row
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok", service: "sitescope-api" }
    }
}
