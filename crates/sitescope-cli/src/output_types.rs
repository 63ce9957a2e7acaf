use serde::Serialize;
use sitescope_core::models::{AreaSummary, EnrichedSite, PipelineParams};
use tabled::Tabled;

/// Output for analyze command
#[derive(Debug, Serialize)]
pub struct AnalyzeOutput {
    pub input: String,
    pub output: Option<String>,
    pub params: PipelineParams,
    pub summary: AreaSummary,
    pub total_rows: usize,
    pub messages: Vec<String>,
    pub preview: Vec<PreviewRow>,
}

/// One enriched site in the preview
#[derive(Debug, Serialize, Tabled)]
pub struct PreviewRow {
    #[tabled(rename = "Site")]
    pub site_id: String,
    #[tabled(rename = "Cluster")]
    pub cluster_id: String,
    #[tabled(rename = "Density (/km²)", display_with = "display_density")]
    pub density: f64,
    #[tabled(rename = "Group")]
    pub group_id: String,
    #[tabled(rename = "Group Size")]
    pub group_size: usize,
    #[tabled(rename = "Area Class")]
    pub area_class: String,
}

impl From<&EnrichedSite> for PreviewRow {
    fn from(record: &EnrichedSite) -> Self {
        Self {
            site_id: record.site.site_id.clone(),
            cluster_id: record.site.cluster_id.clone(),
            density: record.density,
            group_id: record.group_id.clone(),
            group_size: record.group_size,
            area_class: record.area_class.to_string(),
        }
    }
}

fn display_density(density: &f64) -> String {
    format!("{:.4}", density)
}

/// Site count for one area class
#[derive(Debug, Serialize, Tabled)]
pub struct ClassCountRow {
    #[tabled(rename = "Area Class")]
    pub area_class: String,
    #[tabled(rename = "Sites")]
    pub count: usize,
    #[tabled(rename = "Share")]
    pub share: String,
}

impl ClassCountRow {
    /// One row per class in ascending density order
    pub fn from_summary(summary: &AreaSummary) -> Vec<Self> {
        let total = summary.total();
        sitescope_core::models::AreaClass::ALL
            .into_iter()
            .map(|class| {
                let count = summary.count(class);
                let share = if total == 0 { 0.0 } else { 100.0 * count as f64 / total as f64 };
                Self { area_class: class.to_string(), count, share: format!("{:.1}%", share) }
            })
            .collect()
    }
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub config_file: Option<String>,
    pub values: Vec<ConfigRow>,
}

/// One resolved configuration value
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}
