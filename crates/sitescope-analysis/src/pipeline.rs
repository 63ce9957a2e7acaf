//! End-to-end enrichment: validate, density, co-location, classification.

use crate::classifier::classify;
use crate::colocation::find_groups;
use crate::density::compute_density;
use sitescope_core::models::{
    EnrichedSite, EnrichedTable, PipelineParams, RawTable, SiteTable, Thresholds,
};
use sitescope_core::validation::validate;
use sitescope_core::Result;
use sitescope_geo::SpatialIndex;
use std::time::Instant;

/// Message appended when validation leaves nothing to analyze
pub const NO_VALID_ROWS: &str = "No valid rows after validation";

/// Enriched table plus the ordered messages gathered on the way
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOutput {
    pub table: EnrichedTable,
    pub messages: Vec<String>,
}

impl PipelineOutput {
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// A configured pipeline run.
///
/// Parameters are checked once at construction, so a [`SitePipeline`] can only
/// exist with a usable radius, threshold and set of cut points.
#[derive(Debug, Clone)]
pub struct SitePipeline {
    params: PipelineParams,
    thresholds: Thresholds,
}

impl SitePipeline {
    pub fn new(params: PipelineParams) -> Result<Self> {
        let thresholds = params.validate()?;
        Ok(Self { params, thresholds })
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    /// Validate a raw table and enrich every surviving row
    pub fn run(&self, raw: &RawTable) -> Result<PipelineOutput> {
        let (clean, mut messages) = validate(raw);

        if clean.is_empty() {
            messages.push(NO_VALID_ROWS.to_string());
            return Ok(PipelineOutput {
                table: EnrichedTable::new(clean.extra_columns, Vec::new()),
                messages,
            });
        }

        let table = self.enrich(clean)?;
        messages.push(format!("Processed {} sites successfully", table.len()));

        Ok(PipelineOutput { table, messages })
    }

    /// Derive density, co-location group and area class for a clean table
    pub fn enrich(&self, clean: SiteTable) -> Result<EnrichedTable> {
        let started = Instant::now();
        let index = SpatialIndex::build(&clean.coordinates())?;

        let stage = Instant::now();
        let densities = compute_density(&index, self.params.radius_km);
        tracing::debug!(
            radius_km = self.params.radius_km,
            elapsed_ms = stage.elapsed().as_millis() as u64,
            "Density computed"
        );

        let stage = Instant::now();
        let groups = find_groups(&index, &clean.site_ids(), self.params.threshold_m)?;
        tracing::debug!(
            threshold_m = self.params.threshold_m,
            groups = groups.group_count(),
            elapsed_ms = stage.elapsed().as_millis() as u64,
            "Co-location groups assigned"
        );

        let stage = Instant::now();
        let classes =
            classify(self.params.mode, &densities, &clean.cluster_ids(), &self.thresholds)?;
        tracing::debug!(
            mode = %self.params.mode,
            elapsed_ms = stage.elapsed().as_millis() as u64,
            "Area classes assigned"
        );

        let group_count = groups.group_count();
        let records: Vec<EnrichedSite> = clean
            .sites
            .into_iter()
            .zip(densities)
            .zip(groups.group_ids.into_iter().zip(groups.group_sizes))
            .zip(classes)
            .map(|(((site, density), (group_id, group_size)), area_class)| EnrichedSite {
                site,
                density,
                group_id,
                group_size,
                area_class,
            })
            .collect();

        tracing::info!(
            sites = records.len(),
            groups = group_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Site table enriched"
        );

        Ok(EnrichedTable::new(clean.extra_columns, records))
    }
}

/// Run the whole pipeline with `params` over `raw`
pub fn process(raw: &RawTable, params: &PipelineParams) -> Result<PipelineOutput> {
    SitePipeline::new(*params)?.run(raw)
}
