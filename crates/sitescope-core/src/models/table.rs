//! In-memory tables flowing through the pipeline.
//!
//! Row position is the join key between stages: the n-th site of a
//! [`SiteTable`] becomes the n-th record of the [`EnrichedTable`].

use serde::{Deserialize, Serialize};

use super::classification::AreaSummary;
use super::site::{EnrichedSite, Site};

/// Output columns that precede the pass-through columns
pub const SITE_COLUMNS: [&str; 4] = ["site_id", "lat", "lon", "cluster_id"];

/// Output columns appended by the pipeline
pub const DERIVED_COLUMNS: [&str; 4] = ["density", "group_id", "group_size", "area_class"];

/// Untyped table of string cells, as decoded from an upload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    /// Build a table from string slices; handy for fixtures
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows.iter().map(|row| row.iter().map(|c| c.to_string()).collect()).collect(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column whose trimmed header equals `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Trimmed cell value, `None` when absent or blank
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

/// Validated sites plus the names of their pass-through columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteTable {
    pub extra_columns: Vec<String>,
    pub sites: Vec<Site>,
}

impl SiteTable {
    pub fn new(extra_columns: Vec<String>, sites: Vec<Site>) -> Self {
        Self { extra_columns, sites }
    }

    /// Table without pass-through columns
    pub fn from_sites(sites: Vec<Site>) -> Self {
        Self::new(Vec::new(), sites)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Site> {
        self.sites.iter()
    }

    /// `[lat, lon]` pairs in degrees, aligned with row order
    pub fn coordinates(&self) -> Vec<[f64; 2]> {
        self.sites.iter().map(Site::coordinates).collect()
    }

    pub fn site_ids(&self) -> Vec<&str> {
        self.sites.iter().map(|s| s.site_id.as_str()).collect()
    }

    pub fn cluster_ids(&self) -> Vec<&str> {
        self.sites.iter().map(|s| s.cluster_id.as_str()).collect()
    }
}

/// Pipeline output: every validated site with its derived signals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTable {
    pub extra_columns: Vec<String>,
    pub records: Vec<EnrichedSite>,
}

impl EnrichedTable {
    pub fn new(extra_columns: Vec<String>, records: Vec<EnrichedSite>) -> Self {
        Self { extra_columns, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnrichedSite> {
        self.records.iter()
    }

    /// Column names in output order
    pub fn headers(&self) -> Vec<String> {
        SITE_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.extra_columns.iter().cloned())
            .chain(DERIVED_COLUMNS.iter().map(|c| c.to_string()))
            .collect()
    }

    /// Render one record as strings in [`EnrichedTable::headers`] order
    pub fn render_row(&self, index: usize) -> Option<Vec<String>> {
        let record = self.records.get(index)?;
        let site = &record.site;

        let mut row = Vec::with_capacity(SITE_COLUMNS.len() + self.extra_columns.len() + 4);
        row.push(site.site_id.clone());
        row.push(site.lat.to_string());
        row.push(site.lon.to_string());
        row.push(site.cluster_id.clone());
        for i in 0..self.extra_columns.len() {
            row.push(site.extra.get(i).cloned().unwrap_or_default());
        }
        row.push(record.density.to_string());
        row.push(record.group_id.clone());
        row.push(record.group_size.to_string());
        row.push(record.area_class.to_string());

        Some(row)
    }

    /// All records rendered as string rows
    pub fn rows(&self) -> Vec<Vec<String>> {
        (0..self.records.len()).filter_map(|i| self.render_row(i)).collect()
    }

    pub fn summary(&self) -> AreaSummary {
        AreaSummary::from_classes(self.records.iter().map(|r| r.area_class))
    }
}
