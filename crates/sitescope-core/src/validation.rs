//! Row-level validation of raw site tables.
//!
//! Schema problems empty the table, row problems drop the offending rows.
//! Either way the caller gets a clean table plus human-readable warnings;
//! validation never fails.

use crate::models::{RawTable, Site, SiteTable};

/// Columns every input table must provide
pub const REQUIRED_COLUMNS: [&str; 4] = ["site_id", "lat", "lon", "cluster_id"];

/// Column positions of the required fields in a raw table
#[derive(Debug, Clone, Copy)]
struct RequiredColumns {
    site_id: usize,
    lat: usize,
    lon: usize,
    cluster_id: usize,
}

impl RequiredColumns {
    /// Locate the required columns, or list the missing ones
    fn locate(raw: &RawTable) -> Result<Self, Vec<&'static str>> {
        let missing: Vec<&'static str> =
            REQUIRED_COLUMNS.into_iter().filter(|c| raw.column_index(c).is_none()).collect();

        match (
            raw.column_index("site_id"),
            raw.column_index("lat"),
            raw.column_index("lon"),
            raw.column_index("cluster_id"),
        ) {
            (Some(site_id), Some(lat), Some(lon), Some(cluster_id)) if missing.is_empty() => {
                Ok(Self { site_id, lat, lon, cluster_id })
            }
            _ => Err(missing),
        }
    }

    fn all(&self) -> [usize; 4] {
        [self.site_id, self.lat, self.lon, self.cluster_id]
    }
}

/// Validate a raw table and drop invalid rows.
///
/// Checks run in a fixed order (missing values, non-numeric `lat`,
/// non-numeric `lon`, coordinate range) and each check that drops rows adds
/// one warning. Surviving rows keep their relative order.
pub fn validate(raw: &RawTable) -> (SiteTable, Vec<String>) {
    let mut warnings = Vec::new();

    let columns = match RequiredColumns::locate(raw) {
        Ok(columns) => columns,
        Err(missing) => {
            warnings.push(format!("Missing required columns: {}", missing.join(", ")));
            log_warnings(&warnings);
            return (SiteTable::default(), warnings);
        }
    };

    let initial_count = raw.len();

    let complete: Vec<usize> = (0..raw.len())
        .filter(|&row| columns.all().iter().all(|&col| raw.cell(row, col).is_some()))
        .collect();
    push_drop_warning(
        &mut warnings,
        initial_count - complete.len(),
        "with missing values in required columns",
    );

    let with_lat: Vec<(usize, f64)> = complete
        .iter()
        .filter_map(|&row| parse_coordinate(raw.cell(row, columns.lat)).map(|lat| (row, lat)))
        .collect();
    push_drop_warning(&mut warnings, complete.len() - with_lat.len(), "with non-numeric lat");

    let with_coords: Vec<(usize, f64, f64)> = with_lat
        .iter()
        .filter_map(|&(row, lat)| {
            parse_coordinate(raw.cell(row, columns.lon)).map(|lon| (row, lat, lon))
        })
        .collect();
    push_drop_warning(&mut warnings, with_lat.len() - with_coords.len(), "with non-numeric lon");

    let in_range: Vec<(usize, f64, f64)> =
        with_coords.iter().copied().filter(|&(_, lat, lon)| coordinates_in_range(lat, lon)).collect();
    push_drop_warning(
        &mut warnings,
        with_coords.len() - in_range.len(),
        "with invalid coordinates",
    );

    let required = columns.all();
    let extra_indices: Vec<usize> =
        (0..raw.headers.len()).filter(|i| !required.contains(i)).collect();
    let extra_columns: Vec<String> =
        extra_indices.iter().map(|&i| raw.headers[i].trim().to_string()).collect();

    let sites: Vec<Site> = in_range
        .into_iter()
        .map(|(row, lat, lon)| {
            let extra = extra_indices
                .iter()
                .map(|&col| raw.cell(row, col).unwrap_or_default().to_string())
                .collect();
            Site::new(
                raw.cell(row, columns.site_id).unwrap_or_default(),
                lat,
                lon,
                raw.cell(row, columns.cluster_id).unwrap_or_default(),
            )
            .with_extra(extra)
        })
        .collect();

    let dropped = initial_count - sites.len();
    if dropped > 0 {
        warnings.push(format!("Dropped {} invalid rows (from {} total)", dropped, initial_count));
    }

    log_warnings(&warnings);
    tracing::debug!(input_rows = initial_count, valid_rows = sites.len(), "Validated site table");

    (SiteTable::new(extra_columns, sites), warnings)
}

/// Whether a coordinate pair lies within the WGS 84 degree ranges
pub fn coordinates_in_range(lat: f64, lon: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

/// Parse a numeric cell; NaN and infinities count as non-numeric
fn parse_coordinate(cell: Option<&str>) -> Option<f64> {
    cell.and_then(|value| value.parse::<f64>().ok()).filter(|value| value.is_finite())
}

fn push_drop_warning(warnings: &mut Vec<String>, count: usize, reason: &str) {
    if count > 0 {
        warnings.push(format!("Dropped {} rows {}", count, reason));
    }
}

fn log_warnings(warnings: &[String]) {
    for warning in warnings {
        tracing::warn!("{}", warning);
    }
}
