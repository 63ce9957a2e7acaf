//! End-to-end behavior of the enrichment pipeline

use proptest::prelude::*;
use sitescope_analysis::{classify_quantile, classify_threshold, process};
use sitescope_core::models::{
    AreaClass, ClassificationMode, PipelineParams, RawTable, ThresholdOverrides, Thresholds,
};
use sitescope_core::table_io::to_csv_bytes;
use sitescope_geo::haversine_km;
use std::collections::{HashMap, HashSet, VecDeque};
use std::f64::consts::PI;

fn table(sites: &[(&str, f64, f64, &str)]) -> RawTable {
    let mut raw = RawTable::new(
        ["site_id", "lat", "lon", "cluster_id"].iter().map(|c| c.to_string()).collect(),
    );
    for (id, lat, lon, cluster) in sites {
        raw.push_row(vec![id.to_string(), lat.to_string(), lon.to_string(), cluster.to_string()]);
    }
    raw
}

fn owned_table(sites: &[(String, f64, f64)]) -> RawTable {
    let borrowed: Vec<(&str, f64, f64, &str)> =
        sites.iter().map(|(id, lat, lon)| (id.as_str(), *lat, *lon, "c")).collect();
    table(&borrowed)
}

#[test]
fn test_scenario_density_of_close_triangle() {
    let raw = table(&[
        ("A", 40.0, -74.0, "c"),
        ("B", 40.009, -74.0, "c"),
        ("C", 40.0045, -73.9898, "c"),
    ]);

    let output = process(&raw, &PipelineParams::new().with_radius_km(2.0)).unwrap();

    let expected = 2.0 / (4.0 * PI);
    for record in output.table.iter() {
        assert!((record.density - expected).abs() < 1e-12, "density {}", record.density);
    }
    assert!((expected - 0.1592).abs() < 1e-4);
    assert_eq!(output.messages, vec!["Processed 3 sites successfully"]);
}

#[test]
fn test_scenario_chain_forms_one_group() {
    // ~50 m apart along a meridian
    let raw = table(&[
        ("S1", 40.0, -74.0, "c"),
        ("S2", 40.00045, -74.0, "c"),
        ("S3", 40.0009, -74.0, "c"),
    ]);

    let output = process(&raw, &PipelineParams::new().with_threshold_m(100.0)).unwrap();

    let ids: HashSet<&str> = output.table.iter().map(|r| r.group_id.as_str()).collect();
    assert_eq!(ids.len(), 1);
    assert!(output.table.iter().all(|r| r.group_size == 3));
}

#[test]
fn test_scenario_distant_sites_stay_apart() {
    let raw = table(&[("A", 40.0, -74.0, "c"), ("B", 41.0, -75.0, "c")]);

    let output = process(&raw, &PipelineParams::new().with_threshold_m(100.0)).unwrap();

    let records = &output.table.records;
    assert_ne!(records[0].group_id, records[1].group_id);
    assert_eq!(records[0].group_size, 1);
    assert_eq!(records[1].group_size, 1);
}

#[test]
fn test_scenario_quantile_two_per_class() {
    let densities: Vec<f64> = (1..=8).map(f64::from).collect();
    let classes = classify_quantile(&densities, &["c"; 8]);

    for class in AreaClass::ALL {
        assert_eq!(classes.iter().filter(|&&c| c == class).count(), 2, "{}", class);
    }
}

#[test]
fn test_scenario_default_thresholds() {
    let classes = classify_threshold(&[5.0, 25.0, 100.0, 300.0], &Thresholds::default());
    assert_eq!(
        classes,
        vec![AreaClass::Rural, AreaClass::Suburban, AreaClass::Urban, AreaClass::Dense]
    );
}

#[test]
fn test_threshold_mode_through_pipeline() {
    // Two co-located pairs far apart: each site has one neighbor within 1 km
    let raw = table(&[
        ("A", 10.0, 10.0, "x"),
        ("B", 10.0, 10.0, "x"),
        ("C", 20.0, 20.0, "y"),
        ("D", 30.0, 30.0, "y"),
    ]);
    let params = PipelineParams::new()
        .with_radius_km(1.0)
        .with_mode(ClassificationMode::Threshold)
        .with_thresholds(ThresholdOverrides { rural: Some(0.0), ..Default::default() });

    let output = process(&raw, &params).unwrap();
    let classes: Vec<AreaClass> = output.table.iter().map(|r| r.area_class).collect();

    // 1/π ≈ 0.318 per km² lands between the overridden rural cut and the default suburban one
    assert_eq!(
        classes,
        vec![AreaClass::Suburban, AreaClass::Suburban, AreaClass::Rural, AreaClass::Rural]
    );
}

#[test]
fn test_single_threshold_override_above_next_default() {
    let raw = table(&[
        ("A", 10.0, 10.0, "x"),
        ("B", 10.0, 10.0, "x"),
        ("C", 20.0, 20.0, "y"),
    ]);
    let params = PipelineParams::new()
        .with_radius_km(1.0)
        .with_mode(ClassificationMode::Threshold)
        .with_thresholds(ThresholdOverrides { rural: Some(100.0), ..Default::default() });

    let output = process(&raw, &params).unwrap();

    assert_eq!(output.table.len(), 3);
    assert!(output.table.iter().all(|r| r.area_class == AreaClass::Rural));
}

#[test]
fn test_unordered_thresholds_let_densest_band_win() {
    let densities = [40.0, 75.0, 150.0, 250.0];
    let thresholds = Thresholds::new(100.0, 50.0, 200.0);

    assert_eq!(
        classify_threshold(&densities, &thresholds),
        vec![AreaClass::Rural, AreaClass::Urban, AreaClass::Urban, AreaClass::Dense]
    );
}

#[test]
fn test_repeated_site_ids_in_separate_components_share_group_id() {
    // Group ids hash member ids, so repeated ids are not told apart
    let raw = table(&[("X", 10.0, 10.0, "c"), ("X", 50.0, 50.0, "c")]);

    let output = process(&raw, &PipelineParams::new()).unwrap();
    let records = &output.table.records;

    assert_eq!(records[0].group_id, records[1].group_id);
    assert_eq!(records[0].group_size, 1);
    assert_eq!(records[1].group_size, 1);
}

#[test]
fn test_duplicate_coordinates_share_group_and_count_as_neighbors() {
    let raw = table(&[("A", 52.52, 13.405, "c"), ("B", 52.52, 13.405, "c")]);

    let output = process(&raw, &PipelineParams::new().with_radius_km(1.0)).unwrap();
    let records = &output.table.records;

    assert_eq!(records[0].group_id, records[1].group_id);
    assert_eq!(records[0].group_size, 2);
    assert_eq!(records[0].density, 1.0 / PI);
}

#[test]
fn test_zero_threshold_disables_grouping() {
    let raw = table(&[("A", 52.52, 13.405, "c"), ("B", 52.52, 13.405, "c")]);

    let output = process(&raw, &PipelineParams::new().with_threshold_m(0.0)).unwrap();

    assert!(output.table.iter().all(|r| r.group_size == 1));
    assert_ne!(output.table.records[0].group_id, output.table.records[1].group_id);
}

#[test]
fn test_extra_columns_pass_through() {
    let raw = RawTable::from_rows(
        &["site_id", "operator", "lat", "lon", "cluster_id"],
        &[&["A", "acme", "40.0", "-74.0", "c"], &["B", "", "40.001", "-74.0", "c"]],
    );

    let output = process(&raw, &PipelineParams::default()).unwrap();

    assert_eq!(output.table.extra_columns, vec!["operator"]);
    assert_eq!(output.table.records[0].site.extra, vec!["acme"]);
    assert_eq!(
        output.table.headers(),
        vec![
            "site_id", "lat", "lon", "cluster_id", "operator", "density", "group_id",
            "group_size", "area_class"
        ]
    );
}

#[test]
fn test_runs_are_byte_identical() {
    let raw = table(&[
        ("A", 40.0, -74.0, "n"),
        ("B", 40.001, -74.001, "n"),
        ("C", 40.02, -74.03, "n"),
        ("D", 40.5, -74.5, "s"),
        ("E", 40.5005, -74.5, "s"),
    ]);

    let first = process(&raw, &PipelineParams::default()).unwrap();
    let second = process(&raw, &PipelineParams::default()).unwrap();

    assert_eq!(to_csv_bytes(&first.table).unwrap(), to_csv_bytes(&second.table).unwrap());
}

fn sites_strategy() -> impl Strategy<Value = Vec<(String, f64, f64)>> {
    prop::collection::vec((40.0f64..40.01, -74.01f64..-74.0), 1..30).prop_map(|coords| {
        coords
            .into_iter()
            .enumerate()
            .map(|(i, (lat, lon))| (format!("S{}", i), lat, lon))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_group_ids_ignore_row_order(
        (sites, shuffled) in sites_strategy()
            .prop_flat_map(|sites| (Just(sites.clone()), Just(sites).prop_shuffle()))
    ) {
        let params = PipelineParams::new().with_threshold_m(200.0);
        let original = process(&owned_table(&sites), &params).unwrap();
        let permuted = process(&owned_table(&shuffled), &params).unwrap();

        let by_id = |output: &sitescope_analysis::PipelineOutput| -> HashMap<String, (String, usize)> {
            output
                .table
                .iter()
                .map(|r| (r.site.site_id.clone(), (r.group_id.clone(), r.group_size)))
                .collect()
        };

        prop_assert_eq!(by_id(&original), by_id(&permuted));
    }

    #[test]
    fn prop_groups_partition_the_table(sites in sites_strategy(), threshold_m in 0.0f64..500.0) {
        let output = process(&owned_table(&sites), &PipelineParams::new().with_threshold_m(threshold_m)).unwrap();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in output.table.iter() {
            *counts.entry(record.group_id.as_str()).or_default() += 1;
        }
        for record in output.table.iter() {
            prop_assert_eq!(record.group_size, counts[record.group_id.as_str()]);
            prop_assert!(record.density >= 0.0);
        }

        let total: f64 = output.table.iter().map(|r| 1.0 / r.group_size as f64).sum();
        prop_assert!((total - counts.len() as f64).abs() < 1e-9);
        prop_assert_eq!(output.table.len(), sites.len());
    }

    #[test]
    fn prop_group_members_are_linked_by_short_hops(
        sites in sites_strategy(),
        threshold_m in 1.0f64..400.0,
    ) {
        let output = process(&owned_table(&sites), &PipelineParams::new().with_threshold_m(threshold_m)).unwrap();
        let records = &output.table.records;
        let threshold_km = threshold_m / 1000.0;

        let close = |a: usize, b: usize| {
            haversine_km(records[a].site.lat, records[a].site.lon, records[b].site.lat, records[b].site.lon)
                <= threshold_km
        };

        for start in 0..records.len() {
            // Everything reachable by short hops, and nothing else, shares the group
            let mut seen = vec![false; records.len()];
            let mut queue = VecDeque::from([start]);
            seen[start] = true;
            while let Some(node) = queue.pop_front() {
                for next in 0..records.len() {
                    if !seen[next] && close(node, next) {
                        seen[next] = true;
                        queue.push_back(next);
                    }
                }
            }

            for other in 0..records.len() {
                prop_assert_eq!(
                    seen[other],
                    records[start].group_id == records[other].group_id,
                    "sites {} and {}", start, other
                );
            }
        }
    }
}
