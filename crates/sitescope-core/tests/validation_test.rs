//! Validation properties over CSV-decoded tables

use proptest::prelude::*;
use sitescope_core::table_io::read_csv_bytes;
use sitescope_core::validation::{coordinates_in_range, validate};

#[test]
fn test_csv_to_clean_table() {
    let csv = "\
site_id,lat,lon,cluster_id,notes
A,40.0,-74.0,north,rooftop
B,,-74.0,north,missing lat
C,40.1,abc,north,bad lon
D,95.0,-74.0,south,out of range
E,40.2,-74.1,south,
";

    let raw = read_csv_bytes(csv.as_bytes()).unwrap();
    let (clean, warnings) = validate(&raw);

    assert_eq!(clean.site_ids(), vec!["A", "E"]);
    assert_eq!(clean.cluster_ids(), vec!["north", "south"]);
    assert_eq!(clean.extra_columns, vec!["notes"]);
    assert_eq!(clean.sites[1].extra, vec![""]);
    assert_eq!(
        warnings,
        vec![
            "Dropped 1 rows with missing values in required columns",
            "Dropped 1 rows with non-numeric lon",
            "Dropped 1 rows with invalid coordinates",
            "Dropped 3 invalid rows (from 5 total)",
        ]
    );
}

proptest! {
    #[test]
    fn prop_surviving_rows_are_in_range_and_ordered(
        rows in prop::collection::vec((-120.0f64..120.0, -200.0f64..200.0), 0..40)
    ) {
        let mut csv = String::from("site_id,lat,lon,cluster_id\n");
        for (i, (lat, lon)) in rows.iter().enumerate() {
            csv.push_str(&format!("S{:03},{},{},c\n", i, lat, lon));
        }

        let raw = read_csv_bytes(csv.as_bytes()).unwrap();
        let (clean, _) = validate(&raw);

        let expected: Vec<String> = rows
            .iter()
            .enumerate()
            .filter(|(_, (lat, lon))| coordinates_in_range(*lat, *lon))
            .map(|(i, _)| format!("S{:03}", i))
            .collect();

        prop_assert_eq!(clean.site_ids(), expected.iter().map(String::as_str).collect::<Vec<_>>());
        for site in clean.iter() {
            prop_assert!(coordinates_in_range(site.lat, site.lon));
        }
    }
}
