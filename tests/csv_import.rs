//! CSV import behavior on the committed airlines fixture.

use frameboost::data::io::load_csv;
use frameboost::FeatureType;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/airlines_test.csv");

#[test]
fn header_names_are_preserved() {
    let frame = load_csv(FIXTURE).unwrap();
    let schema = frame.schema();
    assert_eq!(schema.feature_name(0), Some("fYear"));
    assert_eq!(schema.feature_name(6), Some("UniqueCarrier"));
    assert_eq!(schema.feature_name(9), Some("Distance"));
    assert_eq!(schema.feature_index("Origin"), Some(7));
}

#[test]
fn column_types_are_inferred() {
    let frame = load_csv(FIXTURE).unwrap();
    let schema = frame.schema();

    // fYear..fDayOfWeek and carrier/airport columns are strings.
    for categorical in [0, 1, 2, 3, 6, 7, 8] {
        assert_eq!(
            schema.feature_type(categorical),
            FeatureType::Categorical,
            "column {categorical}"
        );
    }
    // DepTime, ArrTime and Distance parse as numbers.
    for numeric in [4, 5, 9] {
        assert_eq!(schema.feature_type(numeric), FeatureType::Numeric);
    }
}

#[test]
fn missing_cells_become_nan() {
    let frame = load_csv(FIXTURE).unwrap();
    let features = frame.features();

    let dep_missing = features.feature(4).iter().filter(|v| v.is_nan()).count();
    let arr_missing = features.feature(5).iter().filter(|v| v.is_nan()).count();
    assert!(dep_missing > 0, "fixture has NA departure times");
    assert!(arr_missing > 0, "fixture has empty arrival times");

    // The target column is fully populated.
    assert!(features.feature(9).iter().all(|v| v.is_finite()));
}

#[test]
fn categorical_levels_are_recorded() {
    let frame = load_csv(FIXTURE).unwrap();
    let carrier = frame.schema().feature(6);
    let levels = carrier.levels.as_ref().expect("carrier levels recorded");
    assert!(levels.iter().any(|l| l == "AA"));
    assert!(levels.len() <= 6);

    // Codes stay within the recorded level range.
    let n_levels = levels.len() as f32;
    assert!(frame
        .features()
        .feature(6)
        .iter()
        .all(|&v| v >= 0.0 && v < n_levels));
}

#[test]
fn fixture_shape() {
    let frame = load_csv(FIXTURE).unwrap();
    assert_eq!(frame.n_features(), 10);
    assert_eq!(frame.n_samples(), 120);
    assert!(frame.targets().is_none());
}
