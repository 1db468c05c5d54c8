//! Model persistence round trips.

use frameboost::data::io::load_csv;
use frameboost::model::gbm::{GbmConfig, PersistError, RegularizationParams};
use frameboost::training::Objective;
use frameboost::{GbmModel, TaskKind};
use ndarray::Array1;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/airlines_test.csv");

fn airline_model() -> (frameboost::Dataset, GbmModel) {
    let frame = load_csv(FIXTURE).unwrap();
    let x: Vec<usize> = (0..9).collect();
    let train = frame.select_xy(&x, 9).unwrap();
    let config = GbmConfig::builder().n_trees(10).build().unwrap();
    let model = GbmModel::train(&train, config).unwrap();
    (train, model)
}

#[test]
fn json_round_trip_preserves_predictions() {
    let (train, model) = airline_model();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("airlines.json");
    model.save_json(&path).unwrap();

    let loaded = GbmModel::load_json(&path).unwrap();
    assert_eq!(loaded.forest().n_trees(), model.forest().n_trees());
    assert_eq!(loaded.meta().n_features, 9);
    assert_eq!(loaded.meta().task, TaskKind::Regression);
    assert_eq!(
        loaded.meta().feature_names,
        model.meta().feature_names
    );

    let features = train.features();
    for sample in [0usize, 17, 63, 119] {
        let row: Vec<f32> = (0..train.n_features())
            .map(|f| features.get(sample, f))
            .collect();
        assert_eq!(loaded.predict_row(&row), model.predict_row(&row));
    }
}

#[test]
fn classification_objective_survives_round_trip() {
    let x = Array1::from_iter((0..60).map(|i| i as f32));
    let y = x.mapv(|v| if v >= 30.0 { 1.0 } else { 0.0 });
    let frame = frameboost::DatasetBuilder::new()
        .add_feature("x", x.view())
        .targets_1d(y.view())
        .build()
        .unwrap();
    let config = GbmConfig::builder()
        .objective(Objective::logistic())
        .n_trees(10)
        .regularization(RegularizationParams {
            min_child_weight: 1.0,
            ..Default::default()
        })
        .build()
        .unwrap();
    let model = GbmModel::train(&frame, config).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clf.json");
    model.save_json(&path).unwrap();
    let loaded = GbmModel::load_json(&path).unwrap();

    assert_eq!(loaded.meta().task, TaskKind::BinaryClassification);
    // Transform restored: outputs are probabilities, not margins.
    let p = loaded.predict_row(&[55.0])[0];
    assert!((0.0..=1.0).contains(&p));
    assert_eq!(loaded.predict_row(&[55.0]), model.predict_row(&[55.0]));
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = GbmModel::load_json(dir.path().join("nope.json"));
    assert!(matches!(result, Err(PersistError::Io(_))));
}

#[test]
fn load_garbage_is_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.json");
    std::fs::write(&path, b"{ not json").unwrap();
    assert!(matches!(
        GbmModel::load_json(&path),
        Err(PersistError::Json(_))
    ));
}
