//! Frame container and builder.
//!
//! This module provides [`Dataset`] and [`DatasetBuilder`].

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use super::schema::{DatasetSchema, FeatureMeta};
use super::views::{FeaturesView, TargetsView, WeightsView};

/// Errors produced by dataset construction and column selection.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset has no feature columns")]
    EmptyFeatures,

    #[error("{field} sample count mismatch: expected {expected}, got {got}")]
    ShapeMismatch {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("column index {index} out of range for {n_features} columns")]
    ColumnOutOfRange { index: usize, n_features: usize },

    #[error("target column {index} is also selected as a feature")]
    TargetInFeatures { index: usize },

    #[error("feature column {index} selected more than once")]
    DuplicateColumn { index: usize },

    #[error("no feature columns selected")]
    EmptySelection,
}

/// The tabular in-memory frame all models train on.
///
/// # Storage Layout
///
/// Features are stored in **feature-major** layout: `[n_features, n_samples]`.
/// Each feature's values across all samples are contiguous in memory.
///
/// Targets are stored as `[n_outputs, n_samples]` for consistency.
///
/// # Construction
///
/// Use [`Dataset::new`] for construction from feature-major matrices,
/// [`Dataset::builder`] for column-by-column construction with mixed
/// feature types, or [`load_csv`](crate::data::io::load_csv) to import a
/// CSV file. An imported frame carries no targets; derive a training
/// frame with [`Dataset::select_xy`].
///
/// # Example
///
/// ```
/// use frameboost::data::Dataset;
/// use ndarray::array;
///
/// // Feature-major format: 2 features, 3 samples
/// let features = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
/// let targets = array![[0.0, 1.0, 0.0]]; // [n_outputs, n_samples]
/// let ds = Dataset::new(features.view(), Some(targets.view()), None);
///
/// assert_eq!(ds.n_samples(), 3);
/// assert_eq!(ds.n_features(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Feature data: `[n_features, n_samples]` (feature-major).
    features: Array2<f32>,

    /// Feature metadata.
    schema: DatasetSchema,

    /// Target values: `[n_outputs, n_samples]`.
    targets: Option<Array2<f32>>,

    /// Sample weights: length = n_samples.
    weights: Option<Array1<f32>>,
}

impl Dataset {
    /// Create a dataset from feature-major data.
    ///
    /// All features are assumed to be numeric. For categorical features
    /// or mixed types, use [`Dataset::builder`].
    ///
    /// # Panics
    ///
    /// Debug-asserts that sample counts match across features, targets,
    /// and weights.
    pub fn new(
        features: ArrayView2<f32>,
        targets: Option<ArrayView2<f32>>,
        weights: Option<ArrayView1<f32>>,
    ) -> Self {
        let n_samples = features.ncols();
        let n_features = features.nrows();

        if let Some(ref t) = targets {
            debug_assert_eq!(
                t.ncols(),
                n_samples,
                "targets must have same sample count as features"
            );
        }
        if let Some(ref w) = weights {
            debug_assert_eq!(
                w.len(),
                n_samples,
                "weights must have same sample count as features"
            );
        }

        let schema = DatasetSchema::all_numeric(n_features);

        Self {
            features: features.to_owned(),
            schema,
            targets: targets.map(|t| t.to_owned()),
            weights: weights.map(|w| w.to_owned()),
        }
    }

    /// Create a builder for column-by-column construction.
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::new()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.features.ncols()
    }

    /// Number of features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.nrows()
    }

    /// Number of output dimensions (0 if no targets).
    #[inline]
    pub fn n_outputs(&self) -> usize {
        self.targets.as_ref().map(|t| t.nrows()).unwrap_or(0)
    }

    /// Get the schema.
    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    /// Check if any feature is categorical.
    pub fn has_categorical(&self) -> bool {
        self.schema.has_categorical()
    }

    /// Check if dataset has targets.
    pub fn has_targets(&self) -> bool {
        self.targets.is_some()
    }

    /// Check if dataset has weights.
    pub fn has_weights(&self) -> bool {
        self.weights.is_some()
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Get a view of the feature data.
    ///
    /// Shape: `[n_features, n_samples]` (feature-major).
    pub fn features(&self) -> FeaturesView<'_> {
        FeaturesView::new(self.features.view(), &self.schema)
    }

    /// Get a view of the target data.
    ///
    /// Returns `None` if no targets were provided.
    pub fn targets(&self) -> Option<TargetsView<'_>> {
        self.targets.as_ref().map(|t| TargetsView::new(t.view()))
    }

    /// Get sample weights.
    ///
    /// Uniform (all 1.0) if no weights were provided.
    pub fn weights(&self) -> WeightsView<'_> {
        match &self.weights {
            Some(w) => WeightsView::from_array(w.view()),
            None => WeightsView::none(),
        }
    }

    // =========================================================================
    // Builder-style methods
    // =========================================================================

    /// Attach sample weights.
    ///
    /// # Panics
    ///
    /// Debug-asserts that weights length matches n_samples.
    pub fn with_weights(mut self, weights: Array1<f32>) -> Self {
        debug_assert_eq!(
            weights.len(),
            self.n_samples(),
            "weights length must match n_samples"
        );
        self.weights = Some(weights);
        self
    }

    /// Set the schema.
    ///
    /// # Panics
    ///
    /// Debug-asserts that schema has same number of features.
    pub fn with_schema(mut self, schema: DatasetSchema) -> Self {
        debug_assert_eq!(
            schema.n_features(),
            self.n_features(),
            "schema must have same number of features"
        );
        self.schema = schema;
        self
    }

    // =========================================================================
    // Column selection
    // =========================================================================

    /// Derive a training frame from column indices.
    ///
    /// Selects `feature_indices` as the feature columns and `target_index`
    /// as the (single-output) target column, preserving per-column
    /// metadata. Weights carry over unchanged. This mirrors the
    /// `x`/`y`/`training_frame` call shape of estimator APIs built around
    /// imported frames.
    ///
    /// # Errors
    ///
    /// * [`DatasetError::EmptySelection`] if `feature_indices` is empty
    /// * [`DatasetError::ColumnOutOfRange`] for any out-of-range index
    /// * [`DatasetError::DuplicateColumn`] for repeated feature indices
    /// * [`DatasetError::TargetInFeatures`] if `target_index` is also a feature
    ///
    /// # Example
    ///
    /// ```
    /// use frameboost::data::Dataset;
    /// use ndarray::array;
    ///
    /// // A 3-column frame: columns 0..2 as features, column 2 as target.
    /// let columns = array![[1.0, 2.0], [3.0, 4.0], [10.0, 20.0]];
    /// let frame = Dataset::new(columns.view(), None, None);
    /// let train = frame.select_xy(&[0, 1], 2).unwrap();
    ///
    /// assert_eq!(train.n_features(), 2);
    /// assert_eq!(train.targets().unwrap().as_single_output().to_vec(), vec![10.0, 20.0]);
    /// ```
    pub fn select_xy(
        &self,
        feature_indices: &[usize],
        target_index: usize,
    ) -> Result<Dataset, DatasetError> {
        let n_cols = self.n_features();

        if feature_indices.is_empty() {
            return Err(DatasetError::EmptySelection);
        }
        for (pos, &idx) in feature_indices.iter().enumerate() {
            if idx >= n_cols {
                return Err(DatasetError::ColumnOutOfRange {
                    index: idx,
                    n_features: n_cols,
                });
            }
            if feature_indices[..pos].contains(&idx) {
                return Err(DatasetError::DuplicateColumn { index: idx });
            }
            if idx == target_index {
                return Err(DatasetError::TargetInFeatures { index: idx });
            }
        }
        if target_index >= n_cols {
            return Err(DatasetError::ColumnOutOfRange {
                index: target_index,
                n_features: n_cols,
            });
        }

        let features = self.features.select(Axis(0), feature_indices);
        let metas: Vec<FeatureMeta> = feature_indices
            .iter()
            .map(|&idx| self.schema.feature(idx).clone())
            .collect();

        let n = self.n_samples();
        let targets = self
            .features
            .row(target_index)
            .to_owned()
            .into_shape_with_order((1, n))
            .expect("target row reshapes to [1, n_samples]");

        Ok(Dataset {
            features,
            schema: DatasetSchema::from_features(metas),
            targets: Some(targets),
            weights: self.weights.clone(),
        })
    }
}

/// Builder for column-by-column dataset construction.
///
/// Use this when you need explicit feature types (numeric vs categorical)
/// or explicit feature names.
///
/// # Example
///
/// ```
/// use frameboost::data::DatasetBuilder;
/// use ndarray::array;
///
/// let ds = DatasetBuilder::new()
///     .add_feature("age", array![25.0, 30.0, 35.0].view())
///     .add_categorical("color", array![0.0, 1.0, 2.0].view())
///     .targets(array![[0.0, 1.0, 0.0]].view())
///     .build()
///     .unwrap();
///
/// assert_eq!(ds.n_features(), 2);
/// assert!(ds.has_categorical());
/// ```
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    columns: Vec<Array1<f32>>,
    metas: Vec<FeatureMeta>,
    targets: Option<Array2<f32>>,
    weights: Option<Array1<f32>>,
}

impl DatasetBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a numeric feature column.
    pub fn add_feature(mut self, name: &str, values: ArrayView1<f32>) -> Self {
        self.columns.push(values.to_owned());
        self.metas.push(FeatureMeta::numeric_named(name));
        self
    }

    /// Add an unnamed numeric feature column.
    pub fn add_feature_unnamed(mut self, values: ArrayView1<f32>) -> Self {
        self.columns.push(values.to_owned());
        self.metas.push(FeatureMeta::numeric());
        self
    }

    /// Add a categorical feature column.
    ///
    /// Values should be non-negative integers encoded as floats
    /// (e.g., 0.0, 1.0, 2.0). Missing values are `f32::NAN`.
    pub fn add_categorical(mut self, name: &str, values: ArrayView1<f32>) -> Self {
        self.columns.push(values.to_owned());
        self.metas.push(FeatureMeta::categorical_named(name));
        self
    }

    /// Add a categorical feature column with level names.
    ///
    /// `levels[i]` is the string level encoded as category ID `i`.
    pub fn add_categorical_with_levels(
        mut self,
        name: &str,
        values: ArrayView1<f32>,
        levels: Vec<String>,
    ) -> Self {
        self.columns.push(values.to_owned());
        self.metas
            .push(FeatureMeta::categorical_named(name).with_levels(levels));
        self
    }

    /// Set target values.
    ///
    /// Shape: `[n_outputs, n_samples]`.
    pub fn targets(mut self, targets: ArrayView2<f32>) -> Self {
        self.targets = Some(targets.to_owned());
        self
    }

    /// Set 1D targets (single output).
    pub fn targets_1d(mut self, targets: ArrayView1<f32>) -> Self {
        let n = targets.len();
        self.targets = Some(
            targets
                .to_owned()
                .into_shape_with_order((1, n))
                .expect("reshape should succeed"),
        );
        self
    }

    /// Set sample weights.
    pub fn weights(mut self, weights: ArrayView1<f32>) -> Self {
        self.weights = Some(weights.to_owned());
        self
    }

    /// Build the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if no features were provided, or if any
    /// column, target, or weight length disagrees on sample count.
    pub fn build(self) -> Result<Dataset, DatasetError> {
        if self.columns.is_empty() {
            return Err(DatasetError::EmptyFeatures);
        }

        let n_samples = self.columns[0].len();
        let n_features = self.columns.len();

        for col in &self.columns {
            if col.len() != n_samples {
                return Err(DatasetError::ShapeMismatch {
                    field: "features",
                    expected: n_samples,
                    got: col.len(),
                });
            }
        }

        if let Some(ref targets) = self.targets {
            if targets.ncols() != n_samples {
                return Err(DatasetError::ShapeMismatch {
                    field: "targets",
                    expected: n_samples,
                    got: targets.ncols(),
                });
            }
        }

        if let Some(ref weights) = self.weights {
            if weights.len() != n_samples {
                return Err(DatasetError::ShapeMismatch {
                    field: "weights",
                    expected: n_samples,
                    got: weights.len(),
                });
            }
        }

        // Assemble feature matrix [n_features, n_samples]
        let mut features = Array2::zeros((n_features, n_samples));
        for (i, col) in self.columns.into_iter().enumerate() {
            features.row_mut(i).assign(&col);
        }

        let schema = DatasetSchema::from_features(self.metas);

        Ok(Dataset {
            features,
            schema,
            targets: self.targets,
            weights: self.weights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FeatureType;
    use ndarray::array;

    #[test]
    fn dataset_new() {
        let features = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let targets = array![[0.0, 1.0, 0.0]];
        let ds = Dataset::new(features.view(), Some(targets.view()), None);

        assert_eq!(ds.n_samples(), 3);
        assert_eq!(ds.n_features(), 2);
        assert_eq!(ds.n_outputs(), 1);
        assert!(ds.has_targets());
        assert!(!ds.has_weights());
        assert!(!ds.has_categorical());

        let view = ds.features();
        assert_eq!(view.feature(0).to_vec(), vec![1.0, 2.0, 3.0]);
        assert_eq!(view.feature(1).to_vec(), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn dataset_new_features_only() {
        let features = array![[1.0, 2.0], [3.0, 4.0]];
        let ds = Dataset::new(features.view(), None, None);

        assert_eq!(ds.n_samples(), 2);
        assert_eq!(ds.n_outputs(), 0);
        assert!(!ds.has_targets());
    }

    #[test]
    fn dataset_with_weights() {
        let features = array![[1.0, 2.0]];
        let targets = array![[0.0, 1.0]];
        let weights = array![0.5, 1.5];

        let ds = Dataset::new(features.view(), Some(targets.view()), Some(weights.view()));

        assert!(ds.has_weights());
        assert_eq!(
            ds.weights().as_array().unwrap().to_vec(),
            vec![0.5, 1.5]
        );
    }

    #[test]
    fn builder_basic() {
        let ds = DatasetBuilder::new()
            .add_feature("x", array![1.0, 2.0, 3.0].view())
            .add_feature("y", array![4.0, 5.0, 6.0].view())
            .targets(array![[0.0, 1.0, 0.0]].view())
            .build()
            .unwrap();

        assert_eq!(ds.n_features(), 2);
        assert_eq!(ds.n_samples(), 3);
        assert_eq!(ds.schema().feature_index("y"), Some(1));
    }

    #[test]
    fn builder_with_categorical() {
        let ds = DatasetBuilder::new()
            .add_feature("age", array![25.0, 30.0].view())
            .add_categorical("color", array![0.0, 1.0].view())
            .targets(array![[0.0, 1.0]].view())
            .build()
            .unwrap();

        assert!(ds.has_categorical());
        assert_eq!(ds.schema().feature_type(0), FeatureType::Numeric);
        assert_eq!(ds.schema().feature_type(1), FeatureType::Categorical);
    }

    #[test]
    fn builder_empty_features_error() {
        let result = DatasetBuilder::new()
            .targets(array![[0.0, 1.0]].view())
            .build();
        assert!(matches!(result, Err(DatasetError::EmptyFeatures)));
    }

    #[test]
    fn builder_shape_mismatch_error() {
        let result = DatasetBuilder::new()
            .add_feature("x", array![1.0, 2.0, 3.0].view())
            .add_feature("y", array![4.0, 5.0].view()) // wrong length
            .build();
        assert!(matches!(result, Err(DatasetError::ShapeMismatch { .. })));
    }

    #[test]
    fn builder_targets_mismatch_error() {
        let result = DatasetBuilder::new()
            .add_feature("x", array![1.0, 2.0, 3.0].view())
            .targets(array![[0.0, 1.0]].view()) // wrong length
            .build();
        assert!(matches!(result, Err(DatasetError::ShapeMismatch { .. })));
    }

    #[test]
    fn select_xy_basic() {
        let columns = array![
            [1.0, 2.0, 3.0],    // column 0
            [4.0, 5.0, 6.0],    // column 1
            [10.0, 20.0, 30.0]  // column 2 (target)
        ];
        let frame = Dataset::new(columns.view(), None, None);
        let train = frame.select_xy(&[0, 1], 2).unwrap();

        assert_eq!(train.n_features(), 2);
        assert_eq!(train.n_samples(), 3);
        assert_eq!(
            train.targets().unwrap().as_single_output().to_vec(),
            vec![10.0, 20.0, 30.0]
        );
        assert_eq!(train.features().feature(1).to_vec(), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn select_xy_preserves_metadata() {
        let frame = DatasetBuilder::new()
            .add_feature("a", array![1.0, 2.0].view())
            .add_categorical("b", array![0.0, 1.0].view())
            .add_feature("y", array![5.0, 6.0].view())
            .build()
            .unwrap();

        let train = frame.select_xy(&[1, 0], 2).unwrap();
        assert_eq!(train.schema().feature_name(0), Some("b"));
        assert_eq!(train.schema().feature_type(0), FeatureType::Categorical);
        assert_eq!(train.schema().feature_name(1), Some("a"));
    }

    #[test]
    fn select_xy_rejects_bad_indices() {
        let columns = array![[1.0, 2.0], [3.0, 4.0]];
        let frame = Dataset::new(columns.view(), None, None);

        assert!(matches!(
            frame.select_xy(&[], 1),
            Err(DatasetError::EmptySelection)
        ));
        assert!(matches!(
            frame.select_xy(&[0, 5], 1),
            Err(DatasetError::ColumnOutOfRange { index: 5, .. })
        ));
        assert!(matches!(
            frame.select_xy(&[0], 7),
            Err(DatasetError::ColumnOutOfRange { index: 7, .. })
        ));
        assert!(matches!(
            frame.select_xy(&[0, 0], 1),
            Err(DatasetError::DuplicateColumn { index: 0 })
        ));
        assert!(matches!(
            frame.select_xy(&[0, 1], 1),
            Err(DatasetError::TargetInFeatures { index: 1 })
        ));
    }

    // Verify Send + Sync
    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn dataset_is_send_sync() {
        assert_send_sync::<Dataset>();
        assert_send_sync::<DatasetBuilder>();
    }
}
