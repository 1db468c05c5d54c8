//! View types for algorithm access.
//!
//! Read-only access to dataset components with semantics appropriate for
//! training and inference code.

use ndarray::{ArrayView1, ArrayView2, Axis};

use super::schema::{DatasetSchema, FeatureType};
use super::traits::SampleValues;

// =============================================================================
// FeaturesView
// =============================================================================

/// Read-only view into feature data.
///
/// Internal storage is feature-major: `[n_features, n_samples]`.
/// This means:
/// - `feature(f)` returns all samples for feature f (contiguous)
/// - `sample(s)` returns all features for sample s (strided)
///
/// Schema is optional. When not provided, all features are assumed numeric.
#[derive(Clone, Copy)]
pub struct FeaturesView<'a> {
    /// Shape: `[n_features, n_samples]` - feature-major
    data: ArrayView2<'a, f32>,
    /// Optional schema. If `None`, all features are assumed numeric.
    schema: Option<&'a DatasetSchema>,
}

impl<'a> FeaturesView<'a> {
    /// Create a new features view with schema.
    ///
    /// # Arguments
    ///
    /// * `data` - Array with shape `[n_features, n_samples]`
    /// * `schema` - Feature metadata
    pub fn new(data: ArrayView2<'a, f32>, schema: &'a DatasetSchema) -> Self {
        debug_assert_eq!(
            data.nrows(),
            schema.n_features(),
            "data.nrows() must match schema.n_features()"
        );
        Self {
            data,
            schema: Some(schema),
        }
    }

    /// Create a features view without schema (all features assumed numeric).
    pub fn from_array(data: ArrayView2<'a, f32>) -> Self {
        Self { data, schema: None }
    }

    /// Number of samples (second dimension).
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.data.ncols()
    }

    /// Number of features (first dimension).
    #[inline]
    pub fn n_features(&self) -> usize {
        self.data.nrows()
    }

    /// Get feature value at (sample, feature).
    ///
    /// Internally accesses `[feature, sample]` due to storage layout.
    #[inline]
    pub fn get(&self, sample: usize, feature: usize) -> f32 {
        self.data[[feature, sample]]
    }

    /// Get a contiguous view of all sample values for a feature.
    ///
    /// The view is split off the underlying data by value, so it borrows
    /// the data for `'a` rather than this struct.
    #[inline]
    pub fn feature(&self, feature: usize) -> ArrayView1<'a, f32> {
        self.data.index_axis_move(Axis(0), feature)
    }

    /// Get all features for a sample.
    ///
    /// **Warning**: This returns a strided view, not contiguous.
    #[inline]
    pub fn sample_view(&self, sample: usize) -> ArrayView1<'a, f32> {
        self.data.index_axis_move(Axis(1), sample)
    }

    /// Get a cheap per-sample accessor implementing [`SampleValues`].
    #[inline]
    pub fn sample_values(&self, sample: usize) -> SampleRef<'a> {
        SampleRef {
            view: *self,
            sample,
        }
    }

    /// Get the type of a feature.
    ///
    /// Returns `Numeric` if no schema was provided.
    #[inline]
    pub fn feature_type(&self, feature: usize) -> FeatureType {
        self.schema
            .map(|s| s.feature_type(feature))
            .unwrap_or(FeatureType::Numeric)
    }

    /// Get the underlying array view.
    ///
    /// Shape is `[n_features, n_samples]`.
    pub fn view(&self) -> ArrayView2<'a, f32> {
        self.data
    }

    /// Get the schema, if available.
    pub fn schema(&self) -> Option<&'a DatasetSchema> {
        self.schema
    }
}

/// A single sample of a [`FeaturesView`], usable for tree traversal.
#[derive(Clone, Copy)]
pub struct SampleRef<'a> {
    view: FeaturesView<'a>,
    sample: usize,
}

impl SampleValues for SampleRef<'_> {
    #[inline]
    fn value(&self, feature: usize) -> f32 {
        self.view.get(self.sample, feature)
    }
}

// =============================================================================
// TargetsView
// =============================================================================

/// Read-only view of target data.
///
/// Shape: `[n_outputs, n_samples]`. Each output's values are contiguous.
#[derive(Clone, Copy)]
pub struct TargetsView<'a> {
    data: ArrayView2<'a, f32>,
}

impl<'a> TargetsView<'a> {
    /// Create a targets view from a `[n_outputs, n_samples]` array.
    pub fn new(data: ArrayView2<'a, f32>) -> Self {
        Self { data }
    }

    /// Number of outputs (first dimension).
    #[inline]
    pub fn n_outputs(&self) -> usize {
        self.data.nrows()
    }

    /// Number of samples (second dimension).
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.data.ncols()
    }

    /// Get all sample values for one output.
    #[inline]
    pub fn output(&self, output: usize) -> ArrayView1<'a, f32> {
        self.data.index_axis_move(Axis(0), output)
    }

    /// Get single-output targets.
    ///
    /// # Panics
    ///
    /// Debug-asserts that the view has exactly one output.
    #[inline]
    pub fn as_single_output(&self) -> ArrayView1<'a, f32> {
        debug_assert_eq!(self.n_outputs(), 1, "expected single-output targets");
        self.data.index_axis_move(Axis(0), 0)
    }

    /// Get the underlying array view.
    pub fn view(&self) -> ArrayView2<'a, f32> {
        self.data
    }
}

// =============================================================================
// WeightsView
// =============================================================================

/// Read-only view of sample weights.
///
/// `WeightsView::none()` denotes uniform weights of 1.0 and avoids
/// materializing a weight array for the common unweighted case.
#[derive(Clone, Copy)]
pub struct WeightsView<'a> {
    weights: Option<ArrayView1<'a, f32>>,
}

impl<'a> WeightsView<'a> {
    /// Uniform weights (all 1.0).
    pub fn none() -> Self {
        Self { weights: None }
    }

    /// Explicit per-sample weights.
    pub fn from_array(weights: ArrayView1<'a, f32>) -> Self {
        Self {
            weights: Some(weights),
        }
    }

    /// Returns true if weights are uniform (no explicit array).
    #[inline]
    pub fn is_uniform(&self) -> bool {
        self.weights.is_none()
    }

    /// Weight of a single sample.
    #[inline]
    pub fn get(&self, sample: usize) -> f32 {
        self.weights.map_or(1.0, |w| w[sample])
    }

    /// Iterate over `n` weights (1.0 repeated when uniform).
    #[inline]
    pub fn iter(&self, n: usize) -> WeightsIter<'a> {
        WeightsIter {
            weights: self.weights,
            index: 0,
            n,
        }
    }

    /// Total weight over `n` samples.
    pub fn sum(&self, n: usize) -> f64 {
        match self.weights {
            Some(w) => w.iter().map(|&x| x as f64).sum(),
            None => n as f64,
        }
    }

    /// The explicit weight array, if any.
    pub fn as_array(&self) -> Option<ArrayView1<'a, f32>> {
        self.weights
    }
}

/// Iterator over sample weights.
pub struct WeightsIter<'a> {
    weights: Option<ArrayView1<'a, f32>>,
    index: usize,
    n: usize,
}

impl Iterator for WeightsIter<'_> {
    type Item = f32;

    #[inline]
    fn next(&mut self) -> Option<f32> {
        if self.index >= self.n {
            return None;
        }
        let w = self.weights.map_or(1.0, |ws| ws[self.index]);
        self.index += 1;
        Some(w)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.n - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for WeightsIter<'_> {}
