//! Access traits shared between data containers and tree traversal.

use ndarray::ArrayView1;

/// Per-sample feature access used during tree traversal.
///
/// Implemented by contiguous row slices, ndarray views, and
/// [`SampleRef`](super::views::SampleRef) into feature-major storage, so
/// traversal code is agnostic to the underlying layout.
pub trait SampleValues {
    /// Value of `feature` for this sample (`f32::NAN` for missing).
    fn value(&self, feature: usize) -> f32;
}

impl SampleValues for &[f32] {
    #[inline]
    fn value(&self, feature: usize) -> f32 {
        self[feature]
    }
}

impl SampleValues for ArrayView1<'_, f32> {
    #[inline]
    fn value(&self, feature: usize) -> f32 {
        self[feature]
    }
}
