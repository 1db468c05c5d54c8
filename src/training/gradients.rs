//! Gradient pairs and the per-round gradient buffer.

/// Gradient and hessian pair for second-order optimization.
///
/// - `grad`: first derivative (∂L/∂ŷ)
/// - `hess`: second derivative (∂²L/∂ŷ²)
///
/// For squared error: grad = (ŷ - y), hess = 1.
/// For logistic: grad = (sigmoid(ŷ) - y), hess = sigmoid(ŷ) * (1 - sigmoid(ŷ)).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GradPair {
    /// First derivative (gradient).
    pub grad: f32,
    /// Second derivative (hessian).
    pub hess: f32,
}

impl GradPair {
    /// Create a new gradient pair.
    #[inline]
    pub fn new(grad: f32, hess: f32) -> Self {
        Self { grad, hess }
    }

    /// Zero gradient pair (neutral element for accumulation).
    pub const ZERO: Self = Self {
        grad: 0.0,
        hess: 0.0,
    };
}

/// Per-round buffer of gradient pairs, one per (output, sample).
///
/// Output-major layout: the pairs of output `k` are the contiguous slice
/// `[k * n_samples .. (k + 1) * n_samples]`, so the tree grower can take a
/// single output's gradients as a plain slice.
#[derive(Debug, Clone)]
pub struct Gradients {
    pairs: Vec<GradPair>,
    n_samples: usize,
    n_outputs: usize,
}

impl Gradients {
    /// Create a zeroed buffer.
    ///
    /// # Panics
    ///
    /// Panics if `n_samples` or `n_outputs` is zero.
    pub fn new(n_samples: usize, n_outputs: usize) -> Self {
        assert!(n_samples > 0, "n_samples must be positive");
        assert!(n_outputs > 0, "n_outputs must be positive");
        Self {
            pairs: vec![GradPair::ZERO; n_samples * n_outputs],
            n_samples,
            n_outputs,
        }
    }

    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Number of outputs per sample.
    #[inline]
    pub fn n_outputs(&self) -> usize {
        self.n_outputs
    }

    /// All pairs for one output, contiguous.
    #[inline]
    pub fn output_pairs(&self, output: usize) -> &[GradPair] {
        let start = output * self.n_samples;
        &self.pairs[start..start + self.n_samples]
    }

    /// Mutable pairs for one output.
    #[inline]
    pub fn output_pairs_mut(&mut self, output: usize) -> &mut [GradPair] {
        let start = output * self.n_samples;
        &mut self.pairs[start..start + self.n_samples]
    }
}
