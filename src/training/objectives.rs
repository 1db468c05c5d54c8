//! Objective (loss) functions for gradient boosting.
//!
//! Objectives compute gradients and hessians for optimization, the initial
//! base score, and the transform from raw margins to semantic predictions.
//!
//! # Available objectives
//!
//! - [`SquaredLoss`]: squared error for regression (the default)
//! - [`LogisticLoss`]: binary cross-entropy for classification

use crate::data::WeightsView;

use super::gradients::GradPair;

/// An objective function for training gradient boosted models.
///
/// All slices are per-sample for a single output. The `weights` view is
/// uniform when no sample weights were provided.
pub trait ObjectiveFn: Send + Sync {
    /// Compute gradient pairs for the given raw predictions.
    fn compute_gradients(
        &self,
        predictions: &[f32],
        targets: &[f32],
        weights: WeightsView<'_>,
        out: &mut [GradPair],
    );

    /// Optimal constant raw prediction before any trees are added.
    fn base_score(&self, targets: &[f32], weights: WeightsView<'_>) -> f32;

    /// Transform raw margins into semantic predictions, in place.
    ///
    /// Regression objectives are a no-op; classification applies sigmoid.
    fn transform_predictions(&self, _predictions: &mut [f32]) {}

    /// Whether this objective trains a classifier.
    fn is_classification(&self) -> bool {
        false
    }

    /// Name of the objective (for logging).
    fn name(&self) -> &'static str;
}

fn weighted_mean(values: &[f32], weights: WeightsView<'_>) -> f32 {
    let (sum, sum_w) = values
        .iter()
        .zip(weights.iter(values.len()))
        .fold((0.0f64, 0.0f64), |(s, sw), (&v, w)| {
            (s + v as f64 * w as f64, sw + w as f64)
        });
    if sum_w > 0.0 {
        (sum / sum_w) as f32
    } else {
        0.0
    }
}

#[inline]
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

// =============================================================================
// Squared Error Loss (Regression)
// =============================================================================

/// Squared error loss: L = 0.5 * (pred - target)²
///
/// Derivatives: grad = pred - target, hess = 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredLoss;

impl ObjectiveFn for SquaredLoss {
    fn compute_gradients(
        &self,
        predictions: &[f32],
        targets: &[f32],
        weights: WeightsView<'_>,
        out: &mut [GradPair],
    ) {
        debug_assert_eq!(predictions.len(), targets.len());
        debug_assert_eq!(predictions.len(), out.len());

        for ((gp, (&pred, &target)), w) in out
            .iter_mut()
            .zip(predictions.iter().zip(targets.iter()))
            .zip(weights.iter(predictions.len()))
        {
            *gp = GradPair::new(w * (pred - target), w);
        }
    }

    fn base_score(&self, targets: &[f32], weights: WeightsView<'_>) -> f32 {
        weighted_mean(targets, weights)
    }

    fn name(&self) -> &'static str {
        "squared_error"
    }
}

// =============================================================================
// Logistic Loss (Binary Classification)
// =============================================================================

/// Logistic loss: L = -y*log(p) - (1-y)*log(1-p), where p = sigmoid(pred).
///
/// Derivatives: grad = p - target, hess = p * (1 - p). Expects targets
/// in {0, 1}.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogisticLoss;

impl ObjectiveFn for LogisticLoss {
    fn compute_gradients(
        &self,
        predictions: &[f32],
        targets: &[f32],
        weights: WeightsView<'_>,
        out: &mut [GradPair],
    ) {
        debug_assert_eq!(predictions.len(), targets.len());
        debug_assert_eq!(predictions.len(), out.len());

        for ((gp, (&pred, &target)), w) in out
            .iter_mut()
            .zip(predictions.iter().zip(targets.iter()))
            .zip(weights.iter(predictions.len()))
        {
            let p = sigmoid(pred);
            // Small floor keeps leaf weights finite on saturated samples.
            let hess = (p * (1.0 - p)).max(1e-16);
            *gp = GradPair::new(w * (p - target), w * hess);
        }
    }

    fn base_score(&self, targets: &[f32], weights: WeightsView<'_>) -> f32 {
        let p = weighted_mean(targets, weights).clamp(1e-6, 1.0 - 1e-6);
        (p / (1.0 - p)).ln()
    }

    fn transform_predictions(&self, predictions: &mut [f32]) {
        for pred in predictions.iter_mut() {
            *pred = sigmoid(*pred);
        }
    }

    fn is_classification(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "logistic"
    }
}

// =============================================================================
// Objective Enum (runtime selection)
// =============================================================================

/// A runtime-selected objective function.
///
/// Wraps the concrete objectives so configurations can carry one without
/// generics or boxing.
#[derive(Debug, Clone, Copy)]
pub enum Objective {
    /// Squared error (regression).
    Squared(SquaredLoss),
    /// Logistic loss (binary classification).
    Logistic(LogisticLoss),
}

impl Objective {
    /// Squared error objective.
    pub fn squared() -> Self {
        Self::Squared(SquaredLoss)
    }

    /// Logistic objective.
    pub fn logistic() -> Self {
        Self::Logistic(LogisticLoss)
    }

    fn as_fn(&self) -> &dyn ObjectiveFn {
        match self {
            Self::Squared(o) => o,
            Self::Logistic(o) => o,
        }
    }
}

impl Default for Objective {
    fn default() -> Self {
        Self::squared()
    }
}

impl ObjectiveFn for Objective {
    fn compute_gradients(
        &self,
        predictions: &[f32],
        targets: &[f32],
        weights: WeightsView<'_>,
        out: &mut [GradPair],
    ) {
        self.as_fn()
            .compute_gradients(predictions, targets, weights, out)
    }

    fn base_score(&self, targets: &[f32], weights: WeightsView<'_>) -> f32 {
        self.as_fn().base_score(targets, weights)
    }

    fn transform_predictions(&self, predictions: &mut [f32]) {
        self.as_fn().transform_predictions(predictions)
    }

    fn is_classification(&self) -> bool {
        self.as_fn().is_classification()
    }

    fn name(&self) -> &'static str {
        self.as_fn().name()
    }
}
