//! Evaluation metrics for model quality.
//!
//! Metrics are separate from objectives — a model might be trained with
//! one loss but monitored with a different metric. All metrics here
//! operate on transformed predictions (values for regression,
//! probabilities for classification) and support optional sample weights.

use crate::data::WeightsView;

/// A metric for evaluating model quality.
pub trait MetricFn: Send + Sync {
    /// Compute the metric over one output's predictions.
    fn compute(&self, predictions: &[f32], targets: &[f32], weights: WeightsView<'_>) -> f64;

    /// Whether higher values indicate better performance.
    fn higher_is_better(&self) -> bool {
        false
    }

    /// Name of the metric (for logging).
    fn name(&self) -> &'static str;
}

/// Weighted mean of a per-sample error term.
fn weighted_mean_by(
    predictions: &[f32],
    targets: &[f32],
    weights: WeightsView<'_>,
    term: impl Fn(f64, f64) -> f64,
) -> f64 {
    debug_assert_eq!(predictions.len(), targets.len());
    if predictions.is_empty() {
        return 0.0;
    }

    let (sum, sum_w) = predictions
        .iter()
        .zip(targets.iter())
        .zip(weights.iter(predictions.len()))
        .fold((0.0f64, 0.0f64), |(s, sw), ((&p, &t), w)| {
            (s + w as f64 * term(p as f64, t as f64), sw + w as f64)
        });

    if sum_w > 0.0 {
        sum / sum_w
    } else {
        0.0
    }
}

// =============================================================================
// Regression metrics
// =============================================================================

/// Root Mean Squared Error: sqrt(mean(w * (pred - target)²) / mean(w)).
#[derive(Debug, Clone, Copy, Default)]
pub struct Rmse;

impl MetricFn for Rmse {
    fn compute(&self, predictions: &[f32], targets: &[f32], weights: WeightsView<'_>) -> f64 {
        weighted_mean_by(predictions, targets, weights, |p, t| (p - t) * (p - t)).sqrt()
    }

    fn name(&self) -> &'static str {
        "rmse"
    }
}

/// Mean Absolute Error. More robust to outliers than RMSE.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mae;

impl MetricFn for Mae {
    fn compute(&self, predictions: &[f32], targets: &[f32], weights: WeightsView<'_>) -> f64 {
        weighted_mean_by(predictions, targets, weights, |p, t| (p - t).abs())
    }

    fn name(&self) -> &'static str {
        "mae"
    }
}

/// Mean residual deviance for gaussian regression.
///
/// The gaussian deviance contribution of a sample is its squared residual,
/// so this is the weighted mean squared error (RMSE without the square
/// root).
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanResidualDeviance;

impl MetricFn for MeanResidualDeviance {
    fn compute(&self, predictions: &[f32], targets: &[f32], weights: WeightsView<'_>) -> f64 {
        weighted_mean_by(predictions, targets, weights, |p, t| (p - t) * (p - t))
    }

    fn name(&self) -> &'static str {
        "mean_residual_deviance"
    }
}

// =============================================================================
// Classification metrics
// =============================================================================

/// Binary cross-entropy: -mean(y*log(p) + (1-y)*log(1-p)).
///
/// Expects predictions to be probabilities in (0, 1).
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLoss;

impl MetricFn for LogLoss {
    fn compute(&self, predictions: &[f32], targets: &[f32], weights: WeightsView<'_>) -> f64 {
        weighted_mean_by(predictions, targets, weights, |p, t| {
            let p = p.clamp(1e-15, 1.0 - 1e-15);
            -(t * p.ln() + (1.0 - t) * (1.0 - p).ln())
        })
    }

    fn name(&self) -> &'static str {
        "logloss"
    }
}

// =============================================================================
// Metric Enum (runtime selection)
// =============================================================================

/// A runtime-selected metric.
///
/// `Metric::none()` disables evaluation entirely; the trainer then skips
/// metric computation and prediction transforms.
#[derive(Debug, Clone, Copy, Default)]
pub enum Metric {
    /// No metric; evaluation is skipped.
    #[default]
    None,
    /// Root mean squared error.
    Rmse(Rmse),
    /// Mean absolute error.
    Mae(Mae),
    /// Mean residual deviance (gaussian).
    MeanResidualDeviance(MeanResidualDeviance),
    /// Binary cross-entropy.
    LogLoss(LogLoss),
}

impl Metric {
    /// Disable evaluation.
    pub fn none() -> Self {
        Self::None
    }

    /// Root mean squared error.
    pub fn rmse() -> Self {
        Self::Rmse(Rmse)
    }

    /// Mean absolute error.
    pub fn mae() -> Self {
        Self::Mae(Mae)
    }

    /// Mean residual deviance.
    pub fn mean_residual_deviance() -> Self {
        Self::MeanResidualDeviance(MeanResidualDeviance)
    }

    /// Binary cross-entropy.
    pub fn logloss() -> Self {
        Self::LogLoss(LogLoss)
    }

    /// Whether evaluation is enabled.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }

    fn as_fn(&self) -> Option<&dyn MetricFn> {
        match self {
            Self::None => None,
            Self::Rmse(m) => Some(m),
            Self::Mae(m) => Some(m),
            Self::MeanResidualDeviance(m) => Some(m),
            Self::LogLoss(m) => Some(m),
        }
    }
}

impl MetricFn for Metric {
    fn compute(&self, predictions: &[f32], targets: &[f32], weights: WeightsView<'_>) -> f64 {
        self.as_fn()
            .map(|m| m.compute(predictions, targets, weights))
            .unwrap_or(f64::NAN)
    }

    fn higher_is_better(&self) -> bool {
        self.as_fn().map(|m| m.higher_is_better()).unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        self.as_fn().map(|m| m.name()).unwrap_or("none")
    }
}
