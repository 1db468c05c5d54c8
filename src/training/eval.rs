//! Evaluation utilities for training.
//!
//! Provides the [`Evaluator`] component for computing metrics during
//! training, [`EvalSet`] for named validation data, and [`MetricValue`]
//! for wrapping computed metrics with metadata.

use crate::data::{Dataset, WeightsView};

use super::metrics::{Metric, MetricFn};
use super::objectives::ObjectiveFn;

/// A computed metric value with metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    /// Name of the metric (e.g., "train-rmse", "valid-rmse").
    pub name: String,
    /// The computed value.
    pub value: f64,
    /// Whether higher values are better.
    pub higher_is_better: bool,
}

impl MetricValue {
    /// Create a new metric value.
    pub fn new(name: impl Into<String>, value: f64, higher_is_better: bool) -> Self {
        Self {
            name: name.into(),
            value,
            higher_is_better,
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:.6}", self.name, self.value)
    }
}

/// Named evaluation dataset.
#[derive(Debug, Clone, Copy)]
pub struct EvalSet<'a> {
    pub name: &'a str,
    pub dataset: &'a Dataset,
}

impl<'a> EvalSet<'a> {
    pub fn new(name: &'a str, dataset: &'a Dataset) -> Self {
        Self { name, dataset }
    }
}

/// Evaluation state for computing metrics during training.
///
/// Owns a scratch buffer for the objective's prediction transform so the
/// raw margins passed in stay untouched.
pub struct Evaluator<'a> {
    objective: &'a dyn ObjectiveFn,
    metric: Metric,
    transform_buffer: Vec<f32>,
}

impl<'a> Evaluator<'a> {
    /// Create a new evaluator.
    pub fn new(objective: &'a dyn ObjectiveFn, metric: Metric) -> Self {
        Self {
            objective,
            metric,
            transform_buffer: Vec::new(),
        }
    }

    /// Whether the metric is enabled.
    ///
    /// When `false`, evaluation should be skipped entirely.
    pub fn is_enabled(&self) -> bool {
        self.metric.is_enabled()
    }

    /// Whether higher metric values are better.
    pub fn higher_is_better(&self) -> bool {
        self.metric.higher_is_better()
    }

    /// The metric name.
    pub fn metric_name(&self) -> &'static str {
        self.metric.name()
    }

    /// Compute the metric over raw margin predictions.
    pub fn compute(
        &mut self,
        raw_predictions: &[f32],
        targets: &[f32],
        weights: WeightsView<'_>,
    ) -> f64 {
        self.transform_buffer.clear();
        self.transform_buffer.extend_from_slice(raw_predictions);
        self.objective
            .transform_predictions(&mut self.transform_buffer);
        self.metric
            .compute(&self.transform_buffer, targets, weights)
    }

    /// Compute the metric and wrap it in a named [`MetricValue`].
    pub fn compute_metric(
        &mut self,
        name: impl Into<String>,
        raw_predictions: &[f32],
        targets: &[f32],
        weights: WeightsView<'_>,
    ) -> MetricValue {
        let value = self.compute(raw_predictions, targets, weights);
        MetricValue::new(name, value, self.higher_is_better())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::objectives::{LogisticLoss, SquaredLoss};
    use approx::assert_abs_diff_eq;

    #[test]
    fn regression_metric_uses_raw_values() {
        let mut evaluator = Evaluator::new(&SquaredLoss, Metric::rmse());
        let value = evaluator.compute(&[1.0, 3.0], &[1.0, 1.0], WeightsView::none());
        assert_abs_diff_eq!(value, 2.0f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn classification_metric_sees_probabilities() {
        let mut evaluator = Evaluator::new(&LogisticLoss, Metric::logloss());
        // Large positive margin for a positive target: near-zero loss.
        let value = evaluator.compute(&[20.0], &[1.0], WeightsView::none());
        assert!(value < 1e-6);
    }

    #[test]
    fn compute_metric_carries_name_and_direction() {
        let mut evaluator = Evaluator::new(&SquaredLoss, Metric::mae());
        let mv = evaluator.compute_metric("train-mae", &[2.0], &[1.0], WeightsView::none());
        assert_eq!(mv.name, "train-mae");
        assert_abs_diff_eq!(mv.value, 1.0, epsilon = 1e-9);
        assert!(!mv.higher_is_better);
        assert_eq!(format!("{mv}"), "train-mae: 1.000000");
    }

    #[test]
    fn none_metric_is_disabled() {
        let evaluator = Evaluator::new(&SquaredLoss, Metric::none());
        assert!(!evaluator.is_enabled());
    }
}
