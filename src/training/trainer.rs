//! Gradient boosting training loop.

use thiserror::Error;

use crate::data::{Dataset, FeaturesView, WeightsView};
use crate::repr::Forest;
use crate::utils::Parallelism;

use super::callback::{EarlyStopAction, EarlyStopping};
use super::eval::{EvalSet, Evaluator, MetricValue};
use super::gradients::Gradients;
use super::grower::{GrowerParams, TreeGrower};
use super::logger::{TrainingLogger, Verbosity};
use super::metrics::Metric;
use super::objectives::{Objective, ObjectiveFn};
use super::sampling::RowSampler;

/// Errors produced when a training request is inconsistent.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("training dataset has no targets")]
    MissingTargets,
    #[error("expected single-output targets, got {n_outputs} outputs")]
    MultiOutputTargets { n_outputs: usize },
    #[error("training dataset has no samples")]
    EmptyDataset,
    #[error("eval set '{name}' has {got} features, expected {expected}")]
    EvalSetFeatureMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("eval set '{name}' has no targets")]
    EvalSetMissingTargets { name: String },
}

/// Full parameter set for [`GbmTrainer`].
#[derive(Debug, Clone)]
pub struct TrainerParams {
    /// Number of boosting rounds.
    pub n_trees: u32,
    /// Loss to optimize.
    pub objective: Objective,
    /// Metric reported each round. `Metric::None` disables evaluation.
    pub metric: Metric,
    /// Per-tree growth parameters.
    pub grower: GrowerParams,
    /// Row subsample ratio per round, in (0, 1].
    pub subsample: f32,
    /// Seed for row subsampling.
    pub seed: u64,
    /// Stop after this many rounds without metric improvement. 0 disables.
    pub early_stopping_rounds: u32,
    /// Training output verbosity.
    pub verbosity: Verbosity,
}

impl Default for TrainerParams {
    fn default() -> Self {
        Self {
            n_trees: 50,
            objective: Objective::default(),
            metric: Metric::default(),
            grower: GrowerParams::default(),
            subsample: 1.0,
            seed: 42,
            early_stopping_rounds: 0,
            verbosity: Verbosity::Silent,
        }
    }
}

/// Margin state for one dataset during training.
struct ScoredSet<'a> {
    name: String,
    features: FeaturesView<'a>,
    targets: Vec<f32>,
    weights: WeightsView<'a>,
    predictions: Vec<f32>,
}

impl<'a> ScoredSet<'a> {
    fn from_dataset(
        name: &str,
        dataset: &'a Dataset,
        base_score: f32,
    ) -> Result<Self, TrainError> {
        let targets_view = dataset
            .targets()
            .ok_or_else(|| TrainError::EvalSetMissingTargets {
                name: name.to_string(),
            })?;
        Ok(Self {
            name: name.to_string(),
            features: dataset.features(),
            targets: targets_view.as_single_output().to_vec(),
            weights: dataset.weights(),
            predictions: vec![base_score; dataset.n_samples()],
        })
    }

    /// Accumulate one tree's contribution into every sample's margin.
    fn apply_tree(&mut self, tree: &crate::repr::Tree) {
        for (sample, prediction) in self.predictions.iter_mut().enumerate() {
            *prediction += tree.predict_row(self.features.sample_values(sample));
        }
    }
}

/// Gradient boosting trainer for single-output objectives.
///
/// Each round computes gradients against the current margins, grows one
/// tree on a (possibly subsampled) set of rows, and folds the tree's
/// predictions back into the margins. Validation sets are scored
/// incrementally the same way; the last one drives early stopping.
pub struct GbmTrainer {
    params: TrainerParams,
}

impl GbmTrainer {
    pub fn new(params: TrainerParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TrainerParams {
        &self.params
    }

    /// Train a forest on `dataset`.
    pub fn train(
        &self,
        dataset: &Dataset,
        eval_sets: &[EvalSet<'_>],
        parallelism: Parallelism,
    ) -> Result<Forest, TrainError> {
        let targets_view = dataset.targets().ok_or(TrainError::MissingTargets)?;
        if targets_view.n_outputs() != 1 {
            return Err(TrainError::MultiOutputTargets {
                n_outputs: targets_view.n_outputs(),
            });
        }
        let n_samples = dataset.n_samples();
        if n_samples == 0 {
            return Err(TrainError::EmptyDataset);
        }
        let n_features = dataset.n_features();
        for eval_set in eval_sets {
            if eval_set.dataset.n_features() != n_features {
                return Err(TrainError::EvalSetFeatureMismatch {
                    name: eval_set.name.to_string(),
                    expected: n_features,
                    got: eval_set.dataset.n_features(),
                });
            }
        }

        let objective: &dyn ObjectiveFn = &self.params.objective;
        let logger = TrainingLogger::new(self.params.verbosity);
        let targets: Vec<f32> = targets_view.as_single_output().to_vec();
        let weights = dataset.weights();

        let base_score = objective.base_score(&targets, weights);
        let mut forest = Forest::for_regression().with_base_score(vec![base_score]);

        let mut train_set = ScoredSet {
            name: "train".to_string(),
            features: dataset.features(),
            targets,
            weights,
            predictions: vec![base_score; n_samples],
        };
        let mut scored_eval_sets = eval_sets
            .iter()
            .map(|es| ScoredSet::from_dataset(es.name, es.dataset, base_score))
            .collect::<Result<Vec<_>, _>>()?;

        let mut gradients = Gradients::new(n_samples, 1);
        let sampler = RowSampler::new(n_samples as u32, self.params.subsample, self.params.seed);
        let grower = TreeGrower::new(self.params.grower.clone());

        let mut evaluator = Evaluator::new(objective, self.params.metric);
        let mut stopping = EarlyStopping::new(
            self.params.early_stopping_rounds as usize,
            evaluator.higher_is_better(),
        );

        logger.info(&format!(
            "training {} trees on {} samples, {} features (objective: {})",
            self.params.n_trees,
            n_samples,
            n_features,
            objective.name()
        ));

        for round in 0..self.params.n_trees {
            objective.compute_gradients(
                &train_set.predictions,
                &train_set.targets,
                train_set.weights,
                gradients.output_pairs_mut(0),
            );

            let rows = sampler.sample(round);
            let tree = grower.grow(
                train_set.features,
                gradients.output_pairs(0),
                &rows,
                parallelism,
            );

            train_set.apply_tree(&tree);
            for eval_set in &mut scored_eval_sets {
                eval_set.apply_tree(&tree);
            }
            forest.push_tree(tree, 0);

            if evaluator.is_enabled() {
                let metrics = self.evaluate_round(&mut evaluator, &train_set, &scored_eval_sets);
                logger.log_round(round as usize, &metrics);

                // Early stopping monitors the last eval set, or the
                // training metric when no eval sets were given.
                if stopping.is_enabled() {
                    let monitored = metrics.last().map(|m| m.value).unwrap_or(f64::NAN);
                    if stopping.update(monitored) == EarlyStopAction::Stop {
                        logger.log_early_stopping(
                            round as usize,
                            stopping.best_round(),
                            evaluator.metric_name(),
                        );
                        break;
                    }
                }
            }
        }

        if stopping.is_enabled() && stopping.best_value().is_some() {
            forest.truncate(stopping.best_round() + 1);
        }

        logger.info(&format!("finished with {} trees", forest.n_trees()));
        Ok(forest)
    }

    // `ScoredSet` is invariant in its lifetime, so chaining the train set
    // with the eval sets requires both to share one.
    fn evaluate_round<'a>(
        &self,
        evaluator: &mut Evaluator<'_>,
        train_set: &ScoredSet<'a>,
        eval_sets: &[ScoredSet<'a>],
    ) -> Vec<MetricValue> {
        let mut metrics = Vec::with_capacity(1 + eval_sets.len());
        for set in std::iter::once(train_set).chain(eval_sets.iter()) {
            metrics.push(evaluator.compute_metric(
                format!("{}-{}", set.name, evaluator.metric_name()),
                &set.predictions,
                &set.targets,
                set.weights,
            ));
        }
        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DatasetBuilder;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};

    fn step_dataset() -> Dataset {
        // One feature; target is a clean step function.
        let values = Array1::from_iter((0..20).map(|i| i as f32));
        let targets = values.mapv(|v| if v < 10.0 { 1.0 } else { 5.0 });
        DatasetBuilder::new()
            .add_feature("x", values.view())
            .targets_1d(targets.view())
            .build()
            .unwrap()
    }

    fn fast_params(n_trees: u32) -> TrainerParams {
        TrainerParams {
            n_trees,
            grower: GrowerParams {
                max_depth: 3,
                learning_rate: 0.5,
                ..GrowerParams::default()
            },
            ..TrainerParams::default()
        }
    }

    #[test]
    fn fits_step_function() {
        let dataset = step_dataset();
        let trainer = GbmTrainer::new(fast_params(20));
        let forest = trainer
            .train(&dataset, &[], Parallelism::Sequential)
            .unwrap();

        assert_eq!(forest.n_trees(), 20);
        assert!(forest.validate().is_ok());
        assert_abs_diff_eq!(forest.predict_row(&[3.0])[0], 1.0, epsilon = 1e-2);
        assert_abs_diff_eq!(forest.predict_row(&[15.0])[0], 5.0, epsilon = 1e-2);
    }

    #[test]
    fn missing_targets_is_an_error() {
        let dataset = DatasetBuilder::new()
            .add_feature("x", array![1.0, 2.0].view())
            .build()
            .unwrap();
        let result = GbmTrainer::new(fast_params(5)).train(&dataset, &[], Parallelism::Sequential);
        assert!(matches!(result, Err(TrainError::MissingTargets)));
    }

    #[test]
    fn eval_set_feature_mismatch_is_an_error() {
        let dataset = step_dataset();
        let other = DatasetBuilder::new()
            .add_feature("a", array![1.0, 2.0].view())
            .add_feature("b", array![3.0, 4.0].view())
            .targets_1d(array![0.0, 1.0].view())
            .build()
            .unwrap();
        let eval_sets = [EvalSet::new("valid", &other)];
        let result =
            GbmTrainer::new(fast_params(5)).train(&dataset, &eval_sets, Parallelism::Sequential);
        assert!(matches!(
            result,
            Err(TrainError::EvalSetFeatureMismatch { expected: 1, got: 2, .. })
        ));
    }

    #[test]
    fn subsampling_is_deterministic_per_seed() {
        let dataset = step_dataset();
        let params = TrainerParams {
            subsample: 0.7,
            ..fast_params(10)
        };

        let a = GbmTrainer::new(params.clone())
            .train(&dataset, &[], Parallelism::Sequential)
            .unwrap();
        let b = GbmTrainer::new(params)
            .train(&dataset, &[], Parallelism::Sequential)
            .unwrap();

        for x in [0.0f32, 4.0, 11.0, 19.0] {
            assert_eq!(a.predict_row(&[x]), b.predict_row(&[x]));
        }
    }

    #[test]
    fn early_stopping_truncates_forest() {
        let dataset = step_dataset();
        let params = TrainerParams {
            metric: Metric::rmse(),
            early_stopping_rounds: 3,
            ..fast_params(200)
        };
        let eval_sets = [EvalSet::new("valid", &dataset)];
        let forest = GbmTrainer::new(params)
            .train(&dataset, &eval_sets, Parallelism::Sequential)
            .unwrap();

        // The step function is fit exactly after a few rounds, so the
        // metric flatlines and stopping kicks in well before 200 trees.
        assert!(forest.n_trees() < 200);
    }

    #[test]
    fn logistic_objective_learns_probabilities() {
        let values = Array1::from_iter((0..40).map(|i| i as f32));
        let targets = values.mapv(|v| if v >= 20.0 { 1.0 } else { 0.0 });
        let dataset = DatasetBuilder::new()
            .add_feature("x", values.view())
            .targets_1d(targets.view())
            .build()
            .unwrap();

        let params = TrainerParams {
            objective: Objective::logistic(),
            ..fast_params(30)
        };
        let forest = GbmTrainer::new(params)
            .train(&dataset, &[], Parallelism::Sequential)
            .unwrap();

        let sigmoid = |m: f32| 1.0 / (1.0 + (-m).exp());
        assert!(sigmoid(forest.predict_row(&[5.0])[0]) < 0.1);
        assert!(sigmoid(forest.predict_row(&[35.0])[0]) > 0.9);
    }
}
