//! High-level GBM configuration with builder pattern.
//!
//! [`GbmConfig`] composes the nested parameter groups and uses `bon` for
//! builder generation with validation at build time.
//!
//! # Example
//!
//! ```
//! use frameboost::model::gbm::{GbmConfig, TreeParams, SamplingParams};
//! use frameboost::training::{Objective, Metric};
//!
//! // All defaults
//! let config = GbmConfig::builder().build().unwrap();
//!
//! // Customize objective and hyperparameters
//! let config = GbmConfig::builder()
//!     .objective(Objective::logistic())
//!     .metric(Metric::logloss())
//!     .n_trees(200)
//!     .learning_rate(0.05)
//!     .tree(TreeParams::depth_wise(8))
//!     .sampling(SamplingParams { subsample: 0.8 })
//!     .build()
//!     .unwrap();
//! ```

use std::num::NonZeroUsize;

use bon::Builder;
use thiserror::Error;

use crate::training::{GainParams, GrowerParams, Metric, Objective, TrainerParams, Verbosity};

use super::{ParamValidationError, RegularizationParams, SamplingParams, TreeParams};

/// Errors from configuration validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("learning_rate must be positive, got {0}")]
    InvalidLearningRate(f32),
    #[error("n_trees must be at least 1")]
    InvalidNTrees,
    #[error("invalid parameter: {0}")]
    InvalidParam(#[from] ParamValidationError),
}

/// High-level configuration for GBM training.
///
/// Defaults match the conventions of most GBM frameworks: 50 trees of
/// depth 5 at learning rate 0.1, no L2 penalty, at least 10 rows per
/// leaf, and no subsampling.
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct GbmConfig {
    /// Loss function to optimize. Default: squared error.
    #[builder(default)]
    pub objective: Objective,

    /// Evaluation metric. `None` disables per-round evaluation.
    pub metric: Option<Metric>,

    /// Number of boosting rounds. Default: 50.
    #[builder(default = 50)]
    pub n_trees: u32,

    /// Learning rate (shrinkage). Default: 0.1.
    #[builder(default = 0.1)]
    pub learning_rate: f32,

    /// Tree structure parameters.
    #[builder(default)]
    pub tree: TreeParams,

    /// Regularization parameters.
    #[builder(default)]
    pub regularization: RegularizationParams,

    /// Row sampling parameters.
    #[builder(default)]
    pub sampling: SamplingParams,

    /// Stop after this many rounds without metric improvement.
    /// `None` disables early stopping.
    pub early_stopping_rounds: Option<u32>,

    /// Number of threads. `None` uses all available cores.
    pub n_threads: Option<NonZeroUsize>,

    /// Random seed for subsampling. Default: 42.
    #[builder(default = 42)]
    pub seed: u64,

    /// Training output verbosity. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

/// Custom finishing function that validates the config.
impl<S: gbm_config_builder::IsComplete> GbmConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `learning_rate <= 0`, `n_trees == 0`,
    /// or a nested parameter group is out of range.
    pub fn build(self) -> Result<GbmConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl GbmConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate > 0.0) {
            return Err(ConfigError::InvalidLearningRate(self.learning_rate));
        }
        if self.n_trees == 0 {
            return Err(ConfigError::InvalidNTrees);
        }
        self.tree.validate()?;
        self.regularization.validate()?;
        self.sampling.validate()?;
        Ok(())
    }

    /// Thread count with `None` mapped to 0 (auto).
    pub fn n_threads_or_auto(&self) -> usize {
        self.n_threads.map(NonZeroUsize::get).unwrap_or(0)
    }

    /// Lower the config into trainer parameters.
    pub fn to_trainer_params(&self) -> TrainerParams {
        TrainerParams {
            n_trees: self.n_trees,
            objective: self.objective,
            metric: self.metric.unwrap_or(Metric::None),
            grower: GrowerParams {
                max_depth: self.tree.max_depth,
                learning_rate: self.learning_rate,
                gain: GainParams {
                    lambda: self.regularization.lambda,
                    min_child_weight: self.regularization.min_child_weight,
                    min_split_gain: self.regularization.min_split_gain,
                },
            },
            subsample: self.sampling.subsample,
            seed: self.seed,
            early_stopping_rounds: self.early_stopping_rounds.unwrap_or(0),
            verbosity: self.verbosity,
        }
    }
}

impl Default for GbmConfig {
    fn default() -> Self {
        Self::builder().build().expect("default config is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GbmConfig::builder().build().unwrap();
        assert_eq!(config.n_trees, 50);
        assert!((config.learning_rate - 0.1).abs() < 1e-6);
        assert_eq!(config.tree.max_depth, 5);
        assert_eq!(config.regularization.min_child_weight, 10.0);
        assert_eq!(config.seed, 42);
        assert!(config.metric.is_none());
        assert!(config.early_stopping_rounds.is_none());
    }

    #[test]
    fn invalid_learning_rate() {
        assert!(matches!(
            GbmConfig::builder().learning_rate(0.0).build(),
            Err(ConfigError::InvalidLearningRate(_))
        ));
        assert!(matches!(
            GbmConfig::builder().learning_rate(-0.1).build(),
            Err(ConfigError::InvalidLearningRate(_))
        ));
    }

    #[test]
    fn zero_trees_rejected() {
        assert!(matches!(
            GbmConfig::builder().n_trees(0).build(),
            Err(ConfigError::InvalidNTrees)
        ));
    }

    #[test]
    fn nested_param_errors_surface() {
        let result = GbmConfig::builder()
            .sampling(SamplingParams { subsample: 2.0 })
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParam(
                ParamValidationError::InvalidSubsample(_)
            ))
        ));
    }

    #[test]
    fn lowers_to_trainer_params() {
        let config = GbmConfig::builder()
            .n_trees(7)
            .learning_rate(0.2)
            .tree(TreeParams::depth_wise(3))
            .early_stopping_rounds(4)
            .build()
            .unwrap();
        let params = config.to_trainer_params();
        assert_eq!(params.n_trees, 7);
        assert_eq!(params.grower.max_depth, 3);
        assert!((params.grower.learning_rate - 0.2).abs() < 1e-6);
        assert_eq!(params.early_stopping_rounds, 4);
        assert!(!params.metric.is_enabled());
    }
}
