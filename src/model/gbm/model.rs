//! High-level GBM model: training, prediction, persistence.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::Dataset;
use crate::model::meta::{ModelMeta, TaskKind};
use crate::repr::{Forest, TreeValidationError};
use crate::training::{EvalSet, GbmTrainer, Objective, ObjectiveFn, TrainError};
use crate::utils::run_with_threads;

use super::GbmConfig;

/// Current on-disk schema version.
const SCHEMA_VERSION: u32 = 1;

/// Errors from saving or loading a model.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid forest: {0}")]
    InvalidForest(#[from] TreeValidationError),
    #[error("unknown objective '{0}'")]
    UnknownObjective(String),
    #[error("unsupported schema version {0}")]
    UnsupportedVersion(u32),
}

/// Stable serialization schema, decoupled from the runtime types.
#[derive(Serialize, Deserialize)]
struct GbmModelSchema {
    version: u32,
    meta: ModelMeta,
    forest: Forest,
    /// Objective name, used to restore the prediction transform.
    objective: String,
}

/// High-level GBM model wrapping a [`Forest`] with metadata and the
/// configuration it was trained with.
pub struct GbmModel {
    forest: Forest,
    meta: ModelMeta,
    config: GbmConfig,
}

impl GbmModel {
    /// Train a model on a dataset with targets attached.
    pub fn train(dataset: &Dataset, config: GbmConfig) -> Result<Self, TrainError> {
        Self::train_with_eval(dataset, &[], config)
    }

    /// Train with named validation sets scored each round.
    ///
    /// The last eval set drives early stopping when
    /// `config.early_stopping_rounds` is set.
    pub fn train_with_eval(
        dataset: &Dataset,
        eval_sets: &[EvalSet<'_>],
        config: GbmConfig,
    ) -> Result<Self, TrainError> {
        let trainer = GbmTrainer::new(config.to_trainer_params());
        let forest = run_with_threads(config.n_threads_or_auto(), |parallelism| {
            trainer.train(dataset, eval_sets, parallelism)
        })?;

        let schema = dataset.schema();
        let task = if config.objective.is_classification() {
            TaskKind::BinaryClassification
        } else {
            TaskKind::Regression
        };
        // Early stopping is the only path that truncates the forest.
        let best_iteration = if (forest.n_trees() as u32) < config.n_trees {
            Some(forest.n_trees().saturating_sub(1))
        } else {
            None
        };
        let meta = ModelMeta {
            feature_names: schema.names(),
            feature_types: Some(schema.iter().map(|m| m.feature_type).collect()),
            n_features: dataset.n_features(),
            n_groups: forest.n_groups() as usize,
            task,
            base_scores: forest.base_score().to_vec(),
            best_iteration,
        };

        Ok(Self {
            forest,
            meta,
            config,
        })
    }

    /// Create a model from all its parts.
    pub fn from_parts(forest: Forest, meta: ModelMeta, config: GbmConfig) -> Self {
        Self {
            forest,
            meta,
            config,
        }
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    pub fn config(&self) -> &GbmConfig {
        &self.config
    }

    /// Predict transformed outputs for a feature-major batch.
    ///
    /// `features` has shape `[n_features, n_samples]` in training feature
    /// order. Returns `[n_groups, n_samples]`; classification outputs are
    /// probabilities, regression outputs raw values.
    pub fn predict(&self, features: ArrayView2<f32>, n_threads: usize) -> Array2<f32> {
        let mut output = self.predict_raw(features, n_threads);
        if !output.is_standard_layout() {
            output = output.as_standard_layout().to_owned();
        }
        let slice = output
            .as_slice_mut()
            .expect("standard layout is contiguous");
        self.config.objective.transform_predictions(slice);
        output
    }

    /// Predict raw margin scores for a feature-major batch.
    pub fn predict_raw(&self, features: ArrayView2<f32>, n_threads: usize) -> Array2<f32> {
        let n_groups = self.forest.n_groups() as usize;
        if features.ncols() == 0 {
            return Array2::zeros((n_groups, 0));
        }
        run_with_threads(n_threads, |parallelism| {
            self.forest.predict_batch(features, parallelism)
        })
    }

    /// Predict transformed outputs for a single sample.
    pub fn predict_row(&self, features: &[f32]) -> Vec<f32> {
        let mut output = self.forest.predict_row(features);
        self.config.objective.transform_predictions(&mut output);
        output
    }

    /// Save the model as JSON.
    ///
    /// The file carries the forest, metadata and objective name. Training
    /// hyperparameters are not persisted; loaded models fall back to the
    /// default configuration with the stored objective.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let schema = GbmModelSchema {
            version: SCHEMA_VERSION,
            meta: self.meta.clone(),
            forest: self.forest.clone(),
            objective: self.config.objective.name().to_string(),
        };
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), &schema)?;
        Ok(())
    }

    /// Load a model saved with [`save_json`](Self::save_json).
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let file = File::open(path)?;
        let schema: GbmModelSchema = serde_json::from_reader(BufReader::new(file))?;
        if schema.version != SCHEMA_VERSION {
            return Err(PersistError::UnsupportedVersion(schema.version));
        }
        schema.forest.validate()?;

        let objective = match schema.objective.as_str() {
            "squared_error" => Objective::squared(),
            "logistic" => Objective::logistic(),
            other => return Err(PersistError::UnknownObjective(other.to_string())),
        };
        let config = GbmConfig {
            objective,
            ..GbmConfig::default()
        };

        Ok(Self {
            forest: schema.forest,
            meta: schema.meta,
            config,
        })
    }
}

impl std::fmt::Debug for GbmModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GbmModel")
            .field("n_trees", &self.forest.n_trees())
            .field("n_features", &self.meta.n_features)
            .field("task", &self.meta.task)
            .finish()
    }
}
