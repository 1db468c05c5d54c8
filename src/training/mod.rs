//! Gradient boosting training.
//!
//! The pipeline is split into small pieces: objectives turn margins into
//! gradient pairs, the grower fits one tree per round, and [`GbmTrainer`]
//! runs the boosting loop with optional subsampling, per-round evaluation
//! and early stopping.

mod callback;
mod eval;
mod gradients;
mod grower;
mod logger;
mod metrics;
mod objectives;
mod sampling;
mod trainer;

pub use callback::{EarlyStopAction, EarlyStopping};
pub use eval::{EvalSet, Evaluator, MetricValue};
pub use gradients::{GradPair, Gradients};
pub use grower::{GainParams, GrowerParams, TreeGrower};
pub use logger::{TrainingLogger, Verbosity};
pub use metrics::{LogLoss, Mae, MeanResidualDeviance, Metric, MetricFn, Rmse};
pub use objectives::{LogisticLoss, Objective, ObjectiveFn, SquaredLoss};
pub use sampling::RowSampler;
pub use trainer::{GbmTrainer, TrainError, TrainerParams};
