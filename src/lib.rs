//! frameboost: gradient boosted decision trees over tabular frames.
//!
//! Native Rust gradient boosting with CSV import, mixed numeric and
//! categorical features, and missing-value handling built into the trees.
//!
//! # Key Types
//!
//! - [`GbmModel`] - High-level model with train/predict/persist
//! - [`GbmConfig`] - Configuration builder
//! - [`Objective`] / [`Metric`] - Training objectives and evaluation metrics
//! - [`Dataset`] - Data handling and CSV import
//!
//! # Training
//!
//! Load data with [`data::io::load_csv`] or assemble it with
//! [`DatasetBuilder`], configure with `GbmConfig::builder()`, then call
//! `GbmModel::train()`. See the [`model`] module for details.

pub mod data;
pub mod model;
pub mod repr;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// High-level model types
pub use model::{GbmModel, ModelMeta, TaskKind};

// Configuration types (most users want these)
pub use model::gbm::GbmConfig;

// Training types (objectives, metrics)
pub use training::{Metric, MetricFn, Objective, ObjectiveFn};

// Data types (for preparing training data)
pub use data::{
    Dataset, DatasetBuilder, DatasetError, DatasetSchema, FeatureMeta, FeatureType, FeaturesView,
    TargetsView, WeightsView,
};

// Shared utilities
pub use utils::{run_with_threads, Parallelism};
