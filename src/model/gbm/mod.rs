//! GBM model and configuration.
//!
//! [`GbmConfig`] composes nested parameter groups ([`TreeParams`],
//! [`RegularizationParams`], [`SamplingParams`]) and lowers into trainer
//! parameters. [`GbmModel`] wraps training, prediction and persistence.

mod config;
mod model;
mod params;

pub use config::{ConfigError, GbmConfig, GbmConfigBuilder};
pub use model::{GbmModel, PersistError};
pub use params::{ParamValidationError, RegularizationParams, SamplingParams, TreeParams};
