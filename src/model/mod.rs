//! High-level model wrappers.
//!
//! - [`GbmModel`]: gradient boosted tree ensemble
//! - [`ModelMeta`] / [`TaskKind`]: shared model metadata

mod meta;
pub mod gbm;

pub use gbm::GbmModel;
pub use meta::{ModelMeta, TaskKind};
