//! Tabular frames, schemas, and data import.
//!
//! The [`Dataset`] type is the in-memory frame all training and prediction
//! operates on. Features are stored feature-major (`[n_features, n_samples]`)
//! so per-feature scans during tree growth are contiguous. Frames are built
//! either programmatically via [`DatasetBuilder`] or imported from CSV via
//! [`io::load_csv`].

mod dataset;
pub mod io;
mod schema;
mod traits;
mod views;

pub use dataset::{Dataset, DatasetBuilder, DatasetError};
pub use schema::{DatasetSchema, FeatureMeta, FeatureType};
pub use traits::SampleValues;
pub use views::{FeaturesView, SampleRef, TargetsView, WeightsView};
