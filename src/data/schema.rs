//! Feature type definitions.
//!
//! Schema types describing the structure of a [`Dataset`](super::Dataset).

use serde::{Deserialize, Serialize};

/// Logical feature types.
///
/// Features are stored as `f32` regardless of type. The `FeatureType`
/// indicates how to interpret the values during split finding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureType {
    /// Continuous numeric feature.
    ///
    /// Missing values: `f32::NAN`
    #[default]
    Numeric,

    /// Categorical feature stored as float, interpreted as integer
    /// category ID.
    ///
    /// Missing values: `f32::NAN`
    /// Valid categories: `0.0, 1.0, 2.0, ..., n_levels-1.0`
    Categorical,
}

impl FeatureType {
    /// Returns true if this is a categorical feature.
    #[inline]
    pub fn is_categorical(&self) -> bool {
        matches!(self, FeatureType::Categorical)
    }

    /// Returns true if this is a numeric feature.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, FeatureType::Numeric)
    }
}

/// Metadata for a single feature.
#[derive(Clone, Debug, Default)]
pub struct FeatureMeta {
    /// Feature name (optional).
    pub name: Option<String>,

    /// Feature type.
    pub feature_type: FeatureType,

    /// Level names for categorical features, in category-ID order.
    ///
    /// `None` for numeric features (or categorical features whose levels
    /// are unknown).
    pub levels: Option<Vec<String>>,
}

impl FeatureMeta {
    /// Create metadata for a numeric feature.
    pub fn numeric() -> Self {
        Self::default()
    }

    /// Create metadata for a numeric feature with a name.
    pub fn numeric_named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Create metadata for a categorical feature.
    pub fn categorical() -> Self {
        Self {
            feature_type: FeatureType::Categorical,
            ..Self::default()
        }
    }

    /// Create metadata for a categorical feature with a name.
    pub fn categorical_named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            feature_type: FeatureType::Categorical,
            levels: None,
        }
    }

    /// Set the feature name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set categorical level names (category-ID order).
    pub fn with_levels(mut self, levels: Vec<String>) -> Self {
        self.levels = Some(levels);
        self
    }
}

/// Schema describing the dataset structure.
///
/// Contains per-feature metadata and name-based lookup.
#[derive(Clone, Debug, Default)]
pub struct DatasetSchema {
    features: Vec<FeatureMeta>,
}

impl DatasetSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a schema with the given feature metadata.
    pub fn from_features(features: Vec<FeatureMeta>) -> Self {
        Self { features }
    }

    /// Create a schema where all features are numeric and unnamed.
    pub fn all_numeric(n_features: usize) -> Self {
        Self {
            features: vec![FeatureMeta::numeric(); n_features],
        }
    }

    /// Number of features.
    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    /// Get the type of a feature.
    ///
    /// # Panics
    ///
    /// Panics if `feature` is out of range.
    pub fn feature_type(&self, feature: usize) -> FeatureType {
        self.features[feature].feature_type
    }

    /// Get the name of a feature, if it has one.
    pub fn feature_name(&self, feature: usize) -> Option<&str> {
        self.features[feature].name.as_deref()
    }

    /// Get the metadata of a feature.
    pub fn feature(&self, feature: usize) -> &FeatureMeta {
        &self.features[feature]
    }

    /// Look up a feature index by name.
    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.features
            .iter()
            .position(|m| m.name.as_deref() == Some(name))
    }

    /// Check if any feature is categorical.
    pub fn has_categorical(&self) -> bool {
        self.features
            .iter()
            .any(|m| m.feature_type.is_categorical())
    }

    /// Iterate over feature metadata.
    pub fn iter(&self) -> impl Iterator<Item = &FeatureMeta> {
        self.features.iter()
    }

    /// Collect all feature names, if every feature is named.
    pub fn names(&self) -> Option<Vec<String>> {
        self.features
            .iter()
            .map(|m| m.name.clone())
            .collect::<Option<Vec<_>>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_type_predicates() {
        assert!(FeatureType::Numeric.is_numeric());
        assert!(!FeatureType::Numeric.is_categorical());
        assert!(FeatureType::Categorical.is_categorical());
    }

    #[test]
    fn schema_all_numeric() {
        let schema = DatasetSchema::all_numeric(3);
        assert_eq!(schema.n_features(), 3);
        assert!(!schema.has_categorical());
        assert_eq!(schema.feature_type(1), FeatureType::Numeric);
        assert_eq!(schema.feature_name(1), None);
    }

    #[test]
    fn schema_lookup_by_name() {
        let schema = DatasetSchema::from_features(vec![
            FeatureMeta::numeric_named("age"),
            FeatureMeta::categorical_named("color"),
        ]);
        assert_eq!(schema.feature_index("color"), Some(1));
        assert_eq!(schema.feature_index("missing"), None);
        assert!(schema.has_categorical());
    }

    #[test]
    fn schema_names_requires_all_named() {
        let named = DatasetSchema::from_features(vec![
            FeatureMeta::numeric_named("a"),
            FeatureMeta::numeric_named("b"),
        ]);
        assert_eq!(named.names(), Some(vec!["a".to_string(), "b".to_string()]));

        let partial =
            DatasetSchema::from_features(vec![FeatureMeta::numeric_named("a"), FeatureMeta::numeric()]);
        assert_eq!(partial.names(), None);
    }

    #[test]
    fn categorical_levels() {
        let meta = FeatureMeta::categorical_named("carrier")
            .with_levels(vec!["AA".into(), "UA".into()]);
        assert_eq!(meta.levels.as_ref().map(|l| l.len()), Some(2));
    }
}
