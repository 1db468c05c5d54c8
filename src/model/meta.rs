//! Model metadata.

use serde::{Deserialize, Serialize};

use crate::data::FeatureType;

/// Type of machine learning task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Regression (continuous target).
    #[default]
    Regression,
    /// Binary classification (2 classes).
    BinaryClassification,
}

impl TaskKind {
    /// Number of output groups for this task.
    pub fn n_groups(&self) -> usize {
        1
    }

    pub fn is_classification(&self) -> bool {
        matches!(self, Self::BinaryClassification)
    }

    pub fn is_regression(&self) -> bool {
        matches!(self, Self::Regression)
    }
}

/// Shared metadata describing a trained model's shape and context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMeta {
    /// Feature names in training order, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    /// Feature types in training order, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_types: Option<Vec<FeatureType>>,
    /// Number of features the model was trained on.
    pub n_features: usize,
    /// Number of output groups.
    pub n_groups: usize,
    /// Task type.
    pub task: TaskKind,
    /// Per-group base scores.
    pub base_scores: Vec<f32>,
    /// Best boosting round when early stopping truncated the forest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_iteration: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_kind_predicates() {
        assert!(TaskKind::Regression.is_regression());
        assert!(!TaskKind::Regression.is_classification());
        assert!(TaskKind::BinaryClassification.is_classification());
        assert_eq!(TaskKind::BinaryClassification.n_groups(), 1);
    }

    #[test]
    fn meta_serde_round_trip() {
        let meta = ModelMeta {
            feature_names: Some(vec!["a".into(), "b".into()]),
            feature_types: Some(vec![FeatureType::Numeric, FeatureType::Categorical]),
            n_features: 2,
            n_groups: 1,
            task: TaskKind::Regression,
            base_scores: vec![0.5],
            best_iteration: None,
        };
        let json = serde_json::to_string(&meta).unwrap();
        let back: ModelMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(back.feature_names, meta.feature_names);
        assert_eq!(back.n_features, 2);
        assert_eq!(back.task, TaskKind::Regression);
    }
}
