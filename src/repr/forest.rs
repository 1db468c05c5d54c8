//! Canonical forest representation (collection of trees).

use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use super::tree::{Tree, TreeValidationError};
use crate::utils::Parallelism;

/// Forest of decision trees.
///
/// Stores trees with their group assignments for multi-output support,
/// plus a per-group base score. Prediction sums base score and the leaf
/// values of each tree into its group's output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forest {
    trees: Vec<Tree>,
    tree_groups: Vec<u32>,
    n_groups: u32,
    base_score: Vec<f32>,
}

impl Forest {
    /// Create a new forest with the given number of groups.
    pub fn new(n_groups: u32) -> Self {
        Self {
            trees: Vec::new(),
            tree_groups: Vec::new(),
            n_groups,
            base_score: vec![0.0; n_groups as usize],
        }
    }

    /// Create a forest for regression (single output group).
    pub fn for_regression() -> Self {
        Self::new(1)
    }

    /// Set the base score for all groups.
    pub fn with_base_score(mut self, base_score: Vec<f32>) -> Self {
        debug_assert_eq!(base_score.len(), self.n_groups as usize);
        self.base_score = base_score;
        self
    }

    /// Add a tree to the forest.
    pub fn push_tree(&mut self, tree: Tree, group: u32) {
        debug_assert!(group < self.n_groups, "group out of range");
        self.trees.push(tree);
        self.tree_groups.push(group);
    }

    /// Number of trees.
    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of output groups.
    #[inline]
    pub fn n_groups(&self) -> u32 {
        self.n_groups
    }

    /// Get the base score for each group.
    #[inline]
    pub fn base_score(&self) -> &[f32] {
        &self.base_score
    }

    /// Get a reference to a specific tree.
    #[inline]
    pub fn tree(&self, idx: usize) -> &Tree {
        &self.trees[idx]
    }

    /// Get the group assignment for a tree.
    #[inline]
    pub fn tree_group(&self, idx: usize) -> u32 {
        self.tree_groups[idx]
    }

    /// Iterate over trees.
    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter()
    }

    /// Iterate over trees with their group assignments.
    pub fn trees_with_groups(&self) -> impl Iterator<Item = (&Tree, u32)> {
        self.trees
            .iter()
            .zip(self.tree_groups.iter())
            .map(|(t, &g)| (t, g))
    }

    /// Keep only the first `n_trees` trees.
    ///
    /// Used to roll back rounds rejected by early stopping.
    pub fn truncate(&mut self, n_trees: usize) {
        self.trees.truncate(n_trees);
        self.tree_groups.truncate(n_trees);
    }

    /// Validate every tree in the forest.
    pub fn validate(&self) -> Result<(), TreeValidationError> {
        for tree in &self.trees {
            tree.validate()?;
        }
        Ok(())
    }

    /// Predict raw margin scores for a single sample.
    ///
    /// `features` holds one value per feature in training order.
    /// Returns one score per group.
    pub fn predict_row(&self, features: &[f32]) -> Vec<f32> {
        let mut output = self.base_score.clone();

        for (tree, group) in self.trees_with_groups() {
            output[group as usize] += tree.predict_row(features);
        }

        output
    }

    /// Predict raw margin scores for a batch of samples.
    ///
    /// `features` is feature-major: `[n_features, n_samples]`. The output
    /// is `[n_groups, n_samples]`. Samples are scored independently, in
    /// parallel when `parallelism` allows it.
    pub fn predict_batch(&self, features: ArrayView2<f32>, parallelism: Parallelism) -> Array2<f32> {
        let n_samples = features.ncols();
        let n_groups = self.n_groups as usize;

        // Sample-major scratch so each worker writes a contiguous row.
        let mut scores = Array2::zeros((n_samples, n_groups));

        parallelism.maybe_par_bridge_for_each(
            scores.outer_iter_mut().zip(features.axis_iter(Axis(1))),
            |(mut out, sample)| {
                for (slot, &base) in out.iter_mut().zip(&self.base_score) {
                    *slot = base;
                }
                for (tree, group) in self.trees_with_groups() {
                    out[group as usize] += tree.predict_row(sample);
                }
            },
        );

        scores.reversed_axes().as_standard_layout().to_owned()
    }
}
