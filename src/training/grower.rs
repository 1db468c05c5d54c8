//! Exact greedy depth-wise tree growth.
//!
//! The grower works directly on raw feature values: numeric splits come
//! from a sorted scan over each feature, categorical splits are one-hot
//! on category IDs. Missing (NaN) values are routed to whichever side of
//! a candidate split yields the higher gain, and that direction is
//! recorded as the node's default.

use rayon::prelude::*;

use crate::data::{FeatureType, FeaturesView};
use crate::repr::{MutableTree, NodeId, SplitKind, Tree};
use crate::utils::Parallelism;

use super::gradients::GradPair;

/// Gain computation and pruning parameters.
#[derive(Debug, Clone)]
pub struct GainParams {
    /// L2 regularization on leaf weights.
    pub lambda: f32,
    /// Minimum sum of hessians on each side of a split.
    pub min_child_weight: f32,
    /// Minimum gain required to accept a split.
    pub min_split_gain: f32,
}

impl Default for GainParams {
    fn default() -> Self {
        Self {
            lambda: 0.0,
            min_child_weight: 1.0,
            min_split_gain: 0.0,
        }
    }
}

/// Parameters for growing a single tree.
#[derive(Debug, Clone)]
pub struct GrowerParams {
    /// Maximum tree depth (root is depth 0).
    pub max_depth: u32,
    /// Shrinkage applied to leaf weights.
    pub learning_rate: f32,
    /// Gain and pruning parameters.
    pub gain: GainParams,
}

impl Default for GrowerParams {
    fn default() -> Self {
        Self {
            max_depth: 5,
            learning_rate: 0.1,
            gain: GainParams::default(),
        }
    }
}

/// Accumulated gradient statistics for a set of rows.
///
/// Sums are kept in f64; per-sample pairs are f32 and large nodes would
/// otherwise lose precision during the scan.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct GradStats {
    grad: f64,
    hess: f64,
}

impl GradStats {
    #[inline]
    fn add(&mut self, gp: GradPair) {
        self.grad += gp.grad as f64;
        self.hess += gp.hess as f64;
    }

    #[inline]
    fn minus(&self, other: &GradStats) -> GradStats {
        GradStats {
            grad: self.grad - other.grad,
            hess: self.hess - other.hess,
        }
    }

    #[inline]
    fn plus(&self, other: &GradStats) -> GradStats {
        GradStats {
            grad: self.grad + other.grad,
            hess: self.hess + other.hess,
        }
    }

    /// Structure score G²/(H+λ).
    #[inline]
    fn score(&self, lambda: f64) -> f64 {
        (self.grad * self.grad) / (self.hess + lambda)
    }

    /// Newton leaf weight -G/(H+λ).
    #[inline]
    fn leaf_weight(&self, lambda: f64) -> f32 {
        if self.hess + lambda > 0.0 {
            (-self.grad / (self.hess + lambda)) as f32
        } else {
            0.0
        }
    }
}

/// Best split found for one node.
#[derive(Debug, Clone)]
struct SplitCandidate {
    feature: u32,
    kind: SplitKind,
    threshold: f32,
    default_left: bool,
    gain: f64,
}

/// Grows one tree per call from gradient pairs.
#[derive(Debug, Clone)]
pub struct TreeGrower {
    params: GrowerParams,
}

impl TreeGrower {
    pub fn new(params: GrowerParams) -> Self {
        Self { params }
    }

    /// Grow a tree on the given rows.
    ///
    /// `grad_pairs` is indexed by absolute row id; `rows` selects the
    /// (possibly subsampled) rows to train on.
    pub fn grow(
        &self,
        features: FeaturesView<'_>,
        grad_pairs: &[GradPair],
        rows: &[u32],
        parallelism: Parallelism,
    ) -> Tree {
        let lambda = self.params.gain.lambda as f64;
        let lr = self.params.learning_rate;

        let mut root_stats = GradStats::default();
        for &row in rows {
            root_stats.add(grad_pairs[row as usize]);
        }

        let mut tree = MutableTree::new();
        let root = tree.new_leaf(root_stats.leaf_weight(lambda) * lr);

        // Depth-wise worklist: (node, rows, stats, depth).
        let mut worklist: Vec<(NodeId, Vec<u32>, GradStats, u32)> =
            vec![(root, rows.to_vec(), root_stats, 0)];

        while let Some((node, node_rows, stats, depth)) = worklist.pop() {
            if depth >= self.params.max_depth {
                continue;
            }
            if stats.hess < 2.0 * self.params.gain.min_child_weight as f64 {
                // Neither side could satisfy min_child_weight.
                continue;
            }

            let best = match self.find_best_split(features, grad_pairs, &node_rows, &stats, parallelism)
            {
                Some(best) => best,
                None => continue,
            };

            let (left_rows, right_rows, left_stats, right_stats) =
                partition_rows(features, grad_pairs, &node_rows, &best);

            let (left, right) = tree.apply_split(
                node,
                best.feature,
                best.kind,
                best.threshold,
                best.default_left,
                left_stats.leaf_weight(lambda) * lr,
                right_stats.leaf_weight(lambda) * lr,
            );

            worklist.push((left, left_rows, left_stats, depth + 1));
            worklist.push((right, right_rows, right_stats, depth + 1));
        }

        tree.freeze()
    }

    /// Search all features for the best split of one node.
    fn find_best_split(
        &self,
        features: FeaturesView<'_>,
        grad_pairs: &[GradPair],
        rows: &[u32],
        stats: &GradStats,
        parallelism: Parallelism,
    ) -> Option<SplitCandidate> {
        let n_features = features.n_features();

        let per_feature = |feature: usize| -> Option<SplitCandidate> {
            match features.feature_type(feature) {
                FeatureType::Numeric => {
                    self.best_numeric_split(features, grad_pairs, rows, stats, feature)
                }
                FeatureType::Categorical => {
                    self.best_categorical_split(features, grad_pairs, rows, stats, feature)
                }
            }
        };

        let best = if parallelism.is_parallel() {
            (0..n_features)
                .into_par_iter()
                .filter_map(per_feature)
                .max_by(compare_candidates)
        } else {
            (0..n_features).filter_map(per_feature).max_by(compare_candidates)
        };

        best.filter(|c| c.gain > self.params.gain.min_split_gain as f64)
    }

    /// Sorted scan over one numeric feature.
    fn best_numeric_split(
        &self,
        features: FeaturesView<'_>,
        grad_pairs: &[GradPair],
        rows: &[u32],
        stats: &GradStats,
        feature: usize,
    ) -> Option<SplitCandidate> {
        let mut finite: Vec<(f32, GradPair)> = Vec::with_capacity(rows.len());
        let mut missing = GradStats::default();
        for &row in rows {
            let value = features.get(row as usize, feature);
            let gp = grad_pairs[row as usize];
            if value.is_nan() {
                missing.add(gp);
            } else {
                finite.push((value, gp));
            }
        }
        if finite.len() < 2 {
            return None;
        }
        finite.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

        let mut best: Option<SplitCandidate> = None;
        let mut prefix = GradStats::default();
        let mut prev_value = finite[0].0;

        for &(value, gp) in &finite {
            if value != prev_value {
                // Boundary between distinct values: threshold is the
                // midpoint, nudged up to `value` when rounding collapses it.
                let mut threshold = prev_value + (value - prev_value) * 0.5;
                if threshold <= prev_value {
                    threshold = value;
                }

                self.consider(
                    &mut best,
                    stats,
                    &missing,
                    &prefix,
                    feature,
                    SplitKind::Numeric,
                    threshold,
                );
                prev_value = value;
            }
            prefix.add(gp);
        }

        best
    }

    /// One-hot scan over one categorical feature.
    fn best_categorical_split(
        &self,
        features: FeaturesView<'_>,
        grad_pairs: &[GradPair],
        rows: &[u32],
        stats: &GradStats,
        feature: usize,
    ) -> Option<SplitCandidate> {
        let mut per_category: Vec<GradStats> = Vec::new();
        let mut seen: Vec<bool> = Vec::new();
        let mut missing = GradStats::default();

        for &row in rows {
            let value = features.get(row as usize, feature);
            let gp = grad_pairs[row as usize];
            if value.is_nan() {
                missing.add(gp);
                continue;
            }
            let category = value as usize;
            if category >= per_category.len() {
                per_category.resize(category + 1, GradStats::default());
                seen.resize(category + 1, false);
            }
            per_category[category].add(gp);
            seen[category] = true;
        }

        let mut best: Option<SplitCandidate> = None;
        for (category, cat_stats) in per_category.iter().enumerate() {
            if !seen[category] {
                continue;
            }
            self.consider(
                &mut best,
                stats,
                &missing,
                cat_stats,
                feature,
                SplitKind::Categorical,
                category as f32,
            );
        }

        best
    }

    /// Evaluate one candidate boundary with missing values on either side.
    ///
    /// `finite_left` holds the non-missing rows that the candidate sends
    /// left (sorted prefix for numeric, the matching category for
    /// categorical).
    #[allow(clippy::too_many_arguments)]
    fn consider(
        &self,
        best: &mut Option<SplitCandidate>,
        stats: &GradStats,
        missing: &GradStats,
        finite_left: &GradStats,
        feature: usize,
        kind: SplitKind,
        threshold: f32,
    ) {
        let lambda = self.params.gain.lambda as f64;
        let min_child_weight = self.params.gain.min_child_weight as f64;
        let parent_score = stats.score(lambda);

        for default_left in [false, true] {
            let left = if default_left {
                finite_left.plus(missing)
            } else {
                *finite_left
            };
            let right = stats.minus(&left);

            if left.hess < min_child_weight || right.hess < min_child_weight {
                continue;
            }

            let gain = 0.5 * (left.score(lambda) + right.score(lambda) - parent_score);
            let candidate = SplitCandidate {
                feature: feature as u32,
                kind,
                threshold,
                default_left,
                gain,
            };
            if best
                .as_ref()
                .map(|b| compare_candidates(b, &candidate) == std::cmp::Ordering::Less)
                .unwrap_or(true)
            {
                *best = Some(candidate);
            }
        }
    }
}

/// Total order on candidates: higher gain wins, ties go to the lower
/// feature index and then the lower threshold so parallel and sequential
/// searches agree.
fn compare_candidates(a: &SplitCandidate, b: &SplitCandidate) -> std::cmp::Ordering {
    a.gain
        .total_cmp(&b.gain)
        .then_with(|| b.feature.cmp(&a.feature))
        .then_with(|| b.threshold.total_cmp(&a.threshold))
}

/// Route a single value through a split.
#[inline]
fn goes_left(value: f32, candidate: &SplitCandidate) -> bool {
    if value.is_nan() {
        candidate.default_left
    } else {
        match candidate.kind {
            SplitKind::Numeric => value < candidate.threshold,
            SplitKind::Categorical => value == candidate.threshold,
        }
    }
}

fn partition_rows(
    features: FeaturesView<'_>,
    grad_pairs: &[GradPair],
    rows: &[u32],
    candidate: &SplitCandidate,
) -> (Vec<u32>, Vec<u32>, GradStats, GradStats) {
    let mut left_rows = Vec::new();
    let mut right_rows = Vec::new();
    let mut left_stats = GradStats::default();
    let mut right_stats = GradStats::default();

    for &row in rows {
        let value = features.get(row as usize, candidate.feature as usize);
        if goes_left(value, candidate) {
            left_rows.push(row);
            left_stats.add(grad_pairs[row as usize]);
        } else {
            right_rows.push(row);
            right_stats.add(grad_pairs[row as usize]);
        }
    }

    (left_rows, right_rows, left_stats, right_stats)
}
