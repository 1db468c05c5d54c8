//! Canonical tree representation (SoA) and mutable construction API.
//!
//! This module provides:
//! - [`Tree`]: Immutable SoA tree storage for efficient traversal
//! - [`MutableTree`]: Builder for constructing trees during training
//!
//! Trees store scalar leaf values. Splits are either numeric
//! (`value < threshold` goes left) or categorical one-hot
//! (`value == category` goes left); missing values follow the node's
//! recorded default direction.

use serde::{Deserialize, Serialize};

use crate::data::SampleValues;

/// Node index within a single tree (0 = root).
pub type NodeId = u32;

/// How a split node routes non-missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitKind {
    /// `value < threshold` goes left.
    Numeric,
    /// `value == threshold` (a category code) goes left.
    Categorical,
}

/// Structural validation errors for [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeValidationError {
    /// Tree has no nodes.
    #[error("tree has no nodes")]
    EmptyTree,
    /// A child pointer references an out-of-bounds node.
    #[error("node {node}: {side} child {child} out of bounds ({n_nodes} nodes)")]
    ChildOutOfBounds {
        node: NodeId,
        side: &'static str,
        child: NodeId,
        n_nodes: usize,
    },
    /// A node references itself as a child.
    #[error("node {node} references itself as a child")]
    SelfLoop { node: NodeId },
    /// A node was reached by more than one path (DAG) or due to a cycle.
    #[error("node {node} reached by more than one path")]
    DuplicateVisit { node: NodeId },
    /// A cycle was detected during traversal.
    #[error("cycle detected at node {node}")]
    CycleDetected { node: NodeId },
    /// A node exists in storage but is unreachable from the root.
    #[error("node {node} is unreachable from the root")]
    UnreachableNode { node: NodeId },
    /// A leaf holds a NaN or infinite value.
    #[error("leaf {node} holds a non-finite value")]
    NonFiniteLeaf { node: NodeId },
}

/// Structure-of-Arrays tree storage for efficient traversal.
///
/// Stores tree nodes in flat arrays for cache-friendly traversal.
/// Child indices are local to this tree (0 = root).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    split_indices: Box<[u32]>,
    split_thresholds: Box<[f32]>,
    split_kinds: Box<[SplitKind]>,
    left_children: Box<[u32]>,
    right_children: Box<[u32]>,
    default_left: Box<[bool]>,
    is_leaf: Box<[bool]>,
    leaf_values: Box<[f32]>,
}

impl Tree {
    /// Create a tree containing a single leaf.
    pub fn single_leaf(value: f32) -> Self {
        let mut tree = MutableTree::new();
        tree.new_leaf(value);
        tree.freeze()
    }

    /// Number of nodes in this tree.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    /// Number of leaf nodes.
    pub fn n_leaves(&self) -> usize {
        self.is_leaf.iter().filter(|&&leaf| leaf).count()
    }

    /// Check if a node is a leaf.
    #[inline]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.is_leaf[node as usize]
    }

    /// Get split feature index for a node.
    #[inline]
    pub fn split_index(&self, node: NodeId) -> u32 {
        self.split_indices[node as usize]
    }

    /// Get split threshold for a node.
    ///
    /// For categorical splits this is the category code encoded as a float.
    #[inline]
    pub fn split_threshold(&self, node: NodeId) -> f32 {
        self.split_thresholds[node as usize]
    }

    /// Get split kind for a node.
    #[inline]
    pub fn split_kind(&self, node: NodeId) -> SplitKind {
        self.split_kinds[node as usize]
    }

    /// Get left child index.
    #[inline]
    pub fn left_child(&self, node: NodeId) -> NodeId {
        self.left_children[node as usize]
    }

    /// Get right child index.
    #[inline]
    pub fn right_child(&self, node: NodeId) -> NodeId {
        self.right_children[node as usize]
    }

    /// Get default direction for missing values.
    #[inline]
    pub fn default_left(&self, node: NodeId) -> bool {
        self.default_left[node as usize]
    }

    /// Get leaf value for a node.
    #[inline]
    pub fn leaf_value(&self, node: NodeId) -> f32 {
        self.leaf_values[node as usize]
    }

    /// Traverse the tree to find the leaf value for the given sample.
    pub fn predict_row(&self, sample: impl SampleValues) -> f32 {
        let mut idx: NodeId = 0; // Start at root

        while !self.is_leaf(idx) {
            let fvalue = sample.value(self.split_index(idx) as usize);

            let go_left = if fvalue.is_nan() {
                self.default_left(idx)
            } else {
                match self.split_kind(idx) {
                    SplitKind::Numeric => fvalue < self.split_threshold(idx),
                    SplitKind::Categorical => fvalue == self.split_threshold(idx),
                }
            };

            idx = if go_left {
                self.left_child(idx)
            } else {
                self.right_child(idx)
            };
        }

        self.leaf_value(idx)
    }

    /// Validate basic structural invariants for this tree.
    ///
    /// Intended for debug checks and tests.
    pub fn validate(&self) -> Result<(), TreeValidationError> {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }

        // Iterative DFS with color marking.
        // 0 = unvisited, 1 = visiting, 2 = done
        let mut color = vec![0u8; n_nodes];
        let mut stack: Vec<(NodeId, u8)> = vec![(0, 0)];

        while let Some((node, phase)) = stack.pop() {
            let node_usize = node as usize;

            match phase {
                0 => {
                    match color[node_usize] {
                        0 => {}
                        1 => return Err(TreeValidationError::CycleDetected { node }),
                        2 => return Err(TreeValidationError::DuplicateVisit { node }),
                        _ => unreachable!(),
                    }

                    color[node_usize] = 1;
                    stack.push((node, 1));

                    if !self.is_leaf(node) {
                        let left = self.left_child(node);
                        let right = self.right_child(node);

                        if left == node || right == node {
                            return Err(TreeValidationError::SelfLoop { node });
                        }

                        if left as usize >= n_nodes {
                            return Err(TreeValidationError::ChildOutOfBounds {
                                node,
                                side: "left",
                                child: left,
                                n_nodes,
                            });
                        }
                        if right as usize >= n_nodes {
                            return Err(TreeValidationError::ChildOutOfBounds {
                                node,
                                side: "right",
                                child: right,
                                n_nodes,
                            });
                        }

                        // Visit children
                        stack.push((right, 0));
                        stack.push((left, 0));
                    }
                }
                1 => {
                    color[node_usize] = 2;
                }
                _ => unreachable!(),
            }
        }

        for (i, &c) in color.iter().enumerate() {
            if c == 0 {
                return Err(TreeValidationError::UnreachableNode { node: i as u32 });
            }
        }

        for i in 0..n_nodes {
            if self.is_leaf[i] && !self.leaf_values[i].is_finite() {
                return Err(TreeValidationError::NonFiniteLeaf { node: i as u32 });
            }
        }

        Ok(())
    }
}

/// Mutable tree under construction during training.
///
/// Nodes start as leaves and are converted to splits via
/// [`MutableTree::apply_split`], which appends two fresh leaf children.
/// [`MutableTree::freeze`] produces the immutable [`Tree`].
#[derive(Debug, Clone, Default)]
pub struct MutableTree {
    split_indices: Vec<u32>,
    split_thresholds: Vec<f32>,
    split_kinds: Vec<SplitKind>,
    left_children: Vec<u32>,
    right_children: Vec<u32>,
    default_left: Vec<bool>,
    is_leaf: Vec<bool>,
    leaf_values: Vec<f32>,
}

impl MutableTree {
    /// Create an empty tree under construction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes allocated so far.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    /// Append a new leaf node and return its id.
    pub fn new_leaf(&mut self, value: f32) -> NodeId {
        let id = self.n_nodes() as NodeId;
        self.split_indices.push(0);
        self.split_thresholds.push(0.0);
        self.split_kinds.push(SplitKind::Numeric);
        self.left_children.push(0);
        self.right_children.push(0);
        self.default_left.push(false);
        self.is_leaf.push(true);
        self.leaf_values.push(value);
        id
    }

    /// Update the value stored at a leaf.
    pub fn set_leaf_value(&mut self, node: NodeId, value: f32) {
        debug_assert!(self.is_leaf[node as usize]);
        self.leaf_values[node as usize] = value;
    }

    /// Convert a leaf into a split node with two fresh leaf children.
    ///
    /// Returns `(left, right)` child ids.
    pub fn apply_split(
        &mut self,
        node: NodeId,
        feature: u32,
        kind: SplitKind,
        threshold: f32,
        default_left: bool,
        left_value: f32,
        right_value: f32,
    ) -> (NodeId, NodeId) {
        debug_assert!(self.is_leaf[node as usize], "can only split a leaf");

        let left = self.new_leaf(left_value);
        let right = self.new_leaf(right_value);

        let n = node as usize;
        self.split_indices[n] = feature;
        self.split_thresholds[n] = threshold;
        self.split_kinds[n] = kind;
        self.left_children[n] = left;
        self.right_children[n] = right;
        self.default_left[n] = default_left;
        self.is_leaf[n] = false;
        self.leaf_values[n] = 0.0;

        (left, right)
    }

    /// Finalize into an immutable [`Tree`].
    pub fn freeze(self) -> Tree {
        Tree {
            split_indices: self.split_indices.into_boxed_slice(),
            split_thresholds: self.split_thresholds.into_boxed_slice(),
            split_kinds: self.split_kinds.into_boxed_slice(),
            left_children: self.left_children.into_boxed_slice(),
            right_children: self.right_children.into_boxed_slice(),
            default_left: self.default_left.into_boxed_slice(),
            is_leaf: self.is_leaf.into_boxed_slice(),
            leaf_values: self.leaf_values.into_boxed_slice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Depth-1 tree: `x0 < threshold` -> left leaf, else right leaf.
    fn stump(threshold: f32, left: f32, right: f32, default_left: bool) -> Tree {
        let mut tree = MutableTree::new();
        let root = tree.new_leaf(0.0);
        tree.apply_split(
            root,
            0,
            SplitKind::Numeric,
            threshold,
            default_left,
            left,
            right,
        );
        tree.freeze()
    }

    #[test]
    fn single_leaf_predicts_constant() {
        let tree = Tree::single_leaf(1.5);
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict_row([0.0f32].as_slice()), 1.5);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn numeric_split_routes_left_right() {
        let tree = stump(2.0, -1.0, 1.0, true);
        assert_eq!(tree.predict_row([1.0f32].as_slice()), -1.0);
        assert_eq!(tree.predict_row([2.0f32].as_slice()), 1.0); // not strictly less
        assert_eq!(tree.predict_row([3.0f32].as_slice()), 1.0);
    }

    #[test]
    fn missing_values_follow_default_direction() {
        let left_default = stump(2.0, -1.0, 1.0, true);
        let right_default = stump(2.0, -1.0, 1.0, false);
        assert_eq!(left_default.predict_row([f32::NAN].as_slice()), -1.0);
        assert_eq!(right_default.predict_row([f32::NAN].as_slice()), 1.0);
    }

    #[test]
    fn categorical_split_matches_single_level() {
        let mut tree = MutableTree::new();
        let root = tree.new_leaf(0.0);
        tree.apply_split(root, 0, SplitKind::Categorical, 2.0, false, 10.0, 20.0);
        let tree = tree.freeze();

        assert_eq!(tree.predict_row([2.0f32].as_slice()), 10.0);
        assert_eq!(tree.predict_row([1.0f32].as_slice()), 20.0);
        assert_eq!(tree.predict_row([3.0f32].as_slice()), 20.0);
        assert_eq!(tree.predict_row([f32::NAN].as_slice()), 20.0);
    }

    #[test]
    fn deeper_tree_traversal() {
        let mut tree = MutableTree::new();
        let root = tree.new_leaf(0.0);
        let (left, _right) = tree.apply_split(root, 0, SplitKind::Numeric, 5.0, true, 0.0, 9.0);
        tree.apply_split(left, 1, SplitKind::Numeric, 1.0, false, 3.0, 4.0);
        let tree = tree.freeze();

        assert_eq!(tree.n_nodes(), 5);
        assert_eq!(tree.n_leaves(), 3);
        assert!(tree.validate().is_ok());
        assert_eq!(tree.predict_row([1.0f32, 0.5].as_slice()), 3.0);
        assert_eq!(tree.predict_row([1.0f32, 2.0].as_slice()), 4.0);
        assert_eq!(tree.predict_row([7.0f32, 0.5].as_slice()), 9.0);
    }

    #[test]
    fn validate_rejects_self_loop() {
        // Hand-build a broken tree through serde to bypass the builder.
        let json = serde_json::json!({
            "split_indices": [0],
            "split_thresholds": [0.5],
            "split_kinds": ["Numeric"],
            "left_children": [0],
            "right_children": [0],
            "default_left": [false],
            "is_leaf": [false],
            "leaf_values": [0.0]
        });
        let tree: Tree = serde_json::from_value(json).unwrap();
        assert_eq!(
            tree.validate(),
            Err(TreeValidationError::SelfLoop { node: 0 })
        );
    }

    #[test]
    fn validate_rejects_out_of_bounds_child() {
        let json = serde_json::json!({
            "split_indices": [0, 0],
            "split_thresholds": [0.5, 0.0],
            "split_kinds": ["Numeric", "Numeric"],
            "left_children": [1, 0],
            "right_children": [7, 0],
            "default_left": [false, false],
            "is_leaf": [false, true],
            "leaf_values": [0.0, 1.0]
        });
        let tree: Tree = serde_json::from_value(json).unwrap();
        assert_eq!(
            tree.validate(),
            Err(TreeValidationError::ChildOutOfBounds {
                node: 0,
                side: "right",
                child: 7,
                n_nodes: 2
            })
        );
    }

    #[test]
    fn validate_rejects_non_finite_leaf() {
        let tree = Tree::single_leaf(f32::NAN);
        assert_eq!(
            tree.validate(),
            Err(TreeValidationError::NonFiniteLeaf { node: 0 })
        );
    }

    #[test]
    fn validation_errors_display_and_propagate() {
        let err = TreeValidationError::ChildOutOfBounds {
            node: 0,
            side: "right",
            child: 7,
            n_nodes: 2,
        };
        assert_eq!(
            err.to_string(),
            "node 0: right child 7 out of bounds (2 nodes)"
        );
        // Must be a real error type so callers can wrap it with `?`.
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn serde_round_trip() {
        let tree = stump(2.0, -1.0, 1.0, true);
        let json = serde_json::to_string(&tree).unwrap();
        let back: Tree = serde_json::from_str(&json).unwrap();
        assert_eq!(back.n_nodes(), tree.n_nodes());
        assert_eq!(back.predict_row([1.0f32].as_slice()), -1.0);
    }
}
