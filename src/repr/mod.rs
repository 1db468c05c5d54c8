//! Model representations optimized for inference and storage.

mod forest;
mod tree;

pub use forest::Forest;
pub use tree::{MutableTree, NodeId, SplitKind, Tree, TreeValidationError};
