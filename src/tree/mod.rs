//! Family tree derivation.
//!
//! A tree is built in three steps: [`builder`] walks the store into a
//! [`TreeNode`](crate::model::TreeNode) graph, [`normalize`] flattens spouses
//! and parents into tagged children, and [`couple`] folds each person and
//! spouse into a single "A & B" node for descendant views.

pub mod builder;
pub mod couple;
pub mod normalize;

pub use builder::{build_tree, TreeBuilder};
pub use couple::merge_couples;
pub use normalize::normalize;
