pub mod person_ops;
pub mod relationship_ops;
pub mod tree_ops;

pub use relationship_ops::{ReconcilePlan, ReconcileSummary};
