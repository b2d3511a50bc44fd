pub mod ids;
pub mod user;
pub mod person;
pub mod relationship;
pub mod tree;

// Re-exports for convenience
pub use ids::Id;
pub use user::User;
pub use person::{Gender, LifeStatus, Person};
pub use relationship::{DesiredRelationship, EdgeKey, RelationType, RelationshipEdge};
pub use tree::{filter_attributes, Attributes, Direction, DisplayNode, NodeRelation, TreeNode};
