use crate::error::FamResult;
use crate::model::{Id, Person, RelationshipEdge};

/// Read/write access to people and relationship edges.
///
/// Implementations only ever return live records: soft-deleted people and
/// edges are invisible to `get_person` and `edges_touching`.
pub trait FamilyStore {
    fn get_person(&self, id: Id<Person>) -> FamResult<Option<Person>>;

    /// Every live edge with `person_id` as either endpoint.
    fn edges_touching(&self, person_id: Id<Person>) -> FamResult<Vec<RelationshipEdge>>;

    fn insert_edges(&self, edges: &[RelationshipEdge]) -> FamResult<()>;

    /// Updates an existing edge by id. Only `order` is expected to change.
    fn update_edge(&self, edge: &RelationshipEdge) -> FamResult<()>;

    fn soft_delete_edges(&self, ids: &[Id<RelationshipEdge>]) -> FamResult<()>;
}
