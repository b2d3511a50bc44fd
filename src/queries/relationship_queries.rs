use crate::db::FamilyStore;
use crate::error::FamResult;
use crate::model::{Id, Person, RelationshipEdge};

/// Edges that start at `person_id`, sorted by their order hint.
pub fn outgoing_relationships<S: FamilyStore + ?Sized>(
    store: &S,
    person_id: Id<Person>,
) -> FamResult<Vec<RelationshipEdge>> {
    let mut edges: Vec<RelationshipEdge> = store
        .edges_touching(person_id)?
        .into_iter()
        .filter(|edge| edge.from == person_id)
        .collect();
    edges.sort_by_key(|edge| edge.order);
    Ok(edges)
}
