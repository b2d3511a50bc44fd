use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use log::debug;

use super::store::FamilyStore;
use crate::error::{FamError, FamResult};
use crate::model::{Id, Person, RelationType, RelationshipEdge};

/// Store operations that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    GetPerson,
    EdgesTouching,
    InsertEdges,
    UpdateEdge,
    SoftDeleteEdges,
}

#[derive(Debug, Clone)]
struct StoredEdge {
    edge: RelationshipEdge,
    deleted: bool,
}

/// In-memory store. Edges keep insertion order, so traversal order is
/// deterministic for a given setup.
#[derive(Debug, Default)]
pub struct MemoryStore {
    people: RefCell<HashMap<Id<Person>, Person>>,
    removed_people: RefCell<HashSet<Id<Person>>>,
    edges: RefCell<Vec<StoredEdge>>,
    failing: RefCell<HashSet<StoreOp>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_person(&self, person: Person) -> Id<Person> {
        let id = person.id;
        self.people.borrow_mut().insert(id, person);
        self.removed_people.borrow_mut().remove(&id);
        id
    }

    /// Soft-deletes a person. Their edges stay, so relatives still point at
    /// an id that no longer resolves.
    pub fn remove_person(&self, id: Id<Person>) {
        self.removed_people.borrow_mut().insert(id);
    }

    /// Inserts one raw edge with no inverse.
    pub fn add_edge(&self, edge: RelationshipEdge) {
        self.edges.borrow_mut().push(StoredEdge {
            edge,
            deleted: false,
        });
    }

    /// Inserts an edge and its inverse.
    pub fn connect(&self, from: Id<Person>, to: Id<Person>, relation_type: RelationType, order: i64) {
        self.add_edge(RelationshipEdge::create(from, to, relation_type, order));
        self.add_edge(RelationshipEdge::create(to, from, relation_type.inverse(), order));
    }

    /// Makes every later call of `op` fail with `StoreUnavailable`.
    pub fn fail_on(&self, op: StoreOp) {
        self.failing.borrow_mut().insert(op);
    }

    pub fn recover(&self, op: StoreOp) {
        self.failing.borrow_mut().remove(&op);
    }

    pub fn live_edges(&self) -> Vec<RelationshipEdge> {
        self.edges
            .borrow()
            .iter()
            .filter(|s| !s.deleted)
            .map(|s| s.edge.clone())
            .collect()
    }

    pub fn deleted_edges(&self) -> Vec<RelationshipEdge> {
        self.edges
            .borrow()
            .iter()
            .filter(|s| s.deleted)
            .map(|s| s.edge.clone())
            .collect()
    }

    fn check(&self, op: StoreOp) -> FamResult<()> {
        if self.failing.borrow().contains(&op) {
            debug!("event=store_fault module=memory op={:?}", op);
            return Err(FamError::StoreUnavailable(format!("{:?} failed", op)));
        }
        Ok(())
    }
}

impl FamilyStore for MemoryStore {
    fn get_person(&self, id: Id<Person>) -> FamResult<Option<Person>> {
        self.check(StoreOp::GetPerson)?;
        if self.removed_people.borrow().contains(&id) {
            return Ok(None);
        }
        Ok(self.people.borrow().get(&id).cloned())
    }

    fn edges_touching(&self, person_id: Id<Person>) -> FamResult<Vec<RelationshipEdge>> {
        self.check(StoreOp::EdgesTouching)?;
        Ok(self
            .edges
            .borrow()
            .iter()
            .filter(|s| !s.deleted && s.edge.touches(person_id))
            .map(|s| s.edge.clone())
            .collect())
    }

    fn insert_edges(&self, edges: &[RelationshipEdge]) -> FamResult<()> {
        self.check(StoreOp::InsertEdges)?;
        let mut stored = self.edges.borrow_mut();
        for edge in edges {
            let duplicate = stored
                .iter()
                .any(|s| !s.deleted && s.edge.key() == edge.key());
            if duplicate {
                return Err(FamError::StoreUnavailable(format!(
                    "duplicate live edge {} -> {} ({})",
                    edge.from, edge.to, edge.relation_type
                )));
            }
        }
        stored.extend(edges.iter().cloned().map(|edge| StoredEdge {
            edge,
            deleted: false,
        }));
        Ok(())
    }

    fn update_edge(&self, edge: &RelationshipEdge) -> FamResult<()> {
        self.check(StoreOp::UpdateEdge)?;
        let mut stored = self.edges.borrow_mut();
        let existing = stored
            .iter_mut()
            .find(|s| !s.deleted && s.edge.id == edge.id)
            .ok_or_else(|| FamError::NotFound {
                entity_type: "Relationship".into(),
                id: edge.id.to_string(),
            })?;
        existing.edge.order = edge.order;
        Ok(())
    }

    fn soft_delete_edges(&self, ids: &[Id<RelationshipEdge>]) -> FamResult<()> {
        self.check(StoreOp::SoftDeleteEdges)?;
        for stored in self.edges.borrow_mut().iter_mut() {
            if ids.contains(&stored.edge.id) {
                stored.deleted = true;
            }
        }
        Ok(())
    }
}
