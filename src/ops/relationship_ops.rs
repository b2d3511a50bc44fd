use std::collections::{HashMap, HashSet};

use log::{debug, info};
use serde::Serialize;

use crate::db::FamilyStore;
use crate::error::{FamError, FamResult, ReconcileStage};
use crate::model::{DesiredRelationship, EdgeKey, Id, Person, RelationshipEdge};

/// Write batches needed to bring one person's edges in line with a
/// desired list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub to_insert: Vec<RelationshipEdge>,
    pub to_update: Vec<RelationshipEdge>,
    pub to_delete: Vec<Id<RelationshipEdge>>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.to_insert.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    pub fn summary(&self) -> ReconcileSummary {
        ReconcileSummary {
            inserted: self.to_insert.len(),
            updated: self.to_update.len(),
            deleted: self.to_delete.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

/// Diffs `desired` against `existing`. Every desired edge also brings its
/// inverse. `existing` may hold edges of other people (needed to match
/// entries with an overridden `from`); only unmatched edges touching
/// `person_id` are deleted.
pub fn plan_reconciliation(
    person_id: Id<Person>,
    existing: &[RelationshipEdge],
    desired: &[DesiredRelationship],
) -> ReconcilePlan {
    let existing_by_key: HashMap<EdgeKey, &RelationshipEdge> =
        existing.iter().map(|edge| (edge.key(), edge)).collect();
    let mut seen: HashSet<EdgeKey> = HashSet::new();
    let mut plan = ReconcilePlan::default();

    for entry in desired {
        let (Some(to), Some(relation_type)) = (entry.to, entry.relation_type) else {
            debug!(
                "event=desired_skipped module=reconcile person={} reason=missing_field",
                person_id
            );
            continue;
        };
        let from = entry.from.unwrap_or(person_id);
        let order = entry.order.unwrap_or(0);

        sync_edge(&mut plan, &existing_by_key, &mut seen, (from, to, relation_type), order);
        sync_edge(
            &mut plan,
            &existing_by_key,
            &mut seen,
            (to, from, relation_type.inverse()),
            order,
        );
    }

    let mut deleted: HashSet<Id<RelationshipEdge>> = HashSet::new();
    plan.to_delete = existing
        .iter()
        .filter(|edge| edge.touches(person_id) && !seen.contains(&edge.key()))
        .map(|edge| edge.id)
        .filter(|id| deleted.insert(*id))
        .collect();
    plan
}

fn sync_edge(
    plan: &mut ReconcilePlan,
    existing: &HashMap<EdgeKey, &RelationshipEdge>,
    seen: &mut HashSet<EdgeKey>,
    key: EdgeKey,
    order: i64,
) {
    // A key reached twice (an entry plus another entry's inverse) is
    // queued once.
    if !seen.insert(key) {
        return;
    }
    let (from, to, relation_type) = key;
    match existing.get(&key) {
        None => plan
            .to_insert
            .push(RelationshipEdge::create(from, to, relation_type, order)),
        Some(current) if current.order != order => {
            let mut updated = (*current).clone();
            updated.order = order;
            plan.to_update.push(updated);
        }
        Some(_) => {}
    }
}

/// Writes a plan: inserts, then updates, then deletes. Stops at the first
/// failing batch and reports which one it was.
pub fn apply_plan<S: FamilyStore + ?Sized>(store: &S, plan: &ReconcilePlan) -> FamResult<()> {
    if !plan.to_insert.is_empty() {
        store
            .insert_edges(&plan.to_insert)
            .map_err(|e| at_stage(ReconcileStage::Insert, e))?;
    }
    for edge in &plan.to_update {
        store
            .update_edge(edge)
            .map_err(|e| at_stage(ReconcileStage::Update, e))?;
    }
    if !plan.to_delete.is_empty() {
        store
            .soft_delete_edges(&plan.to_delete)
            .map_err(|e| at_stage(ReconcileStage::Delete, e))?;
    }
    Ok(())
}

fn at_stage(stage: ReconcileStage, source: FamError) -> FamError {
    FamError::Reconcile {
        stage,
        source: Box::new(source),
    }
}

/// Live edges touching `person_id`, plus those touching any overridden
/// `from`, so keys that bypass `person_id` are still matched.
fn load_existing<S: FamilyStore + ?Sized>(
    store: &S,
    person_id: Id<Person>,
    desired: &[DesiredRelationship],
) -> FamResult<Vec<RelationshipEdge>> {
    let mut edges = store.edges_touching(person_id)?;
    let mut loaded: HashSet<Id<Person>> = HashSet::from([person_id]);
    let mut known: HashSet<Id<RelationshipEdge>> = edges.iter().map(|e| e.id).collect();

    let overridden = desired
        .iter()
        .filter(|entry| entry.to.is_some() && entry.relation_type.is_some())
        .filter_map(|entry| entry.from);
    for from in overridden {
        if !loaded.insert(from) {
            continue;
        }
        for edge in store.edges_touching(from)? {
            if known.insert(edge.id) {
                edges.push(edge);
            }
        }
    }
    Ok(edges)
}

/// Makes the store's edges for `person_id` match `desired`, inverses
/// included. Returns how many edges were inserted, updated and deleted.
pub fn reconcile_relationships<S: FamilyStore + ?Sized>(
    store: &S,
    person_id: Id<Person>,
    desired: &[DesiredRelationship],
) -> FamResult<ReconcileSummary> {
    store
        .get_person(person_id)?
        .ok_or_else(|| FamError::person_not_found(person_id))?;

    let existing = load_existing(store, person_id, desired)?;
    let plan = plan_reconciliation(person_id, &existing, desired);
    apply_plan(store, &plan)?;

    let summary = plan.summary();
    info!(
        "event=relationships_reconciled module=reconcile person={} inserted={} updated={} deleted={}",
        person_id, summary.inserted, summary.updated, summary.deleted
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RelationType;

    fn ids() -> (Id<Person>, Id<Person>, Id<Person>) {
        (Id::generate(), Id::generate(), Id::generate())
    }

    #[test]
    fn new_entry_inserts_edge_and_inverse() {
        let (p, q, _) = ids();
        let plan = plan_reconciliation(p, &[], &[DesiredRelationship::new(q, RelationType::Parent, 1)]);

        assert_eq!(plan.to_insert.len(), 2);
        assert_eq!(plan.to_insert[0].key(), (p, q, RelationType::Parent));
        assert_eq!(plan.to_insert[1].key(), (q, p, RelationType::Child));
        assert_eq!(plan.to_insert[1].order, 1);
        assert!(plan.to_update.is_empty());
        assert!(plan.to_delete.is_empty());
    }

    #[test]
    fn spouse_inverse_is_spouse() {
        let (p, q, _) = ids();
        let plan = plan_reconciliation(p, &[], &[DesiredRelationship::new(q, RelationType::Spouse, 0)]);
        assert_eq!(plan.to_insert[1].key(), (q, p, RelationType::Spouse));
    }

    #[test]
    fn unchanged_entries_produce_an_empty_plan() {
        let (p, q, _) = ids();
        let existing = vec![
            RelationshipEdge::create(p, q, RelationType::Spouse, 2),
            RelationshipEdge::create(q, p, RelationType::Spouse, 2),
        ];
        let plan = plan_reconciliation(p, &existing, &[DesiredRelationship::new(q, RelationType::Spouse, 2)]);
        assert!(plan.is_empty());
    }

    #[test]
    fn changed_order_updates_both_directions() {
        let (p, q, _) = ids();
        let existing = vec![
            RelationshipEdge::create(p, q, RelationType::Child, 1),
            RelationshipEdge::create(q, p, RelationType::Parent, 1),
        ];
        let plan = plan_reconciliation(p, &existing, &[DesiredRelationship::new(q, RelationType::Child, 4)]);

        assert_eq!(plan.to_update.len(), 2);
        assert_eq!(plan.to_update[0].id, existing[0].id);
        assert!(plan.to_update.iter().all(|e| e.order == 4));
    }

    #[test]
    fn inverse_with_stale_order_is_updated_even_when_forward_matches() {
        let (p, q, _) = ids();
        let existing = vec![
            RelationshipEdge::create(p, q, RelationType::Parent, 3),
            RelationshipEdge::create(q, p, RelationType::Child, 0),
        ];
        let plan = plan_reconciliation(p, &existing, &[DesiredRelationship::new(q, RelationType::Parent, 3)]);

        assert_eq!(plan.to_update.len(), 1);
        assert_eq!(plan.to_update[0].id, existing[1].id);
    }

    #[test]
    fn missing_inverse_is_inserted() {
        let (p, q, _) = ids();
        let existing = vec![RelationshipEdge::create(p, q, RelationType::Parent, 0)];
        let plan = plan_reconciliation(p, &existing, &[DesiredRelationship::new(q, RelationType::Parent, 0)]);

        assert!(plan.to_update.is_empty());
        assert_eq!(plan.to_insert.len(), 1);
        assert_eq!(plan.to_insert[0].key(), (q, p, RelationType::Child));
    }

    #[test]
    fn dropped_entries_delete_edge_and_inverse() {
        let (p, q, r) = ids();
        let existing = vec![
            RelationshipEdge::create(p, q, RelationType::Parent, 0),
            RelationshipEdge::create(q, p, RelationType::Child, 0),
            RelationshipEdge::create(p, r, RelationType::Spouse, 0),
            RelationshipEdge::create(r, p, RelationType::Spouse, 0),
        ];
        let plan = plan_reconciliation(p, &existing, &[DesiredRelationship::new(r, RelationType::Spouse, 0)]);

        assert_eq!(plan.to_delete, vec![existing[0].id, existing[1].id]);
    }

    #[test]
    fn entries_missing_to_or_type_are_skipped() {
        let (p, q, _) = ids();
        let desired = vec![
            DesiredRelationship {
                to: Some(q),
                ..Default::default()
            },
            DesiredRelationship {
                relation_type: Some(RelationType::Parent),
                ..Default::default()
            },
        ];
        let plan = plan_reconciliation(p, &[], &desired);
        assert!(plan.is_empty());
    }

    #[test]
    fn from_override_sets_both_endpoints() {
        let (p, q, r) = ids();
        let desired = vec![DesiredRelationship::new(r, RelationType::Parent, 0).with_from(q)];
        let plan = plan_reconciliation(p, &[], &desired);

        assert_eq!(plan.to_insert[0].key(), (q, r, RelationType::Parent));
        assert_eq!(plan.to_insert[1].key(), (r, q, RelationType::Child));
    }

    #[test]
    fn edges_of_other_people_match_but_are_never_deleted() {
        let (p, q, r) = ids();
        let existing = vec![
            RelationshipEdge::create(q, r, RelationType::Parent, 0),
            RelationshipEdge::create(r, q, RelationType::Child, 0),
            RelationshipEdge::create(q, p, RelationType::Spouse, 0),
        ];
        let desired = vec![DesiredRelationship::new(r, RelationType::Parent, 0).with_from(q)];
        let plan = plan_reconciliation(p, &existing, &desired);

        assert!(plan.to_insert.is_empty());
        assert_eq!(plan.to_delete, vec![existing[2].id]);
    }

    #[test]
    fn overlapping_entries_are_queued_once() {
        let (p, q, _) = ids();
        let desired = vec![
            DesiredRelationship::new(q, RelationType::Parent, 0),
            DesiredRelationship::new(p, RelationType::Child, 0).with_from(q),
        ];
        let plan = plan_reconciliation(p, &[], &desired);
        assert_eq!(plan.to_insert.len(), 2);
    }

    #[test]
    fn missing_order_defaults_to_zero() {
        let (p, q, _) = ids();
        let desired = vec![DesiredRelationship {
            to: Some(q),
            relation_type: Some(RelationType::Spouse),
            ..Default::default()
        }];
        let plan = plan_reconciliation(p, &[], &desired);
        assert!(plan.to_insert.iter().all(|e| e.order == 0));
    }
}
