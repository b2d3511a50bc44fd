use chrono::NaiveDate;
use famtree::db::*;
use famtree::model::*;
use famtree::ops::person_ops;
use famtree::ops::relationship_ops::reconcile_relationships;
use famtree::ops::tree_ops::derive_tree;
use famtree::queries::relationship_queries;

fn setup() -> SqliteStore {
    SqliteStore::new(schema::test_connection())
}

fn add(store: &SqliteStore, nickname: &str, gender: Gender) -> Person {
    person_ops::add_person(
        store.conn(),
        &format!("{} Surname", nickname),
        nickname,
        gender,
        None,
        None,
        None,
    )
    .unwrap()
}

// ==========================================================================
// PERSON REPO TESTS
// ==========================================================================

#[test]
fn person_insert_and_find() {
    let store = setup();
    let owner = Id::<User>::generate();
    let birth = NaiveDate::from_ymd_opt(1961, 8, 17).unwrap();
    let person = person_ops::add_person(
        store.conn(),
        "  Budi Santoso ",
        "Budi",
        Gender::Male,
        Some(birth),
        Some("  Jl. Mawar 3 "),
        Some(owner),
    )
    .unwrap();

    let found = store.get_person(person.id).unwrap().unwrap();
    assert_eq!(found.name, "Budi Santoso");
    assert_eq!(found.nickname, "Budi");
    assert_eq!(found.gender, Gender::Male);
    assert_eq!(found.status, LifeStatus::Alive);
    assert_eq!(found.birth_date, Some(birth));
    assert_eq!(found.address.as_deref(), Some("Jl. Mawar 3"));
    assert!(found.is_owned_by(owner));
}

#[test]
fn person_rejects_blank_nickname() {
    let store = setup();
    let result = person_ops::add_person(store.conn(), "Name", "  ", Gender::Female, None, None, None);
    assert!(result.is_err());
}

#[test]
fn person_update_changes_fields() {
    let store = setup();
    let mut person = add(&store, "Ani", Gender::Female);
    person.status = LifeStatus::Deceased;
    person.phone = Some("0812".into());
    person_repo::update(store.conn(), &person).unwrap();

    let found = person_repo::find_by_id(store.conn(), person.id).unwrap().unwrap();
    assert_eq!(found.status, LifeStatus::Deceased);
    assert_eq!(found.phone.as_deref(), Some("0812"));
}

#[test]
fn find_all_skips_deleted_people() {
    let store = setup();
    let a = add(&store, "A", Gender::Male);
    add(&store, "B", Gender::Female);
    person_repo::soft_delete(store.conn(), a.id).unwrap();

    let people = person_repo::find_all(store.conn()).unwrap();
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].nickname, "B");
    assert!(store.get_person(a.id).unwrap().is_none());
}

// ==========================================================================
// RELATIONSHIP REPO TESTS
// ==========================================================================

#[test]
fn edges_insert_update_and_soft_delete() {
    let store = setup();
    let a = add(&store, "A", Gender::Male);
    let b = add(&store, "B", Gender::Female);
    let forward = RelationshipEdge::create(a.id, b.id, RelationType::Spouse, 0);
    let back = RelationshipEdge::create(b.id, a.id, RelationType::Spouse, 0);
    store.insert_edges(&[forward.clone(), back.clone()]).unwrap();

    let mut touching = store.edges_touching(a.id).unwrap();
    assert_eq!(touching, vec![forward.clone(), back.clone()]);

    touching[0].order = 7;
    store.update_edge(&touching[0]).unwrap();
    let reread = relationship_queries::outgoing_relationships(&store, a.id).unwrap();
    assert_eq!(reread[0].order, 7);

    store.soft_delete_edges(&[forward.id]).unwrap();
    assert_eq!(store.edges_touching(a.id).unwrap(), vec![back]);
}

#[test]
fn updating_a_deleted_edge_is_not_found() {
    let store = setup();
    let a = add(&store, "A", Gender::Male);
    let b = add(&store, "B", Gender::Female);
    let mut edge = RelationshipEdge::create(a.id, b.id, RelationType::Parent, 0);
    store.insert_edges(&[edge.clone()]).unwrap();
    store.soft_delete_edges(&[edge.id]).unwrap();

    edge.order = 3;
    assert!(store.update_edge(&edge).unwrap_err().is_not_found());

    let unknown = RelationshipEdge::create(a.id, b.id, RelationType::Spouse, 1);
    assert!(store.update_edge(&unknown).unwrap_err().is_not_found());
}

#[test]
fn duplicate_live_key_is_rejected_atomically() {
    let store = setup();
    let a = add(&store, "A", Gender::Male);
    let b = add(&store, "B", Gender::Female);
    let c = add(&store, "C", Gender::Female);
    store
        .insert_edges(&[RelationshipEdge::create(a.id, b.id, RelationType::Parent, 0)])
        .unwrap();

    let batch = vec![
        RelationshipEdge::create(a.id, c.id, RelationType::Parent, 0),
        RelationshipEdge::create(a.id, b.id, RelationType::Parent, 1),
    ];
    assert!(store.insert_edges(&batch).is_err());
    // The first edge of the failed batch must not have been kept.
    assert!(store.edges_touching(c.id).unwrap().is_empty());
}

#[test]
fn deleted_key_can_be_inserted_again() {
    let store = setup();
    let a = add(&store, "A", Gender::Male);
    let b = add(&store, "B", Gender::Female);
    let edge = RelationshipEdge::create(a.id, b.id, RelationType::Parent, 0);
    store.insert_edges(&[edge.clone()]).unwrap();
    store.soft_delete_edges(&[edge.id]).unwrap();

    let again = RelationshipEdge::create(a.id, b.id, RelationType::Parent, 0);
    store.insert_edges(&[again.clone()]).unwrap();
    assert_eq!(store.edges_touching(a.id).unwrap(), vec![again]);
}

#[test]
fn remove_person_drops_their_edges() {
    let store = setup();
    let a = add(&store, "A", Gender::Male);
    let b = add(&store, "B", Gender::Female);
    let c = add(&store, "C", Gender::Female);
    store.insert_edges(&[
        RelationshipEdge::create(a.id, b.id, RelationType::Spouse, 0),
        RelationshipEdge::create(b.id, a.id, RelationType::Spouse, 0),
        RelationshipEdge::create(b.id, c.id, RelationType::Parent, 0),
    ])
    .unwrap();

    assert_eq!(person_ops::remove_person(store.conn(), a.id).unwrap(), 2);
    assert_eq!(store.edges_touching(b.id).unwrap().len(), 1);
    assert!(person_ops::remove_person(store.conn(), a.id).unwrap_err().is_not_found());
}

// ==========================================================================
// END TO END OVER SQLITE
// ==========================================================================

#[test]
fn reconcile_then_derive_over_sqlite() {
    let store = setup();
    let a = add(&store, "A", Gender::Male);
    let b = add(&store, "B", Gender::Female);
    let c = add(&store, "C", Gender::Male);

    let desired_a = vec![
        DesiredRelationship::new(b.id, RelationType::Spouse, 0),
        DesiredRelationship::new(c.id, RelationType::Parent, 0),
    ];
    let first = reconcile_relationships(&store, a.id, &desired_a).unwrap();
    assert_eq!((first.inserted, first.updated, first.deleted), (4, 0, 0));
    let second = reconcile_relationships(&store, a.id, &desired_a).unwrap();
    assert_eq!((second.inserted, second.updated, second.deleted), (0, 0, 0));

    reconcile_relationships(
        &store,
        b.id,
        &[
            DesiredRelationship::new(a.id, RelationType::Spouse, 0),
            DesiredRelationship::new(c.id, RelationType::Parent, 0),
        ],
    )
    .unwrap();

    let down = derive_tree(&store, a.id, Direction::Descendants).unwrap();
    assert_eq!(down.len(), 1);
    assert_eq!(down[0].name, "A & B");
    assert_eq!(down[0].children[0].id, c.id);

    person_ops::remove_person(store.conn(), c.id).unwrap();
    let after = derive_tree(&store, a.id, Direction::Descendants).unwrap();
    assert_eq!(after[0].name, "A & B");
    assert!(after[0].children.is_empty());
}

#[test]
fn overridden_from_reconciles_twice_over_sqlite() {
    let store = setup();
    let p = add(&store, "P", Gender::Male);
    let q = add(&store, "Q", Gender::Female);
    let r = add(&store, "R", Gender::Male);
    let desired = vec![DesiredRelationship::new(r.id, RelationType::Parent, 1).with_from(q.id)];

    let first = reconcile_relationships(&store, p.id, &desired).unwrap();
    assert_eq!((first.inserted, first.updated, first.deleted), (2, 0, 0));
    let second = reconcile_relationships(&store, p.id, &desired).unwrap();
    assert_eq!((second.inserted, second.updated, second.deleted), (0, 0, 0));
    assert_eq!(store.edges_touching(q.id).unwrap().len(), 2);
}

#[test]
fn open_creates_schema_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("family.db");
    {
        let store = SqliteStore::open(&path).unwrap();
        add(&store, "Disk", Gender::Female);
    }
    let reopened = SqliteStore::open(&path).unwrap();
    assert_eq!(person_repo::find_all(reopened.conn()).unwrap().len(), 1);
}
