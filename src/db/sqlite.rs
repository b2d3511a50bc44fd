use std::path::Path;

use rusqlite::Connection;

use super::store::FamilyStore;
use super::{person_repo, relationship_repo, schema};
use crate::error::FamResult;
use crate::model::{Id, Person, RelationshipEdge};

/// `FamilyStore` over a single SQLite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Wraps a connection whose schema is already initialized.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: &Path) -> FamResult<Self> {
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        Ok(Self::new(conn))
    }

    pub fn open_in_memory() -> FamResult<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self::new(conn))
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl FamilyStore for SqliteStore {
    fn get_person(&self, id: Id<Person>) -> FamResult<Option<Person>> {
        person_repo::find_by_id(&self.conn, id)
    }

    fn edges_touching(&self, person_id: Id<Person>) -> FamResult<Vec<RelationshipEdge>> {
        relationship_repo::find_touching(&self.conn, person_id)
    }

    fn insert_edges(&self, edges: &[RelationshipEdge]) -> FamResult<()> {
        relationship_repo::insert_many(&self.conn, edges)
    }

    fn update_edge(&self, edge: &RelationshipEdge) -> FamResult<()> {
        relationship_repo::update_order(&self.conn, edge)
    }

    fn soft_delete_edges(&self, ids: &[Id<RelationshipEdge>]) -> FamResult<()> {
        relationship_repo::soft_delete_many(&self.conn, ids)
    }
}
