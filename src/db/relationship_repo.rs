use rusqlite::{params, Connection};

use super::parse_id;
use crate::error::{FamError, FamResult};
use crate::model::{Id, Person, RelationshipEdge};

const EDGE_COLUMNS: &str = "id, from_id, to_id, type, sort_order";

/// Inserts a batch of edges atomically.
pub fn insert_many(conn: &Connection, edges: &[RelationshipEdge]) -> FamResult<()> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO relationships (id, from_id, to_id, type, sort_order)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for edge in edges {
            stmt.execute(params![
                edge.id.value.to_string(),
                edge.from.value.to_string(),
                edge.to.value.to_string(),
                edge.relation_type.as_str(),
                edge.order,
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Fails with `NotFound` when the edge is unknown or already deleted.
pub fn update_order(conn: &Connection, edge: &RelationshipEdge) -> FamResult<()> {
    let changed = conn.execute(
        "UPDATE relationships SET sort_order = ?1, updated_at = datetime('now')
         WHERE id = ?2 AND deleted_at IS NULL",
        params![edge.order, edge.id.value.to_string()],
    )?;
    if changed == 0 {
        return Err(FamError::NotFound {
            entity_type: "Relationship".into(),
            id: edge.id.to_string(),
        });
    }
    Ok(())
}

pub fn soft_delete_many(conn: &Connection, ids: &[Id<RelationshipEdge>]) -> FamResult<()> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(
            "UPDATE relationships SET deleted_at = datetime('now')
             WHERE id = ?1 AND deleted_at IS NULL",
        )?;
        for id in ids {
            stmt.execute(params![id.value.to_string()])?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Soft-deletes every live edge with `person_id` at either end.
pub fn soft_delete_touching(conn: &Connection, person_id: Id<Person>) -> FamResult<usize> {
    let changed = conn.execute(
        "UPDATE relationships SET deleted_at = datetime('now')
         WHERE (from_id = ?1 OR to_id = ?1) AND deleted_at IS NULL",
        params![person_id.value.to_string()],
    )?;
    Ok(changed)
}

pub fn find_touching(conn: &Connection, person_id: Id<Person>) -> FamResult<Vec<RelationshipEdge>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM relationships
         WHERE (from_id = ?1 OR to_id = ?1) AND deleted_at IS NULL
         ORDER BY rowid",
        EDGE_COLUMNS
    ))?;

    let edges = stmt
        .query_map(params![person_id.value.to_string()], |row| {
            Ok(row_to_edge(row))
        })?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<FamResult<Vec<_>>>()?;

    Ok(edges)
}

fn row_to_edge(row: &rusqlite::Row) -> FamResult<RelationshipEdge> {
    let id_str: String = row.get(0)?;
    let from_str: String = row.get(1)?;
    let to_str: String = row.get(2)?;
    let type_str: String = row.get(3)?;

    Ok(RelationshipEdge {
        id: parse_id(&id_str)?,
        from: parse_id(&from_str)?,
        to: parse_id(&to_str)?,
        relation_type: type_str.parse()?,
        order: row.get(4)?,
    })
}
