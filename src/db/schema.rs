use rusqlite::Connection;

use crate::error::FamResult;

/// Initialize the database schema. Creates all tables if they don't exist.
pub fn initialize(conn: &Connection) -> FamResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS people (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            nickname TEXT NOT NULL,
            gender TEXT NOT NULL CHECK (gender IN ('male', 'female')),
            status TEXT NOT NULL DEFAULT 'alive' CHECK (status IN ('alive', 'deceased')),
            birth_date TEXT,
            address TEXT,
            phone TEXT,
            photo_url TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            deleted_at TEXT
        );

        CREATE TABLE IF NOT EXISTS person_owners (
            person_id TEXT NOT NULL REFERENCES people(id) ON DELETE CASCADE,
            owner_id TEXT NOT NULL,
            PRIMARY KEY (person_id, owner_id)
        );

        CREATE TABLE IF NOT EXISTS relationships (
            id TEXT PRIMARY KEY NOT NULL,
            from_id TEXT NOT NULL REFERENCES people(id),
            to_id TEXT NOT NULL REFERENCES people(id),
            type TEXT NOT NULL CHECK (type IN ('parent', 'child', 'spouse')),
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            deleted_at TEXT
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_relationships_live_key
            ON relationships (from_id, to_id, type) WHERE deleted_at IS NULL;
        CREATE INDEX IF NOT EXISTS idx_relationships_from ON relationships (from_id);
        CREATE INDEX IF NOT EXISTS idx_relationships_to ON relationships (to_id);

        PRAGMA foreign_keys = ON;
        ",
    )?;
    Ok(())
}

/// Create an in-memory connection for testing. Available in test builds.
pub fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}
