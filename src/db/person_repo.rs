use rusqlite::{params, Connection};

use super::parse_id;
use crate::error::FamResult;
use crate::model::{Id, Person, User};

const PERSON_COLUMNS: &str =
    "id, name, nickname, gender, status, birth_date, address, phone, photo_url";

pub fn insert(conn: &Connection, person: &Person) -> FamResult<()> {
    conn.execute(
        "INSERT INTO people (id, name, nickname, gender, status, birth_date, address, phone, photo_url)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            person.id.value.to_string(),
            person.name,
            person.nickname,
            person.gender.as_str(),
            person.status.as_str(),
            person.birth_date.map(|d| d.to_string()),
            person.address,
            person.phone,
            person.photo_url,
        ],
    )?;
    replace_owners(conn, person)
}

pub fn update(conn: &Connection, person: &Person) -> FamResult<()> {
    conn.execute(
        "UPDATE people SET name = ?1, nickname = ?2, gender = ?3, status = ?4, birth_date = ?5,
         address = ?6, phone = ?7, photo_url = ?8, updated_at = datetime('now')
         WHERE id = ?9 AND deleted_at IS NULL",
        params![
            person.name,
            person.nickname,
            person.gender.as_str(),
            person.status.as_str(),
            person.birth_date.map(|d| d.to_string()),
            person.address,
            person.phone,
            person.photo_url,
            person.id.value.to_string(),
        ],
    )?;
    replace_owners(conn, person)
}

/// Marks a person deleted. Returns false if there was no live row.
pub fn soft_delete(conn: &Connection, id: Id<Person>) -> FamResult<bool> {
    let changed = conn.execute(
        "UPDATE people SET deleted_at = datetime('now') WHERE id = ?1 AND deleted_at IS NULL",
        params![id.value.to_string()],
    )?;
    Ok(changed > 0)
}

pub fn find_by_id(conn: &Connection, id: Id<Person>) -> FamResult<Option<Person>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM people WHERE id = ?1 AND deleted_at IS NULL",
        PERSON_COLUMNS
    ))?;

    let result = stmt.query_row(params![id.value.to_string()], |row| {
        Ok(row_to_person(row))
    });

    match result {
        Ok(person) => {
            let mut person = person?;
            person.owned_by = find_owner_ids(conn, person.id)?;
            Ok(Some(person))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_all(conn: &Connection) -> FamResult<Vec<Person>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM people WHERE deleted_at IS NULL ORDER BY name",
        PERSON_COLUMNS
    ))?;

    let people = stmt
        .query_map([], |row| Ok(row_to_person(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<FamResult<Vec<_>>>()?;

    people
        .into_iter()
        .map(|mut p| {
            p.owned_by = find_owner_ids(conn, p.id)?;
            Ok(p)
        })
        .collect()
}

fn replace_owners(conn: &Connection, person: &Person) -> FamResult<()> {
    conn.execute(
        "DELETE FROM person_owners WHERE person_id = ?1",
        params![person.id.value.to_string()],
    )?;
    for owner in &person.owned_by {
        conn.execute(
            "INSERT OR IGNORE INTO person_owners (person_id, owner_id) VALUES (?1, ?2)",
            params![person.id.value.to_string(), owner.value.to_string()],
        )?;
    }
    Ok(())
}

fn find_owner_ids(conn: &Connection, person_id: Id<Person>) -> FamResult<Vec<Id<User>>> {
    let mut stmt = conn.prepare(
        "SELECT owner_id FROM person_owners WHERE person_id = ?1 ORDER BY owner_id",
    )?;

    let ids = stmt
        .query_map(params![person_id.value.to_string()], |row| {
            row.get::<_, String>(0)
        })?
        .collect::<Result<Vec<_>, _>>()?;

    ids.iter().map(|s| parse_id(s)).collect()
}

fn row_to_person(row: &rusqlite::Row) -> FamResult<Person> {
    let id_str: String = row.get(0)?;
    let gender_str: String = row.get(3)?;
    let status_str: String = row.get(4)?;
    let birth_date_str: Option<String> = row.get(5)?;

    Ok(Person {
        id: parse_id(&id_str)?,
        name: row.get(1)?,
        nickname: row.get(2)?,
        gender: gender_str.parse()?,
        status: status_str.parse()?,
        birth_date: birth_date_str
            .and_then(|s| chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        address: row.get(6)?,
        phone: row.get(7)?,
        photo_url: row.get(8)?,
        owned_by: Vec::new(),
    })
}
