use chrono::NaiveDate;
use log::info;
use rusqlite::Connection;

use crate::db::{person_repo, relationship_repo};
use crate::error::{FamError, FamResult};
use crate::model::{Gender, Id, Person, User};
use crate::validation::{self, trim_optional};

pub fn add_person(
    conn: &Connection,
    name: &str,
    nickname: &str,
    gender: Gender,
    birth_date: Option<NaiveDate>,
    address: Option<&str>,
    owner: Option<Id<User>>,
) -> FamResult<Person> {
    let valid_name = validation::non_blank(name, "name")?;
    let valid_nickname = validation::non_blank(nickname, "nickname")?;

    let mut person = Person::create(valid_name, valid_nickname, gender);
    person.birth_date = birth_date;
    person.address = trim_optional(address);
    person.owned_by.extend(owner);

    person_repo::insert(conn, &person)?;
    Ok(person)
}

/// Soft-deletes a person together with every edge touching them, so no
/// relative keeps a dangling half of a relationship.
pub fn remove_person(conn: &Connection, person_id: Id<Person>) -> FamResult<usize> {
    if !person_repo::soft_delete(conn, person_id)? {
        return Err(FamError::person_not_found(person_id));
    }
    let edges = relationship_repo::soft_delete_touching(conn, person_id)?;
    info!(
        "event=person_removed module=person person={} edges_removed={}",
        person_id, edges
    );
    Ok(edges)
}
