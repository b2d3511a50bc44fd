use chrono::NaiveDate;

use super::{arg, option_value, parse_id_arg, print_json};
use crate::db::{person_repo, SqliteStore};
use crate::error::{FamError, FamResult};
use crate::model::{Gender, Person};
use crate::ops::person_ops;

pub fn add_person(store: &SqliteStore, args: &[String]) -> FamResult<()> {
    let name = arg(args, 0, "name")?;
    let nickname = arg(args, 1, "nickname")?;
    let gender: Gender = arg(args, 2, "gender")?.parse()?;
    let birth_date = option_value(args, "--birth")?
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|e| FamError::Other(format!("invalid --birth `{}`: {}", s, e)))
        })
        .transpose()?;
    let address = option_value(args, "--address")?;

    let person = person_ops::add_person(
        store.conn(),
        name,
        nickname,
        gender,
        birth_date,
        address,
        None,
    )?;
    print_json(&person)
}

pub fn list_people(store: &SqliteStore) -> FamResult<()> {
    let people: Vec<Person> = person_repo::find_all(store.conn())?;
    print_json(&people)
}

pub fn remove_person(store: &SqliteStore, args: &[String]) -> FamResult<()> {
    let person_id = parse_id_arg(args, 0, "person-id")?;
    let edges = person_ops::remove_person(store.conn(), person_id)?;
    print_json(&serde_json::json!({ "removed": person_id, "edgesRemoved": edges }))
}
