use std::io::Read;

use super::{arg, option_value, parse_id_arg, print_json};
use crate::db::SqliteStore;
use crate::error::FamResult;
use crate::model::{DesiredRelationship, Direction};
use crate::ops::{relationship_ops, tree_ops};
use crate::queries::relationship_queries;

pub fn show_relationships(store: &SqliteStore, args: &[String]) -> FamResult<()> {
    let person_id = parse_id_arg(args, 0, "person-id")?;
    let edges = relationship_queries::outgoing_relationships(store, person_id)?;
    print_json(&edges)
}

/// Reads a JSON array of `{to, type, order, from?}` from a file, or stdin
/// when the path is `-`.
pub fn set_relationships(store: &SqliteStore, args: &[String]) -> FamResult<()> {
    let person_id = parse_id_arg(args, 0, "person-id")?;
    let source = arg(args, 1, "json-file")?;

    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(source)?
    };
    let desired: Vec<DesiredRelationship> = serde_json::from_str(&raw)?;

    let summary = relationship_ops::reconcile_relationships(store, person_id, &desired)?;
    print_json(&summary)
}

pub fn show_tree(store: &SqliteStore, args: &[String]) -> FamResult<()> {
    let root_id = parse_id_arg(args, 0, "person-id")?;
    let direction = match option_value(args, "--direction")? {
        Some(raw) => raw.parse()?,
        None => Direction::Descendants,
    };

    let tree = tree_ops::derive_tree(store, root_id, direction)?;
    print_json(&tree)
}
