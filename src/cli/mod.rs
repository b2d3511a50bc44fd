pub mod person_commands;
pub mod tree_commands;

use std::fs;

use serde::Serialize;

use crate::config::Config;
use crate::db::SqliteStore;
use crate::error::{FamError, FamResult};
use crate::model::Id;

pub const USAGE: &str = "\
famtree - family tree derivation

Usage: famtree [OPTIONS] <COMMAND> [ARGS]

Commands:
  add-person <name> <nickname> <male|female> [--birth YYYY-MM-DD] [--address TEXT]
  people                               List live people
  remove-person <id>                   Soft-delete a person and their edges
  relationships <id>                   Show edges starting at a person
  set-relationships <id> <json|->      Reconcile a person's edges with a JSON list
  tree <id> [--direction DIR]          Derive a tree (descendants|ancestors)

Options:
  -f, --file <PATH>      Database file path (env FAMTREE_DB, default .data/famtree.db)
  --log-level <LEVEL>    trace|debug|info|warn|error|off (env FAMTREE_LOG_LEVEL)
  --log-dir <DIR>        Absolute directory for log files (env FAMTREE_LOG_DIR)
  -h, --help             Show this help";

/// Runs one command against the database named in `config`.
pub fn run(config: &Config, args: &[String]) -> FamResult<()> {
    let Some((command, rest)) = args.split_first() else {
        return Err(FamError::Other(format!("missing command\n\n{}", USAGE)));
    };

    if let Some(dir) = config.db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let store = SqliteStore::open(&config.db_path)?;

    match command.as_str() {
        "add-person" => person_commands::add_person(&store, rest),
        "people" => person_commands::list_people(&store),
        "remove-person" => person_commands::remove_person(&store, rest),
        "relationships" => tree_commands::show_relationships(&store, rest),
        "set-relationships" => tree_commands::set_relationships(&store, rest),
        "tree" => tree_commands::show_tree(&store, rest),
        other => Err(FamError::Other(format!(
            "unknown command `{}`; use --help for usage",
            other
        ))),
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> FamResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn arg<'a>(args: &'a [String], index: usize, name: &str) -> FamResult<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| FamError::Other(format!("missing argument <{}>", name)))
}

pub(crate) fn parse_id_arg<T>(args: &[String], index: usize, name: &str) -> FamResult<Id<T>> {
    let raw = arg(args, index, name)?;
    Id::parse(raw).map_err(|e| FamError::Other(format!("invalid {} `{}`: {}", name, raw, e)))
}

/// Value following `flag` anywhere in `args`, if present.
pub(crate) fn option_value<'a>(args: &'a [String], flag: &str) -> FamResult<Option<&'a str>> {
    match args.iter().position(|a| a == flag) {
        None => Ok(None),
        Some(i) => args
            .get(i + 1)
            .map(|v| Some(v.as_str()))
            .ok_or_else(|| FamError::Other(format!("{} requires a value", flag))),
    }
}
