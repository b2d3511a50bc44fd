use log::info;

use crate::db::FamilyStore;
use crate::error::FamResult;
use crate::model::{Direction, DisplayNode, Id, Person};
use crate::tree::{build_tree, merge_couples, normalize};

/// Derives the display tree for `root_id`.
///
/// Descendant views are couple-merged and may hold several top-level
/// nodes. Ancestor views are returned unmerged as a single-element list.
pub fn derive_tree<S: FamilyStore + ?Sized>(
    store: &S,
    root_id: Id<Person>,
    direction: Direction,
) -> FamResult<Vec<DisplayNode>> {
    let result = match direction {
        Direction::Descendants => {
            let tree = build_tree(store, root_id, true, false)?;
            merge_couples(&normalize(&tree))
        }
        Direction::Ancestors => {
            let tree = build_tree(store, root_id, false, true)?;
            vec![normalize(&tree)]
        }
    };

    info!(
        "event=tree_derived module=tree root={} direction={} roots={} nodes={}",
        root_id,
        direction,
        result.len(),
        count_nodes(&result)
    );
    Ok(result)
}

pub fn count_nodes(nodes: &[DisplayNode]) -> usize {
    nodes.iter().map(|n| 1 + count_nodes(&n.children)).sum()
}
