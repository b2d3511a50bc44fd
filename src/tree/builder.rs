use std::collections::HashSet;

use log::{debug, warn};

use crate::db::FamilyStore;
use crate::error::{FamError, FamResult};
use crate::model::{Id, Person, RelationType, RelationshipEdge, TreeNode};

/// Builds the tree rooted at `root_id`.
///
/// `expand_children` walks down through spouses and children,
/// `expand_parents` walks up through parents. With neither flag the root is
/// returned as a bare leaf.
pub fn build_tree<S: FamilyStore + ?Sized>(
    store: &S,
    root_id: Id<Person>,
    expand_children: bool,
    expand_parents: bool,
) -> FamResult<TreeNode> {
    TreeBuilder::new(store).build(root_id, expand_children, expand_parents)
}

/// Recursive traversal state for one tree. `path` holds the ids currently
/// being expanded, root first.
pub struct TreeBuilder<'a, S: FamilyStore + ?Sized> {
    store: &'a S,
    path: Vec<Id<Person>>,
}

impl<'a, S: FamilyStore + ?Sized> TreeBuilder<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            path: Vec::new(),
        }
    }

    pub fn build(
        &mut self,
        root_id: Id<Person>,
        expand_children: bool,
        expand_parents: bool,
    ) -> FamResult<TreeNode> {
        if !expand_children && !expand_parents {
            let person = self.load_person(root_id)?;
            return Ok(TreeNode::leaf(&person));
        }
        self.expand(root_id, expand_children, expand_parents)
    }

    fn load_person(&self, id: Id<Person>) -> FamResult<Person> {
        self.store
            .get_person(id)?
            .ok_or_else(|| FamError::person_not_found(id))
    }

    fn expand(&mut self, id: Id<Person>, with_children: bool, with_parents: bool) -> FamResult<TreeNode> {
        if self.path.contains(&id) {
            return Err(FamError::CycleDetected { id: id.to_string() });
        }
        let person = self.load_person(id)?;

        self.path.push(id);
        let result = self.expand_person(&person, with_children, with_parents);
        self.path.pop();
        result
    }

    fn expand_person(
        &mut self,
        person: &Person,
        with_children: bool,
        with_parents: bool,
    ) -> FamResult<TreeNode> {
        let edges = self.store.edges_touching(person.id)?;
        debug!(
            "event=tree_expand module=tree node={} edges={} depth={} children={} parents={}",
            person.id,
            edges.len(),
            self.path.len(),
            with_children,
            with_parents
        );

        let mut node = TreeNode::expanded(person);
        if with_children {
            let (children, spouses) = self.expand_descendants(person.id, &edges)?;
            node.children = children;
            node.spouses = spouses;
        }
        if with_parents {
            let parents = parent_ids(person.id, &edges);
            node.parents = self.expand_each(&parents, false, true)?;
        }
        Ok(node)
    }

    /// Returns `(single_children, spouses)`. Each spouse node holds the
    /// children shared with `id`; children claimed by no spouse are returned
    /// directly.
    fn expand_descendants(
        &mut self,
        id: Id<Person>,
        edges: &[RelationshipEdge],
    ) -> FamResult<(Vec<TreeNode>, Vec<TreeNode>)> {
        let own_children = child_ids(id, edges);
        let mut claimed: HashSet<Id<Person>> = HashSet::new();
        let mut spouses = Vec::new();

        for spouse_id in spouse_ids(id, edges) {
            let Some(spouse) = self.store.get_person(spouse_id)? else {
                warn!(
                    "event=relative_dropped module=tree node={} spouse={} reason=not_found",
                    id, spouse_id
                );
                continue;
            };

            let spouse_children: HashSet<Id<Person>> =
                child_ids(spouse_id, &self.store.edges_touching(spouse_id)?)
                    .into_iter()
                    .collect();
            let shared: Vec<Id<Person>> = own_children
                .iter()
                .copied()
                .filter(|child| spouse_children.contains(child))
                .collect();
            claimed.extend(shared.iter().copied());

            let mut spouse_node = TreeNode::leaf(&spouse);
            spouse_node.children = self.expand_each(&shared, true, false)?;
            spouses.push(spouse_node);
        }

        let single: Vec<Id<Person>> = own_children
            .into_iter()
            .filter(|child| !claimed.contains(child))
            .collect();
        let children = self.expand_each(&single, true, false)?;

        Ok((children, spouses))
    }

    /// Expands each id in order. Relatives that no longer resolve are
    /// skipped; any other failure aborts the whole tree.
    fn expand_each(
        &mut self,
        ids: &[Id<Person>],
        with_children: bool,
        with_parents: bool,
    ) -> FamResult<Vec<TreeNode>> {
        let mut nodes = Vec::with_capacity(ids.len());
        for &id in ids {
            match self.expand(id, with_children, with_parents) {
                Ok(node) => nodes.push(node),
                Err(err) if err.is_not_found() => {
                    warn!(
                        "event=relative_dropped module=tree relative={} reason=not_found",
                        id
                    );
                }
                Err(err) => return Err(err),
            }
        }
        Ok(nodes)
    }
}

fn unique(ids: impl IntoIterator<Item = Id<Person>>) -> Vec<Id<Person>> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

fn spouse_ids(id: Id<Person>, edges: &[RelationshipEdge]) -> Vec<Id<Person>> {
    unique(
        edges
            .iter()
            .filter(|e| e.relation_type == RelationType::Spouse && e.touches(id))
            .map(|e| e.other_end(id))
            .filter(|other| *other != id),
    )
}

fn child_ids(id: Id<Person>, edges: &[RelationshipEdge]) -> Vec<Id<Person>> {
    unique(
        edges
            .iter()
            .filter(|e| e.relation_type == RelationType::Parent && e.from == id)
            .map(|e| e.to),
    )
}

fn parent_ids(id: Id<Person>, edges: &[RelationshipEdge]) -> Vec<Id<Person>> {
    unique(
        edges
            .iter()
            .filter(|e| e.relation_type == RelationType::Parent && e.to == id)
            .map(|e| e.from),
    )
}
