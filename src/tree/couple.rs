use crate::model::tree::GENDER_KEY;
use crate::model::{filter_attributes, DisplayNode, NodeRelation};

/// Folds each person and spouse into one couple node.
///
/// Returns one node per spouse, named `"{person} & {spouse}"` and holding
/// that couple's children, followed by one node for the person's remaining
/// children if there are any. A person without spouses maps to a single
/// node. Parent entries are dropped.
///
/// Couple nodes reuse the person's id, so siblings from one person with
/// several spouses share an id.
pub fn merge_couples(node: &DisplayNode) -> Vec<DisplayNode> {
    if node.children.is_empty() {
        return vec![with_children(node, Vec::new())];
    }

    let mut spouses = Vec::new();
    let mut plain = Vec::new();
    for child in &node.children {
        match child.relation {
            NodeRelation::Spouse => spouses.push(child),
            NodeRelation::Parent => {}
            NodeRelation::Plain => plain.push(child),
        }
    }

    if spouses.is_empty() {
        return vec![with_children(node, merge_all(plain))];
    }

    let mut result: Vec<DisplayNode> = spouses
        .into_iter()
        .map(|spouse| couple(node, spouse))
        .collect();
    if !plain.is_empty() {
        result.push(with_children(node, merge_all(plain)));
    }
    result
}

fn merge_all<'a>(nodes: impl IntoIterator<Item = &'a DisplayNode>) -> Vec<DisplayNode> {
    nodes.into_iter().flat_map(merge_couples).collect()
}

fn with_children(node: &DisplayNode, children: Vec<DisplayNode>) -> DisplayNode {
    DisplayNode {
        id: node.id,
        name: node.name.clone(),
        gender: node.gender.clone(),
        relation: node.relation,
        attributes: filter_attributes(&node.attributes),
        children,
    }
}

fn couple(person: &DisplayNode, spouse: &DisplayNode) -> DisplayNode {
    let mut attributes = filter_attributes(&person.attributes);
    attributes.remove(GENDER_KEY);

    let shared = spouse
        .children
        .iter()
        .filter(|c| c.relation == NodeRelation::Plain);

    DisplayNode {
        id: person.id,
        name: format!("{} & {}", person.name, spouse.name),
        gender: String::new(),
        relation: person.relation,
        attributes,
        children: merge_all(shared),
    }
}
