use crate::model::tree::GENDER_KEY;
use crate::model::{filter_attributes, DisplayNode, NodeRelation, TreeNode};

/// Converts a traversal node into display form. Spouses and parents become
/// tagged children, appended after the node's own children.
pub fn normalize(node: &TreeNode) -> DisplayNode {
    let mut out = DisplayNode::new(node.id, node.name.clone(), node.gender.as_str());
    out.attributes = filter_attributes(&node.attributes);

    out.children.extend(node.children.iter().map(normalize));
    out.children.extend(node.spouses.iter().map(spouse_entry));
    out.children.extend(node.parents.iter().map(parent_entry));
    out
}

fn tagged(node: &TreeNode, relation: NodeRelation) -> DisplayNode {
    let mut out = DisplayNode::new(node.id, node.name.clone(), node.gender.as_str());
    out.attributes
        .insert(GENDER_KEY.to_string(), node.gender.as_str().to_string());
    out.with_relation(relation)
}

fn spouse_entry(spouse: &TreeNode) -> DisplayNode {
    let mut out = tagged(spouse, NodeRelation::Spouse);
    out.children = spouse.children.iter().map(normalize).collect();
    out
}

// Grandparents hang under their child's entry, so an ancestor chain nests
// downwards as parent-of-parent.
fn parent_entry(parent: &TreeNode) -> DisplayNode {
    let mut out = tagged(parent, NodeRelation::Parent);
    out.children = parent
        .children
        .iter()
        .map(normalize)
        .chain(parent.parents.iter().map(parent_entry))
        .collect();
    out
}
