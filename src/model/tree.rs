use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ids::Id;
use super::person::{Gender, Person};
use crate::error::FamError;

pub const RELATION_KEY: &str = "relation";
pub const GENDER_KEY: &str = "gender";

pub type Attributes = BTreeMap<String, String>;

/// Which way a tree is expanded from its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Descendants,
    Ancestors,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Descendants => f.write_str("descendants"),
            Direction::Ancestors => f.write_str("ancestors"),
        }
    }
}

impl FromStr for Direction {
    type Err = FamError;

    /// Also accepts the view-mode words: viewing someone as a `parent` shows
    /// their descendants, as a `child` shows their ancestors.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "descendants" | "down" | "parent" => Ok(Direction::Descendants),
            "ancestors" | "up" | "child" => Ok(Direction::Ancestors),
            other => Err(FamError::Other(format!("Unknown direction: {}", other))),
        }
    }
}

/// Traversal-time node built by the tree builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: Id<Person>,
    pub name: String,
    pub gender: Gender,
    pub attributes: Attributes,
    pub children: Vec<TreeNode>,
    pub spouses: Vec<TreeNode>,
    pub parents: Vec<TreeNode>,
}

impl TreeNode {
    /// Bare node for `person`: no attributes, nothing expanded.
    pub fn leaf(person: &Person) -> Self {
        Self {
            id: person.id,
            name: person.nickname.clone(),
            gender: person.gender,
            attributes: Attributes::new(),
            children: Vec::new(),
            spouses: Vec::new(),
            parents: Vec::new(),
        }
    }

    /// Node for an expanded person, tagged with its gender.
    pub fn expanded(person: &Person) -> Self {
        let mut node = Self::leaf(person);
        node.attributes
            .insert(GENDER_KEY.to_string(), person.gender.as_str().to_string());
        node
    }
}

/// How a display node relates to its parent in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRelation {
    Plain,
    Spouse,
    Parent,
}

impl NodeRelation {
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            NodeRelation::Plain => None,
            NodeRelation::Spouse => Some("spouse"),
            NodeRelation::Parent => Some("parent"),
        }
    }
}

/// Externally visible tree node. `relation` is mirrored in
/// `attributes["relation"]`, which is what gets serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayNode {
    pub id: Id<Person>,
    pub name: String,
    pub gender: String,
    #[serde(skip)]
    pub relation: NodeRelation,
    pub attributes: Attributes,
    pub children: Vec<DisplayNode>,
}

impl DisplayNode {
    pub fn new(id: Id<Person>, name: impl Into<String>, gender: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            gender: gender.into(),
            relation: NodeRelation::Plain,
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Marks this node as a spouse/parent entry and records the tag in
    /// the attributes.
    pub fn with_relation(mut self, relation: NodeRelation) -> Self {
        self.relation = relation;
        match relation.tag() {
            Some(tag) => {
                self.attributes
                    .insert(RELATION_KEY.to_string(), tag.to_string());
            }
            None => {
                self.attributes.remove(RELATION_KEY);
            }
        }
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// Drops empty values; absent values never enter the map in the first place.
pub fn filter_attributes(attributes: &Attributes) -> Attributes {
    attributes
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
