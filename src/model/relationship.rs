use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ids::Id;
use super::person::Person;
use crate::error::FamError;

/// Edge type, read from the `from` person's point of view: a `Parent` edge
/// `A -> B` says A is a parent of B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    Parent,
    Child,
    Spouse,
}

impl RelationType {
    pub fn inverse(self) -> RelationType {
        match self {
            RelationType::Parent => RelationType::Child,
            RelationType::Child => RelationType::Parent,
            RelationType::Spouse => RelationType::Spouse,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::Parent => "parent",
            RelationType::Child => "child",
            RelationType::Spouse => "spouse",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationType {
    type Err = FamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parent" => Ok(RelationType::Parent),
            "child" => Ok(RelationType::Child),
            "spouse" => Ok(RelationType::Spouse),
            other => Err(FamError::Other(format!("Unknown relationship type: {}", other))),
        }
    }
}

/// Identity of an edge for diffing: at most one live edge exists per key.
pub type EdgeKey = (Id<Person>, Id<Person>, RelationType);

/// A directed, typed link between two people.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    pub id: Id<RelationshipEdge>,
    pub from: Id<Person>,
    pub to: Id<Person>,
    #[serde(rename = "type")]
    pub relation_type: RelationType,
    pub order: i64,
}

impl RelationshipEdge {
    pub fn create(from: Id<Person>, to: Id<Person>, relation_type: RelationType, order: i64) -> Self {
        Self {
            id: Id::generate(),
            from,
            to,
            relation_type,
            order,
        }
    }

    pub fn key(&self) -> EdgeKey {
        (self.from, self.to, self.relation_type)
    }

    pub fn touches(&self, person_id: Id<Person>) -> bool {
        self.from == person_id || self.to == person_id
    }

    /// The endpoint that is not `person_id`.
    pub fn other_end(&self, person_id: Id<Person>) -> Id<Person> {
        if self.from == person_id {
            self.to
        } else {
            self.from
        }
    }
}

/// One entry of a caller-supplied relationship list. `to` and
/// `relation_type` are optional so malformed entries can be skipped rather
/// than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredRelationship {
    #[serde(default)]
    pub from: Option<Id<Person>>,
    #[serde(default)]
    pub to: Option<Id<Person>>,
    #[serde(default, rename = "type")]
    pub relation_type: Option<RelationType>,
    #[serde(default)]
    pub order: Option<i64>,
}

impl DesiredRelationship {
    pub fn new(to: Id<Person>, relation_type: RelationType, order: i64) -> Self {
        Self {
            from: None,
            to: Some(to),
            relation_type: Some(relation_type),
            order: Some(order),
        }
    }

    pub fn with_from(mut self, from: Id<Person>) -> Self {
        self.from = Some(from);
        self
    }
}
