use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::Id;
use super::user::User;
use crate::error::FamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = FamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(FamError::Other(format!("Unknown gender: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifeStatus {
    Alive,
    Deceased,
}

impl LifeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifeStatus::Alive => "alive",
            LifeStatus::Deceased => "deceased",
        }
    }
}

impl FromStr for LifeStatus {
    type Err = FamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alive" => Ok(LifeStatus::Alive),
            "deceased" => Ok(LifeStatus::Deceased),
            other => Err(FamError::Other(format!("Unknown status: {}", other))),
        }
    }
}

/// A member of a family graph. Tree derivation only reads `id`,
/// `nickname` and `gender`; the rest is display data carried for callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: Id<Person>,
    pub name: String,
    pub nickname: String,
    pub gender: Gender,
    pub status: LifeStatus,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub owned_by: Vec<Id<User>>,
}

impl Person {
    pub fn create(name: String, nickname: String, gender: Gender) -> Self {
        Self {
            id: Id::generate(),
            name,
            nickname,
            gender,
            status: LifeStatus::Alive,
            birth_date: None,
            address: None,
            phone: None,
            photo_url: None,
            owned_by: Vec::new(),
        }
    }

    pub fn is_owned_by(&self, owner: Id<User>) -> bool {
        self.owned_by.contains(&owner)
    }
}
