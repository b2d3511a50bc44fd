use serde::{Deserialize, Serialize};

use super::ids::Id;

/// An account that owns person records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Id<User>,
    pub username: String,
}

impl User {
    pub fn create(username: String) -> Self {
        Self {
            id: Id::generate(),
            username,
        }
    }
}
