pub mod schema;
pub mod person_repo;
pub mod relationship_repo;
pub mod store;
pub mod memory;
pub mod sqlite;

pub use memory::{MemoryStore, StoreOp};
pub use sqlite::SqliteStore;
pub use store::FamilyStore;

use crate::error::{FamError, FamResult};
use crate::model::Id;

pub(crate) fn parse_id<T>(s: &str) -> FamResult<Id<T>> {
    Id::parse(s).map_err(|e| FamError::Other(format!("Invalid UUID: {}", e)))
}
