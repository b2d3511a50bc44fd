use std::fmt;

use thiserror::Error;

/// Which write batch of a reconciliation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileStage {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for ReconcileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReconcileStage::Insert => "insert",
            ReconcileStage::Update => "update",
            ReconcileStage::Delete => "delete",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Error)]
pub enum FamError {
    #[error("{field} cannot be blank")]
    BlankField { field: String },

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Cycle detected while expanding person {id}")]
    CycleDetected { id: String },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Reconciliation failed during {stage}: {source}")]
    Reconcile {
        stage: ReconcileStage,
        #[source]
        source: Box<FamError>,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl FamError {
    pub fn person_not_found(id: impl fmt::Display) -> Self {
        FamError::NotFound {
            entity_type: "Person".into(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FamError::NotFound { .. })
    }
}

pub type FamResult<T> = Result<T, FamError>;
