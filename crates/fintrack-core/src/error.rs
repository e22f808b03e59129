use std::io;

use fintrack_domain::ValidationError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("{entity} {id} already exists")]
    DuplicateId { entity: &'static str, id: Uuid },
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CoreError {
    pub fn transaction_not_found(id: Uuid) -> Self {
        CoreError::NotFound {
            entity: "Transaction",
            id,
        }
    }

    pub fn budget_not_found(id: Uuid) -> Self {
        CoreError::NotFound {
            entity: "Budget",
            id,
        }
    }

    pub fn duplicate_transaction(id: Uuid) -> Self {
        CoreError::DuplicateId {
            entity: "Transaction",
            id,
        }
    }

    pub fn duplicate_budget(id: Uuid) -> Self {
        CoreError::DuplicateId {
            entity: "Budget",
            id,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}
