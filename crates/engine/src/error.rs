//! Engine error model, as seen by callers of the request/response boundary.

use thiserror::Error;

use stockroom_core::{BillId, DomainError};
use stockroom_store::StorageError;

/// Result type returned by every engine operation.
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Client input rejected before any storage was touched.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The identity key or record id does not resolve. Terminal; no effect.
    #[error("not found")]
    NotFound,

    /// The sale asked for more than the key's aggregated stock. Terminal; no
    /// mutation occurred.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u64, available: u64 },

    /// Backend fault, surfaced as-is. The operation was rolled back; for a
    /// sale this means the bill was not recorded.
    #[error("storage fault: {0}")]
    Storage(#[from] StorageError),

    /// Backend fault during the sale commit where rollback also failed, so
    /// stock state is indeterminate. Probe the bill store with `bill_id` to
    /// decide whether the sale was recorded.
    #[error("commit fault for bill {bill_id}: {source}")]
    CommitFault {
        bill_id: BillId,
        source: StorageError,
    },
}

impl EngineError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<DomainError> for EngineError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput(msg) => Self::InvalidInput(msg),
            DomainError::InvalidId(msg) => Self::InvalidInput(msg),
            DomainError::NotFound => Self::NotFound,
            DomainError::InsufficientStock {
                requested,
                available,
            } => Self::InsufficientStock {
                requested,
                available,
            },
        }
    }
}
