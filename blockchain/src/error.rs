use lagoon_block::BlockId;
use thiserror::Error;

/// Failures of the liquid storage itself. They never leave the state
/// machine; each one is logged and the triggering event is dropped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("liquid storage holds no key block")]
    Empty,
    #[error("key block cannot be pushed: {0}")]
    InvariantViolation(String),
    #[error("micro block references {reference} but the current tip is {tip}")]
    ReferenceMismatch { reference: BlockId, tip: BlockId },
}

/// Failures reported by the persistent ledger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{0} is not an applied block")]
    NotFound(BlockId),
    #[error("no applied block at height {0}")]
    NotFoundAtHeight(u64),
    #[error("rollback rejected: {0}")]
    Rollback(String),
}

impl LedgerError {
    /// The predicate the state machine branches on: the rollback target (or
    /// queried height) is simply unknown, as opposed to the ledger refusing
    /// the operation.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LedgerError::NotFound(_) | LedgerError::NotFoundAtHeight(_)
        )
    }
}

/// Failure of the validating block applier. The ledger is unchanged when
/// this is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplyError {
    #[error("block {0} rejected: {1}")]
    Rejected(BlockId, String),
}
