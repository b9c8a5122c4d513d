use std::sync::Arc;

use lagoon_block::{Block, BlockId};
use parking_lot::Mutex;

use crate::error::{ApplyError, LedgerError};

/// The persistent, linear chain of applied blocks.
///
/// The ledger is shared with readers and writers outside this crate, so it
/// exposes its own lock token instead of guarded methods: the mutating
/// calls (`rollback_to`, `rollback_to_height`, `add_deserialized_block`)
/// must only be issued while the caller holds the guard obtained from
/// [`Ledger::mutex`], and a sequence of reads that must stay consistent
/// with a following write has to sit inside the same critical section.
/// Plain reads (`height`, `block_at`) may run without the token.
///
/// Lock order is state machine first, ledger second; see [`crate::NgState`].
pub trait Ledger {
    /// Height of the current chain tip.
    fn height(&self) -> Result<u64, LedgerError>;

    /// The applied block at the given height.
    fn block_at(&self, height: u64) -> Result<Block, LedgerError>;

    /// Rolls the chain back so the block with the given id becomes the tip.
    fn rollback_to(&self, id: &BlockId) -> Result<(), LedgerError>;

    /// Rolls the chain back to the given height.
    fn rollback_to_height(&self, height: u64) -> Result<(), LedgerError>;

    /// Appends an already-deserialized block without re-validation.
    fn add_deserialized_block(&self, block: Block) -> Result<(), LedgerError>;

    /// The lock token guarding mutations; see the trait docs.
    fn mutex(&self) -> &Mutex<()>;
}

/// The validating writer of the ledger: the only component allowed to grow
/// the applied chain. A call is atomic — on failure the ledger is
/// guaranteed unchanged. Implementations coordinate with the ledger mutex
/// internally, so callers must not hold it across [`Applier::apply`].
pub trait Applier {
    fn apply(&self, blocks: &[Block]) -> Result<(), ApplyError>;
}

impl<T: Applier + ?Sized> Applier for Arc<T> {
    fn apply(&self, blocks: &[Block]) -> Result<(), ApplyError> {
        (**self).apply(blocks)
    }
}
