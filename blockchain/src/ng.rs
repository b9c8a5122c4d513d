use std::sync::Arc;

use lagoon_block::{Block, BlockId, MicroBlock};
use lagoon_primitives::Scheme;
use parking_lot::Mutex;

use crate::known_blocks::KnownBlocks;
use crate::ledger::{Applier, Ledger};
use crate::liquid_storage::LiquidStorage;

/// The state machine that keeps the ledger tip, the liquid view and the
/// duplicate memory consistent while peers stream key blocks and micro
/// blocks.
///
/// All three operations are serialized by one mutex held for the whole call
/// body; the ledger's own mutex is only ever taken while that mutex is
/// held (state machine first, ledger second). The applier is invoked
/// without the ledger mutex — it takes it internally.
///
/// Every operation is total: failures are logged and the triggering event
/// is dropped, leaving the node to resynchronize on the next one.
pub struct NgState<L, A> {
    ledger: Arc<L>,
    applier: A,
    inner: Mutex<Inner>,
}

struct Inner {
    storage: LiquidStorage,
    known_blocks: KnownBlocks,
    prev_added_block: Option<Block>,
}

impl<L: Ledger, A: Applier> NgState<L, A> {
    pub fn new(scheme: Scheme, ledger: Arc<L>, applier: A) -> NgState<L, A> {
        NgState {
            ledger,
            applier,
            inner: Mutex::new(Inner {
                storage: LiquidStorage::new(scheme),
                known_blocks: KnownBlocks::new(),
                prev_added_block: None,
            }),
        }
    }

    /// Ingests a key block received from a peer.
    pub fn add_block(&self, block: Block) {
        let mut inner = self.inner.lock();

        if !inner.known_blocks.add(block.id()) {
            // Already tried this one.
            return;
        }
        if let Some(prev) = &inner.prev_added_block {
            if prev.id() == block.id() {
                return;
            }
        }

        if let Err(e) = inner.storage.push_block(block.clone()) {
            debug!("Dropping key block {}: {}", block.id(), e);
            return;
        }

        let rolled_back = {
            let _ledger_token = self.ledger.mutex().lock();
            self.ledger.rollback_to(block.parent())
        };

        if let Err(e) = rolled_back {
            if e.is_not_found() {
                debug!("No applied block to roll back to for {}", block.parent());
                if inner.storage.contains_id(block.parent()) {
                    debug!(
                        "Parent {} is an intermediate liquid tip, rebasing the ledger",
                        block.parent()
                    );
                    if !self.rebase_onto_liquid_parent(&inner) {
                        return;
                    }
                }
            } else {
                info!(
                    "Cannot roll back to {} for incoming block {}: {}",
                    block.parent(),
                    block.id(),
                    e
                );
                inner.storage.pop();
                return;
            }
        }

        if let Err(e) = self.applier.apply(std::slice::from_ref(&block)) {
            debug!("Key block {} was not applied: {}", block.id(), e);
            inner.storage.pop();

            // Best effort: put the old tip back.
            if let Some(prev) = inner.prev_added_block.clone() {
                if let Err(e) = self.applier.apply(&[prev]) {
                    error!(
                        "Cannot re-apply the previous block, the node state may be inconsistent: {}",
                        e
                    );
                }
            }
            return;
        }

        inner.prev_added_block = Some(block);
    }

    /// Replaces the ledger tip with the liquid view one announcement back,
    /// making room for a key block that extends an intermediate tip. The
    /// ledger mutex is held across the read-modify-write sequence.
    fn rebase_onto_liquid_parent(&self, inner: &Inner) -> bool {
        let prev_block = match inner.storage.previous_block() {
            Ok(block) => block,
            Err(e) => {
                debug!("{}", e);
                return false;
            }
        };

        let _ledger_token = self.ledger.mutex().lock();
        let height = match self.ledger.height() {
            Ok(height) => height,
            Err(e) => {
                debug!("{}", e);
                return false;
            }
        };
        let target = match height.checked_sub(1) {
            Some(target) => target,
            None => {
                debug!("Ledger is at height 0, nothing to rebase");
                return false;
            }
        };
        if let Err(e) = self.ledger.rollback_to_height(target) {
            debug!("{}", e);
            return false;
        }
        if let Err(e) = self.ledger.add_deserialized_block(prev_block) {
            debug!("{}", e);
            return false;
        }
        true
    }

    /// Ingests a micro block: rewrites the tip by rolling the ledger back
    /// one block and re-applying it with the accumulated transactions.
    pub fn add_micro_block(&self, micro: MicroBlock) {
        let mut inner = self.inner.lock();

        let prev_added = match &inner.prev_added_block {
            Some(block) => block.clone(),
            None => {
                debug!(
                    "Ignoring micro block {}: no block has been applied yet",
                    micro.updated_signature
                );
                return;
            }
        };

        if let Err(e) = inner.storage.push_micro(micro) {
            debug!("Failed to push micro block: {}", e);
            return;
        }

        let candidate = match inner.storage.block() {
            Ok(block) => block,
            Err(e) => {
                error!("{}", e);
                return;
            }
        };

        if prev_added.parent() != candidate.parent() {
            error!(
                "Liquid tip diverged: expected parent {}, synthesized {}",
                prev_added.parent(),
                candidate.parent()
            );
            return;
        }

        let height = match self.ledger.height() {
            Ok(height) => height,
            Err(e) => {
                error!("{}", e);
                return;
            }
        };
        let head = match self.ledger.block_at(height) {
            Ok(block) => block,
            Err(e) => {
                error!("{}", e);
                return;
            }
        };
        if head.parent() != candidate.parent() {
            error!(
                "Ledger head parent {} does not match the liquid parent {}",
                head.parent(),
                candidate.parent()
            );
            return;
        }

        {
            let _ledger_token = self.ledger.mutex().lock();
            if let Err(e) = self.ledger.rollback_to(candidate.parent()) {
                error!("Failed to roll back to {}: {}", candidate.parent(), e);
                return;
            }
        }

        if let Err(e) = self.applier.apply(std::slice::from_ref(&candidate)) {
            error!("Liquid block {} was not applied: {}", candidate.id(), e);
            inner.storage.pop();
            return;
        }

        inner.prev_added_block = Some(candidate);
    }

    /// Notification that a block reached the ledger outside this machine
    /// (initial sync, replay). Reads the tip and re-anchors the liquid view
    /// on it; the superseded view is discarded.
    pub fn block_applied(&self) {
        let height = match self.ledger.height() {
            Ok(height) => height,
            Err(e) => {
                debug!("{}", e);
                return;
            }
        };
        let block = match self.ledger.block_at(height) {
            Ok(block) => block,
            Err(e) => {
                debug!("{}", e);
                return;
            }
        };

        let mut inner = self.inner.lock();
        if let Some(prev) = &inner.prev_added_block {
            if prev.id() == block.id() {
                return;
            }
        }
        inner.storage = inner.storage.new_from_block(block.clone());
        inner.prev_added_block = Some(block);
    }

    /// Id of the block this machine last saw applied, if any.
    pub fn last_block_id(&self) -> Option<BlockId> {
        self.inner
            .lock()
            .prev_added_block
            .as_ref()
            .map(|block| block.id().clone())
    }

    /// The current synthesized liquid tip, if the storage is anchored.
    pub fn liquid_block(&self) -> Option<Block> {
        self.inner.lock().storage.block().ok()
    }
}
