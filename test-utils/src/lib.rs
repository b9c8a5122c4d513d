//! In-memory stand-ins for the ledger and the applier, plus deterministic
//! block fixtures. Everything here exists to drive the state machine in
//! tests; nothing is production code.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use lagoon_block::{Block, BlockHeader, BlockId, MicroBlock, NxtConsensus};
use lagoon_blockchain::{Applier, ApplyError, Ledger, LedgerError};
use lagoon_keys::{PublicKey, Signature};
use lagoon_transaction::{Alias, Proofs, Recipient, Transaction, Transfer};

/// A linear applied chain with the stable/newest id split of a real
/// ledger: ids appended by the applier are "newest" and are not resolvable
/// as rollback targets until [`MemoryLedger::flush`] promotes them. Blocks
/// taken over during bootstrap or through `add_deserialized_block` are
/// stable immediately.
pub struct MemoryLedger {
    token: Mutex<()>,
    inner: RwLock<Inner>,
}

struct Inner {
    blocks: Vec<Block>,
    stable: HashSet<BlockId>,
}

impl MemoryLedger {
    pub fn new(genesis: Block) -> Arc<MemoryLedger> {
        let mut stable = HashSet::new();
        stable.insert(genesis.id().clone());
        Arc::new(MemoryLedger {
            token: Mutex::new(()),
            inner: RwLock::new(Inner {
                blocks: vec![genesis],
                stable,
            }),
        })
    }

    /// Appends a block the way initial sync would: applied and indexed.
    pub fn bootstrap(&self, block: Block) {
        let mut inner = self.inner.write();
        inner.stable.insert(block.id().clone());
        inner.blocks.push(block);
    }

    /// Promotes every applied block to a stable rollback target.
    pub fn flush(&self) {
        let mut inner = self.inner.write();
        let ids: Vec<BlockId> = inner.blocks.iter().map(|b| b.id().clone()).collect();
        inner.stable.extend(ids);
    }

    pub fn head(&self) -> Block {
        self.inner.read().blocks.last().expect("ledger is never empty").clone()
    }

    pub fn ids(&self) -> Vec<BlockId> {
        self.inner.read().blocks.iter().map(|b| b.id().clone()).collect()
    }

    pub(crate) fn append_newest(&self, block: Block) {
        debug_assert!(self.token.is_locked());
        self.inner.write().blocks.push(block);
    }

    /// Reverts every block above the one with the given id, if it is
    /// applied at all. Ids are not required to be stable here; this models
    /// the applier's internal re-anchoring, not a peer-driven rollback.
    pub(crate) fn truncate_above(&self, id: &BlockId) {
        debug_assert!(self.token.is_locked());
        let mut inner = self.inner.write();
        if let Some(position) = inner.blocks.iter().position(|b| b.id() == id) {
            for removed in inner.blocks.split_off(position + 1) {
                inner.stable.remove(removed.id());
            }
        }
    }
}

impl Ledger for MemoryLedger {
    fn height(&self) -> Result<u64, LedgerError> {
        Ok(self.inner.read().blocks.len() as u64)
    }

    fn block_at(&self, height: u64) -> Result<Block, LedgerError> {
        let inner = self.inner.read();
        if height == 0 || height > inner.blocks.len() as u64 {
            return Err(LedgerError::NotFoundAtHeight(height));
        }
        Ok(inner.blocks[height as usize - 1].clone())
    }

    fn rollback_to(&self, id: &BlockId) -> Result<(), LedgerError> {
        debug_assert!(self.token.is_locked());
        let mut inner = self.inner.write();
        if !inner.stable.contains(id) {
            return Err(LedgerError::NotFound(id.clone()));
        }
        let position = inner
            .blocks
            .iter()
            .position(|b| b.id() == id)
            .ok_or_else(|| LedgerError::NotFound(id.clone()))?;
        for removed in inner.blocks.split_off(position + 1) {
            inner.stable.remove(removed.id());
        }
        Ok(())
    }

    fn rollback_to_height(&self, height: u64) -> Result<(), LedgerError> {
        debug_assert!(self.token.is_locked());
        let mut inner = self.inner.write();
        if height == 0 || height > inner.blocks.len() as u64 {
            return Err(LedgerError::Rollback(format!(
                "cannot roll back to height {}",
                height
            )));
        }
        for removed in inner.blocks.split_off(height as usize) {
            inner.stable.remove(removed.id());
        }
        Ok(())
    }

    fn add_deserialized_block(&self, block: Block) -> Result<(), LedgerError> {
        debug_assert!(self.token.is_locked());
        let mut inner = self.inner.write();
        inner.stable.insert(block.id().clone());
        inner.blocks.push(block);
        Ok(())
    }

    fn mutex(&self) -> &Mutex<()> {
        &self.token
    }
}

/// Applier over a [`MemoryLedger`]. Like the real one, it re-anchors at
/// the parent of the first block: if that parent is an applied block,
/// everything above it is reverted before appending. Validation rules are
/// out of scope, so blocks are otherwise accepted unless a test scripted a
/// rejection for their id.
pub struct MemoryApplier {
    ledger: Arc<MemoryLedger>,
    rejects: Mutex<HashSet<BlockId>>,
}

impl MemoryApplier {
    pub fn new(ledger: Arc<MemoryLedger>) -> MemoryApplier {
        MemoryApplier {
            ledger,
            rejects: Mutex::new(HashSet::new()),
        }
    }

    /// Makes every future `apply` of the given block id fail.
    pub fn reject(&self, id: BlockId) {
        self.rejects.lock().insert(id);
    }
}

impl Applier for MemoryApplier {
    fn apply(&self, blocks: &[Block]) -> Result<(), ApplyError> {
        {
            let rejects = self.rejects.lock();
            for block in blocks {
                if rejects.contains(block.id()) {
                    return Err(ApplyError::Rejected(
                        block.id().clone(),
                        "rejected by test script".to_string(),
                    ));
                }
            }
        }
        let _token = self.ledger.mutex().lock();
        if let Some(first) = blocks.first() {
            self.ledger.truncate_above(first.parent());
        }
        for block in blocks {
            self.ledger.append_newest(block.clone());
        }
        Ok(())
    }
}

pub fn block_id(tag: u8) -> BlockId {
    BlockId::from([tag; 64])
}

pub fn key_block(tag: u8, parent: &BlockId) -> Block {
    key_block_with_transactions(tag, parent, vec![transfer(tag)])
}

pub fn key_block_with_transactions(
    tag: u8,
    parent: &BlockId,
    transactions: Vec<Transaction>,
) -> Block {
    Block {
        header: BlockHeader {
            version: 5,
            timestamp: 1_600_000_000_000 + tag as u64 * 2_000,
            parent: parent.clone(),
            generator: PublicKey::from([tag; 32]),
            consensus: NxtConsensus::default(),
            features: vec![],
            reward_vote: 0,
            signature: block_id(tag),
        },
        transactions,
    }
}

pub fn micro_block(tag: u8, reference: &BlockId, transactions: Vec<Transaction>) -> MicroBlock {
    MicroBlock {
        version: 5,
        reference: reference.clone(),
        updated_signature: block_id(tag),
        transactions,
        sender: PublicKey::from([tag; 32]),
        signature: Signature::from([tag; 64]),
    }
}

pub fn transfer(tag: u8) -> Transaction {
    Transaction::Transfer(Transfer {
        version: 2,
        sender: PublicKey::from([tag; 32]),
        asset: None,
        fee_asset: None,
        timestamp: 1_600_000_000_000 + tag as u64,
        amount: 1_000 + tag as u64,
        fee: 100_000,
        recipient: Recipient::Alias(Alias::new(b'T', "fixture")),
        attachment: vec![],
        proofs: Proofs::single(&Signature::from([tag; 64])),
    })
}
