use lagoon_block::{Block, BlockId, MicroBlock};
use lagoon_primitives::Scheme;

use crate::error::StorageError;

/// One key block plus the micro blocks accumulated on top of it, in
/// announcement order.
#[derive(Clone, Debug)]
struct Row {
    key_block: Block,
    micros: Vec<MicroBlock>,
}

impl Row {
    fn new(key_block: Block) -> Row {
        Row {
            key_block,
            micros: Vec::new(),
        }
    }

    fn tip_id(&self) -> &BlockId {
        match self.micros.last() {
            Some(micro) => &micro.updated_signature,
            None => self.key_block.id(),
        }
    }

    fn contains_id(&self, id: &BlockId) -> bool {
        self.key_block.id() == id || self.micros.iter().any(|m| &m.updated_signature == id)
    }

    fn synthesize(&self) -> Block {
        self.key_block.extend_with_micros(&self.micros)
    }

    fn synthesize_without_last_micro(&self) -> Block {
        let keep = self.micros.len().saturating_sub(1);
        self.key_block.extend_with_micros(&self.micros[..keep])
    }
}

/// The in-memory liquid extension of the chain: the current key block with
/// its micro chain, plus the row it superseded.
///
/// The superseded row is what makes a key-block push reversible (`pop`
/// restores it) and what the rebase path inspects when a new key block
/// extends an intermediate liquid tip rather than an applied block.
pub struct LiquidStorage {
    scheme: Scheme,
    current: Option<Row>,
    previous: Option<Row>,
}

impl LiquidStorage {
    pub fn new(scheme: Scheme) -> LiquidStorage {
        LiquidStorage {
            scheme,
            current: None,
            previous: None,
        }
    }

    /// A fresh storage anchored at the given block, carrying this storage's
    /// scheme forward.
    pub fn new_from_block(&self, block: Block) -> LiquidStorage {
        LiquidStorage {
            scheme: self.scheme,
            current: Some(Row::new(block)),
            previous: None,
        }
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Makes `block` the key block of a fresh row. The replaced row is kept
    /// so the push can be undone.
    pub fn push_block(&mut self, block: Block) -> Result<(), StorageError> {
        self.previous = self.current.take();
        self.current = Some(Row::new(block));
        Ok(())
    }

    /// Appends a micro block to the current row. It must reference the
    /// current tip.
    pub fn push_micro(&mut self, micro: MicroBlock) -> Result<(), StorageError> {
        let row = self.current.as_mut().ok_or(StorageError::Empty)?;
        let tip = row.tip_id();
        if &micro.reference != tip {
            return Err(StorageError::ReferenceMismatch {
                reference: micro.reference.clone(),
                tip: tip.clone(),
            });
        }
        row.micros.push(micro);
        Ok(())
    }

    /// Removes the most recently pushed unit: the current row's last micro
    /// if it has one, otherwise the whole row (restoring the superseded row
    /// when present). Never fails.
    pub fn pop(&mut self) {
        match &mut self.current {
            Some(row) if !row.micros.is_empty() => {
                row.micros.pop();
            }
            _ => {
                self.current = self.previous.take();
            }
        }
    }

    /// The synthesized tip of the current row.
    pub fn block(&self) -> Result<Block, StorageError> {
        self.current
            .as_ref()
            .map(Row::synthesize)
            .ok_or(StorageError::Empty)
    }

    /// The tip one announcement back: the current row without its last
    /// micro, or — right after a key-block push — the superseded row
    /// without its last micro.
    pub fn previous_block(&self) -> Result<Block, StorageError> {
        let current = self.current.as_ref().ok_or(StorageError::Empty)?;
        if !current.micros.is_empty() {
            return Ok(current.synthesize_without_last_micro());
        }
        match &self.previous {
            Some(previous) => Ok(previous.synthesize_without_last_micro()),
            None => Ok(current.key_block.clone()),
        }
    }

    /// Whether `id` names a key block or an intermediate liquid tip held in
    /// either row.
    pub fn contains_id(&self, id: &BlockId) -> bool {
        self.current.iter().chain(self.previous.iter()).any(|row| row.contains_id(id))
    }

    /// The current tip id, if a key block has been pushed.
    pub fn tip_id(&self) -> Option<BlockId> {
        self.current.as_ref().map(|row| row.tip_id().clone())
    }
}

#[cfg(test)]
mod tests {
    use lagoon_block::BlockHeader;
    use lagoon_block::NxtConsensus;

    use super::*;

    fn block(tag: u8, parent: u8) -> Block {
        Block {
            header: BlockHeader {
                version: 5,
                timestamp: tag as u64,
                parent: BlockId::from([parent; 64]),
                generator: Default::default(),
                consensus: NxtConsensus::default(),
                features: vec![],
                reward_vote: 0,
                signature: BlockId::from([tag; 64]),
            },
            transactions: vec![],
        }
    }

    fn micro(reference: &BlockId, updated: u8) -> MicroBlock {
        MicroBlock {
            version: 5,
            reference: reference.clone(),
            updated_signature: BlockId::from([updated; 64]),
            transactions: vec![],
            sender: Default::default(),
            signature: Default::default(),
        }
    }

    fn id(tag: u8) -> BlockId {
        BlockId::from([tag; 64])
    }

    #[test]
    fn reads_on_empty_storage_fail() {
        let storage = LiquidStorage::new(Scheme::Testnet);
        assert_eq!(storage.block(), Err(StorageError::Empty));
        assert_eq!(storage.previous_block(), Err(StorageError::Empty));
        assert_eq!(storage.tip_id(), None);
    }

    #[test]
    fn micro_on_empty_storage_fails() {
        let mut storage = LiquidStorage::new(Scheme::Testnet);
        assert_eq!(
            storage.push_micro(micro(&id(1), 2)),
            Err(StorageError::Empty)
        );
    }

    #[test]
    fn micro_must_reference_the_tip() {
        let mut storage = LiquidStorage::new(Scheme::Testnet);
        storage.push_block(block(1, 0)).unwrap();
        assert_eq!(
            storage.push_micro(micro(&id(9), 2)),
            Err(StorageError::ReferenceMismatch {
                reference: id(9),
                tip: id(1),
            })
        );
        storage.push_micro(micro(&id(1), 2)).unwrap();
        // The next micro chains off the updated signature, not the key
        // block.
        assert_eq!(
            storage.push_micro(micro(&id(1), 3)),
            Err(StorageError::ReferenceMismatch {
                reference: id(1),
                tip: id(2),
            })
        );
        storage.push_micro(micro(&id(2), 3)).unwrap();
        assert_eq!(storage.tip_id(), Some(id(3)));
    }

    #[test]
    fn push_micro_then_pop_restores_the_previous_state() {
        let mut storage = LiquidStorage::new(Scheme::Testnet);
        storage.push_block(block(1, 0)).unwrap();
        storage.push_micro(micro(&id(1), 2)).unwrap();
        let before = storage.block().unwrap();

        storage.push_micro(micro(&id(2), 3)).unwrap();
        storage.pop();

        assert_eq!(storage.block().unwrap(), before);
        assert_eq!(storage.tip_id(), Some(id(2)));
    }

    #[test]
    fn pop_after_key_block_push_restores_the_superseded_row() {
        let mut storage = LiquidStorage::new(Scheme::Testnet);
        storage.push_block(block(1, 0)).unwrap();
        storage.push_micro(micro(&id(1), 2)).unwrap();

        storage.push_block(block(4, 2)).unwrap();
        assert_eq!(storage.tip_id(), Some(id(4)));

        storage.pop();
        assert_eq!(storage.tip_id(), Some(id(2)));

        // Only one superseded row is kept: the next pops unwind the micro
        // and then the key block itself.
        storage.pop();
        assert_eq!(storage.tip_id(), Some(id(1)));
        storage.pop();
        assert_eq!(storage.tip_id(), None);
    }

    #[test]
    fn previous_block_drops_the_last_micro() {
        let mut storage = LiquidStorage::new(Scheme::Testnet);
        storage.push_block(block(1, 0)).unwrap();
        assert_eq!(storage.previous_block().unwrap(), block(1, 0));

        storage.push_micro(micro(&id(1), 2)).unwrap();
        assert_eq!(storage.previous_block().unwrap().id(), &id(1));

        storage.push_micro(micro(&id(2), 3)).unwrap();
        // previous_block().id() equals the last micro's reference.
        assert_eq!(storage.previous_block().unwrap().id(), &id(2));
    }

    #[test]
    fn previous_block_after_key_push_sees_the_superseded_row() {
        let mut storage = LiquidStorage::new(Scheme::Testnet);
        storage.push_block(block(1, 0)).unwrap();
        storage.push_micro(micro(&id(1), 2)).unwrap();
        storage.push_block(block(4, 2)).unwrap();

        assert_eq!(storage.previous_block().unwrap().id(), &id(1));
    }

    #[test]
    fn contains_id_sees_both_rows() {
        let mut storage = LiquidStorage::new(Scheme::Testnet);
        storage.push_block(block(1, 0)).unwrap();
        storage.push_micro(micro(&id(1), 2)).unwrap();
        storage.push_block(block(4, 2)).unwrap();

        assert!(storage.contains_id(&id(1)));
        assert!(storage.contains_id(&id(2)));
        assert!(storage.contains_id(&id(4)));
        assert!(!storage.contains_id(&id(9)));
    }

    #[test]
    fn fresh_storage_keeps_the_scheme() {
        let storage = LiquidStorage::new(Scheme::Mainnet);
        let fresh = storage.new_from_block(block(1, 0));
        assert_eq!(fresh.scheme(), Scheme::Mainnet);
        assert_eq!(fresh.tip_id(), Some(id(1)));
        assert!(!fresh.contains_id(&id(9)));
    }
}
