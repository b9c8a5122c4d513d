use lagoon_keys::PublicKey;
use lagoon_macros::fixed_byte_array;
use lagoon_serial::{
    Deserialize, DeserializeWithLength, ReadBytesExt, Serialize, SerializeWithLength,
    SerializingError, WriteBytesExt,
};
use lagoon_transaction::Transaction;

use crate::{BlockId, MicroBlock};

pub const MAX_FEATURE_VOTES: usize = 64;
pub const MAX_TRANSACTIONS_PER_BLOCK: usize = 65_535;

fixed_byte_array!(GenSignature, 32);

/// The proof-of-stake lottery parameters the generator committed to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NxtConsensus {
    pub base_target: u64,
    pub generation_signature: GenSignature,
}

impl Serialize for NxtConsensus {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        Ok(self.base_target.serialize(writer)? + self.generation_signature.serialize(writer)?)
    }

    fn serialized_size(&self) -> usize {
        8 + GenSignature::SIZE
    }
}

impl Deserialize for NxtConsensus {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(NxtConsensus {
            base_target: Deserialize::deserialize(reader)?,
            generation_signature: Deserialize::deserialize(reader)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockHeader {
    pub version: u8,
    pub timestamp: u64,
    pub parent: BlockId,
    pub generator: PublicKey,
    pub consensus: NxtConsensus,
    /// Protocol features this generator votes to activate.
    pub features: Vec<i16>,
    pub reward_vote: i64,
    pub signature: BlockId,
}

impl Serialize for BlockHeader {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = self.version.serialize(writer)?;
        size += self.timestamp.serialize(writer)?;
        size += self.parent.serialize(writer)?;
        size += self.generator.serialize(writer)?;
        size += self.consensus.serialize(writer)?;
        size += SerializeWithLength::serialize::<u32, W>(&self.features, writer)?;
        size += self.reward_vote.serialize(writer)?;
        size += self.signature.serialize(writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + 8
            + self.parent.serialized_size()
            + self.generator.serialized_size()
            + self.consensus.serialized_size()
            + 4
            + 2 * self.features.len()
            + 8
            + self.signature.serialized_size()
    }
}

impl Deserialize for BlockHeader {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(BlockHeader {
            version: Deserialize::deserialize(reader)?,
            timestamp: Deserialize::deserialize(reader)?,
            parent: Deserialize::deserialize(reader)?,
            generator: Deserialize::deserialize(reader)?,
            consensus: Deserialize::deserialize(reader)?,
            features: DeserializeWithLength::deserialize_with_limit::<u32, R>(
                reader,
                Some(MAX_FEATURE_VOTES),
            )?,
            reward_vote: Deserialize::deserialize(reader)?,
            signature: Deserialize::deserialize(reader)?,
        })
    }
}

/// An applied or applicable unit of the chain. A key block as produced by a
/// generator carries its initial transactions; a liquid block additionally
/// carries everything accumulated from micro blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub fn id(&self) -> &BlockId {
        &self.header.signature
    }

    pub fn parent(&self) -> &BlockId {
        &self.header.parent
    }

    pub fn timestamp(&self) -> u64 {
        self.header.timestamp
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Fuses this key block with micro blocks that extend it into the
    /// equivalent standalone block: the header is kept, the transactions are
    /// concatenated in announcement order, and the signature becomes the
    /// last announced one. The caller guarantees the micros form a chain
    /// rooted at this block; the updated signature is authoritative by
    /// protocol, so nothing is re-derived.
    pub fn extend_with_micros(&self, micros: &[MicroBlock]) -> Block {
        let mut transactions = self.transactions.clone();
        let mut signature = self.header.signature.clone();
        for micro in micros {
            transactions.extend_from_slice(&micro.transactions);
            signature = micro.updated_signature.clone();
        }
        Block {
            header: BlockHeader {
                signature,
                ..self.header.clone()
            },
            transactions,
        }
    }
}

impl Serialize for Block {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = self.header.serialize(writer)?;
        size += SerializeWithLength::serialize::<u32, W>(&self.transactions, writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        self.header.serialized_size()
            + SerializeWithLength::serialized_size::<u32>(&self.transactions)
    }
}

impl Deserialize for Block {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(Block {
            header: Deserialize::deserialize(reader)?,
            transactions: DeserializeWithLength::deserialize_with_limit::<u32, R>(
                reader,
                Some(MAX_TRANSACTIONS_PER_BLOCK),
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use lagoon_keys::{Address, Signature};
    use lagoon_transaction::{Genesis, Transaction};

    use super::*;

    fn payment_like(tag: u8) -> Transaction {
        Transaction::Genesis(Genesis {
            version: 1,
            timestamp: tag as u64,
            recipient: Address::from_public_key(b'T', &PublicKey::from([tag; 32])),
            amount: 10,
            signature: Signature::from([tag; 64]),
        })
    }

    fn key_block(tag: u8) -> Block {
        Block {
            header: BlockHeader {
                version: 5,
                timestamp: 1_600_000_000_000,
                parent: BlockId::from([0u8; 64]),
                generator: PublicKey::from([8u8; 32]),
                consensus: NxtConsensus {
                    base_target: 1_000,
                    generation_signature: GenSignature::from([3u8; 32]),
                },
                features: vec![14, 15],
                reward_vote: -1,
                signature: BlockId::from([tag; 64]),
            },
            transactions: vec![payment_like(1)],
        }
    }

    fn micro(reference: &BlockId, updated: u8, txs: Vec<Transaction>) -> MicroBlock {
        MicroBlock {
            version: 5,
            reference: reference.clone(),
            updated_signature: BlockId::from([updated; 64]),
            transactions: txs,
            sender: PublicKey::from([8u8; 32]),
            signature: Signature::from([updated; 64]),
        }
    }

    #[test]
    fn block_roundtrip() {
        let block = key_block(7);
        let encoded = block.serialize_to_vec();
        assert_eq!(encoded.len(), block.serialized_size());
        assert_eq!(Block::deserialize_from_vec(&encoded).unwrap(), block);
    }

    #[test]
    fn synthesis_concatenates_in_order() {
        let key = key_block(7);
        let m1 = micro(key.id(), 20, vec![payment_like(2), payment_like(3)]);
        let m2 = micro(&m1.updated_signature, 30, vec![payment_like(4)]);

        let liquid = key.extend_with_micros(&[m1, m2]);
        assert_eq!(liquid.id(), &BlockId::from([30u8; 64]));
        assert_eq!(liquid.parent(), key.parent());
        assert_eq!(
            liquid
                .transactions
                .iter()
                .map(Transaction::timestamp)
                .collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        // Everything but the transactions and the signature is the key
        // block's.
        assert_eq!(liquid.header.generator, key.header.generator);
        assert_eq!(liquid.header.consensus, key.header.consensus);
    }

    #[test]
    fn synthesis_without_micros_is_identity() {
        let key = key_block(7);
        assert_eq!(key.extend_with_micros(&[]), key);
    }

    #[test]
    fn synthesis_is_deterministic() {
        let key = key_block(7);
        let m1 = micro(key.id(), 20, vec![payment_like(2)]);
        let a = key.extend_with_micros(std::slice::from_ref(&m1));
        let b = key.extend_with_micros(std::slice::from_ref(&m1));
        assert_eq!(a.serialize_to_vec(), b.serialize_to_vec());
    }
}
