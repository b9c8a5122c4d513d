use lagoon_keys::{PublicKey, Signature};
use lagoon_serial::{
    Deserialize, DeserializeWithLength, ReadBytesExt, Serialize, SerializeWithLength,
    SerializingError, WriteBytesExt,
};
use lagoon_transaction::Transaction;

use crate::{BlockId, MAX_TRANSACTIONS_PER_BLOCK};

/// An extension unit streamed after a key block. It announces transactions
/// appended to the block identified by `reference` and the signature that
/// block assumes once they are incorporated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MicroBlock {
    pub version: u8,
    /// Id of the block this micro block extends, i.e. the current tip.
    pub reference: BlockId,
    /// The tip's id after incorporating these transactions.
    pub updated_signature: BlockId,
    pub transactions: Vec<Transaction>,
    pub sender: PublicKey,
    pub signature: Signature,
}

impl MicroBlock {
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

impl Serialize for MicroBlock {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = self.version.serialize(writer)?;
        size += self.reference.serialize(writer)?;
        size += self.updated_signature.serialize(writer)?;
        size += SerializeWithLength::serialize::<u32, W>(&self.transactions, writer)?;
        size += self.sender.serialize(writer)?;
        size += self.signature.serialize(writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + self.reference.serialized_size()
            + self.updated_signature.serialized_size()
            + SerializeWithLength::serialized_size::<u32>(&self.transactions)
            + self.sender.serialized_size()
            + self.signature.serialized_size()
    }
}

impl Deserialize for MicroBlock {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(MicroBlock {
            version: Deserialize::deserialize(reader)?,
            reference: Deserialize::deserialize(reader)?,
            updated_signature: Deserialize::deserialize(reader)?,
            transactions: DeserializeWithLength::deserialize_with_limit::<u32, R>(
                reader,
                Some(MAX_TRANSACTIONS_PER_BLOCK),
            )?,
            sender: Deserialize::deserialize(reader)?,
            signature: Deserialize::deserialize(reader)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn micro_block_roundtrip() {
        let micro = MicroBlock {
            version: 3,
            reference: BlockId::from([1u8; 64]),
            updated_signature: BlockId::from([2u8; 64]),
            transactions: vec![],
            sender: PublicKey::from([4u8; 32]),
            signature: Signature::from([5u8; 64]),
        };
        let encoded = micro.serialize_to_vec();
        assert_eq!(encoded.len(), micro.serialized_size());
        assert_eq!(MicroBlock::deserialize_from_vec(&encoded).unwrap(), micro);
    }
}
