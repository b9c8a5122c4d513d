use lagoon_hash::Blake2bHash;
use lagoon_keys::PublicKey;
use lagoon_serial::{Deserialize, ReadBytesExt, Serialize, SerializingError, WriteBytesExt};

use crate::Proofs;

/// The two assets an exchange order trades between. `None` stands for the
/// chain's native token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetPair {
    pub amount_asset: Option<Blake2bHash>,
    pub price_asset: Option<Blake2bHash>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum OrderSide {
    Buy = 0,
    Sell = 1,
}

/// A matcher order embedded in an exchange transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub version: u8,
    pub sender: PublicKey,
    pub matcher: PublicKey,
    pub pair: AssetPair,
    pub side: OrderSide,
    pub price: u64,
    pub amount: u64,
    pub timestamp: u64,
    pub expiration: u64,
    pub matcher_fee: u64,
    pub proofs: Proofs,
}

impl Serialize for AssetPair {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        Ok(self.amount_asset.serialize(writer)? + self.price_asset.serialize(writer)?)
    }

    fn serialized_size(&self) -> usize {
        self.amount_asset.serialized_size() + self.price_asset.serialized_size()
    }
}

impl Deserialize for AssetPair {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(AssetPair {
            amount_asset: Deserialize::deserialize(reader)?,
            price_asset: Deserialize::deserialize(reader)?,
        })
    }
}

impl Serialize for OrderSide {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        (*self as u8).serialize(writer)
    }

    fn serialized_size(&self) -> usize {
        1
    }
}

impl Deserialize for OrderSide {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        match u8::deserialize(reader)? {
            0 => Ok(OrderSide::Buy),
            1 => Ok(OrderSide::Sell),
            _ => Err(SerializingError::InvalidValue),
        }
    }
}

impl Serialize for Order {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = self.version.serialize(writer)?;
        size += self.sender.serialize(writer)?;
        size += self.matcher.serialize(writer)?;
        size += self.pair.serialize(writer)?;
        size += self.side.serialize(writer)?;
        size += self.price.serialize(writer)?;
        size += self.amount.serialize(writer)?;
        size += self.timestamp.serialize(writer)?;
        size += self.expiration.serialize(writer)?;
        size += self.matcher_fee.serialize(writer)?;
        size += self.proofs.serialize(writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + self.sender.serialized_size()
            + self.matcher.serialized_size()
            + self.pair.serialized_size()
            + 1
            + 8 * 5
            + self.proofs.serialized_size()
    }
}

impl Deserialize for Order {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(Order {
            version: Deserialize::deserialize(reader)?,
            sender: Deserialize::deserialize(reader)?,
            matcher: Deserialize::deserialize(reader)?,
            pair: Deserialize::deserialize(reader)?,
            side: Deserialize::deserialize(reader)?,
            price: Deserialize::deserialize(reader)?,
            amount: Deserialize::deserialize(reader)?,
            timestamp: Deserialize::deserialize(reader)?,
            expiration: Deserialize::deserialize(reader)?,
            matcher_fee: Deserialize::deserialize(reader)?,
            proofs: Deserialize::deserialize(reader)?,
        })
    }
}
