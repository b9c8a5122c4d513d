//! Payload structs for every transaction kind. Serialization order is the
//! struct field order; all collection fields are `u16`-length-prefixed.

use lagoon_hash::Blake2bHash;
use lagoon_keys::{Address, PublicKey, Signature};
use lagoon_serial::{
    Deserialize, DeserializeWithLength, ReadBytesExt, Serialize, SerializeWithLength,
    SerializingError, WriteBytesExt,
};

use crate::data::DataEntry;
use crate::order::Order;
use crate::recipient::{Alias, Recipient};
use crate::Proofs;

pub const MAX_ATTACHMENT_LENGTH: usize = 140;
pub const MAX_SCRIPT_LENGTH: usize = 32 * 1024;
pub const MAX_TRANSFER_COUNT: usize = 100;
pub const MAX_DATA_ENTRY_COUNT: usize = 100;
pub const MAX_PAYMENT_COUNT: usize = 10;

/// An optional compiled script. `None` clears the script on the account or
/// asset it is attached to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Script(pub Option<Vec<u8>>);

impl Serialize for Script {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        match &self.0 {
            Some(bytes) => {
                1u8.serialize(writer)?;
                Ok(1 + SerializeWithLength::serialize::<u16, W>(bytes, writer)?)
            }
            None => 0u8.serialize(writer),
        }
    }

    fn serialized_size(&self) -> usize {
        match &self.0 {
            Some(bytes) => 1 + 2 + bytes.len(),
            None => 1,
        }
    }
}

impl Deserialize for Script {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        match u8::deserialize(reader)? {
            0 => Ok(Script(None)),
            1 => Ok(Script(Some(DeserializeWithLength::deserialize_with_limit::<
                u16,
                R,
            >(reader, Some(MAX_SCRIPT_LENGTH))?))),
            _ => Err(SerializingError::InvalidValue),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MassTransferEntry {
    pub recipient: Recipient,
    pub amount: u64,
}

impl Serialize for MassTransferEntry {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        Ok(self.recipient.serialize(writer)? + self.amount.serialize(writer)?)
    }

    fn serialized_size(&self) -> usize {
        self.recipient.serialized_size() + 8
    }
}

impl Deserialize for MassTransferEntry {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(MassTransferEntry {
            recipient: Deserialize::deserialize(reader)?,
            amount: Deserialize::deserialize(reader)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptPayment {
    pub amount: u64,
    pub asset: Option<Blake2bHash>,
}

impl Serialize for ScriptPayment {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        Ok(self.amount.serialize(writer)? + self.asset.serialize(writer)?)
    }

    fn serialized_size(&self) -> usize {
        8 + self.asset.serialized_size()
    }
}

impl Deserialize for ScriptPayment {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(ScriptPayment {
            amount: Deserialize::deserialize(reader)?,
            asset: Deserialize::deserialize(reader)?,
        })
    }
}

/// Pre-mine distribution. Only valid in the genesis block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Genesis {
    pub version: u8,
    pub timestamp: u64,
    pub recipient: Address,
    pub amount: u64,
    pub signature: Signature,
}

impl Serialize for Genesis {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = self.version.serialize(writer)?;
        size += self.timestamp.serialize(writer)?;
        size += self.recipient.serialize(writer)?;
        size += self.amount.serialize(writer)?;
        size += self.signature.serialize(writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + 8 + self.recipient.serialized_size() + 8 + self.signature.serialized_size()
    }
}

impl Deserialize for Genesis {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(Genesis {
            version: Deserialize::deserialize(reader)?,
            timestamp: Deserialize::deserialize(reader)?,
            recipient: Deserialize::deserialize(reader)?,
            amount: Deserialize::deserialize(reader)?,
            signature: Deserialize::deserialize(reader)?,
        })
    }
}

/// The original plain value transfer to a concrete address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payment {
    pub version: u8,
    pub sender: PublicKey,
    pub recipient: Address,
    pub amount: u64,
    pub fee: u64,
    pub timestamp: u64,
    pub signature: Signature,
}

impl Serialize for Payment {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = self.version.serialize(writer)?;
        size += self.sender.serialize(writer)?;
        size += self.recipient.serialize(writer)?;
        size += self.amount.serialize(writer)?;
        size += self.fee.serialize(writer)?;
        size += self.timestamp.serialize(writer)?;
        size += self.signature.serialize(writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + self.sender.serialized_size()
            + self.recipient.serialized_size()
            + 8 * 3
            + self.signature.serialized_size()
    }
}

impl Deserialize for Payment {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(Payment {
            version: Deserialize::deserialize(reader)?,
            sender: Deserialize::deserialize(reader)?,
            recipient: Deserialize::deserialize(reader)?,
            amount: Deserialize::deserialize(reader)?,
            fee: Deserialize::deserialize(reader)?,
            timestamp: Deserialize::deserialize(reader)?,
            signature: Deserialize::deserialize(reader)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Issue {
    pub version: u8,
    pub sender: PublicKey,
    pub name: String,
    pub description: String,
    pub quantity: u64,
    pub decimals: u8,
    pub reissuable: bool,
    pub fee: u64,
    pub timestamp: u64,
    pub proofs: Proofs,
}

impl Serialize for Issue {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = self.version.serialize(writer)?;
        size += self.sender.serialize(writer)?;
        size += SerializeWithLength::serialize::<u16, W>(&self.name, writer)?;
        size += SerializeWithLength::serialize::<u16, W>(&self.description, writer)?;
        size += self.quantity.serialize(writer)?;
        size += self.decimals.serialize(writer)?;
        size += self.reissuable.serialize(writer)?;
        size += self.fee.serialize(writer)?;
        size += self.timestamp.serialize(writer)?;
        size += self.proofs.serialize(writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + self.sender.serialized_size()
            + 2
            + self.name.len()
            + 2
            + self.description.len()
            + 8
            + 1
            + 1
            + 8 * 2
            + self.proofs.serialized_size()
    }
}

impl Deserialize for Issue {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(Issue {
            version: Deserialize::deserialize(reader)?,
            sender: Deserialize::deserialize(reader)?,
            name: DeserializeWithLength::deserialize::<u16, R>(reader)?,
            description: DeserializeWithLength::deserialize::<u16, R>(reader)?,
            quantity: Deserialize::deserialize(reader)?,
            decimals: Deserialize::deserialize(reader)?,
            reissuable: Deserialize::deserialize(reader)?,
            fee: Deserialize::deserialize(reader)?,
            timestamp: Deserialize::deserialize(reader)?,
            proofs: Deserialize::deserialize(reader)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub version: u8,
    pub sender: PublicKey,
    pub asset: Option<Blake2bHash>,
    pub fee_asset: Option<Blake2bHash>,
    pub timestamp: u64,
    pub amount: u64,
    pub fee: u64,
    pub recipient: Recipient,
    pub attachment: Vec<u8>,
    pub proofs: Proofs,
}

impl Serialize for Transfer {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = self.version.serialize(writer)?;
        size += self.sender.serialize(writer)?;
        size += self.asset.serialize(writer)?;
        size += self.fee_asset.serialize(writer)?;
        size += self.timestamp.serialize(writer)?;
        size += self.amount.serialize(writer)?;
        size += self.fee.serialize(writer)?;
        size += self.recipient.serialize(writer)?;
        size += SerializeWithLength::serialize::<u16, W>(&self.attachment, writer)?;
        size += self.proofs.serialize(writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + self.sender.serialized_size()
            + self.asset.serialized_size()
            + self.fee_asset.serialized_size()
            + 8 * 3
            + self.recipient.serialized_size()
            + 2
            + self.attachment.len()
            + self.proofs.serialized_size()
    }
}

impl Deserialize for Transfer {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(Transfer {
            version: Deserialize::deserialize(reader)?,
            sender: Deserialize::deserialize(reader)?,
            asset: Deserialize::deserialize(reader)?,
            fee_asset: Deserialize::deserialize(reader)?,
            timestamp: Deserialize::deserialize(reader)?,
            amount: Deserialize::deserialize(reader)?,
            fee: Deserialize::deserialize(reader)?,
            recipient: Deserialize::deserialize(reader)?,
            attachment: DeserializeWithLength::deserialize_with_limit::<u16, R>(
                reader,
                Some(MAX_ATTACHMENT_LENGTH),
            )?,
            proofs: Deserialize::deserialize(reader)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reissue {
    pub version: u8,
    pub sender: PublicKey,
    pub asset_id: Blake2bHash,
    pub quantity: u64,
    pub reissuable: bool,
    pub fee: u64,
    pub timestamp: u64,
    pub proofs: Proofs,
}

impl Serialize for Reissue {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = self.version.serialize(writer)?;
        size += self.sender.serialize(writer)?;
        size += self.asset_id.serialize(writer)?;
        size += self.quantity.serialize(writer)?;
        size += self.reissuable.serialize(writer)?;
        size += self.fee.serialize(writer)?;
        size += self.timestamp.serialize(writer)?;
        size += self.proofs.serialize(writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + self.sender.serialized_size()
            + self.asset_id.serialized_size()
            + 8
            + 1
            + 8 * 2
            + self.proofs.serialized_size()
    }
}

impl Deserialize for Reissue {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(Reissue {
            version: Deserialize::deserialize(reader)?,
            sender: Deserialize::deserialize(reader)?,
            asset_id: Deserialize::deserialize(reader)?,
            quantity: Deserialize::deserialize(reader)?,
            reissuable: Deserialize::deserialize(reader)?,
            fee: Deserialize::deserialize(reader)?,
            timestamp: Deserialize::deserialize(reader)?,
            proofs: Deserialize::deserialize(reader)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Burn {
    pub version: u8,
    pub sender: PublicKey,
    pub asset_id: Blake2bHash,
    pub amount: u64,
    pub fee: u64,
    pub timestamp: u64,
    pub proofs: Proofs,
}

impl Serialize for Burn {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = self.version.serialize(writer)?;
        size += self.sender.serialize(writer)?;
        size += self.asset_id.serialize(writer)?;
        size += self.amount.serialize(writer)?;
        size += self.fee.serialize(writer)?;
        size += self.timestamp.serialize(writer)?;
        size += self.proofs.serialize(writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + self.sender.serialized_size()
            + self.asset_id.serialized_size()
            + 8 * 3
            + self.proofs.serialized_size()
    }
}

impl Deserialize for Burn {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(Burn {
            version: Deserialize::deserialize(reader)?,
            sender: Deserialize::deserialize(reader)?,
            asset_id: Deserialize::deserialize(reader)?,
            amount: Deserialize::deserialize(reader)?,
            fee: Deserialize::deserialize(reader)?,
            timestamp: Deserialize::deserialize(reader)?,
            proofs: Deserialize::deserialize(reader)?,
        })
    }
}

/// Settlement of two matched orders, submitted by the matcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exchange {
    pub version: u8,
    pub buy_order: Order,
    pub sell_order: Order,
    pub price: u64,
    pub amount: u64,
    pub buy_matcher_fee: u64,
    pub sell_matcher_fee: u64,
    pub fee: u64,
    pub timestamp: u64,
    pub proofs: Proofs,
}

impl Serialize for Exchange {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = self.version.serialize(writer)?;
        size += self.buy_order.serialize(writer)?;
        size += self.sell_order.serialize(writer)?;
        size += self.price.serialize(writer)?;
        size += self.amount.serialize(writer)?;
        size += self.buy_matcher_fee.serialize(writer)?;
        size += self.sell_matcher_fee.serialize(writer)?;
        size += self.fee.serialize(writer)?;
        size += self.timestamp.serialize(writer)?;
        size += self.proofs.serialize(writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + self.buy_order.serialized_size()
            + self.sell_order.serialized_size()
            + 8 * 6
            + self.proofs.serialized_size()
    }
}

impl Deserialize for Exchange {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(Exchange {
            version: Deserialize::deserialize(reader)?,
            buy_order: Deserialize::deserialize(reader)?,
            sell_order: Deserialize::deserialize(reader)?,
            price: Deserialize::deserialize(reader)?,
            amount: Deserialize::deserialize(reader)?,
            buy_matcher_fee: Deserialize::deserialize(reader)?,
            sell_matcher_fee: Deserialize::deserialize(reader)?,
            fee: Deserialize::deserialize(reader)?,
            timestamp: Deserialize::deserialize(reader)?,
            proofs: Deserialize::deserialize(reader)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lease {
    pub version: u8,
    pub sender: PublicKey,
    pub recipient: Recipient,
    pub amount: u64,
    pub fee: u64,
    pub timestamp: u64,
    pub proofs: Proofs,
}

impl Serialize for Lease {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = self.version.serialize(writer)?;
        size += self.sender.serialize(writer)?;
        size += self.recipient.serialize(writer)?;
        size += self.amount.serialize(writer)?;
        size += self.fee.serialize(writer)?;
        size += self.timestamp.serialize(writer)?;
        size += self.proofs.serialize(writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + self.sender.serialized_size()
            + self.recipient.serialized_size()
            + 8 * 3
            + self.proofs.serialized_size()
    }
}

impl Deserialize for Lease {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(Lease {
            version: Deserialize::deserialize(reader)?,
            sender: Deserialize::deserialize(reader)?,
            recipient: Deserialize::deserialize(reader)?,
            amount: Deserialize::deserialize(reader)?,
            fee: Deserialize::deserialize(reader)?,
            timestamp: Deserialize::deserialize(reader)?,
            proofs: Deserialize::deserialize(reader)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaseCancel {
    pub version: u8,
    pub chain_id: u8,
    pub sender: PublicKey,
    pub lease_id: Blake2bHash,
    pub fee: u64,
    pub timestamp: u64,
    pub proofs: Proofs,
}

impl Serialize for LeaseCancel {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = self.version.serialize(writer)?;
        size += self.chain_id.serialize(writer)?;
        size += self.sender.serialize(writer)?;
        size += self.lease_id.serialize(writer)?;
        size += self.fee.serialize(writer)?;
        size += self.timestamp.serialize(writer)?;
        size += self.proofs.serialize(writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + 1
            + self.sender.serialized_size()
            + self.lease_id.serialized_size()
            + 8 * 2
            + self.proofs.serialized_size()
    }
}

impl Deserialize for LeaseCancel {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(LeaseCancel {
            version: Deserialize::deserialize(reader)?,
            chain_id: Deserialize::deserialize(reader)?,
            sender: Deserialize::deserialize(reader)?,
            lease_id: Deserialize::deserialize(reader)?,
            fee: Deserialize::deserialize(reader)?,
            timestamp: Deserialize::deserialize(reader)?,
            proofs: Deserialize::deserialize(reader)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateAlias {
    pub version: u8,
    pub sender: PublicKey,
    pub alias: Alias,
    pub fee: u64,
    pub timestamp: u64,
    pub proofs: Proofs,
}

impl Serialize for CreateAlias {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = self.version.serialize(writer)?;
        size += self.sender.serialize(writer)?;
        size += self.alias.serialize(writer)?;
        size += self.fee.serialize(writer)?;
        size += self.timestamp.serialize(writer)?;
        size += self.proofs.serialize(writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + self.sender.serialized_size()
            + self.alias.serialized_size()
            + 8 * 2
            + self.proofs.serialized_size()
    }
}

impl Deserialize for CreateAlias {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(CreateAlias {
            version: Deserialize::deserialize(reader)?,
            sender: Deserialize::deserialize(reader)?,
            alias: Deserialize::deserialize(reader)?,
            fee: Deserialize::deserialize(reader)?,
            timestamp: Deserialize::deserialize(reader)?,
            proofs: Deserialize::deserialize(reader)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MassTransfer {
    pub version: u8,
    pub sender: PublicKey,
    pub asset: Option<Blake2bHash>,
    pub transfers: Vec<MassTransferEntry>,
    pub timestamp: u64,
    pub fee: u64,
    pub attachment: Vec<u8>,
    pub proofs: Proofs,
}

impl Serialize for MassTransfer {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = self.version.serialize(writer)?;
        size += self.sender.serialize(writer)?;
        size += self.asset.serialize(writer)?;
        size += SerializeWithLength::serialize::<u16, W>(&self.transfers, writer)?;
        size += self.timestamp.serialize(writer)?;
        size += self.fee.serialize(writer)?;
        size += SerializeWithLength::serialize::<u16, W>(&self.attachment, writer)?;
        size += self.proofs.serialize(writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + self.sender.serialized_size()
            + self.asset.serialized_size()
            + SerializeWithLength::serialized_size::<u16>(&self.transfers)
            + 8 * 2
            + 2
            + self.attachment.len()
            + self.proofs.serialized_size()
    }
}

impl Deserialize for MassTransfer {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(MassTransfer {
            version: Deserialize::deserialize(reader)?,
            sender: Deserialize::deserialize(reader)?,
            asset: Deserialize::deserialize(reader)?,
            transfers: DeserializeWithLength::deserialize_with_limit::<u16, R>(
                reader,
                Some(MAX_TRANSFER_COUNT),
            )?,
            timestamp: Deserialize::deserialize(reader)?,
            fee: Deserialize::deserialize(reader)?,
            attachment: DeserializeWithLength::deserialize_with_limit::<u16, R>(
                reader,
                Some(MAX_ATTACHMENT_LENGTH),
            )?,
            proofs: Deserialize::deserialize(reader)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Data {
    pub version: u8,
    pub sender: PublicKey,
    pub entries: Vec<DataEntry>,
    pub fee: u64,
    pub timestamp: u64,
    pub proofs: Proofs,
}

impl Serialize for Data {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = self.version.serialize(writer)?;
        size += self.sender.serialize(writer)?;
        size += SerializeWithLength::serialize::<u16, W>(&self.entries, writer)?;
        size += self.fee.serialize(writer)?;
        size += self.timestamp.serialize(writer)?;
        size += self.proofs.serialize(writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + self.sender.serialized_size()
            + SerializeWithLength::serialized_size::<u16>(&self.entries)
            + 8 * 2
            + self.proofs.serialized_size()
    }
}

impl Deserialize for Data {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(Data {
            version: Deserialize::deserialize(reader)?,
            sender: Deserialize::deserialize(reader)?,
            entries: DeserializeWithLength::deserialize_with_limit::<u16, R>(
                reader,
                Some(MAX_DATA_ENTRY_COUNT),
            )?,
            fee: Deserialize::deserialize(reader)?,
            timestamp: Deserialize::deserialize(reader)?,
            proofs: Deserialize::deserialize(reader)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetScript {
    pub version: u8,
    pub chain_id: u8,
    pub sender: PublicKey,
    pub script: Script,
    pub fee: u64,
    pub timestamp: u64,
    pub proofs: Proofs,
}

impl Serialize for SetScript {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = self.version.serialize(writer)?;
        size += self.chain_id.serialize(writer)?;
        size += self.sender.serialize(writer)?;
        size += self.script.serialize(writer)?;
        size += self.fee.serialize(writer)?;
        size += self.timestamp.serialize(writer)?;
        size += self.proofs.serialize(writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + 1
            + self.sender.serialized_size()
            + self.script.serialized_size()
            + 8 * 2
            + self.proofs.serialized_size()
    }
}

impl Deserialize for SetScript {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(SetScript {
            version: Deserialize::deserialize(reader)?,
            chain_id: Deserialize::deserialize(reader)?,
            sender: Deserialize::deserialize(reader)?,
            script: Deserialize::deserialize(reader)?,
            fee: Deserialize::deserialize(reader)?,
            timestamp: Deserialize::deserialize(reader)?,
            proofs: Deserialize::deserialize(reader)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SponsorFee {
    pub version: u8,
    pub sender: PublicKey,
    pub asset_id: Blake2bHash,
    pub min_asset_fee: u64,
    pub fee: u64,
    pub timestamp: u64,
    pub proofs: Proofs,
}

impl Serialize for SponsorFee {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = self.version.serialize(writer)?;
        size += self.sender.serialize(writer)?;
        size += self.asset_id.serialize(writer)?;
        size += self.min_asset_fee.serialize(writer)?;
        size += self.fee.serialize(writer)?;
        size += self.timestamp.serialize(writer)?;
        size += self.proofs.serialize(writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + self.sender.serialized_size()
            + self.asset_id.serialized_size()
            + 8 * 3
            + self.proofs.serialized_size()
    }
}

impl Deserialize for SponsorFee {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(SponsorFee {
            version: Deserialize::deserialize(reader)?,
            sender: Deserialize::deserialize(reader)?,
            asset_id: Deserialize::deserialize(reader)?,
            min_asset_fee: Deserialize::deserialize(reader)?,
            fee: Deserialize::deserialize(reader)?,
            timestamp: Deserialize::deserialize(reader)?,
            proofs: Deserialize::deserialize(reader)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetAssetScript {
    pub version: u8,
    pub chain_id: u8,
    pub sender: PublicKey,
    pub asset_id: Blake2bHash,
    pub script: Script,
    pub fee: u64,
    pub timestamp: u64,
    pub proofs: Proofs,
}

impl Serialize for SetAssetScript {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = self.version.serialize(writer)?;
        size += self.chain_id.serialize(writer)?;
        size += self.sender.serialize(writer)?;
        size += self.asset_id.serialize(writer)?;
        size += self.script.serialize(writer)?;
        size += self.fee.serialize(writer)?;
        size += self.timestamp.serialize(writer)?;
        size += self.proofs.serialize(writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + 1
            + self.sender.serialized_size()
            + self.asset_id.serialized_size()
            + self.script.serialized_size()
            + 8 * 2
            + self.proofs.serialized_size()
    }
}

impl Deserialize for SetAssetScript {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(SetAssetScript {
            version: Deserialize::deserialize(reader)?,
            chain_id: Deserialize::deserialize(reader)?,
            sender: Deserialize::deserialize(reader)?,
            asset_id: Deserialize::deserialize(reader)?,
            script: Deserialize::deserialize(reader)?,
            fee: Deserialize::deserialize(reader)?,
            timestamp: Deserialize::deserialize(reader)?,
            proofs: Deserialize::deserialize(reader)?,
        })
    }
}

/// A call into a deployed script, with optional attached payments. The call
/// itself stays opaque serialized bytes; decoding it is the script engine's
/// concern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvokeScript {
    pub version: u8,
    pub chain_id: u8,
    pub sender: PublicKey,
    pub dapp: Recipient,
    pub call: Vec<u8>,
    pub payments: Vec<ScriptPayment>,
    pub fee: u64,
    pub fee_asset: Option<Blake2bHash>,
    pub timestamp: u64,
    pub proofs: Proofs,
}

impl Serialize for InvokeScript {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = self.version.serialize(writer)?;
        size += self.chain_id.serialize(writer)?;
        size += self.sender.serialize(writer)?;
        size += self.dapp.serialize(writer)?;
        size += SerializeWithLength::serialize::<u16, W>(&self.call, writer)?;
        size += SerializeWithLength::serialize::<u16, W>(&self.payments, writer)?;
        size += self.fee.serialize(writer)?;
        size += self.fee_asset.serialize(writer)?;
        size += self.timestamp.serialize(writer)?;
        size += self.proofs.serialize(writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + 1
            + self.sender.serialized_size()
            + self.dapp.serialized_size()
            + 2
            + self.call.len()
            + SerializeWithLength::serialized_size::<u16>(&self.payments)
            + 8
            + self.fee_asset.serialized_size()
            + 8
            + self.proofs.serialized_size()
    }
}

impl Deserialize for InvokeScript {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(InvokeScript {
            version: Deserialize::deserialize(reader)?,
            chain_id: Deserialize::deserialize(reader)?,
            sender: Deserialize::deserialize(reader)?,
            dapp: Deserialize::deserialize(reader)?,
            call: DeserializeWithLength::deserialize_with_limit::<u16, R>(
                reader,
                Some(MAX_SCRIPT_LENGTH),
            )?,
            payments: DeserializeWithLength::deserialize_with_limit::<u16, R>(
                reader,
                Some(MAX_PAYMENT_COUNT),
            )?,
            fee: Deserialize::deserialize(reader)?,
            fee_asset: Deserialize::deserialize(reader)?,
            timestamp: Deserialize::deserialize(reader)?,
            proofs: Deserialize::deserialize(reader)?,
        })
    }
}
