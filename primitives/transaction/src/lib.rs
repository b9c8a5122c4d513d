//! The transaction model: one tagged variant per kind, each carrying its
//! versioned payload. The wire codec writes the kind tag first and
//! dispatches on it when decoding.

pub use self::data::{DataEntry, DataValue};
pub use self::kinds::*;
pub use self::order::{AssetPair, Order, OrderSide};
pub use self::proofs::Proofs;
pub use self::recipient::{Alias, Recipient};

use lagoon_keys::PublicKey;
use lagoon_serial::{Deserialize, ReadBytesExt, Serialize, SerializingError, WriteBytesExt};

mod data;
mod kinds;
mod order;
mod proofs;
mod recipient;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(u8)]
pub enum TransactionType {
    Genesis = 1,
    Payment = 2,
    Issue = 3,
    Transfer = 4,
    Reissue = 5,
    Burn = 6,
    Exchange = 7,
    Lease = 8,
    LeaseCancel = 9,
    CreateAlias = 10,
    MassTransfer = 11,
    Data = 12,
    SetScript = 13,
    SponsorFee = 14,
    SetAssetScript = 15,
    InvokeScript = 16,
}

impl TryFrom<u8> for TransactionType {
    type Error = SerializingError;

    fn try_from(tag: u8) -> Result<Self, SerializingError> {
        Ok(match tag {
            1 => TransactionType::Genesis,
            2 => TransactionType::Payment,
            3 => TransactionType::Issue,
            4 => TransactionType::Transfer,
            5 => TransactionType::Reissue,
            6 => TransactionType::Burn,
            7 => TransactionType::Exchange,
            8 => TransactionType::Lease,
            9 => TransactionType::LeaseCancel,
            10 => TransactionType::CreateAlias,
            11 => TransactionType::MassTransfer,
            12 => TransactionType::Data,
            13 => TransactionType::SetScript,
            14 => TransactionType::SponsorFee,
            15 => TransactionType::SetAssetScript,
            16 => TransactionType::InvokeScript,
            _ => return Err(SerializingError::InvalidValue),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transaction {
    Genesis(Genesis),
    Payment(Payment),
    Issue(Issue),
    Transfer(Transfer),
    Reissue(Reissue),
    Burn(Burn),
    Exchange(Exchange),
    Lease(Lease),
    LeaseCancel(LeaseCancel),
    CreateAlias(CreateAlias),
    MassTransfer(MassTransfer),
    Data(Data),
    SetScript(SetScript),
    SponsorFee(SponsorFee),
    SetAssetScript(SetAssetScript),
    InvokeScript(InvokeScript),
}

impl Transaction {
    pub fn ty(&self) -> TransactionType {
        match self {
            Transaction::Genesis(_) => TransactionType::Genesis,
            Transaction::Payment(_) => TransactionType::Payment,
            Transaction::Issue(_) => TransactionType::Issue,
            Transaction::Transfer(_) => TransactionType::Transfer,
            Transaction::Reissue(_) => TransactionType::Reissue,
            Transaction::Burn(_) => TransactionType::Burn,
            Transaction::Exchange(_) => TransactionType::Exchange,
            Transaction::Lease(_) => TransactionType::Lease,
            Transaction::LeaseCancel(_) => TransactionType::LeaseCancel,
            Transaction::CreateAlias(_) => TransactionType::CreateAlias,
            Transaction::MassTransfer(_) => TransactionType::MassTransfer,
            Transaction::Data(_) => TransactionType::Data,
            Transaction::SetScript(_) => TransactionType::SetScript,
            Transaction::SponsorFee(_) => TransactionType::SponsorFee,
            Transaction::SetAssetScript(_) => TransactionType::SetAssetScript,
            Transaction::InvokeScript(_) => TransactionType::InvokeScript,
        }
    }

    pub fn version(&self) -> u8 {
        match self {
            Transaction::Genesis(tx) => tx.version,
            Transaction::Payment(tx) => tx.version,
            Transaction::Issue(tx) => tx.version,
            Transaction::Transfer(tx) => tx.version,
            Transaction::Reissue(tx) => tx.version,
            Transaction::Burn(tx) => tx.version,
            Transaction::Exchange(tx) => tx.version,
            Transaction::Lease(tx) => tx.version,
            Transaction::LeaseCancel(tx) => tx.version,
            Transaction::CreateAlias(tx) => tx.version,
            Transaction::MassTransfer(tx) => tx.version,
            Transaction::Data(tx) => tx.version,
            Transaction::SetScript(tx) => tx.version,
            Transaction::SponsorFee(tx) => tx.version,
            Transaction::SetAssetScript(tx) => tx.version,
            Transaction::InvokeScript(tx) => tx.version,
        }
    }

    pub fn timestamp(&self) -> u64 {
        match self {
            Transaction::Genesis(tx) => tx.timestamp,
            Transaction::Payment(tx) => tx.timestamp,
            Transaction::Issue(tx) => tx.timestamp,
            Transaction::Transfer(tx) => tx.timestamp,
            Transaction::Reissue(tx) => tx.timestamp,
            Transaction::Burn(tx) => tx.timestamp,
            Transaction::Exchange(tx) => tx.timestamp,
            Transaction::Lease(tx) => tx.timestamp,
            Transaction::LeaseCancel(tx) => tx.timestamp,
            Transaction::CreateAlias(tx) => tx.timestamp,
            Transaction::MassTransfer(tx) => tx.timestamp,
            Transaction::Data(tx) => tx.timestamp,
            Transaction::SetScript(tx) => tx.timestamp,
            Transaction::SponsorFee(tx) => tx.timestamp,
            Transaction::SetAssetScript(tx) => tx.timestamp,
            Transaction::InvokeScript(tx) => tx.timestamp,
        }
    }

    /// The account that signed the transaction. Genesis entries predate any
    /// account, so they have no sender.
    pub fn sender(&self) -> Option<&PublicKey> {
        match self {
            Transaction::Genesis(_) => None,
            Transaction::Payment(tx) => Some(&tx.sender),
            Transaction::Issue(tx) => Some(&tx.sender),
            Transaction::Transfer(tx) => Some(&tx.sender),
            Transaction::Reissue(tx) => Some(&tx.sender),
            Transaction::Burn(tx) => Some(&tx.sender),
            Transaction::Exchange(tx) => Some(&tx.buy_order.matcher),
            Transaction::Lease(tx) => Some(&tx.sender),
            Transaction::LeaseCancel(tx) => Some(&tx.sender),
            Transaction::CreateAlias(tx) => Some(&tx.sender),
            Transaction::MassTransfer(tx) => Some(&tx.sender),
            Transaction::Data(tx) => Some(&tx.sender),
            Transaction::SetScript(tx) => Some(&tx.sender),
            Transaction::SponsorFee(tx) => Some(&tx.sender),
            Transaction::SetAssetScript(tx) => Some(&tx.sender),
            Transaction::InvokeScript(tx) => Some(&tx.sender),
        }
    }
}

impl Serialize for Transaction {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = (self.ty() as u8).serialize(writer)?;
        size += match self {
            Transaction::Genesis(tx) => tx.serialize(writer)?,
            Transaction::Payment(tx) => tx.serialize(writer)?,
            Transaction::Issue(tx) => tx.serialize(writer)?,
            Transaction::Transfer(tx) => tx.serialize(writer)?,
            Transaction::Reissue(tx) => tx.serialize(writer)?,
            Transaction::Burn(tx) => tx.serialize(writer)?,
            Transaction::Exchange(tx) => tx.serialize(writer)?,
            Transaction::Lease(tx) => tx.serialize(writer)?,
            Transaction::LeaseCancel(tx) => tx.serialize(writer)?,
            Transaction::CreateAlias(tx) => tx.serialize(writer)?,
            Transaction::MassTransfer(tx) => tx.serialize(writer)?,
            Transaction::Data(tx) => tx.serialize(writer)?,
            Transaction::SetScript(tx) => tx.serialize(writer)?,
            Transaction::SponsorFee(tx) => tx.serialize(writer)?,
            Transaction::SetAssetScript(tx) => tx.serialize(writer)?,
            Transaction::InvokeScript(tx) => tx.serialize(writer)?,
        };
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + match self {
            Transaction::Genesis(tx) => tx.serialized_size(),
            Transaction::Payment(tx) => tx.serialized_size(),
            Transaction::Issue(tx) => tx.serialized_size(),
            Transaction::Transfer(tx) => tx.serialized_size(),
            Transaction::Reissue(tx) => tx.serialized_size(),
            Transaction::Burn(tx) => tx.serialized_size(),
            Transaction::Exchange(tx) => tx.serialized_size(),
            Transaction::Lease(tx) => tx.serialized_size(),
            Transaction::LeaseCancel(tx) => tx.serialized_size(),
            Transaction::CreateAlias(tx) => tx.serialized_size(),
            Transaction::MassTransfer(tx) => tx.serialized_size(),
            Transaction::Data(tx) => tx.serialized_size(),
            Transaction::SetScript(tx) => tx.serialized_size(),
            Transaction::SponsorFee(tx) => tx.serialized_size(),
            Transaction::SetAssetScript(tx) => tx.serialized_size(),
            Transaction::InvokeScript(tx) => tx.serialized_size(),
        }
    }
}

impl Deserialize for Transaction {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        let ty = TransactionType::try_from(u8::deserialize(reader)?)?;
        Ok(match ty {
            TransactionType::Genesis => Transaction::Genesis(Deserialize::deserialize(reader)?),
            TransactionType::Payment => Transaction::Payment(Deserialize::deserialize(reader)?),
            TransactionType::Issue => Transaction::Issue(Deserialize::deserialize(reader)?),
            TransactionType::Transfer => Transaction::Transfer(Deserialize::deserialize(reader)?),
            TransactionType::Reissue => Transaction::Reissue(Deserialize::deserialize(reader)?),
            TransactionType::Burn => Transaction::Burn(Deserialize::deserialize(reader)?),
            TransactionType::Exchange => Transaction::Exchange(Deserialize::deserialize(reader)?),
            TransactionType::Lease => Transaction::Lease(Deserialize::deserialize(reader)?),
            TransactionType::LeaseCancel => {
                Transaction::LeaseCancel(Deserialize::deserialize(reader)?)
            }
            TransactionType::CreateAlias => {
                Transaction::CreateAlias(Deserialize::deserialize(reader)?)
            }
            TransactionType::MassTransfer => {
                Transaction::MassTransfer(Deserialize::deserialize(reader)?)
            }
            TransactionType::Data => Transaction::Data(Deserialize::deserialize(reader)?),
            TransactionType::SetScript => Transaction::SetScript(Deserialize::deserialize(reader)?),
            TransactionType::SponsorFee => {
                Transaction::SponsorFee(Deserialize::deserialize(reader)?)
            }
            TransactionType::SetAssetScript => {
                Transaction::SetAssetScript(Deserialize::deserialize(reader)?)
            }
            TransactionType::InvokeScript => {
                Transaction::InvokeScript(Deserialize::deserialize(reader)?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use lagoon_hash::Blake2bHash;
    use lagoon_keys::{Address, Signature};

    use super::*;

    fn transfer() -> Transaction {
        Transaction::Transfer(Transfer {
            version: 2,
            sender: PublicKey::from([1u8; 32]),
            asset: None,
            fee_asset: Some(Blake2bHash::from([9u8; 32])),
            timestamp: 1_600_000_000_000,
            amount: 50_000,
            fee: 100_000,
            recipient: Recipient::Alias(Alias::new(b'T', "merchant")),
            attachment: b"invoice 17".to_vec(),
            proofs: Proofs::single(&Signature::from([5u8; 64])),
        })
    }

    #[test]
    fn tag_byte_leads_the_encoding() {
        let tx = transfer();
        let encoded = tx.serialize_to_vec();
        assert_eq!(encoded[0], TransactionType::Transfer as u8);
        assert_eq!(encoded.len(), tx.serialized_size());
    }

    #[test]
    fn decode_dispatches_on_tag() {
        let tx = transfer();
        let decoded = Transaction::deserialize_from_vec(&tx.serialize_to_vec()).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.ty(), TransactionType::Transfer);
        assert_eq!(decoded.version(), 2);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(
            Transaction::deserialize_from_vec(&[17, 0, 0]),
            Err(SerializingError::InvalidValue)
        );
        assert_eq!(
            Transaction::deserialize_from_vec(&[0]),
            Err(SerializingError::InvalidValue)
        );
    }

    #[test]
    fn genesis_has_no_sender() {
        let tx = Transaction::Genesis(Genesis {
            version: 1,
            timestamp: 0,
            recipient: Address::from_public_key(b'T', &PublicKey::from([2u8; 32])),
            amount: 1_000_000,
            signature: Signature::from([0u8; 64]),
        });
        assert!(tx.sender().is_none());
        let decoded = Transaction::deserialize_from_vec(&tx.serialize_to_vec()).unwrap();
        assert_eq!(decoded, tx);
    }
}
