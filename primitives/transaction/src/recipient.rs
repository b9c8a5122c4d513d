use lagoon_keys::Address;
use lagoon_serial::{
    Deserialize, DeserializeWithLength, ReadBytesExt, Serialize, SerializeWithLength,
    SerializingError, WriteBytesExt,
};

pub const ALIAS_VERSION: u8 = 2;
pub const MIN_ALIAS_LENGTH: usize = 4;
pub const MAX_ALIAS_LENGTH: usize = 30;

/// A short human-readable account name registered on chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alias {
    pub chain_id: u8,
    pub name: String,
}

impl Alias {
    pub fn new(chain_id: u8, name: &str) -> Alias {
        Alias {
            chain_id,
            name: name.to_string(),
        }
    }
}

impl Serialize for Alias {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = ALIAS_VERSION.serialize(writer)?;
        size += self.chain_id.serialize(writer)?;
        size += SerializeWithLength::serialize::<u16, W>(&self.name, writer)?;
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        1 + 1 + 2 + self.name.len()
    }
}

impl Deserialize for Alias {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        let version = u8::deserialize(reader)?;
        if version != ALIAS_VERSION {
            return Err(SerializingError::InvalidValue);
        }
        let chain_id = u8::deserialize(reader)?;
        let name: String =
            DeserializeWithLength::deserialize_with_limit::<u16, R>(reader, Some(MAX_ALIAS_LENGTH))?;
        if name.len() < MIN_ALIAS_LENGTH {
            return Err(SerializingError::InvalidValue);
        }
        Ok(Alias { chain_id, name })
    }
}

/// The target of a value transfer: a concrete address or an alias to be
/// resolved by the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recipient {
    Address(Address),
    Alias(Alias),
}

const RECIPIENT_ADDRESS: u8 = 0;
const RECIPIENT_ALIAS: u8 = 1;

impl Serialize for Recipient {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        match self {
            Recipient::Address(address) => {
                RECIPIENT_ADDRESS.serialize(writer)?;
                Ok(1 + address.serialize(writer)?)
            }
            Recipient::Alias(alias) => {
                RECIPIENT_ALIAS.serialize(writer)?;
                Ok(1 + alias.serialize(writer)?)
            }
        }
    }

    fn serialized_size(&self) -> usize {
        1 + match self {
            Recipient::Address(address) => address.serialized_size(),
            Recipient::Alias(alias) => alias.serialized_size(),
        }
    }
}

impl Deserialize for Recipient {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        match u8::deserialize(reader)? {
            RECIPIENT_ADDRESS => Ok(Recipient::Address(Deserialize::deserialize(reader)?)),
            RECIPIENT_ALIAS => Ok(Recipient::Alias(Deserialize::deserialize(reader)?)),
            _ => Err(SerializingError::InvalidValue),
        }
    }
}

#[cfg(test)]
mod tests {
    use lagoon_keys::PublicKey;

    use super::*;

    #[test]
    fn recipient_roundtrip() {
        let address = Address::from_public_key(b'T', &PublicKey::from([1u8; 32]));
        for recipient in [
            Recipient::Address(address),
            Recipient::Alias(Alias::new(b'T', "merchant")),
        ] {
            let encoded = recipient.serialize_to_vec();
            assert_eq!(encoded.len(), recipient.serialized_size());
            assert_eq!(Recipient::deserialize_from_vec(&encoded).unwrap(), recipient);
        }
    }

    #[test]
    fn short_alias_rejected() {
        let alias = Alias::new(b'T', "ab");
        let encoded = alias.serialize_to_vec();
        assert_eq!(
            Alias::deserialize_from_vec(&encoded),
            Err(SerializingError::InvalidValue)
        );
    }
}
