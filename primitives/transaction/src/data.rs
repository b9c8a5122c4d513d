use lagoon_serial::{
    Deserialize, DeserializeWithLength, ReadBytesExt, Serialize, SerializeWithLength,
    SerializingError, WriteBytesExt,
};

pub const MAX_DATA_KEY_LENGTH: usize = 100;
pub const MAX_DATA_BINARY_LENGTH: usize = 32 * 1024;

/// One typed key/value pair of a data transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataEntry {
    pub key: String,
    pub value: DataValue,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataValue {
    Integer(i64),
    Boolean(bool),
    Binary(Vec<u8>),
    String(String),
}

const VALUE_INTEGER: u8 = 0;
const VALUE_BOOLEAN: u8 = 1;
const VALUE_BINARY: u8 = 2;
const VALUE_STRING: u8 = 3;

impl Serialize for DataEntry {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = SerializeWithLength::serialize::<u16, W>(&self.key, writer)?;
        size += match &self.value {
            DataValue::Integer(value) => {
                VALUE_INTEGER.serialize(writer)? + value.serialize(writer)?
            }
            DataValue::Boolean(value) => {
                VALUE_BOOLEAN.serialize(writer)? + value.serialize(writer)?
            }
            DataValue::Binary(value) => {
                VALUE_BINARY.serialize(writer)?
                    + SerializeWithLength::serialize::<u16, W>(value, writer)?
            }
            DataValue::String(value) => {
                VALUE_STRING.serialize(writer)?
                    + SerializeWithLength::serialize::<u16, W>(value, writer)?
            }
        };
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        let value_size = match &self.value {
            DataValue::Integer(_) => 8,
            DataValue::Boolean(_) => 1,
            DataValue::Binary(value) => 2 + value.len(),
            DataValue::String(value) => 2 + value.len(),
        };
        2 + self.key.len() + 1 + value_size
    }
}

impl Deserialize for DataEntry {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        let key: String =
            DeserializeWithLength::deserialize_with_limit::<u16, R>(reader, Some(MAX_DATA_KEY_LENGTH))?;
        let value = match u8::deserialize(reader)? {
            VALUE_INTEGER => DataValue::Integer(Deserialize::deserialize(reader)?),
            VALUE_BOOLEAN => DataValue::Boolean(Deserialize::deserialize(reader)?),
            VALUE_BINARY => DataValue::Binary(DeserializeWithLength::deserialize_with_limit::<
                u16,
                R,
            >(reader, Some(MAX_DATA_BINARY_LENGTH))?),
            VALUE_STRING => DataValue::String(DeserializeWithLength::deserialize_with_limit::<
                u16,
                R,
            >(reader, Some(MAX_DATA_BINARY_LENGTH))?),
            _ => return Err(SerializingError::InvalidValue),
        };
        Ok(DataEntry { key, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_value_kind_roundtrips() {
        let entries = [
            DataEntry {
                key: "height".to_string(),
                value: DataValue::Integer(-42),
            },
            DataEntry {
                key: "enabled".to_string(),
                value: DataValue::Boolean(true),
            },
            DataEntry {
                key: "blob".to_string(),
                value: DataValue::Binary(vec![1, 2, 3]),
            },
            DataEntry {
                key: "note".to_string(),
                value: DataValue::String("ok".to_string()),
            },
        ];
        for entry in entries {
            let encoded = entry.serialize_to_vec();
            assert_eq!(encoded.len(), entry.serialized_size());
            assert_eq!(DataEntry::deserialize_from_vec(&encoded).unwrap(), entry);
        }
    }
}
