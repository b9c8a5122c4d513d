use lagoon_serial::{Deserialize, ReadBytesExt, Serialize, SerializingError, WriteBytesExt};

/// The chain identifier byte. It is baked into addresses and signed
/// payloads so that transactions cannot be replayed across networks.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Scheme {
    Mainnet = b'W',
    Testnet = b'T',
}

impl Scheme {
    pub fn chain_id(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Scheme {
    type Error = SerializingError;

    fn try_from(byte: u8) -> Result<Self, SerializingError> {
        match byte {
            b'W' => Ok(Scheme::Mainnet),
            b'T' => Ok(Scheme::Testnet),
            _ => Err(SerializingError::InvalidValue),
        }
    }
}

impl Serialize for Scheme {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        self.chain_id().serialize(writer)
    }

    fn serialized_size(&self) -> usize {
        1
    }
}

impl Deserialize for Scheme {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Scheme::try_from(u8::deserialize(reader)?)
    }
}
