use lagoon_keys::Signature;
use lagoon_serial::{
    Deserialize, DeserializeWithLength, ReadBytesExt, Serialize, SerializeWithLength,
    SerializingError, WriteBytesExt,
};

const PROOFS_VERSION: u8 = 1;
const MAX_PROOFS: usize = 8;

/// An ordered list of byte-string proofs. Most kinds carry exactly one
/// entry, the sender's signature, but smart accounts may attach several.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Proofs(Vec<Vec<u8>>);

impl Proofs {
    pub fn new(proofs: Vec<Vec<u8>>) -> Proofs {
        Proofs(proofs)
    }

    pub fn single(signature: &Signature) -> Proofs {
        Proofs(vec![signature.as_bytes().to_vec()])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.0.get(index).map(Vec::as_slice)
    }
}

impl Serialize for Proofs {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let mut size = PROOFS_VERSION.serialize(writer)?;
        size += (self.0.len() as u16).serialize(writer)?;
        for proof in &self.0 {
            size += SerializeWithLength::serialize::<u16, W>(proof, writer)?;
        }
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        let mut size = 1 + 2;
        for proof in &self.0 {
            size += 2 + proof.len();
        }
        size
    }
}

impl Deserialize for Proofs {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        let version = u8::deserialize(reader)?;
        if version != PROOFS_VERSION {
            return Err(SerializingError::InvalidValue);
        }
        let count = u16::deserialize(reader)? as usize;
        if count > MAX_PROOFS {
            return Err(SerializingError::LimitExceeded);
        }
        let mut proofs = Vec::with_capacity(count);
        for _ in 0..count {
            proofs.push(DeserializeWithLength::deserialize::<u16, R>(reader)?);
        }
        Ok(Proofs(proofs))
    }
}
