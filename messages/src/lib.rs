//! The peer message envelope and the message set the liquid-block pipeline
//! consumes.
//!
//! Every packet is a 17-byte header followed by the payload:
//! `length:u32` (bytes after the length field), `magic:u32`,
//! `content_id:u8`, `payload_length:u32`, `payload_checksum:u32`. The
//! checksum is the first four bytes of the Blake2b-256 digest of the
//! payload. Block, score and transaction payloads stay opaque bytes here —
//! decoding them is the codec layer above.

use std::net::Ipv4Addr;

use lagoon_block::BlockId;
use lagoon_hash::{Blake2bHasher, Hasher};
use lagoon_keys::Signature;
use lagoon_serial::{
    BigEndian, ByteOrder, Deserialize, DeserializeWithLength, ReadBytesExt, Serialize,
    SerializeWithLength, SerializingError, WriteBytesExt,
};

pub const HEADER_SIZE: usize = 17;
pub const MAGIC: u32 = 0x1234_5678;

/// Largest payload a peer may send; larger packets are rejected before the
/// payload is read.
pub const MAX_PAYLOAD_SIZE: usize = 2 * 1024 * 1024;

const MAX_INV_COUNT: usize = 1_000;
const MAX_PEER_COUNT: usize = 1_000;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum ContentId {
    GetPeers = 0x01,
    Peers = 0x02,
    GetSignatures = 0x14,
    Signatures = 0x15,
    GetBlock = 0x16,
    Block = 0x17,
    Score = 0x18,
    Transaction = 0x19,
    Checkpoint = 0x64,
}

impl TryFrom<u8> for ContentId {
    type Error = SerializingError;

    fn try_from(byte: u8) -> Result<Self, SerializingError> {
        Ok(match byte {
            0x01 => ContentId::GetPeers,
            0x02 => ContentId::Peers,
            0x14 => ContentId::GetSignatures,
            0x15 => ContentId::Signatures,
            0x16 => ContentId::GetBlock,
            0x17 => ContentId::Block,
            0x18 => ContentId::Score,
            0x19 => ContentId::Transaction,
            0x64 => ContentId::Checkpoint,
            _ => return Err(SerializingError::InvalidValue),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeerEndpoint {
    pub addr: Ipv4Addr,
    pub port: u16,
}

impl Serialize for PeerEndpoint {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        writer.write_all(&self.addr.octets())?;
        self.port.serialize(writer)?;
        Ok(6)
    }

    fn serialized_size(&self) -> usize {
        6
    }
}

impl Deserialize for PeerEndpoint {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        let mut octets = [0u8; 4];
        reader.read_exact(&mut octets)?;
        Ok(PeerEndpoint {
            addr: Ipv4Addr::from(octets),
            port: u16::deserialize(reader)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckpointItem {
    pub height: u64,
    pub signature: Signature,
}

impl Serialize for CheckpointItem {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        Ok(self.height.serialize(writer)? + self.signature.serialize(writer)?)
    }

    fn serialized_size(&self) -> usize {
        8 + self.signature.serialized_size()
    }
}

impl Deserialize for CheckpointItem {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(CheckpointItem {
            height: Deserialize::deserialize(reader)?,
            signature: Deserialize::deserialize(reader)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    GetPeers,
    Peers(Vec<PeerEndpoint>),
    GetSignatures(Vec<BlockId>),
    Signatures(Vec<Signature>),
    GetBlock(BlockId),
    /// An encoded block; the payload is handed to the block codec as-is.
    Block(Vec<u8>),
    /// A big-endian big-integer chain score.
    Score(Vec<u8>),
    /// An encoded transaction.
    Transaction(Vec<u8>),
    Checkpoint(Vec<CheckpointItem>),
}

impl Message {
    pub fn content_id(&self) -> ContentId {
        match self {
            Message::GetPeers => ContentId::GetPeers,
            Message::Peers(_) => ContentId::Peers,
            Message::GetSignatures(_) => ContentId::GetSignatures,
            Message::Signatures(_) => ContentId::Signatures,
            Message::GetBlock(_) => ContentId::GetBlock,
            Message::Block(_) => ContentId::Block,
            Message::Score(_) => ContentId::Score,
            Message::Transaction(_) => ContentId::Transaction,
            Message::Checkpoint(_) => ContentId::Checkpoint,
        }
    }

    fn payload(&self) -> Result<Vec<u8>, SerializingError> {
        let mut payload = Vec::new();
        match self {
            Message::GetPeers => {}
            Message::Peers(peers) => {
                SerializeWithLength::serialize::<u32, _>(peers, &mut payload)?;
            }
            Message::GetSignatures(ids) => {
                SerializeWithLength::serialize::<u32, _>(ids, &mut payload)?;
            }
            Message::Signatures(signatures) => {
                SerializeWithLength::serialize::<u32, _>(signatures, &mut payload)?;
            }
            Message::GetBlock(id) => {
                id.serialize(&mut payload)?;
            }
            Message::Block(bytes) | Message::Score(bytes) | Message::Transaction(bytes) => {
                payload.extend_from_slice(bytes);
            }
            Message::Checkpoint(items) => {
                SerializeWithLength::serialize::<u32, _>(items, &mut payload)?;
            }
        }
        Ok(payload)
    }

    fn from_payload(content_id: ContentId, payload: &[u8]) -> Result<Message, SerializingError> {
        let mut reader = payload;
        let message = match content_id {
            ContentId::GetPeers => Message::GetPeers,
            ContentId::Peers => Message::Peers(DeserializeWithLength::deserialize_with_limit::<
                u32,
                _,
            >(&mut reader, Some(MAX_PEER_COUNT))?),
            ContentId::GetSignatures => {
                Message::GetSignatures(DeserializeWithLength::deserialize_with_limit::<u32, _>(
                    &mut reader,
                    Some(MAX_INV_COUNT),
                )?)
            }
            ContentId::Signatures => {
                Message::Signatures(DeserializeWithLength::deserialize_with_limit::<u32, _>(
                    &mut reader,
                    Some(MAX_INV_COUNT),
                )?)
            }
            ContentId::GetBlock => Message::GetBlock(Deserialize::deserialize(&mut reader)?),
            ContentId::Block => Message::Block(payload.to_vec()),
            ContentId::Score => Message::Score(payload.to_vec()),
            ContentId::Transaction => Message::Transaction(payload.to_vec()),
            ContentId::Checkpoint => {
                Message::Checkpoint(DeserializeWithLength::deserialize_with_limit::<u32, _>(
                    &mut reader,
                    Some(MAX_INV_COUNT),
                )?)
            }
        };
        // Opaque payloads were consumed wholesale above; everything else
        // must have used up the payload exactly.
        match message {
            Message::Block(_) | Message::Score(_) | Message::Transaction(_) => {}
            _ if !reader.is_empty() => return Err(SerializingError::InvalidEncoding),
            _ => {}
        }
        Ok(message)
    }
}

fn payload_checksum(payload: &[u8]) -> u32 {
    let digest = Blake2bHasher::new().digest(payload);
    BigEndian::read_u32(&digest.as_bytes()[..4])
}

impl Serialize for Message {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        let payload = self.payload()?;

        let mut size = ((HEADER_SIZE - 4 + payload.len()) as u32).serialize(writer)?;
        size += MAGIC.serialize(writer)?;
        size += (self.content_id() as u8).serialize(writer)?;
        size += (payload.len() as u32).serialize(writer)?;
        size += payload_checksum(&payload).serialize(writer)?;
        writer.write_all(&payload)?;
        size += payload.len();
        Ok(size)
    }

    fn serialized_size(&self) -> usize {
        let payload = self.payload().expect("in-memory serialization cannot fail");
        HEADER_SIZE + payload.len()
    }
}

impl Deserialize for Message {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        // Length is informative only; the payload length below is what is
        // trusted, after a sanity bound.
        let _length = u32::deserialize(reader)?;
        let magic = u32::deserialize(reader)?;
        if magic != MAGIC {
            return Err(SerializingError::InvalidValue);
        }
        let content_id = ContentId::try_from(u8::deserialize(reader)?)?;
        let payload_length = u32::deserialize(reader)? as usize;
        if payload_length > MAX_PAYLOAD_SIZE {
            return Err(SerializingError::LimitExceeded);
        }
        let checksum = u32::deserialize(reader)?;

        let mut payload = vec![0u8; payload_length];
        reader.read_exact(&mut payload)?;
        if payload_checksum(&payload) != checksum {
            return Err(SerializingError::InvalidEncoding);
        }

        Message::from_payload(content_id, &payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout_is_fixed() {
        let message = Message::GetBlock(BlockId::from([7u8; 64]));
        let encoded = message.serialize_to_vec();

        assert_eq!(encoded.len(), HEADER_SIZE + 64);
        assert_eq!(encoded.len(), message.serialized_size());
        // length covers everything after the length field itself
        assert_eq!(BigEndian::read_u32(&encoded[0..4]), 13 + 64);
        assert_eq!(BigEndian::read_u32(&encoded[4..8]), MAGIC);
        assert_eq!(encoded[8], ContentId::GetBlock as u8);
        assert_eq!(BigEndian::read_u32(&encoded[9..13]), 64);
        assert_eq!(&encoded[HEADER_SIZE..], &[7u8; 64][..]);
    }

    #[test]
    fn messages_roundtrip() {
        let messages = [
            Message::GetPeers,
            Message::Peers(vec![PeerEndpoint {
                addr: Ipv4Addr::new(10, 0, 0, 7),
                port: 6868,
            }]),
            Message::GetSignatures(vec![BlockId::from([1u8; 64]), BlockId::from([2u8; 64])]),
            Message::Signatures(vec![Signature::from([3u8; 64])]),
            Message::GetBlock(BlockId::from([4u8; 64])),
            Message::Block(vec![0xde, 0xad, 0xbe, 0xef]),
            Message::Score(vec![0x01, 0x00]),
            Message::Transaction(vec![4, 2]),
            Message::Checkpoint(vec![CheckpointItem {
                height: 100,
                signature: Signature::from([5u8; 64]),
            }]),
        ];
        for message in messages {
            let encoded = message.serialize_to_vec();
            assert_eq!(Message::deserialize_from_vec(&encoded).unwrap(), message);
        }
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut encoded = Message::GetPeers.serialize_to_vec();
        encoded[4] ^= 0xff;
        assert_eq!(
            Message::deserialize_from_vec(&encoded),
            Err(SerializingError::InvalidValue)
        );
    }

    #[test]
    fn corrupted_payload_fails_the_checksum() {
        let mut encoded = Message::Block(vec![1, 2, 3, 4]).serialize_to_vec();
        let last = encoded.len() - 1;
        encoded[last] ^= 0xff;
        assert_eq!(
            Message::deserialize_from_vec(&encoded),
            Err(SerializingError::InvalidEncoding)
        );
    }

    #[test]
    fn trailing_garbage_in_structured_payload_is_rejected() {
        // A GetBlock payload with one spare byte. The checksum is valid, so
        // only the strict payload parse can catch it.
        let mut payload = BlockId::from([7u8; 64]).serialize_to_vec();
        payload.push(0);

        let mut encoded = Vec::new();
        ((HEADER_SIZE - 4 + payload.len()) as u32)
            .serialize(&mut encoded)
            .unwrap();
        MAGIC.serialize(&mut encoded).unwrap();
        (ContentId::GetBlock as u8).serialize(&mut encoded).unwrap();
        (payload.len() as u32).serialize(&mut encoded).unwrap();
        payload_checksum(&payload).serialize(&mut encoded).unwrap();
        encoded.extend_from_slice(&payload);

        assert_eq!(
            Message::deserialize_from_vec(&encoded),
            Err(SerializingError::InvalidEncoding)
        );
    }
}
