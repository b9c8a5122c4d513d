//! Binary serialization for the wire protocol.
//!
//! All multi-byte integers are big-endian. Collections are length-prefixed;
//! the length type is chosen per field by the caller (`u16` for short
//! strings and byte blobs, `u32` for block-level counts), which is why the
//! `*WithLength` traits are parameterised on it.

use std::io;

pub use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};
pub use num::{FromPrimitive, ToPrimitive};
use thiserror::Error;

pub trait Deserialize: Sized {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError>;

    fn deserialize_from_vec(v: &[u8]) -> Result<Self, SerializingError> {
        Self::deserialize(&mut &*v)
    }
}

pub trait Serialize {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError>;
    fn serialized_size(&self) -> usize;

    fn serialize_to_vec(&self) -> Vec<u8> {
        let mut v = Vec::with_capacity(self.serialized_size());
        self.serialize(&mut v).unwrap();
        v
    }
}

#[derive(Error, Debug)]
pub enum SerializingError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("invalid encoding")]
    InvalidEncoding,

    #[error("invalid value")]
    InvalidValue,

    #[error("length overflow")]
    Overflow,

    #[error("length limit exceeded")]
    LimitExceeded,
}

impl Eq for SerializingError {}

impl PartialEq for SerializingError {
    fn eq(&self, other: &SerializingError) -> bool {
        match (self, other) {
            (Self::IoError(e1), Self::IoError(e2)) => e1.kind() == e2.kind(),
            (Self::InvalidEncoding, Self::InvalidEncoding)
            | (Self::InvalidValue, Self::InvalidValue)
            | (Self::Overflow, Self::Overflow)
            | (Self::LimitExceeded, Self::LimitExceeded) => true,
            _ => false,
        }
    }
}

// u8 and i8 have no endianness.

impl Deserialize for u8 {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(reader.read_u8()?)
    }
}

impl Serialize for u8 {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        writer.write_u8(*self)?;
        Ok(1)
    }

    fn serialized_size(&self) -> usize {
        1
    }
}

impl Deserialize for i8 {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        Ok(reader.read_i8()?)
    }
}

impl Serialize for i8 {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        writer.write_i8(*self)?;
        Ok(1)
    }

    fn serialized_size(&self) -> usize {
        1
    }
}

macro_rules! primitive_serialize {
    ($t: ty, $len: expr, $r: ident, $w: ident) => {
        impl Deserialize for $t {
            fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
                Ok(reader.$r::<BigEndian>()?)
            }
        }

        impl Serialize for $t {
            fn serialize<W: WriteBytesExt>(
                &self,
                writer: &mut W,
            ) -> Result<usize, SerializingError> {
                writer.$w::<BigEndian>(*self)?;
                Ok($len)
            }

            fn serialized_size(&self) -> usize {
                $len
            }
        }
    };
}

primitive_serialize!(u16, 2, read_u16, write_u16);
primitive_serialize!(u32, 4, read_u32, write_u32);
primitive_serialize!(u64, 8, read_u64, write_u64);
primitive_serialize!(i16, 2, read_i16, write_i16);
primitive_serialize!(i32, 4, read_i32, write_i32);
primitive_serialize!(i64, 8, read_i64, write_i64);

impl Deserialize for bool {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        match reader.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(SerializingError::InvalidValue),
        }
    }
}

impl Serialize for bool {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        writer.write_u8(u8::from(*self))?;
        Ok(1)
    }

    fn serialized_size(&self) -> usize {
        1
    }
}

// Options are a presence byte followed by the value.

impl<T: Deserialize> Deserialize for Option<T> {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, SerializingError> {
        match reader.read_u8()? {
            0 => Ok(None),
            1 => Ok(Some(Deserialize::deserialize(reader)?)),
            _ => Err(SerializingError::InvalidValue),
        }
    }
}

impl<T: Serialize> Serialize for Option<T> {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<usize, SerializingError> {
        match self {
            Some(value) => {
                1u8.serialize(writer)?;
                Ok(value.serialize(writer)? + 1)
            }
            None => 0u8.serialize(writer),
        }
    }

    fn serialized_size(&self) -> usize {
        match self {
            Some(value) => 1 + value.serialized_size(),
            None => 1,
        }
    }
}

// Length-prefixed collections. The length type is picked at the call site.

pub trait DeserializeWithLength: Sized {
    fn deserialize<D: Deserialize + ToPrimitive, R: ReadBytesExt>(
        reader: &mut R,
    ) -> Result<Self, SerializingError> {
        Self::deserialize_with_limit::<D, _>(reader, None)
    }

    fn deserialize_with_limit<D: Deserialize + ToPrimitive, R: ReadBytesExt>(
        reader: &mut R,
        limit: Option<usize>,
    ) -> Result<Self, SerializingError>;
}

pub trait SerializeWithLength {
    fn serialize<S: Serialize + FromPrimitive, W: WriteBytesExt>(
        &self,
        writer: &mut W,
    ) -> Result<usize, SerializingError>;

    fn serialized_size<S: Serialize + FromPrimitive>(&self) -> usize;

    fn serialize_to_vec<S: Serialize + FromPrimitive>(&self) -> Vec<u8> {
        let mut v = Vec::with_capacity(self.serialized_size::<S>());
        self.serialize::<S, Vec<u8>>(&mut v).unwrap();
        v
    }
}

impl<T: Deserialize> DeserializeWithLength for Vec<T> {
    fn deserialize_with_limit<D: Deserialize + ToPrimitive, R: ReadBytesExt>(
        reader: &mut R,
        limit: Option<usize>,
    ) -> Result<Self, SerializingError> {
        let len: D = Deserialize::deserialize(reader)?;
        let len = len.to_usize().ok_or(SerializingError::Overflow)?;

        if limit.map(|l| len > l).unwrap_or(false) {
            return Err(SerializingError::LimitExceeded);
        }

        let mut v = Vec::with_capacity(len);
        for _ in 0..len {
            v.push(T::deserialize(reader)?);
        }
        Ok(v)
    }
}

impl<T: Serialize> SerializeWithLength for Vec<T> {
    fn serialize<S: Serialize + FromPrimitive, W: WriteBytesExt>(
        &self,
        writer: &mut W,
    ) -> Result<usize, SerializingError> {
        let mut size = S::from_usize(self.len())
            .ok_or(SerializingError::Overflow)?
            .serialize(writer)?;
        for item in self {
            size += item.serialize(writer)?;
        }
        Ok(size)
    }

    fn serialized_size<S: Serialize + FromPrimitive>(&self) -> usize {
        let mut size = S::from_usize(self.len()).unwrap().serialized_size();
        for item in self {
            size += item.serialized_size();
        }
        size
    }
}

impl DeserializeWithLength for String {
    fn deserialize_with_limit<D: Deserialize + ToPrimitive, R: ReadBytesExt>(
        reader: &mut R,
        limit: Option<usize>,
    ) -> Result<Self, SerializingError> {
        let bytes: Vec<u8> = DeserializeWithLength::deserialize_with_limit::<D, R>(reader, limit)?;
        String::from_utf8(bytes).map_err(|_| SerializingError::InvalidEncoding)
    }
}

impl SerializeWithLength for String {
    fn serialize<S: Serialize + FromPrimitive, W: WriteBytesExt>(
        &self,
        writer: &mut W,
    ) -> Result<usize, SerializingError> {
        let mut size = S::from_usize(self.len())
            .ok_or(SerializingError::Overflow)?
            .serialize(writer)?;
        writer.write_all(self.as_bytes())?;
        size += self.len();
        Ok(size)
    }

    fn serialized_size<S: Serialize + FromPrimitive>(&self) -> usize {
        S::from_usize(self.len()).unwrap().serialized_size() + self.len()
    }
}
