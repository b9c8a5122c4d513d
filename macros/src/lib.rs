/// Defines a newtype around `[u8; $len]` with the trait surface every
/// fixed-size protocol value needs: byte conversions, wire serialization
/// through `lagoon_serial`, and hex `Debug`/`Display`/`FromStr`.
///
/// The expansion site must have `lagoon_serial` and `hex` available as
/// dependencies.
#[macro_export]
macro_rules! fixed_byte_array {
    ($name: ident, $len: expr) => {
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name([u8; $len]);

        impl $name {
            pub const SIZE: usize = $len;

            #[inline]
            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            #[inline]
            pub fn to_bytes(&self) -> [u8; $len] {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name([0u8; $len])
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                $name(bytes)
            }
        }

        impl<'a> From<&'a [u8]> for $name {
            fn from(slice: &'a [u8]) -> Self {
                assert_eq!(
                    slice.len(),
                    $len,
                    "tried to create {} from a slice of wrong length",
                    stringify!($name)
                );
                let mut bytes = [0u8; $len];
                bytes.copy_from_slice(slice);
                $name(bytes)
            }
        }

        impl From<$name> for [u8; $len] {
            fn from(value: $name) -> [u8; $len] {
                value.0
            }
        }

        impl ::lagoon_serial::Serialize for $name {
            fn serialize<W: ::lagoon_serial::WriteBytesExt>(
                &self,
                writer: &mut W,
            ) -> Result<usize, ::lagoon_serial::SerializingError> {
                writer.write_all(&self.0)?;
                Ok($len)
            }

            fn serialized_size(&self) -> usize {
                $len
            }
        }

        impl ::lagoon_serial::Deserialize for $name {
            fn deserialize<R: ::lagoon_serial::ReadBytesExt>(
                reader: &mut R,
            ) -> Result<Self, ::lagoon_serial::SerializingError> {
                let mut bytes = [0u8; $len];
                reader.read_exact(&mut bytes)?;
                Ok($name(bytes))
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                f.write_str(&::hex::encode(self.0))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                f.write_str(&::hex::encode(self.0))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::hex::FromHexError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let vec = ::hex::decode(s)?;
                if vec.len() != $len {
                    return Err(::hex::FromHexError::InvalidStringLength);
                }
                Ok($name::from(&vec[..]))
            }
        }

        impl From<&'static str> for $name {
            fn from(s: &'static str) -> Self {
                s.parse().unwrap()
            }
        }
    };
}
