use std::io;

use blake2_rfc::blake2b::Blake2b;
use lagoon_macros::fixed_byte_array;

/// An incremental hash builder. Content is fed through `io::Write`.
pub trait Hasher: Default + io::Write {
    type Output;

    fn finish(self) -> Self::Output;

    fn digest(mut self, bytes: &[u8]) -> Self::Output {
        self.write_all(bytes).unwrap();
        self.finish()
    }

    fn chain<T: SerializeContent>(mut self, value: &T) -> Self {
        value.serialize_content(&mut self).unwrap();
        self
    }
}

/// The byte representation of a value that is covered by a digest.
pub trait SerializeContent {
    fn serialize_content<W: io::Write>(&self, writer: &mut W) -> io::Result<usize>;
}

pub trait Hash: SerializeContent {
    fn hash(&self) -> Blake2bHash {
        let mut hasher = Blake2bHasher::new();
        self.serialize_content(&mut hasher).unwrap();
        hasher.finish()
    }
}

const BLAKE2B_LENGTH: usize = 32;

fixed_byte_array!(Blake2bHash, 32);

pub struct Blake2bHasher(Blake2b);

impl Blake2bHasher {
    pub fn new() -> Self {
        Blake2bHasher(Blake2b::new(BLAKE2B_LENGTH))
    }
}

impl Default for Blake2bHasher {
    fn default() -> Self {
        Blake2bHasher::new()
    }
}

impl io::Write for Blake2bHasher {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Hasher for Blake2bHasher {
    type Output = Blake2bHash;

    fn finish(self) -> Blake2bHash {
        let result = self.0.finalize();
        Blake2bHash::from(result.as_bytes())
    }
}

impl SerializeContent for [u8] {
    fn serialize_content<W: io::Write>(&self, writer: &mut W) -> io::Result<usize> {
        writer.write_all(self)?;
        Ok(self.len())
    }
}

impl Hash for [u8] {}

impl SerializeContent for Vec<u8> {
    fn serialize_content<W: io::Write>(&self, writer: &mut W) -> io::Result<usize> {
        writer.write_all(self)?;
        Ok(self.len())
    }
}

impl Hash for Vec<u8> {}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn blake2b_known_vector() {
        // Blake2b-256 of the empty input.
        let empty = Blake2bHasher::new().digest(&[]);
        assert_eq!(
            empty.to_string(),
            "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
        );
    }

    #[test]
    fn incremental_equals_oneshot() {
        let mut hasher = Blake2bHasher::new();
        hasher.write_all(b"liquid").unwrap();
        hasher.write_all(b" block").unwrap();
        assert_eq!(hasher.finish(), Blake2bHasher::new().digest(b"liquid block"));
    }
}
