use lagoon_hash::{Blake2bHasher, Hasher};
use lagoon_macros::fixed_byte_array;
use thiserror::Error;

use crate::PublicKey;

pub const ADDRESS_VERSION: u8 = 1;
pub const ADDRESS_SIZE: usize = 26;

const HASH_OFFSET: usize = 2;
const CHECKSUM_OFFSET: usize = 22;
const CHECKSUM_SIZE: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("unsupported address version {0}")]
    InvalidVersion(u8),
    #[error("address checksum mismatch")]
    InvalidChecksum,
    #[error("address is issued for a different chain")]
    WrongChain,
}

// Layout: version byte, chain id byte, 20-byte public key hash, 4-byte
// checksum over the preceding 22 bytes.
fixed_byte_array!(Address, 26);

impl Address {
    pub fn from_public_key(chain_id: u8, public_key: &PublicKey) -> Address {
        let key_hash = Blake2bHasher::new().digest(public_key.as_bytes());

        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes[0] = ADDRESS_VERSION;
        bytes[1] = chain_id;
        bytes[HASH_OFFSET..CHECKSUM_OFFSET].copy_from_slice(&key_hash.as_bytes()[..20]);

        let checksum = Blake2bHasher::new().digest(&bytes[..CHECKSUM_OFFSET]);
        bytes[CHECKSUM_OFFSET..].copy_from_slice(&checksum.as_bytes()[..CHECKSUM_SIZE]);

        Address::from(bytes)
    }

    pub fn version(&self) -> u8 {
        self.as_bytes()[0]
    }

    pub fn chain_id(&self) -> u8 {
        self.as_bytes()[1]
    }

    /// Structural validity for the given chain. Deserialization is
    /// permissive; callers that care run this check.
    pub fn validate(&self, chain_id: u8) -> Result<(), AddressError> {
        if self.version() != ADDRESS_VERSION {
            return Err(AddressError::InvalidVersion(self.version()));
        }
        if self.chain_id() != chain_id {
            return Err(AddressError::WrongChain);
        }
        let checksum = Blake2bHasher::new().digest(&self.as_bytes()[..CHECKSUM_OFFSET]);
        if self.as_bytes()[CHECKSUM_OFFSET..] != checksum.as_bytes()[..CHECKSUM_SIZE] {
            return Err(AddressError::InvalidChecksum);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_address_validates() {
        let pk = PublicKey::from([7u8; 32]);
        let address = Address::from_public_key(b'W', &pk);
        assert_eq!(address.version(), ADDRESS_VERSION);
        assert_eq!(address.chain_id(), b'W');
        assert_eq!(address.validate(b'W'), Ok(()));
        assert_eq!(address.validate(b'T'), Err(AddressError::WrongChain));
    }

    #[test]
    fn corrupted_checksum_is_rejected() {
        let pk = PublicKey::from([7u8; 32]);
        let address = Address::from_public_key(b'W', &pk);
        let mut bytes = address.to_bytes();
        bytes[25] ^= 0xff;
        assert_eq!(
            Address::from(bytes).validate(b'W'),
            Err(AddressError::InvalidChecksum)
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        let pk = PublicKey::from([42u8; 32]);
        assert_eq!(
            Address::from_public_key(b'T', &pk),
            Address::from_public_key(b'T', &pk)
        );
    }
}
