pub use self::address::{Address, AddressError, ADDRESS_SIZE, ADDRESS_VERSION};
pub use self::public_key::PublicKey;
pub use self::signature::Signature;

mod address;
mod public_key;
mod signature;
