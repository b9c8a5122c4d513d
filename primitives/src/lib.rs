pub mod networks;

pub use networks::Scheme;
