#[macro_use]
extern crate log;

pub use error::*;
pub use known_blocks::KnownBlocks;
pub use ledger::{Applier, Ledger};
pub use liquid_storage::LiquidStorage;
pub use ng::NgState;

pub mod error;
pub mod known_blocks;
pub mod ledger;
pub mod liquid_storage;
pub mod ng;
