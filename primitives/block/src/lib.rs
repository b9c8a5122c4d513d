pub use self::block::{
    Block, BlockHeader, GenSignature, NxtConsensus, MAX_FEATURE_VOTES, MAX_TRANSACTIONS_PER_BLOCK,
};
pub use self::micro_block::MicroBlock;

mod block;
mod micro_block;

use lagoon_keys::Signature;

/// Blocks are identified by their signature. Equality is byte equality.
pub type BlockId = Signature;
