//! Output shards.
//!
//! [ShardAccumulator] gathers [ShardItem]s and hands full batches to a [ShardWriter],
//! which serializes them into WebDataset tar containers and publishes them.
pub mod accumulator;
pub mod item;
pub mod writer;

pub use accumulator::{ShardAccumulator, SplitStats};
pub use item::{category, ItemMetadata, ShardItem};
pub use writer::{shard_destination, write_container, ShardWriter};
