//! Pipelines.
//!
//! [split::SplitProcessor] converts a single split, and [convert::Conversion]
//! runs it over every configured split before publishing the dataset card.
pub mod convert;
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod split;

pub use convert::{Conversion, RunStats};
pub use pipeline::Pipeline;
pub use split::SplitProcessor;
