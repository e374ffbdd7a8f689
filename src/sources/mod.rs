//! Source archive reading.
//!
//! Wraps the [tar] reader over a gzip decoder, so that source corpora can be
//! processed while they are being downloaded.
//!
//! [archive::ArchiveStream] yields file [archive::Member]s, and [events::Events]
//! turns them into transcript and audio [events::Event]s.
pub mod archive;
pub mod events;
pub mod locator;

pub use archive::{ArchiveStream, Member, Members};
pub use events::{Event, Events};
pub use locator::Locator;
