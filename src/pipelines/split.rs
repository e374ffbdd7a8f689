//! Conversion of a single split.
//!
//! The source archive is read in a single forward pass:
//! 1. The transcript member, wherever it is, replaces the split's transcript index.
//! 1. Each audio member is matched against the current index and buffered.
//! 1. Every `shard_size` items, a shard is written and published.
//! 1. Remaining items end up in a last, smaller shard.
//!
//! Audio members located before the transcript member get empty transcripts.
use std::io::Read;

use log::{info, warn};

use crate::config::SpeakerMetadata;
use crate::error::Error;
use crate::publish::Publisher;
use crate::shard::{ShardAccumulator, ShardWriter, SplitStats};
use crate::sources::{ArchiveStream, Event, Events, Locator};
use crate::transcripts::TranscriptIndex;

pub struct SplitProcessor<'a> {
    dataset_id: &'a str,
    shard_size: usize,
    speaker: &'a SpeakerMetadata,
    publisher: &'a dyn Publisher,
}

impl<'a> SplitProcessor<'a> {
    pub fn new(
        dataset_id: &'a str,
        shard_size: usize,
        speaker: &'a SpeakerMetadata,
        publisher: &'a dyn Publisher,
    ) -> Self {
        Self {
            dataset_id,
            shard_size,
            speaker,
            publisher,
        }
    }

    /// Open `locator` and process it as split `split_name`.
    pub fn process_locator(&self, locator: &Locator, split_name: &str) -> Result<SplitStats, Error> {
        info!("[{}] streaming from {}", split_name, locator);
        let source = locator.open()?;
        self.process_split(source, split_name)
    }

    /// Process a gzipped tarball read from `source` as split `split_name`.
    ///
    /// Any error aborts the split: no shard is emitted for pending items.
    pub fn process_split<R: Read>(&self, source: R, split_name: &str) -> Result<SplitStats, Error> {
        info!("Processing {} split", split_name);

        let writer = ShardWriter::new(split_name, self.dataset_id, self.publisher)?;
        let mut accumulator = ShardAccumulator::new(self.shard_size, self.speaker.clone(), writer)?;
        let mut transcripts = TranscriptIndex::default();
        let mut missing = 0usize;

        let mut archive = ArchiveStream::from_gzip(source);
        for event in Events::new(archive.members()?) {
            match event? {
                Event::Transcripts(index) => {
                    if accumulator.total_files() > 0 {
                        warn!(
                            "[{}] transcripts found after {} audio files, those have no transcript",
                            split_name,
                            accumulator.total_files()
                        );
                    }
                    transcripts = index;
                }
                Event::Audio { file_id, payload } => {
                    let transcript = match transcripts.get(&file_id) {
                        Some(transcript) => transcript.clone(),
                        None => {
                            missing += 1;
                            Default::default()
                        }
                    };
                    accumulator.add_item(&file_id, payload, transcript)?;
                }
            }
        }

        let stats = accumulator.finalize_split()?;
        if missing > 0 {
            warn!(
                "[{}] {} audio files without transcript",
                split_name, missing
            );
        }
        info!(
            "Completed {}: {} files in {} shards",
            split_name, stats.files, stats.shards
        );
        Ok(stats)
    }
}
