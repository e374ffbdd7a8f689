use log::debug;

use crate::config::SpeakerMetadata;
use crate::error::Error;
use crate::shard::item::{ItemMetadata, ShardItem};
use crate::shard::writer::ShardWriter;
use crate::transcripts::Transcript;

/// Counts of a processed split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitStats {
    pub split: String,
    pub files: usize,
    pub shards: usize,
}

/// Buffers items of a split and emits a shard each time `capacity` items are pending.
///
/// Shards are numbered from 1, and the processed file counter is never reset.
pub struct ShardAccumulator<'a> {
    capacity: usize,
    speaker: SpeakerMetadata,
    buffer: Vec<ShardItem>,
    shard_index: usize,
    total_files: usize,
    writer: ShardWriter<'a>,
}

impl<'a> ShardAccumulator<'a> {
    pub fn new(
        capacity: usize,
        speaker: SpeakerMetadata,
        writer: ShardWriter<'a>,
    ) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::Config("shard size must be positive".to_string()));
        }

        Ok(Self {
            capacity,
            speaker,
            buffer: Vec::new(),
            shard_index: 0,
            total_files: 0,
            writer,
        })
    }

    /// Add an audio payload with its transcript.
    /// Emits a shard if the buffer is full.
    pub fn add_item(
        &mut self,
        file_id: &str,
        payload: Vec<u8>,
        transcript: Transcript,
    ) -> Result<(), Error> {
        let metadata = ItemMetadata::new(file_id, transcript, &self.speaker);
        self.buffer.push(ShardItem { payload, metadata });
        self.total_files += 1;

        if self.buffer.len() >= self.capacity {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.shard_index += 1;
        debug!(
            "[{}] flushing {} items into shard {}",
            self.writer.split(),
            self.buffer.len(),
            self.shard_index
        );
        self.writer
            .write(self.shard_index, &self.buffer, self.total_files)?;
        self.buffer.clear();
        Ok(())
    }

    /// Number of items waiting for the next shard.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    pub fn total_files(&self) -> usize {
        self.total_files
    }

    pub fn shards(&self) -> usize {
        self.shard_index
    }

    /// Emit remaining items as a last, possibly smaller shard.
    pub fn finalize_split(mut self) -> Result<SplitStats, Error> {
        if !self.buffer.is_empty() {
            self.flush()?;
        }

        Ok(SplitStats {
            split: self.writer.split().to_string(),
            files: self.total_files,
            shards: self.shard_index,
        })
    }
}
