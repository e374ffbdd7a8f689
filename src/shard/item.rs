use std::io;

use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;

use crate::config::SpeakerMetadata;
use crate::transcripts::Transcript;

/// Category used when an identifier does not carry one.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Metadata record stored alongside each audio payload.
///
/// Field order is the serialization order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMetadata {
    pub text: String,
    pub file_id: String,
    pub category: String,
    pub domain: String,
    pub speaker_id: String,
    pub speaker_gender: String,
    pub speaker_age: u32,
    pub language: String,
}

impl ItemMetadata {
    pub fn new(file_id: &str, transcript: Transcript, speaker: &SpeakerMetadata) -> Self {
        Self {
            text: transcript.text,
            file_id: file_id.to_string(),
            category: category(file_id),
            domain: transcript.domain,
            speaker_id: speaker.speaker_id.clone(),
            speaker_gender: speaker.speaker_gender.clone(),
            speaker_age: speaker.speaker_age,
            language: speaker.language.clone(),
        }
    }

    /// UTF-8 JSON encoding. Non-ASCII characters are kept as is.
    ///
    /// Separators are `", "` and `": "`, like the records of previously published shards.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
        self.serialize(&mut ser)?;
        Ok(out)
    }
}

/// Single-line JSON with a space after each `,` and `:`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

/// Get the category of an utterance from its identifier.
///
/// Identifiers look like `AGRI_SPOR_0001`, the category being the
/// second-to-last `_`-separated segment.
pub fn category(file_id: &str) -> String {
    let parts: Vec<&str> = file_id.split('_').collect();
    if parts.len() >= 2 {
        parts[parts.len() - 2].to_string()
    } else {
        UNKNOWN_CATEGORY.to_string()
    }
}

/// An audio payload and its metadata, waiting to be written into a shard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardItem {
    pub payload: Vec<u8>,
    pub metadata: ItemMetadata,
}
