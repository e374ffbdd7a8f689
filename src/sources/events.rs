/*! Classification of archive members into corpus events.

The source archive mixes the transcript index, audio recordings and
assorted files (readmes, speaker sheets...). [Events] wraps [Members] and
turns each member into an [Event], reading the member content that is needed
and silently skipping the rest.
!*/
use std::io::Read;
use std::path::Path;

use log::{debug, info};

use crate::error::Error;
use crate::sources::archive::{Member, Members};
use crate::transcripts::{is_transcript_file, TranscriptIndex};

/// Suffix of audio members.
pub const AUDIO_SUFFIX: &str = ".wav";

#[derive(Debug)]
pub enum Event {
    /// The transcript index has been read.
    Transcripts(TranscriptIndex),
    /// An audio recording, with its identifier (file name without extension).
    Audio { file_id: String, payload: Vec<u8> },
}

/// Check whether a member name designates an audio recording.
pub fn is_audio_file(name: &str) -> bool {
    name.ends_with(AUDIO_SUFFIX)
}

/// Identifier of an audio file: its file name without extension.
pub fn file_id(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}

/// Classify a single member, reading its content when needed.
/// Returns `None` for members that are neither transcripts nor audio.
pub fn classify<R: Read>(member: Member<'_, R>) -> Result<Option<Event>, Error> {
    let file_name = member.file_name().to_string();

    if is_transcript_file(&file_name) {
        info!("Loading transcripts from {}", member.name());
        let index = TranscriptIndex::from_reader(member)?;
        info!("Loaded {} transcripts", index.len());
        return Ok(Some(Event::Transcripts(index)));
    }

    if is_audio_file(&file_name) {
        // the header size is not trusted: the buffer grows with what is actually read.
        let mut member = member;
        let mut payload = Vec::new();
        member.read_to_end(&mut payload)?;
        return Ok(Some(Event::Audio {
            file_id: file_id(&file_name),
            payload,
        }));
    }

    debug!("skipping member {}", member.name());
    Ok(None)
}

/// Lazy sequence of [Event] over the members of an archive.
pub struct Events<'a, R: 'a + Read> {
    members: Members<'a, R>,
}

impl<'a, R: Read> Events<'a, R> {
    pub fn new(members: Members<'a, R>) -> Self {
        Self { members }
    }
}

impl<'a, R: Read> Iterator for Events<'a, R> {
    type Item = Result<Event, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let member = match self.members.next()? {
                Ok(member) => member,
                Err(e) => return Some(Err(e)),
            };

            match classify(member) {
                Ok(Some(event)) => return Some(Ok(event)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
