/*! Transcript index.

Corpora ship a single `*_Transcripts.json` member, holding every utterance's transcript and domain:

```json
{
    "Transcripts": {
        "AGRI_SPOR_0001": {"Transcript": "...", "Domain": "Sports"}
    }
}
```
!*/
use std::collections::HashMap;
use std::io::Read;

use serde_json::Value;

use crate::error::Error;

/// Suffix of the transcript member's file name.
pub const TRANSCRIPT_SUFFIX: &str = "_Transcripts.json";

/// Transcript and domain of a single utterance.
/// Both default to empty strings when unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
    pub domain: String,
}

impl From<&Value> for Transcript {
    fn from(v: &Value) -> Self {
        match v.as_object() {
            Some(record) => {
                let field = |key: &str| {
                    record
                        .get(key)
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                };
                Self {
                    text: field("Transcript"),
                    domain: field("Domain"),
                }
            }
            None => Self::default(),
        }
    }
}

/// Utterance id to [Transcript] mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptIndex {
    inner: HashMap<String, Transcript>,
}

impl TranscriptIndex {
    /// Reads the whole member and parses it.
    ///
    /// Malformed JSON fails, but malformed entries are kept with empty defaults.
    /// A document without a `Transcripts` key yields an empty index.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let document: Value = serde_json::from_reader(reader)?;
        let inner = match document.get("Transcripts").and_then(Value::as_object) {
            Some(transcripts) => transcripts
                .iter()
                .map(|(id, record)| (id.clone(), Transcript::from(record)))
                .collect(),
            None => HashMap::new(),
        };

        Ok(Self { inner })
    }

    pub fn get(&self, file_id: &str) -> Option<&Transcript> {
        self.inner.get(file_id)
    }

    /// Get the transcript of `file_id`, or empty defaults if there's none.
    pub fn lookup(&self, file_id: &str) -> Transcript {
        self.get(file_id).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl FromIterator<(String, Transcript)> for TranscriptIndex {
    fn from_iter<T: IntoIterator<Item = (String, Transcript)>>(iter: T) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

/// Check whether a member name designates the transcript file.
pub fn is_transcript_file(name: &str) -> bool {
    name.ends_with(TRANSCRIPT_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        let json = r#"{
            "Transcripts": {
                "AGRI_SPOR_0001": {"Transcript": "નમસ્તે", "Domain": "Sports"},
                "AGRI_SPOR_0002": {"Transcript": "", "Domain": "Sports"},
                "AGRI_SPOR_0003": "not a record",
                "AGRI_SPOR_0004": {"Transcript": 12}
            }
        }"#;
        let index = TranscriptIndex::from_reader(json.as_bytes()).unwrap();
        assert_eq!(index.len(), 4);

        let t = index.lookup("AGRI_SPOR_0001");
        assert_eq!(t.text, "નમસ્તે");
        assert_eq!(t.domain, "Sports");

        assert_eq!(index.lookup("AGRI_SPOR_0002").text, "");
        assert_eq!(index.lookup("AGRI_SPOR_0003"), Transcript::default());
        assert_eq!(index.lookup("AGRI_SPOR_0004"), Transcript::default());
    }

    #[test]
    fn missing_id() {
        let index = TranscriptIndex::from_reader(r#"{"Transcripts": {}}"#.as_bytes()).unwrap();
        assert!(index.is_empty());
        assert!(index.get("nope").is_none());
        assert_eq!(index.lookup("nope"), Transcript::default());
    }

    #[test]
    fn missing_key() {
        let index = TranscriptIndex::from_reader(r#"{"Speakers": []}"#.as_bytes()).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn malformed() {
        assert!(TranscriptIndex::from_reader(r#"{"Transcripts": {"#.as_bytes()).is_err());
    }

    #[test]
    fn transcript_file_name() {
        assert!(is_transcript_file("corpus/Gujarati_Transcripts.json"));
        assert!(!is_transcript_file("corpus/Gujarati_Transcripts.json.bak"));
        assert!(!is_transcript_file("corpus/AGRI_SPOR_0001.wav"));
    }
}
