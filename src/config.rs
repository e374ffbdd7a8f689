/*! Conversion configuration.

A conversion is described by the splits to process (name and source locator),
the number of items per shard, and the speaker metadata stamped on every item.

It can be loaded from a JSON file:

```json
{
    "shard_size": 500,
    "speaker": {"speaker_id": "Spk0001", "speaker_gender": "Female", "speaker_age": 33, "language": "gu"},
    "splits": [
        {"name": "train", "locator": "https://example.org/train.tar.gz"},
        {"name": "test", "locator": "/data/test.tar.gz"}
    ]
}
```
!*/
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const DEFAULT_SHARD_SIZE: usize = 500;
pub const DEFAULT_LICENSE: &str = "cc-by-4.0";

/// Speaker information, identical for every item of a corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerMetadata {
    pub speaker_id: String,
    pub speaker_gender: String,
    pub speaker_age: u32,
    pub language: String,
}

impl Default for SpeakerMetadata {
    fn default() -> Self {
        Self {
            speaker_id: "Spk0001".to_string(),
            speaker_gender: "Female".to_string(),
            speaker_age: 33,
            language: "gu".to_string(),
        }
    }
}

/// A named split and where to read its source archive from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSource {
    pub name: String,
    pub locator: String,
}

/// Parses `name=locator`. Only the first `=` separates, since pre-signed urls carry
/// plenty of them in their query string.
impl FromStr for SplitSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, locator)) if !name.is_empty() && !locator.is_empty() => Ok(Self {
                name: name.to_string(),
                locator: locator.to_string(),
            }),
            _ => Err(Error::Config(format!(
                "invalid split {:?}, expected name=locator",
                s
            ))),
        }
    }
}

fn default_shard_size() -> usize {
    DEFAULT_SHARD_SIZE
}

fn default_license() -> String {
    DEFAULT_LICENSE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub splits: Vec<SplitSource>,
    #[serde(default = "default_shard_size")]
    pub shard_size: usize,
    #[serde(default)]
    pub speaker: SpeakerMetadata,
    /// Dataset card title. Defaults to the dataset id.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_license")]
    pub license: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            splits: Vec::new(),
            shard_size: DEFAULT_SHARD_SIZE,
            speaker: SpeakerMetadata::default(),
            title: None,
            license: DEFAULT_LICENSE.to_string(),
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file. The result is not validated.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        debug!("loading configuration from {:?}", path);
        let f = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(f)?)
    }

    /// Checks that there is at least one split, that split names are unique
    /// single path components, and that the shard size is positive.
    pub fn validate(&self) -> Result<(), Error> {
        if self.shard_size == 0 {
            return Err(Error::Config("shard size must be positive".to_string()));
        }
        if self.splits.is_empty() {
            return Err(Error::Config("no split to process".to_string()));
        }

        let mut seen = HashSet::new();
        for split in &self.splits {
            check_split_name(&split.name)?;
            if !seen.insert(split.name.as_str()) {
                return Err(Error::Config(format!(
                    "split {:?} is declared twice",
                    split.name
                )));
            }
        }
        Ok(())
    }
}

/// Split names end up in file names and destinations (`data/{split}/{split}_00001.tar`).
fn check_split_name(name: &str) -> Result<(), Error> {
    if name.is_empty() || name == "." || name == ".." || name.contains(&['/', '\\'][..]) {
        return Err(Error::Config(format!("invalid split name {:?}", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_from_str() {
        let s: SplitSource = "train=https://host/a.tar.gz?X-Amz-Date=1&X-Amz-Expires=2"
            .parse()
            .unwrap();
        assert_eq!(s.name, "train");
        assert_eq!(s.locator, "https://host/a.tar.gz?X-Amz-Date=1&X-Amz-Expires=2");

        assert!("train".parse::<SplitSource>().is_err());
        assert!("=foo".parse::<SplitSource>().is_err());
        assert!("train=".parse::<SplitSource>().is_err());
    }

    #[test]
    fn deserialize_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"splits": [{"name": "test", "locator": "t.tar.gz"}]}"#)
                .unwrap();
        assert_eq!(config.shard_size, DEFAULT_SHARD_SIZE);
        assert_eq!(config.speaker, SpeakerMetadata::default());
        assert_eq!(config.license, DEFAULT_LICENSE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate() {
        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.splits = vec!["a=x".parse().unwrap(), "a=y".parse().unwrap()];
        assert!(config.validate().is_err());

        config.splits.pop();
        config.shard_size = 0;
        assert!(config.validate().is_err());

        config.shard_size = 2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_split_names() {
        let with_split = |name: &str| Config {
            splits: vec![SplitSource {
                name: name.to_string(),
                locator: "t.tar.gz".to_string(),
            }],
            ..Config::default()
        };

        assert!(with_split("validation").validate().is_ok());
        assert!(with_split("dev.clean").validate().is_ok());
        for name in ["", ".", "..", "../x", "a/b", "a\\b"] {
            assert!(
                matches!(with_split(name).validate(), Err(Error::Config(_))),
                "{:?} should be rejected",
                name
            );
        }
    }

    #[test]
    fn from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"shard_size": 10, "speaker": {"speaker_id": "Spk0002", "speaker_gender": "Male", "speaker_age": 41, "language": "hi"}}"#,
        )
        .unwrap();

        let config = Config::from_path(&path).unwrap();
        assert_eq!(config.shard_size, 10);
        assert_eq!(config.speaker.speaker_age, 41);
        assert!(config.splits.is_empty());
    }
}
