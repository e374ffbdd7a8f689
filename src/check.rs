//! Verification of produced shards.
//!
//! Checks that a shard follows the WebDataset layout: entries come in
//! `.wav`/`.json` pairs sharing a prefix, prefixes are in increasing order and
//! belong to the same shard, and metadata records have every expected field.
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::Error;
use crate::shard::writer::{METADATA_EXTENSION, PAYLOAD_EXTENSION};
use crate::shard::ItemMetadata;
use crate::sources::ArchiveStream;

/// Result of a successful shard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardReport {
    pub path: PathBuf,
    pub items: usize,
    pub payload_bytes: u64,
}

fn invalid(path: &Path, reason: String) -> Error {
    Error::Custom(format!("invalid shard {:?}: {}", path, reason))
}

/// Split `00001_000002.wav` into `("00001", "000002", "wav")`.
fn split_name(name: &str) -> Option<(&str, &str, &str)> {
    let (prefix, extension) = name.rsplit_once('.')?;
    let (shard, position) = prefix.split_once('_')?;
    let digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
    if digits(shard, 5) && digits(position, 6) {
        Some((shard, position, extension))
    } else {
        None
    }
}

/// Check the shard located at `path`.
pub fn check_shard(path: &Path) -> Result<ShardReport, Error> {
    debug!("checking {:?}", path);
    let mut archive = ArchiveStream::new(BufReader::new(File::open(path)?));
    check_archive(path, &mut archive)
}

fn check_archive<R: Read>(path: &Path, archive: &mut ArchiveStream<R>) -> Result<ShardReport, Error> {
    let mut shard: Option<String> = None;
    let mut last_position: Option<String> = None;
    let mut pending_payload: Option<String> = None;
    let mut items = 0;
    let mut payload_bytes = 0;

    for member in archive.members()? {
        let mut member = member?;
        let name = member.name().to_string();
        let (shard_part, position, extension) = split_name(&name)
            .ok_or_else(|| invalid(path, format!("unexpected entry name {}", name)))?;

        match &shard {
            Some(s) if s != shard_part => {
                return Err(invalid(
                    path,
                    format!("entry {} does not belong to shard {}", name, s),
                ))
            }
            Some(_) => (),
            None => shard = Some(shard_part.to_string()),
        }

        match (pending_payload.take(), extension) {
            (None, PAYLOAD_EXTENSION) => {
                if let Some(last) = &last_position {
                    if position <= last.as_str() {
                        return Err(invalid(path, format!("entry {} is out of order", name)));
                    }
                }
                payload_bytes += member.size();
                last_position = Some(position.to_string());
                pending_payload = Some(position.to_string());
            }
            (Some(expected), METADATA_EXTENSION) if expected == position => {
                let mut content = Vec::new();
                member.read_to_end(&mut content)?;
                serde_json::from_slice::<ItemMetadata>(&content)
                    .map_err(|e| invalid(path, format!("bad metadata in {}: {}", name, e)))?;
                items += 1;
            }
            _ => {
                return Err(invalid(path, format!("entry {} is not paired", name)));
            }
        }
    }

    if let Some(position) = pending_payload {
        return Err(invalid(
            path,
            format!("payload {} has no metadata", position),
        ));
    }

    info!("{:?}: {} items", path, items);
    Ok(ShardReport {
        path: path.to_path_buf(),
        items,
        payload_bytes,
    })
}
