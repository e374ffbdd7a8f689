/*! Shard container writer.

A shard is a plain tar file holding, for each item, an audio entry
immediately followed by its metadata entry:

```text
00001_000000.wav
00001_000000.json
00001_000001.wav
00001_000001.json
```

Both entries share the `{shard:05}_{position:06}` prefix, which is what
WebDataset loaders use to group them into a single sample.
!*/
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use log::info;
use tar::{Builder, Header};
use tempfile::TempDir;

use crate::error::Error;
use crate::publish::Publisher;
use crate::shard::item::ShardItem;

pub const PAYLOAD_EXTENSION: &str = "wav";
pub const METADATA_EXTENSION: &str = "json";

/// Shared name prefix of the entries of an item.
pub fn entry_prefix(shard_index: usize, position: usize) -> String {
    format!("{:05}_{:06}", shard_index, position)
}

/// File name of a shard.
pub fn shard_file_name(split: &str, shard_index: usize) -> String {
    format!("{}_{:05}.tar", split, shard_index)
}

/// Destination of a shard inside the published dataset.
pub fn shard_destination(split: &str, shard_index: usize) -> String {
    format!("data/{}/{}", split, shard_file_name(split, shard_index))
}

fn append_entry<W: Write>(builder: &mut Builder<W>, name: &str, content: &[u8]) -> Result<(), Error> {
    let mut header = Header::new_ustar();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(0);
    header.set_cksum();
    builder.append_data(&mut header, name, content)?;
    Ok(())
}

/// Write `items` as shard number `shard_index` into `dst`.
///
/// Returns the writer back once the archive is finished.
pub fn write_container<W: Write>(dst: W, shard_index: usize, items: &[ShardItem]) -> Result<W, Error> {
    let mut builder = Builder::new(dst);
    for (position, item) in items.iter().enumerate() {
        let prefix = entry_prefix(shard_index, position);
        append_entry(
            &mut builder,
            &format!("{}.{}", prefix, PAYLOAD_EXTENSION),
            &item.payload,
        )?;
        append_entry(
            &mut builder,
            &format!("{}.{}", prefix, METADATA_EXTENSION),
            &item.metadata.to_json()?,
        )?;
    }
    Ok(builder.into_inner()?)
}

/// Writes shards of a split into a private temporary folder,
/// publishes them and removes them right after.
///
/// At most one shard exists on disk at any time.
/// The temporary folder is removed when the writer is dropped.
pub struct ShardWriter<'a> {
    split: String,
    dataset_id: String,
    workdir: TempDir,
    publisher: &'a dyn Publisher,
}

impl<'a> ShardWriter<'a> {
    pub fn new(split: &str, dataset_id: &str, publisher: &'a dyn Publisher) -> Result<Self, Error> {
        let workdir = tempfile::Builder::new()
            .prefix(&format!("wavshard-{}-", split))
            .tempdir()?;
        Ok(Self {
            split: split.to_string(),
            dataset_id: dataset_id.to_string(),
            workdir,
            publisher,
        })
    }

    pub fn split(&self) -> &str {
        &self.split
    }

    /// Write, publish then delete shard `shard_index`.
    ///
    /// `total_files` is only used for progress reporting.
    pub fn write(&self, shard_index: usize, items: &[ShardItem], total_files: usize) -> Result<(), Error> {
        info!(
            "[{}] Shard {}: creating TAR with {} files",
            self.split,
            shard_index,
            items.len()
        );

        let path: PathBuf = self.workdir.path().join(shard_file_name(&self.split, shard_index));
        let file = BufWriter::new(File::create(&path)?);
        let mut file = write_container(file, shard_index, items)?;
        file.flush()?;
        drop(file);

        let size_mb = std::fs::metadata(&path)?.len() as f64 / 1024.0 / 1024.0;
        info!(
            "[{}] uploading {:.1}MB TAR shard ({} total files)",
            self.split, size_mb, total_files
        );
        self.publisher.publish(
            &path,
            &shard_destination(&self.split, shard_index),
            &self.dataset_id,
        )?;
        info!("[{}] Shard {} uploaded", self.split, shard_index);

        std::fs::remove_file(&path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::path::Path;
    use std::sync::Mutex;

    use super::*;
    use crate::config::SpeakerMetadata;
    use crate::shard::item::ItemMetadata;
    use crate::transcripts::Transcript;

    fn item(file_id: &str, text: &str) -> ShardItem {
        let transcript = Transcript {
            text: text.to_string(),
            domain: String::new(),
        };
        ShardItem {
            payload: format!("RIFF{}", file_id).into_bytes(),
            metadata: ItemMetadata::new(file_id, transcript, &SpeakerMetadata::default()),
        }
    }

    fn entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
        let mut archive = tar::Archive::new(bytes);
        archive
            .entries()
            .unwrap()
            .map(|e| {
                let mut e = e.unwrap();
                let name = e.path().unwrap().to_string_lossy().into_owned();
                let mut content = Vec::new();
                e.read_to_end(&mut content).unwrap();
                (name, content)
            })
            .collect()
    }

    #[test]
    fn names() {
        assert_eq!(entry_prefix(1, 0), "00001_000000");
        assert_eq!(entry_prefix(12, 499), "00012_000499");
        assert_eq!(shard_file_name("train", 3), "train_00003.tar");
        assert_eq!(shard_destination("test", 3), "data/test/test_00003.tar");
    }

    #[test]
    fn container_layout() {
        let items = vec![item("A_X_1", "one"), item("A_X_2", ""), item("A_X_3", "three")];
        let bytes = write_container(Vec::new(), 7, &items).unwrap();
        let entries = entries(&bytes);

        assert_eq!(entries.len(), 2 * items.len());
        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "00007_000000.wav",
                "00007_000000.json",
                "00007_000001.wav",
                "00007_000001.json",
                "00007_000002.wav",
                "00007_000002.json",
            ]
        );

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(sorted, names);

        for (pair, item) in entries.chunks(2).zip(&items) {
            assert_eq!(pair[0].1, item.payload);
            let meta: ItemMetadata = serde_json::from_slice(&pair[1].1).unwrap();
            assert_eq!(meta, item.metadata);
        }
    }

    #[derive(Default)]
    struct Recorder {
        published: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl Publisher for Recorder {
        fn publish(&self, local: &Path, destination: &str, _: &str) -> Result<(), Error> {
            let content = std::fs::read(local)?;
            self.published
                .lock()
                .unwrap()
                .push((destination.to_string(), content));
            Ok(())
        }
    }

    #[test]
    fn write_publishes_and_cleans() {
        let recorder = Recorder::default();
        let writer = ShardWriter::new("train", "ds", &recorder).unwrap();
        writer.write(1, &[item("A_X_1", "one")], 1).unwrap();

        let published = recorder.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, "data/train/train_00001.tar");
        assert_eq!(entries(&published[0].1).len(), 2);

        assert_eq!(std::fs::read_dir(writer.workdir.path()).unwrap().count(), 0);
    }
}
