use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::MultiGzDecoder;
use log::debug;
use tar::{Archive, Entries, Entry};

use crate::error::Error;

/// Forward-only tar archive, generic over reader type.
///
/// Source corpora are gzipped tarballs, so most of the time the reader
/// is a [MultiGzDecoder] over a network or file stream.
/// Produced shards are plain tarballs and use the reader as is.
pub struct ArchiveStream<R: Read> {
    archive: Archive<R>,
}

impl<R: Read> ArchiveStream<MultiGzDecoder<R>> {
    /// Create a new stream from a gzipped tarball.
    pub fn from_gzip(reader: R) -> Self {
        Self::new(MultiGzDecoder::new(reader))
    }
}

impl ArchiveStream<MultiGzDecoder<File>> {
    pub fn from_path_gzip<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Ok(Self::from_gzip(File::open(path)?))
    }
}

impl<R: Read> ArchiveStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            archive: Archive::new(reader),
        }
    }

    /// Iterate over the file members of the archive.
    ///
    /// Can only be called once: the underlying stream is consumed.
    pub fn members(&mut self) -> Result<Members<'_, R>, Error> {
        Ok(Members {
            entries: self.archive.entries()?,
        })
    }
}

/// A file member of the archive.
///
/// Reading it reads the archive stream itself, so it has to be used
/// before the next member is requested.
pub struct Member<'a, R: 'a + Read> {
    name: String,
    entry: Entry<'a, R>,
}

impl<'a, R: Read> Member<'a, R> {
    /// Full path of the member inside the archive.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last component of the member path.
    pub fn file_name(&self) -> &str {
        Path::new(&self.name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.name)
    }

    /// Size of the member content, as advertised by its header.
    pub fn size(&self) -> u64 {
        self.entry.size()
    }
}

impl<'a, R: Read> Read for Member<'a, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.entry.read(buf)
    }
}

/// Iterator over the file members of an [ArchiveStream].
/// Directories, links and other non-file entries are skipped.
pub struct Members<'a, R: 'a + Read> {
    entries: Entries<'a, R>,
}

impl<'a, R: Read> Iterator for Members<'a, R> {
    type Item = Result<Member<'a, R>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(Error::Io(e))),
            };

            let name = match entry.path() {
                Ok(path) => path.to_string_lossy().into_owned(),
                Err(e) => return Some(Err(Error::Io(e))),
            };

            if !entry.header().entry_type().is_file() {
                debug!("skipping non-file member {}", name);
                continue;
            }

            return Some(Ok(Member { name, entry }));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::{write::GzEncoder, Compression};
    use tar::{Builder, EntryType, Header};

    use super::*;

    fn append(builder: &mut Builder<impl Write>, name: &str, content: &[u8]) {
        let mut header = Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, content).unwrap();
    }

    fn gzipped_archive() -> Vec<u8> {
        let enc = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = Builder::new(enc);

        let mut dir = Header::new_gnu();
        dir.set_entry_type(EntryType::Directory);
        dir.set_size(0);
        dir.set_mode(0o755);
        dir.set_cksum();
        builder
            .append_data(&mut dir, "corpus/", std::io::empty())
            .unwrap();

        append(&mut builder, "corpus/a.wav", b"RIFFaaaa");
        append(&mut builder, "corpus/b.txt", b"hello");

        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn members() {
        let bytes = gzipped_archive();
        let mut stream = ArchiveStream::from_gzip(bytes.as_slice());

        let mut seen = Vec::new();
        for member in stream.members().unwrap() {
            let mut member = member.unwrap();
            let mut content = Vec::new();
            member.read_to_end(&mut content).unwrap();
            seen.push((member.name().to_string(), member.file_name().to_string(), content));
        }

        assert_eq!(
            seen,
            vec![
                ("corpus/a.wav".to_string(), "a.wav".to_string(), b"RIFFaaaa".to_vec()),
                ("corpus/b.txt".to_string(), "b.txt".to_string(), b"hello".to_vec()),
            ]
        );
    }

    #[test]
    fn members_not_read() {
        // skipping content of a member must not desync the stream
        let bytes = gzipped_archive();
        let mut stream = ArchiveStream::from_gzip(bytes.as_slice());
        let names: Vec<String> = stream
            .members()
            .unwrap()
            .map(|m| m.unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["corpus/a.wav", "corpus/b.txt"]);
    }

    #[test]
    fn truncated() {
        let bytes = gzipped_archive();
        let truncated = &bytes[..bytes.len() / 2];
        let mut stream = ArchiveStream::from_gzip(truncated);

        let result: Result<Vec<Vec<u8>>, Error> = stream
            .members()
            .unwrap()
            .map(|m| {
                let mut m = m?;
                let mut content = Vec::new();
                m.read_to_end(&mut content)?;
                Ok(content)
            })
            .collect();
        assert!(result.is_err());
    }

    #[test]
    fn from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.tar.gz");
        std::fs::write(&path, gzipped_archive()).unwrap();

        let mut stream = ArchiveStream::from_path_gzip(&path).unwrap();
        assert_eq!(stream.members().unwrap().count(), 2);
    }
}
