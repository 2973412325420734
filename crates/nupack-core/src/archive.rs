//! Append-only in-memory zip container.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use tracing::trace;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::PackError;

/// Collects named entries into a deflated zip held in memory.
///
/// Entries are written in the order they are stored. The bytes only become
/// valid after [`ArchiveWriter::finish`]; a writer dropped before that
/// discards everything.
pub struct ArchiveWriter {
    zip: Option<ZipWriter<Cursor<Vec<u8>>>>,
    output: Option<Vec<u8>>,
    names: HashSet<String>,
    options: SimpleFileOptions,
}

impl std::fmt::Debug for ArchiveWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveWriter")
            .field("entries", &self.names.len())
            .field("finished", &self.output.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for ArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveWriter {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self {
            zip: Some(ZipWriter::new(Cursor::new(Vec::new()))),
            output: None,
            names: HashSet::new(),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    /// Append one entry. The path is normalized to forward slashes without a
    /// leading `/`.
    ///
    /// # Errors
    ///
    /// `DuplicateEntry` if the path was already stored, `Finalized` after
    /// [`ArchiveWriter::finish`], `Archive` on a zip failure.
    pub fn store(&mut self, path: &str, content: &[u8]) -> Result<(), PackError> {
        let name = normalize_entry_path(path);
        let zip = self.zip.as_mut().ok_or(PackError::Finalized)?;
        if !self.names.insert(name.clone()) {
            return Err(PackError::DuplicateEntry(name));
        }

        zip.start_file(name.as_str(), self.options)?;
        zip.write_all(content).map_err(zip::result::ZipError::from)?;
        trace!(entry = %name, bytes = content.len(), "stored");
        Ok(())
    }

    /// Number of entries stored so far.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no entry has been stored.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Write the central directory and return the archive bytes.
    ///
    /// Calling it again returns the same bytes. After a failed finish every
    /// later call fails with `Finalized`.
    pub fn finish(&mut self) -> Result<&[u8], PackError> {
        if let Some(zip) = self.zip.take() {
            let cursor = zip.finish()?;
            self.output = Some(cursor.into_inner());
        }
        self.output.as_deref().ok_or(PackError::Finalized)
    }

    /// Finish the archive and take ownership of its bytes.
    pub fn into_bytes(mut self) -> Result<Vec<u8>, PackError> {
        self.finish()?;
        self.output.take().ok_or(PackError::Finalized)
    }
}

/// Forward slashes only, no leading separator.
pub fn normalize_entry_path(path: &str) -> String {
    path.replace('\\', "/").trim_start_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn read_back(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut content = Vec::new();
                file.read_to_end(&mut content).unwrap();
                (file.name().to_string(), content)
            })
            .collect()
    }

    #[test]
    fn test_store_preserves_order_and_content() {
        let mut writer = ArchiveWriter::new();
        writer.store("b.txt", b"second letter").unwrap();
        writer.store(r"lib\net45\a.dll", b"\x00\x01\x02").unwrap();
        writer.store("/[Content_Types].xml", b"<Types/>").unwrap();
        assert_eq!(writer.len(), 3);

        let entries = read_back(&writer.into_bytes().unwrap());
        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["b.txt", "lib/net45/a.dll", "[Content_Types].xml"]);
        assert_eq!(entries[1].1, b"\x00\x01\x02");
    }

    #[test]
    fn test_duplicate_path_is_rejected() {
        let mut writer = ArchiveWriter::new();
        writer.store("lib/a.dll", b"one").unwrap();
        let err = writer.store(r"lib\a.dll", b"two").unwrap_err();
        assert!(matches!(err, PackError::DuplicateEntry(ref p) if p == "lib/a.dll"));
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut writer = ArchiveWriter::new();
        writer.store("a.txt", b"a").unwrap();
        let first = writer.finish().unwrap().to_vec();
        let second = writer.finish().unwrap().to_vec();
        assert_eq!(first, second);
        assert_eq!(read_back(&first).len(), 1);
    }

    #[test]
    fn test_store_after_finish_fails() {
        let mut writer = ArchiveWriter::new();
        writer.finish().unwrap();
        assert!(matches!(
            writer.store("late.txt", b"x"),
            Err(PackError::Finalized)
        ));
    }

    #[test]
    fn test_failed_finish_never_yields_empty_bytes() {
        // state left behind when the central directory write fails
        let mut writer = ArchiveWriter::new();
        writer.zip = None;

        assert!(matches!(writer.finish(), Err(PackError::Finalized)));
        assert!(matches!(writer.finish(), Err(PackError::Finalized)));
        assert!(matches!(writer.into_bytes(), Err(PackError::Finalized)));
    }

    #[test]
    fn test_empty_archive_is_valid() {
        let writer = ArchiveWriter::new();
        assert!(writer.is_empty());
        assert!(read_back(&writer.into_bytes().unwrap()).is_empty());
    }
}
