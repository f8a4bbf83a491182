use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::path::PathBuf;

use crate::catalog::RegionId;
use crate::error::{FlagdeckError, FlagdeckResult};

#[derive(Debug, Default)]
/// Accumulates named byte blobs and packs them into one ZIP archive.
///
/// Entries are keyed by file name: adding a duplicate name replaces the
/// previous bytes (last write wins). All entries are stored at the archive
/// root.
pub struct ArchiveBuilder {
    entries: BTreeMap<String, Vec<u8>>,
}

impl ArchiveBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage one entry at the archive root.
    pub fn add_entry(&mut self, file_name: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(file_name.into(), bytes);
    }

    /// Number of distinct entries currently staged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are staged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize all staged entries into a deflate-compressed ZIP buffer.
    ///
    /// Fails with [`FlagdeckError::EmptyArchive`] when nothing is staged and
    /// with [`FlagdeckError::ArchiveWrite`] when the underlying stream fails;
    /// no partial archive is ever returned.
    pub fn build(&self) -> FlagdeckResult<Vec<u8>> {
        if self.entries.is_empty() {
            return Err(FlagdeckError::EmptyArchive);
        }

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);
        for (name, bytes) in &self.entries {
            writer
                .start_file(name.clone(), options)
                .map_err(|e| FlagdeckError::archive_write(format!("start entry '{name}': {e}")))?;
            writer
                .write_all(bytes)
                .map_err(|e| FlagdeckError::archive_write(format!("write entry '{name}': {e}")))?;
        }
        let cursor = writer
            .finish()
            .map_err(|e| FlagdeckError::archive_write(format!("finalize archive: {e}")))?;
        Ok(cursor.into_inner())
    }
}

/// Destination that receives a finished archive.
///
/// Delivery is fire-and-forget from the pipeline's point of view: a failure
/// is reported back to the caller but the archive itself was still produced.
pub trait ArchiveSink {
    /// Persist or deliver the archive bytes under the suggested file name.
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> FlagdeckResult<()>;
}

#[derive(Clone, Debug)]
/// Sink that writes archives into a target directory.
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Deliver archives into `dir`, created on first delivery.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArchiveSink for FileSink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> FlagdeckResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            FlagdeckError::sink_delivery(format!("create '{}': {e}", self.dir.display()))
        })?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes)
            .map_err(|e| FlagdeckError::sink_delivery(format!("write '{}': {e}", path.display())))
    }
}

/// Suggested archive file name for one pipeline run.
pub fn archive_file_name(prefix: &str, region: RegionId) -> String {
    format!("{prefix}_{region}.zip")
}

#[cfg(test)]
#[path = "../tests/unit/archive.rs"]
mod tests;
