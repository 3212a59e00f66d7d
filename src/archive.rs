//! ZIP container handling for price bundles.
//!
//! Archives are fully buffered in memory. Reading selects the tabular entry
//! by name; writing always produces a single Deflate-compressed entry.

use std::io::{Cursor, Read, Write};

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{LedgerError, Result};

/// How the tabular entry is located inside an uploaded archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryMatch {
    /// The first file whose base name equals the entry name exactly.
    #[default]
    Exact,
    /// Every file sharing the entry name's extension, in archive order.
    ///
    /// Looser than [`EntryMatch::Exact`]: unrelated files with the same
    /// extension are imported too.
    Extension,
}

impl EntryMatch {
    fn accepts(self, entry_path: &str, entry_name: &str) -> bool {
        let base = entry_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(entry_path);
        match self {
            EntryMatch::Exact => base == entry_name,
            EntryMatch::Extension => match (extension(base), extension(entry_name)) {
                (Some(got), Some(want)) => got.eq_ignore_ascii_case(want),
                _ => false,
            },
        }
    }
}

fn extension(name: &str) -> Option<&str> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// One selected archive entry and its decompressed contents.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub name: String,
    pub data: Vec<u8>,
}

/// Open `bytes` as a ZIP archive and return the entries selected by `mode`.
///
/// [`EntryMatch::Exact`] yields at most one entry. No match is not an
/// error: the result is simply empty. Anything that prevents the container
/// or a selected entry from being read is an [`LedgerError::ArchiveFormat`].
pub fn extract_entries(bytes: &[u8], entry_name: &str, mode: EntryMatch) -> Result<Vec<ArchiveEntry>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(LedgerError::ArchiveFormat)?;
    let mut selected = Vec::new();

    for index in 0..archive.len() {
        let mut file = archive.by_index(index).map_err(LedgerError::ArchiveFormat)?;
        if file.is_dir() || !mode.accepts(file.name(), entry_name) {
            debug!(entry = file.name(), "skipping archive entry");
            continue;
        }

        let name = file.name().to_string();
        let mut data = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
        file.read_to_end(&mut data)
            .map_err(|e| LedgerError::ArchiveFormat(e.into()))?;
        debug!(entry = %name, bytes = data.len(), "selected archive entry");
        selected.push(ArchiveEntry { name, data });

        if mode == EntryMatch::Exact {
            break;
        }
    }

    Ok(selected)
}

/// Wrap `payload` as the single entry `entry_name` of a new ZIP archive.
pub fn build_archive(entry_name: &str, payload: &[u8]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    writer
        .start_file(entry_name, options)
        .map_err(LedgerError::ArchiveBuild)?;
    writer
        .write_all(payload)
        .map_err(|e| LedgerError::ArchiveBuild(e.into()))?;
    let cursor = writer.finish().map_err(LedgerError::ArchiveBuild)?;

    Ok(cursor.into_inner())
}
