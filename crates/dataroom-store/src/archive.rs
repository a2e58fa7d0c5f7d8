//! ZIP archive import
//!
//! An uploaded archive is expanded into candidate files which are then
//! offered one by one to the engine's `create_file`. The engine itself never
//! sees archives.

use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dataroom_core::ops::file_ops::try_create_file;
use dataroom_core::rules::naming::unique_name_in_folder;
use dataroom_core::{AggregateState, DataRoomError};
use dataroom_core_types::{FileId, FolderId};
use zip::ZipArchive;

use crate::errors::{io_error, Result, StoreError};

/// Bounds on what an archive may expand to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveLimits {
    pub max_entries: usize,
    pub max_total_bytes: u64,
}

impl Default for ArchiveLimits {
    fn default() -> Self {
        Self {
            max_entries: 1_000,
            max_total_bytes: 512 * 1024 * 1024,
        }
    }
}

/// A candidate file pulled out of an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    /// Base name of the entry, without directories
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Expand a ZIP archive held in memory
///
/// Directory entries, entries whose path escapes the archive root and
/// macOS resource-fork entries are skipped.
///
/// # Errors
///
/// Returns `Archive` for unreadable archives, `TooManyEntries` or
/// `ArchiveTooLarge` when a limit is exceeded.
pub fn extract_zip(bytes: &[u8], limits: &ArchiveLimits) -> Result<Vec<ExtractedFile>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    if archive.len() > limits.max_entries {
        return Err(StoreError::TooManyEntries {
            count: archive.len(),
            limit: limits.max_entries,
        });
    }

    let mut extracted = Vec::new();
    let mut total_size = 0u64;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }

        let enclosed = match entry.enclosed_name() {
            Some(path) => path.to_path_buf(),
            None => {
                tracing::warn!(entry = ?entry.name(), "skipping archive entry with unsafe path");
                continue;
            }
        };
        if enclosed
            .components()
            .any(|part| part.as_os_str() == "__MACOSX")
        {
            continue;
        }
        let Some(name) = base_name(&enclosed) else {
            continue;
        };

        total_size = total_size.saturating_add(entry.size());
        if total_size > limits.max_total_bytes {
            return Err(StoreError::ArchiveTooLarge {
                limit: limits.max_total_bytes,
            });
        }

        let mut content = Vec::new();
        entry
            .read_to_end(&mut content)
            .map_err(|e| io_error("read_archive_entry", e))?;
        extracted.push(ExtractedFile {
            name,
            bytes: content,
        });
    }

    Ok(extracted)
}

fn base_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// A candidate that became a file record
#[derive(Debug, Clone)]
pub struct ImportedFile {
    pub file_id: FileId,
    /// Name after collision renaming
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub name: String,
    pub reason: DataRoomError,
}

/// Outcome of offering extracted files to a folder
#[derive(Debug, Clone)]
pub struct ImportReport {
    /// The input `Arc` itself when nothing was imported
    pub next_state: Arc<AggregateState>,
    /// Files created; the caller stores their bytes
    pub imported: Vec<ImportedFile>,
    pub skipped: Vec<SkippedFile>,
}

impl ImportReport {
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Offer each extracted file to `folder_id`
///
/// Name clashes are resolved by renaming to `name (2).ext`, `name (3).ext`
/// and so on. Candidates the engine still refuses are reported as skipped.
pub fn import_into_folder(
    state: &Arc<AggregateState>,
    folder_id: &FolderId,
    files: Vec<ExtractedFile>,
    mut id_source: impl FnMut() -> FileId,
    now: DateTime<Utc>,
) -> ImportReport {
    let mut next = AggregateState::clone(state);
    let mut imported = Vec::new();
    let mut skipped = Vec::new();

    for file in files {
        let name = unique_name_in_folder(&next, folder_id, &file.name);
        let file_id = id_source();
        let size = u64::try_from(file.bytes.len()).unwrap_or(u64::MAX);

        match try_create_file(&next, folder_id, &file_id, &name, size, now) {
            Ok(created) => {
                next = created;
                imported.push(ImportedFile {
                    file_id,
                    name,
                    bytes: file.bytes,
                });
            }
            Err(reason) => {
                tracing::debug!(name = %file.name, code = reason.code(), "archive entry skipped");
                skipped.push(SkippedFile {
                    name: file.name,
                    reason,
                });
            }
        }
    }

    tracing::info!(
        folder_id = %folder_id,
        imported = imported.len(),
        skipped = skipped.len(),
        "archive import finished"
    );

    let next_state = if imported.is_empty() {
        Arc::clone(state)
    } else {
        Arc::new(next)
    };

    ImportReport {
        next_state,
        imported,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, content) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(content).unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_uses_base_names_and_skips_dirs() {
        let bytes = build_zip(&[
            ("docs/", b""),
            ("docs/q1.pdf", b"one"),
            ("__MACOSX/docs/._q1.pdf", b"junk"),
            ("top.pdf", b"two"),
        ]);

        let files = extract_zip(&bytes, &ArchiveLimits::default()).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["q1.pdf", "top.pdf"]);
        assert_eq!(files[0].bytes, b"one");
    }

    #[test]
    fn test_extract_enforces_entry_limit() {
        let bytes = build_zip(&[("a.pdf", b"a"), ("b.pdf", b"b")]);
        let limits = ArchiveLimits {
            max_entries: 1,
            ..ArchiveLimits::default()
        };
        assert!(matches!(
            extract_zip(&bytes, &limits),
            Err(StoreError::TooManyEntries { count: 2, limit: 1 })
        ));
    }

    #[test]
    fn test_extract_enforces_size_limit() {
        let bytes = build_zip(&[("a.pdf", b"0123456789")]);
        let limits = ArchiveLimits {
            max_total_bytes: 4,
            ..ArchiveLimits::default()
        };
        assert!(matches!(
            extract_zip(&bytes, &limits),
            Err(StoreError::ArchiveTooLarge { limit: 4 })
        ));
    }

    #[test]
    fn test_garbage_is_archive_error() {
        assert!(matches!(
            extract_zip(b"not a zip", &ArchiveLimits::default()),
            Err(StoreError::Archive(_))
        ));
    }
}
