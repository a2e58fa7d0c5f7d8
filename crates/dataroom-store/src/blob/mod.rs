//! Blob storage for file contents
//!
//! The engine tracks file metadata only. Bytes live here, keyed by the same
//! [`FileId`] as the file record, and are released by the caller after a
//! delete commits.

mod fs_store;
mod sharding;

use std::collections::BTreeMap;
use std::sync::RwLock;

use dataroom_core::AggregateState;
use dataroom_core_types::FileId;

use crate::errors::Result;

pub use fs_store::FsBlobStore;

/// Byte storage keyed by file id
pub trait BlobStore {
    /// Store `bytes` for `file_id`, replacing any previous content
    fn put(&self, file_id: &FileId, bytes: &[u8]) -> Result<()>;

    /// Content for `file_id`, or `None` when nothing is stored
    fn get(&self, file_id: &FileId) -> Result<Option<Vec<u8>>>;

    /// Remove the content for `file_id`; returns whether anything was removed
    fn delete(&self, file_id: &FileId) -> Result<bool>;

    /// Every id with stored content
    fn ids(&self) -> Result<Vec<FileId>>;
}

/// In-process blob store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<BTreeMap<FileId, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, file_id: &FileId, bytes: &[u8]) -> Result<()> {
        if let Ok(mut blobs) = self.blobs.write() {
            blobs.insert(file_id.clone(), bytes.to_vec());
        }
        Ok(())
    }

    fn get(&self, file_id: &FileId) -> Result<Option<Vec<u8>>> {
        Ok(self
            .blobs
            .read()
            .ok()
            .and_then(|blobs| blobs.get(file_id).cloned()))
    }

    fn delete(&self, file_id: &FileId) -> Result<bool> {
        Ok(self
            .blobs
            .write()
            .map(|mut blobs| blobs.remove(file_id).is_some())
            .unwrap_or(false))
    }

    fn ids(&self) -> Result<Vec<FileId>> {
        Ok(self
            .blobs
            .read()
            .map(|blobs| blobs.keys().cloned().collect())
            .unwrap_or_default())
    }
}

/// Delete every blob whose file no longer exists in `state`
///
/// Returns the removed ids. Run after cascading deletes or on startup to
/// reclaim space left by interrupted sessions.
pub fn purge_orphans(store: &dyn BlobStore, state: &AggregateState) -> Result<Vec<FileId>> {
    let mut removed = Vec::new();
    for file_id in store.ids()? {
        if state.file(&file_id).is_none() && store.delete(&file_id)? {
            removed.push(file_id);
        }
    }
    if !removed.is_empty() {
        tracing::info!(removed = removed.len(), "purged orphaned blobs");
    }
    Ok(removed)
}
