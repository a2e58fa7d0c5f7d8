//! Data room store - collaborators around the pure engine
//!
//! Provides:
//! - Versioned JSON persistence of the whole state, falling back to the
//!   seeded state when the file is missing or unusable
//! - Blob storage for file bytes keyed by file id
//! - ZIP archive extraction into candidate files for import

pub mod archive;
pub mod atomic;
pub mod blob;
pub mod errors;
pub mod state_file;

// Re-export key types
pub use archive::{
    extract_zip, import_into_folder, ArchiveLimits, ExtractedFile, ImportReport, ImportedFile,
    SkippedFile,
};
pub use blob::{purge_orphans, BlobStore, FsBlobStore, MemoryBlobStore};
pub use errors::{Result, StoreError};
pub use state_file::{load_state, save_state, LoadSource, LoadedState};
