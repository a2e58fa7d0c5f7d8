//! Data room core - pure tree mutation and validation engine
//!
//! This crate provides the in-memory model and the state transitions for a
//! virtual filesystem of data rooms, folders and files:
//! - Entity model and the aggregate state that exclusively owns it
//! - Name validation and case/whitespace-insensitive duplicate detection
//! - Cycle-safe ancestry walks and cascading subtree collection
//! - One pure transition per mutation (create/rename/move/delete)
//! - Selection engine with sparse include/exclude marks and tri-state folders
//! - Multi-item move normalization and validation
//!
//! No function in this crate performs I/O. Callers supply identifiers and
//! timestamps; every mutation returns a new state or the unchanged input.

pub mod apply;
pub mod commands;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod moves;
pub mod ops;
pub mod rules;
pub mod seed;
pub mod selection;
pub mod traversal;
pub mod view;

// Re-export commonly used types
pub use apply::{apply, Outcome};
pub use commands::Command;
pub use dataroom_core_types::{DataRoomId, FileId, FolderId, NodeId};
pub use errors::{DataRoomError, ExError, ExErrorKind, Result};
pub use model::{AggregateState, DataRoom, FileNode, Folder, MimeType};
pub use moves::{MoveRejection, NormalizedSelection};
pub use selection::{Mark, SelectionMarks, SelectionMode, SelectionSnapshot};
pub use view::ViewConfig;
