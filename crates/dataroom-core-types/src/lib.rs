//! Core types shared across the data room crates
//!
//! This crate provides foundational types used by the engine, the store
//! collaborators and the CLI:
//!
//! - **Identifiers**: DataRoomId, FolderId, FileId and the selection-level NodeId
//! - **Schema constants**: Canonical field keys and event names for logging

pub mod ids;
pub mod schema;

pub use ids::{DataRoomId, FileId, FolderId, IdError, NodeId};
