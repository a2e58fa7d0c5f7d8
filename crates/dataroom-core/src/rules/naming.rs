//! Name legality and duplicate detection
//!
//! All duplicate checks compare normalized names (trimmed, lower-cased), so
//! "Finance", " finance " and "FINANCE" cannot coexist as siblings. Folder
//! and file names are scoped independently.

use serde::{Deserialize, Serialize};

use crate::model::AggregateState;
use dataroom_core_types::{DataRoomId, FileId, FolderId};

/// Why a name was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameRejection {
    /// Empty after trimming
    Empty,
    /// "." or ".."
    Reserved,
}

impl NameRejection {
    pub fn code(&self) -> &'static str {
        match self {
            NameRejection::Empty => "empty",
            NameRejection::Reserved => "reserved",
        }
    }
}

impl std::fmt::Display for NameRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameRejection::Empty => write!(f, "name cannot be empty"),
            NameRejection::Reserved => write!(f, "'.' and '..' are reserved names"),
        }
    }
}

/// Validate a raw name and return its trimmed form
///
/// The same rule applies to data rooms, folders and files.
pub fn validate_name(raw: &str) -> Result<&str, NameRejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NameRejection::Empty);
    }
    if trimmed == "." || trimmed == ".." {
        return Err(NameRejection::Reserved);
    }
    Ok(trimmed)
}

/// The sole equality used for duplicate checks
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn names_equal(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}

/// Is another data room (other than `exclude`) already called `name`?
pub fn has_duplicate_data_room_name(
    state: &AggregateState,
    name: &str,
    exclude: Option<&DataRoomId>,
) -> bool {
    let wanted = normalize_name(name);
    state
        .data_rooms()
        .filter(|room| Some(&room.id) != exclude)
        .any(|room| normalize_name(&room.name) == wanted)
}

/// Is a child folder of `parent_folder_id` (other than `exclude`) already called `name`?
///
/// A missing parent has no children and therefore no duplicates.
pub fn has_duplicate_folder_name(
    state: &AggregateState,
    parent_folder_id: &FolderId,
    name: &str,
    exclude: Option<&FolderId>,
) -> bool {
    let Some(parent) = state.folder(parent_folder_id) else {
        return false;
    };
    let wanted = normalize_name(name);
    parent
        .child_folder_ids
        .iter()
        .filter(|id| Some(*id) != exclude)
        .filter_map(|id| state.folder(id))
        .any(|child| normalize_name(&child.name) == wanted)
}

/// Is a file in `parent_folder_id` (other than `exclude`) already called `name`?
pub fn has_duplicate_file_name(
    state: &AggregateState,
    parent_folder_id: &FolderId,
    name: &str,
    exclude: Option<&FileId>,
) -> bool {
    let Some(parent) = state.folder(parent_folder_id) else {
        return false;
    };
    let wanted = normalize_name(name);
    parent
        .file_ids
        .iter()
        .filter(|id| Some(*id) != exclude)
        .filter_map(|id| state.file(id))
        .any(|file| normalize_name(&file.name) == wanted)
}

/// First free file name in a folder, derived from `desired`
///
/// Returns `desired` (trimmed) when it is free, otherwise appends " (2)",
/// " (3)", ... before the extension: `report.pdf` becomes `report (2).pdf`.
pub fn unique_name_in_folder(state: &AggregateState, parent_folder_id: &FolderId, desired: &str) -> String {
    let desired = desired.trim();
    if !has_duplicate_file_name(state, parent_folder_id, desired, None) {
        return desired.to_string();
    }

    let (stem, extension) = match desired.rfind('.') {
        Some(idx) if idx > 0 => (&desired[..idx], &desired[idx..]),
        _ => (desired, ""),
    };

    (2usize..)
        .map(|n| format!("{} ({}){}", stem, n, extension))
        .find(|candidate| !has_duplicate_file_name(state, parent_folder_id, candidate, None))
        .unwrap_or_else(|| desired.to_string())
}
