//! Invariant scanners over the aggregate state
//!
//! Each scanner reports every violation of one invariant. `validation`
//! combines them into a single pass/fail check.

use std::collections::{HashMap, HashSet};

use super::naming::normalize_name;
use crate::model::AggregateState;
use dataroom_core_types::{DataRoomId, FileId, FolderId};

/// Check if a folder's parent chain loops back on itself
pub fn has_cycle(state: &AggregateState, folder_id: &FolderId) -> bool {
    let mut visited = HashSet::new();
    let mut current = Some(folder_id);

    while let Some(id) = current {
        if !visited.insert(id) {
            return true;
        }
        current = state
            .folder(id)
            .and_then(|folder| folder.parent_folder_id.as_ref());
    }

    false
}

/// Room ids that are duplicated in the order list, listed without a room,
/// or stored without being listed
pub fn find_order_mismatches(state: &AggregateState) -> Vec<DataRoomId> {
    let mut mismatches = Vec::new();
    let mut seen = HashSet::new();

    for id in state.data_room_order() {
        if !seen.insert(id) || state.data_room(id).is_none() {
            mismatches.push(id.clone());
        }
    }
    for room in state.data_rooms_by_id.values() {
        if !seen.contains(&room.id) {
            mismatches.push(room.id.clone());
        }
    }

    mismatches
}

/// Rooms whose root folder is missing, has a parent, or belongs elsewhere
///
/// Returns list of (data_room_id, root_folder_id) tuples
pub fn find_invalid_roots(state: &AggregateState) -> Vec<(DataRoomId, FolderId)> {
    state
        .data_rooms_by_id
        .values()
        .filter(|room| match state.folder(&room.root_folder_id) {
            Some(root) => !root.is_root() || root.data_room_id != room.id,
            None => true,
        })
        .map(|room| (room.id.clone(), room.root_folder_id.clone()))
        .collect()
}

/// Parent-less folders that are not their room's designated root
///
/// Returns list of (folder_id, data_room_id) tuples
pub fn find_extra_roots(state: &AggregateState) -> Vec<(FolderId, DataRoomId)> {
    state
        .folders()
        .filter(|folder| folder.is_root())
        .filter(|folder| {
            state
                .data_room(&folder.data_room_id)
                .is_some_and(|room| room.root_folder_id != folder.id)
        })
        .map(|folder| (folder.id.clone(), folder.data_room_id.clone()))
        .collect()
}

/// Folders whose owning data room does not exist
pub fn find_folders_in_unknown_rooms(state: &AggregateState) -> Vec<(FolderId, DataRoomId)> {
    state
        .folders()
        .filter(|folder| state.data_room(&folder.data_room_id).is_none())
        .map(|folder| (folder.id.clone(), folder.data_room_id.clone()))
        .collect()
}

/// Folders whose parent pointer references a missing folder
///
/// Returns list of (folder_id, parent_folder_id) tuples
pub fn find_orphaned_folders(state: &AggregateState) -> Vec<(FolderId, FolderId)> {
    state
        .folders()
        .filter_map(|folder| {
            let parent_id = folder.parent_folder_id.as_ref()?;
            state
                .folder(parent_id)
                .is_none()
                .then(|| (folder.id.clone(), parent_id.clone()))
        })
        .collect()
}

/// Files whose parent folder is missing
///
/// Returns list of (file_id, parent_folder_id) tuples
pub fn find_orphaned_files(state: &AggregateState) -> Vec<(FileId, FolderId)> {
    state
        .files()
        .filter(|file| state.folder(&file.parent_folder_id).is_none())
        .map(|file| (file.id.clone(), file.parent_folder_id.clone()))
        .collect()
}

/// Folders whose data room differs from their parent's
///
/// Returns list of (folder_id, expected_room, actual_room) tuples
pub fn find_cross_room_folders(state: &AggregateState) -> Vec<(FolderId, DataRoomId, DataRoomId)> {
    state
        .folders()
        .filter_map(|folder| {
            let parent = state.folder(folder.parent_folder_id.as_ref()?)?;
            (parent.data_room_id != folder.data_room_id).then(|| {
                (
                    folder.id.clone(),
                    parent.data_room_id.clone(),
                    folder.data_room_id.clone(),
                )
            })
        })
        .collect()
}

/// Disagreements between child lists and parent pointers, in both directions
///
/// Returns list of (folder_id, child_id) tuples: either the folder lists a
/// child that does not point back, or a child points at the folder without
/// being listed.
pub fn find_child_list_mismatches(state: &AggregateState) -> Vec<(FolderId, String)> {
    let mut mismatches = Vec::new();

    for folder in state.folders() {
        for child_id in &folder.child_folder_ids {
            let points_back = state
                .folder(child_id)
                .is_some_and(|child| child.parent_folder_id.as_ref() == Some(&folder.id));
            if !points_back {
                mismatches.push((folder.id.clone(), child_id.to_string()));
            }
        }
        for file_id in &folder.file_ids {
            let points_back = state
                .file(file_id)
                .is_some_and(|file| file.parent_folder_id == folder.id);
            if !points_back {
                mismatches.push((folder.id.clone(), file_id.to_string()));
            }
        }
    }

    for child in state.folders() {
        if let Some(parent) = child
            .parent_folder_id
            .as_ref()
            .and_then(|id| state.folder(id))
        {
            if !parent.child_folder_ids.contains(&child.id) {
                mismatches.push((parent.id.clone(), child.id.to_string()));
            }
        }
    }
    for file in state.files() {
        if let Some(parent) = state.folder(&file.parent_folder_id) {
            if !parent.file_ids.contains(&file.id) {
                mismatches.push((parent.id.clone(), file.id.to_string()));
            }
        }
    }

    mismatches
}

/// Child ids listed more than once by the same folder
pub fn find_duplicate_child_references(state: &AggregateState) -> Vec<(FolderId, String)> {
    let mut duplicates = Vec::new();

    for folder in state.folders() {
        let mut seen_folders = HashSet::new();
        for id in &folder.child_folder_ids {
            if !seen_folders.insert(id) {
                duplicates.push((folder.id.clone(), id.to_string()));
            }
        }
        let mut seen_files = HashSet::new();
        for id in &folder.file_ids {
            if !seen_files.insert(id) {
                duplicates.push((folder.id.clone(), id.to_string()));
            }
        }
    }

    duplicates
}

/// Sibling folders or sibling files sharing a normalized name
///
/// Returns list of (parent_folder_id, normalized_name) tuples
pub fn find_duplicate_sibling_names(state: &AggregateState) -> Vec<(FolderId, String)> {
    let mut duplicates = Vec::new();

    for folder in state.folders() {
        let mut folder_names: HashMap<String, usize> = HashMap::new();
        for child in folder.child_folder_ids.iter().filter_map(|id| state.folder(id)) {
            *folder_names.entry(normalize_name(&child.name)).or_insert(0) += 1;
        }
        let mut file_names: HashMap<String, usize> = HashMap::new();
        for file in folder.file_ids.iter().filter_map(|id| state.file(id)) {
            *file_names.entry(normalize_name(&file.name)).or_insert(0) += 1;
        }

        let mut names: Vec<String> = folder_names
            .into_iter()
            .chain(file_names)
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name)
            .collect();
        names.sort();
        duplicates.extend(names.into_iter().map(|name| (folder.id.clone(), name)));
    }

    duplicates
}
