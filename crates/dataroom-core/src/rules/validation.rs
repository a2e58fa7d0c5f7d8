use crate::errors::{DataRoomError, Result};
use crate::model::{AggregateState, CURRENT_SCHEMA_VERSION};

use super::invariants;

/// Validate the whole aggregate state
///
/// Runs every invariant scanner and returns the first violation found:
///
/// 1. Schema version matches this build
/// 2. Data room order lists each stored room exactly once
/// 3. Each room's root folder exists, is parent-less and belongs to the room
/// 4. No other parent-less folders; every folder's room exists
/// 5. No orphaned folders or files
/// 6. Parent chains are acyclic and stay within one room
/// 7. Child lists agree with parent pointers and hold each id once
/// 8. Sibling names are unique after normalization
///
/// # Errors
/// Returns the first violation encountered. For exhaustive reporting, call
/// the individual scanners in `invariants` directly.
pub fn validate_state(state: &AggregateState) -> Result<()> {
    if state.schema_version() != CURRENT_SCHEMA_VERSION {
        return Err(DataRoomError::SchemaVersionMismatch {
            found: state.schema_version(),
            expected: CURRENT_SCHEMA_VERSION,
        });
    }

    if let Some(data_room_id) = invariants::find_order_mismatches(state).into_iter().next() {
        return Err(DataRoomError::DataRoomOrderMismatch { data_room_id });
    }

    if let Some((data_room_id, root_folder_id)) =
        invariants::find_invalid_roots(state).into_iter().next()
    {
        return Err(DataRoomError::InvalidRootFolder {
            data_room_id,
            root_folder_id,
        });
    }

    if let Some((folder_id, data_room_id)) =
        invariants::find_folders_in_unknown_rooms(state).into_iter().next()
    {
        return Err(DataRoomError::FolderInUnknownRoom {
            folder_id,
            data_room_id,
        });
    }

    if let Some((folder_id, data_room_id)) = invariants::find_extra_roots(state).into_iter().next() {
        return Err(DataRoomError::ExtraRootFolder {
            folder_id,
            data_room_id,
        });
    }

    if let Some((folder_id, parent_folder_id)) =
        invariants::find_orphaned_folders(state).into_iter().next()
    {
        return Err(DataRoomError::OrphanedFolder {
            folder_id,
            parent_folder_id,
        });
    }

    if let Some((file_id, parent_folder_id)) =
        invariants::find_orphaned_files(state).into_iter().next()
    {
        return Err(DataRoomError::OrphanedFile {
            file_id,
            parent_folder_id,
        });
    }

    for folder in state.folders() {
        if invariants::has_cycle(state, &folder.id) {
            return Err(DataRoomError::CycleDetected {
                folder_id: folder.id.clone(),
            });
        }
    }

    if let Some((folder_id, expected, actual)) =
        invariants::find_cross_room_folders(state).into_iter().next()
    {
        return Err(DataRoomError::CrossRoom {
            folder_id,
            expected,
            actual,
        });
    }

    if let Some((folder_id, child_id)) =
        invariants::find_duplicate_child_references(state).into_iter().next()
    {
        return Err(DataRoomError::DuplicateChildReference {
            folder_id,
            child_id,
        });
    }

    if let Some((folder_id, child_id)) =
        invariants::find_child_list_mismatches(state).into_iter().next()
    {
        return Err(DataRoomError::ChildListMismatch {
            folder_id,
            child_id,
        });
    }

    if let Some((folder_id, name)) = invariants::find_duplicate_sibling_names(state).into_iter().next()
    {
        return Err(DataRoomError::DuplicateSiblingName { folder_id, name });
    }

    Ok(())
}
