use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use super::transition::{commit, elapsed_ms, purge};
use crate::errors::{DataRoomError, Result};
use crate::model::{AggregateState, Folder};
use crate::rules::naming::{has_duplicate_folder_name, normalize_name, validate_name};
use crate::traversal::{collect_subtree, is_descendant, SubtreeSummary};
use crate::{log_op_end, log_op_rejected, log_op_start};
use dataroom_core_types::{DataRoomId, FileId, FolderId};

/// Outcome of a cascading folder deletion
///
/// Counts are zero and `fallback_folder_id` is None when nothing was deleted;
/// `rejection` then says why.
#[derive(Debug, Clone)]
pub struct DeleteFolderResult {
    pub next_state: Arc<AggregateState>,
    pub deleted: bool,
    /// The deleted folder's parent, where the view should land
    pub fallback_folder_id: Option<FolderId>,
    pub deleted_folder_count: usize,
    pub deleted_file_count: usize,
    /// Ids whose blobs the caller should release
    pub deleted_file_ids: Vec<FileId>,
    pub rejection: Option<DataRoomError>,
}

fn lookup(state: &AggregateState, folder_id: &FolderId) -> Result<Folder> {
    state
        .folder(folder_id)
        .cloned()
        .ok_or_else(|| DataRoomError::FolderNotFound {
            folder_id: folder_id.clone(),
        })
}

/// Create a folder under `parent_folder_id` in `data_room_id`
pub fn create_folder(
    state: &Arc<AggregateState>,
    data_room_id: &DataRoomId,
    parent_folder_id: &FolderId,
    folder_id: &FolderId,
    name: &str,
    now: DateTime<Utc>,
) -> Arc<AggregateState> {
    let started = Instant::now();
    log_op_start!("create_folder", folder_id = %folder_id, parent_folder_id = %parent_folder_id);
    commit(
        "create_folder",
        state,
        started,
        try_create_folder(state, data_room_id, parent_folder_id, folder_id, name, now),
    )
}

/// # Errors
/// * `DataRoomNotFound` / `FolderNotFound` - room or parent missing
/// * `CrossRoom` - parent belongs to another room
/// * `InvalidName`
/// * `DuplicateFolderName` - a sibling folder has the same normalized name
/// * `IdAlreadyExists` - `folder_id` already used
pub fn try_create_folder(
    state: &AggregateState,
    data_room_id: &DataRoomId,
    parent_folder_id: &FolderId,
    folder_id: &FolderId,
    name: &str,
    now: DateTime<Utc>,
) -> Result<AggregateState> {
    if state.data_room(data_room_id).is_none() {
        return Err(DataRoomError::DataRoomNotFound {
            data_room_id: data_room_id.clone(),
        });
    }

    let parent = lookup(state, parent_folder_id)?;
    if &parent.data_room_id != data_room_id {
        return Err(DataRoomError::CrossRoom {
            folder_id: parent.id,
            expected: data_room_id.clone(),
            actual: parent.data_room_id,
        });
    }

    let name = validate_name(name).map_err(|reason| DataRoomError::InvalidName { reason })?;

    if has_duplicate_folder_name(state, parent_folder_id, name, None) {
        return Err(DataRoomError::DuplicateFolderName {
            parent_folder_id: parent_folder_id.clone(),
            name: name.to_string(),
        });
    }

    if state.folder(folder_id).is_some() {
        return Err(DataRoomError::IdAlreadyExists {
            entity_id: folder_id.to_string(),
        });
    }

    let mut next = state.clone();
    next.insert_folder(Folder::new_child(
        folder_id.clone(),
        data_room_id.clone(),
        parent_folder_id.clone(),
        name.to_string(),
        now,
    ));
    if let Some(parent) = next.folder_mut(parent_folder_id) {
        parent.attach_folder(folder_id.clone());
    }
    next.touch_data_room(data_room_id, now);

    Ok(next)
}

/// Rename a folder; root folders may be renamed too
pub fn rename_folder(
    state: &Arc<AggregateState>,
    folder_id: &FolderId,
    name: &str,
    now: DateTime<Utc>,
) -> Arc<AggregateState> {
    let started = Instant::now();
    log_op_start!("rename_folder", folder_id = %folder_id);
    commit(
        "rename_folder",
        state,
        started,
        try_rename_folder(state, folder_id, name, now),
    )
}

/// # Errors
/// * `FolderNotFound`
/// * `InvalidName`
/// * `NameUnchanged`
/// * `DuplicateFolderName`
pub fn try_rename_folder(
    state: &AggregateState,
    folder_id: &FolderId,
    name: &str,
    now: DateTime<Utc>,
) -> Result<AggregateState> {
    let folder = lookup(state, folder_id)?;
    let name = validate_name(name).map_err(|reason| DataRoomError::InvalidName { reason })?;

    if normalize_name(&folder.name) == normalize_name(name) {
        return Err(DataRoomError::NameUnchanged {
            entity_id: folder_id.to_string(),
        });
    }

    if let Some(parent_id) = &folder.parent_folder_id {
        if has_duplicate_folder_name(state, parent_id, name, Some(folder_id)) {
            return Err(DataRoomError::DuplicateFolderName {
                parent_folder_id: parent_id.clone(),
                name: name.to_string(),
            });
        }
    }

    let mut next = state.clone();
    if let Some(folder) = next.folder_mut(folder_id) {
        folder.name = name.to_string();
        folder.updated_at = now;
    }
    next.touch_data_room(&folder.data_room_id, now);

    Ok(next)
}

/// Move a folder (with its subtree) under `destination_folder_id`
pub fn move_folder(
    state: &Arc<AggregateState>,
    folder_id: &FolderId,
    destination_folder_id: &FolderId,
    now: DateTime<Utc>,
) -> Arc<AggregateState> {
    let started = Instant::now();
    log_op_start!(
        "move_folder",
        folder_id = %folder_id,
        destination_folder_id = %destination_folder_id
    );
    commit(
        "move_folder",
        state,
        started,
        try_move_folder(state, folder_id, destination_folder_id, now),
    )
}

/// # Errors
/// * `FolderNotFound` - folder or destination missing
/// * `RootFolderImmutable` - the folder has no parent
/// * `MoveIntoSelf`
/// * `AlreadyInDestination` - destination is the current parent
/// * `CrossRoom` - destination belongs to another room
/// * `MoveIntoDescendant` - destination is inside the folder
/// * `DuplicateFolderName` - destination already has a folder of that name
pub fn try_move_folder(
    state: &AggregateState,
    folder_id: &FolderId,
    destination_folder_id: &FolderId,
    now: DateTime<Utc>,
) -> Result<AggregateState> {
    let folder = lookup(state, folder_id)?;
    let destination = lookup(state, destination_folder_id)?;

    let Some(current_parent_id) = folder.parent_folder_id.clone() else {
        return Err(DataRoomError::RootFolderImmutable {
            folder_id: folder_id.clone(),
        });
    };

    if destination_folder_id == folder_id {
        return Err(DataRoomError::MoveIntoSelf {
            folder_id: folder_id.clone(),
        });
    }

    if destination_folder_id == &current_parent_id {
        return Err(DataRoomError::AlreadyInDestination {
            entity_id: folder_id.to_string(),
            destination_folder_id: destination_folder_id.clone(),
        });
    }

    if destination.data_room_id != folder.data_room_id {
        return Err(DataRoomError::CrossRoom {
            folder_id: destination.id,
            expected: folder.data_room_id,
            actual: destination.data_room_id,
        });
    }

    if is_descendant(state, destination_folder_id, folder_id) {
        return Err(DataRoomError::MoveIntoDescendant {
            folder_id: folder_id.clone(),
            destination_folder_id: destination_folder_id.clone(),
        });
    }

    if has_duplicate_folder_name(state, destination_folder_id, &folder.name, Some(folder_id)) {
        return Err(DataRoomError::DuplicateFolderName {
            parent_folder_id: destination_folder_id.clone(),
            name: folder.name,
        });
    }

    let mut next = state.clone();

    // Strip every reference to the moved folder, not only the old parent's,
    // so a drifted duplicate reference cannot survive the move.
    for holder in next.folders_by_id.values_mut() {
        if holder.detach_folder(folder_id) && holder.id != current_parent_id {
            tracing::warn!(
                folder_id = %folder_id,
                stale_holder_id = %holder.id,
                "removed stale child reference during move"
            );
        }
    }

    if let Some(destination) = next.folder_mut(destination_folder_id) {
        destination.attach_folder(folder_id.clone());
    }
    if let Some(moved) = next.folder_mut(folder_id) {
        moved.parent_folder_id = Some(destination_folder_id.clone());
        moved.updated_at = now;
    }
    next.touch_data_room(&folder.data_room_id, now);

    Ok(next)
}

/// What deleting a folder would remove, for confirmation dialogs
pub fn preview_folder_delete(state: &AggregateState, folder_id: &FolderId) -> Option<SubtreeSummary> {
    state
        .folder(folder_id)
        .map(|_| collect_subtree(state, folder_id))
}

/// Delete a folder together with its whole subtree
///
/// The root folder of a data room is never deleted.
pub fn delete_folder_cascade(
    state: &Arc<AggregateState>,
    folder_id: &FolderId,
    now: DateTime<Utc>,
) -> DeleteFolderResult {
    let started = Instant::now();
    log_op_start!("delete_folder_cascade", folder_id = %folder_id);

    match try_delete_folder_cascade(state, folder_id, now) {
        Ok((next, parent_id, scope)) => {
            let result = DeleteFolderResult {
                next_state: Arc::new(next),
                deleted: true,
                fallback_folder_id: Some(parent_id),
                deleted_folder_count: scope.folder_count(),
                deleted_file_count: scope.file_count(),
                deleted_file_ids: scope.file_ids.into_iter().collect(),
                rejection: None,
            };
            log_op_end!(
                "delete_folder_cascade",
                duration_ms = elapsed_ms(started),
                deleted_folders = result.deleted_folder_count,
                deleted_files = result.deleted_file_count
            );
            result
        }
        Err(err) => {
            log_op_rejected!("delete_folder_cascade", &err);
            DeleteFolderResult {
                next_state: Arc::clone(state),
                deleted: false,
                fallback_folder_id: None,
                deleted_folder_count: 0,
                deleted_file_count: 0,
                deleted_file_ids: Vec::new(),
                rejection: Some(err),
            }
        }
    }
}

/// Delete a folder's subtree, returning the new state, the parent id and
/// what was removed
///
/// # Errors
/// * `FolderNotFound` - folder or its parent missing
/// * `RootFolderImmutable` - the folder is a room root or has no parent
pub fn try_delete_folder_cascade(
    state: &AggregateState,
    folder_id: &FolderId,
    now: DateTime<Utc>,
) -> Result<(AggregateState, FolderId, SubtreeSummary)> {
    let folder = lookup(state, folder_id)?;

    let is_room_root = state
        .data_room(&folder.data_room_id)
        .is_some_and(|room| &room.root_folder_id == folder_id);
    let parent_id = match folder.parent_folder_id {
        Some(parent_id) if !is_room_root => parent_id,
        _ => {
            return Err(DataRoomError::RootFolderImmutable {
                folder_id: folder_id.clone(),
            })
        }
    };
    lookup(state, &parent_id)?;

    let mut scope = collect_subtree(state, folder_id);
    let mut next = state.clone();
    purge(&mut next, &mut scope);
    next.touch_data_room(&folder.data_room_id, now);

    Ok((next, parent_id, scope))
}
