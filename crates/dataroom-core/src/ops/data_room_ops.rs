use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use super::transition::{commit, elapsed_ms, purge};
use crate::errors::{DataRoomError, Result};
use crate::model::{AggregateState, DataRoom, Folder};
use crate::rules::naming::{has_duplicate_data_room_name, normalize_name, validate_name};
use crate::traversal::{collect_subtree, SubtreeSummary};
use crate::{log_op_end, log_op_rejected, log_op_start};
use dataroom_core_types::{DataRoomId, FileId, FolderId};

/// Outcome of a data room deletion
///
/// Returned whether or not the deletion happened so the caller can message
/// the user and move the view to `fallback_data_room_id`.
#[derive(Debug, Clone)]
pub struct DeleteDataRoomResult {
    pub next_state: Arc<AggregateState>,
    pub deleted: bool,
    /// First remaining data room in display order, if any
    pub fallback_data_room_id: Option<DataRoomId>,
    pub deleted_folder_count: usize,
    pub deleted_file_count: usize,
    /// Ids whose blobs the caller should release
    pub deleted_file_ids: Vec<FileId>,
    pub rejection: Option<DataRoomError>,
}

/// Create a data room together with its root folder
///
/// The root folder takes the room's name. Returns the input state unchanged
/// when the name is illegal or taken, or when either id is already in use.
pub fn create_data_room(
    state: &Arc<AggregateState>,
    data_room_id: &DataRoomId,
    root_folder_id: &FolderId,
    name: &str,
    now: DateTime<Utc>,
) -> Arc<AggregateState> {
    let started = Instant::now();
    log_op_start!("create_data_room", data_room_id = %data_room_id);
    commit(
        "create_data_room",
        state,
        started,
        try_create_data_room(state, data_room_id, root_folder_id, name, now),
    )
}

/// Create a data room, reporting why it was refused
///
/// # Errors
/// * `InvalidName` - name empty or reserved
/// * `DuplicateDataRoomName` - another room has the same normalized name
/// * `IdAlreadyExists` - room id or root folder id already used
pub fn try_create_data_room(
    state: &AggregateState,
    data_room_id: &DataRoomId,
    root_folder_id: &FolderId,
    name: &str,
    now: DateTime<Utc>,
) -> Result<AggregateState> {
    let name = validate_name(name).map_err(|reason| DataRoomError::InvalidName { reason })?;

    if has_duplicate_data_room_name(state, name, None) {
        return Err(DataRoomError::DuplicateDataRoomName {
            name: name.to_string(),
        });
    }

    if state.data_room(data_room_id).is_some() || state.data_room_order().contains(data_room_id) {
        return Err(DataRoomError::IdAlreadyExists {
            entity_id: data_room_id.to_string(),
        });
    }
    if state.folder(root_folder_id).is_some() {
        return Err(DataRoomError::IdAlreadyExists {
            entity_id: root_folder_id.to_string(),
        });
    }

    let mut next = state.clone();
    next.insert_folder(Folder::new_root(
        root_folder_id.clone(),
        data_room_id.clone(),
        name.to_string(),
        now,
    ));
    next.insert_data_room(DataRoom::new(
        data_room_id.clone(),
        name.to_string(),
        root_folder_id.clone(),
        now,
    ));
    next.push_data_room_order(data_room_id.clone());

    Ok(next)
}

/// Rename a data room
///
/// A rename whose normalized form equals the current name is a no-op.
pub fn rename_data_room(
    state: &Arc<AggregateState>,
    data_room_id: &DataRoomId,
    name: &str,
    now: DateTime<Utc>,
) -> Arc<AggregateState> {
    let started = Instant::now();
    log_op_start!("rename_data_room", data_room_id = %data_room_id);
    commit(
        "rename_data_room",
        state,
        started,
        try_rename_data_room(state, data_room_id, name, now),
    )
}

/// # Errors
/// * `DataRoomNotFound`
/// * `InvalidName`
/// * `NameUnchanged` - normalized name is the same as before
/// * `DuplicateDataRoomName`
pub fn try_rename_data_room(
    state: &AggregateState,
    data_room_id: &DataRoomId,
    name: &str,
    now: DateTime<Utc>,
) -> Result<AggregateState> {
    let room = state
        .data_room(data_room_id)
        .ok_or_else(|| DataRoomError::DataRoomNotFound {
            data_room_id: data_room_id.clone(),
        })?;

    let name = validate_name(name).map_err(|reason| DataRoomError::InvalidName { reason })?;

    if normalize_name(&room.name) == normalize_name(name) {
        return Err(DataRoomError::NameUnchanged {
            entity_id: data_room_id.to_string(),
        });
    }

    if has_duplicate_data_room_name(state, name, Some(data_room_id)) {
        return Err(DataRoomError::DuplicateDataRoomName {
            name: name.to_string(),
        });
    }

    let mut next = state.clone();
    if let Some(room) = next.data_room_mut(data_room_id) {
        room.name = name.to_string();
        room.updated_at = now;
    }

    Ok(next)
}

/// Everything a data room owns: its root subtree plus any folder that still
/// claims the room without being reachable from the root
fn data_room_scope(state: &AggregateState, room: &DataRoom) -> SubtreeSummary {
    let mut scope = collect_subtree(state, &room.root_folder_id);
    let unreachable: Vec<_> = state
        .folders()
        .filter(|folder| folder.data_room_id == room.id)
        .filter(|folder| !scope.folder_ids.contains(&folder.id))
        .map(|folder| folder.id.clone())
        .collect();
    for folder_id in unreachable {
        scope.merge(collect_subtree(state, &folder_id));
    }
    scope
}

/// What deleting a data room would remove, for confirmation dialogs
pub fn preview_data_room_delete(
    state: &AggregateState,
    data_room_id: &DataRoomId,
) -> Option<SubtreeSummary> {
    state
        .data_room(data_room_id)
        .map(|room| data_room_scope(state, room))
}

/// Delete a data room with every folder and file it owns
///
/// The fallback room is the first room left in display order.
pub fn delete_data_room(
    state: &Arc<AggregateState>,
    data_room_id: &DataRoomId,
) -> DeleteDataRoomResult {
    let started = Instant::now();
    log_op_start!("delete_data_room", data_room_id = %data_room_id);

    match try_delete_data_room(state, data_room_id) {
        Ok((next, scope)) => {
            let result = DeleteDataRoomResult {
                fallback_data_room_id: next.data_room_order().first().cloned(),
                next_state: Arc::new(next),
                deleted: true,
                deleted_folder_count: scope.folder_count(),
                deleted_file_count: scope.file_count(),
                deleted_file_ids: scope.file_ids.into_iter().collect(),
                rejection: None,
            };
            log_op_end!(
                "delete_data_room",
                duration_ms = elapsed_ms(started),
                deleted_folders = result.deleted_folder_count,
                deleted_files = result.deleted_file_count
            );
            result
        }
        Err(err) => {
            log_op_rejected!("delete_data_room", &err);
            DeleteDataRoomResult {
                next_state: Arc::clone(state),
                deleted: false,
                fallback_data_room_id: state.data_room_order().first().cloned(),
                deleted_folder_count: 0,
                deleted_file_count: 0,
                deleted_file_ids: Vec::new(),
                rejection: Some(err),
            }
        }
    }
}

/// # Errors
/// * `DataRoomNotFound`
pub fn try_delete_data_room(
    state: &AggregateState,
    data_room_id: &DataRoomId,
) -> Result<(AggregateState, SubtreeSummary)> {
    let room = state
        .data_room(data_room_id)
        .ok_or_else(|| DataRoomError::DataRoomNotFound {
            data_room_id: data_room_id.clone(),
        })?;

    let mut scope = data_room_scope(state, room);
    let mut next = state.clone();
    purge(&mut next, &mut scope);
    next.remove_data_room(data_room_id);

    Ok((next, scope))
}
