//! Multi-item move normalization and validation
//!
//! One validator decides what is legal for every move surface: the folder
//! picker dialog, drop-target highlighting while dragging
//! ([`can_drop_on_folder`]) and the final commit ([`apply_move`]).

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::errors::DataRoomError;
use crate::model::AggregateState;
use crate::ops::file_ops::try_move_file;
use crate::ops::folder_ops::try_move_folder;
use crate::rules::naming::{has_duplicate_file_name, has_duplicate_folder_name, normalize_name};
use crate::traversal::{is_descendant, is_file_inside_folder};
use crate::{log_op_end, log_op_rejected, log_op_start};
use dataroom_core_types::{DataRoomId, FileId, FolderId, NodeId};

/// Why a batch move is not allowed, in a form a UI can render
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MoveRejection {
    #[error("No destination folder was chosen")]
    NoDestination,

    #[error("Destination folder not found: {folder_id}")]
    DestinationNotFound { folder_id: FolderId },

    #[error("Destination folder {folder_id} belongs to another data room")]
    DestinationOutsideRoom { folder_id: FolderId },

    #[error("Nothing to move")]
    NothingToMove,

    #[error("The root folder cannot be moved")]
    CannotMoveRoot { folder_id: FolderId },

    #[error("'{name}' cannot be moved into itself")]
    MoveIntoSelf { name: String },

    #[error("'{name}' is already in the destination folder")]
    AlreadyInDestination { name: String },

    #[error("'{name}' cannot be moved into one of its own subfolders")]
    MoveIntoDescendant { name: String },

    #[error("An item named '{name}' already exists in the destination folder")]
    NameConflict { name: String },

    #[error("More than one selected item is named '{name}'")]
    DuplicateInSelection { name: String },

    #[error("Move rejected: {0}")]
    EngineRejected(DataRoomError),
}

impl MoveRejection {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            MoveRejection::NoDestination => "no_destination",
            MoveRejection::DestinationNotFound { .. } => "destination_not_found",
            MoveRejection::DestinationOutsideRoom { .. } => "destination_outside_room",
            MoveRejection::NothingToMove => "nothing_to_move",
            MoveRejection::CannotMoveRoot { .. } => "cannot_move_root",
            MoveRejection::MoveIntoSelf { .. } => "move_into_self",
            MoveRejection::AlreadyInDestination { .. } => "already_in_destination",
            MoveRejection::MoveIntoDescendant { .. } => "move_into_descendant",
            MoveRejection::NameConflict { .. } => "name_conflict",
            MoveRejection::DuplicateInSelection { .. } => "duplicate_in_selection",
            MoveRejection::EngineRejected(_) => "engine_rejected",
        }
    }
}

/// Move candidates reduced to the items that must actually be moved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedSelection {
    /// Folders with no selected ancestor folder, in input order
    pub top_level_folder_ids: Vec<FolderId>,
    /// Files not inside any selected folder, in input order
    pub standalone_file_ids: Vec<FileId>,
    /// Display names of the items above, folders first
    pub item_names: Vec<String>,
}

impl NormalizedSelection {
    pub fn is_empty(&self) -> bool {
        self.top_level_folder_ids.is_empty() && self.standalone_file_ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.top_level_folder_ids.len() + self.standalone_file_ids.len()
    }
}

/// Reduce raw item ids to the actionable, ancestor-collapsed set
///
/// Duplicates, unknown ids, items from other rooms and root folders are
/// dropped. A folder nested in another selected folder, or a file inside a
/// selected folder, is dropped too since moving the ancestor carries it.
pub fn normalize_selection(
    state: &AggregateState,
    item_ids: &[NodeId],
    data_room_id: &DataRoomId,
) -> NormalizedSelection {
    let mut seen = HashSet::new();
    let mut folders = Vec::new();
    let mut files = Vec::new();

    for item in item_ids {
        if !seen.insert(item) {
            continue;
        }
        match item {
            NodeId::Folder(id) => {
                let actionable = state.folder(id).is_some_and(|folder| {
                    &folder.data_room_id == data_room_id && folder.parent_folder_id.is_some()
                });
                if actionable {
                    folders.push(id.clone());
                }
            }
            NodeId::File(id) => {
                if state.data_room_of_file(id) == Some(data_room_id) {
                    files.push(id.clone());
                }
            }
        }
    }

    let top_level_folder_ids: Vec<FolderId> = folders
        .iter()
        .filter(|id| {
            !folders
                .iter()
                .any(|other| other != *id && is_descendant(state, id, other))
        })
        .cloned()
        .collect();

    let standalone_file_ids: Vec<FileId> = files
        .into_iter()
        .filter(|file_id| {
            !top_level_folder_ids
                .iter()
                .any(|folder_id| is_file_inside_folder(state, file_id, folder_id))
        })
        .collect();

    let item_names = top_level_folder_ids
        .iter()
        .filter_map(|id| state.folder(id).map(|folder| folder.name.clone()))
        .chain(
            standalone_file_ids
                .iter()
                .filter_map(|id| state.file(id).map(|file| file.name.clone())),
        )
        .collect();

    NormalizedSelection {
        top_level_folder_ids,
        standalone_file_ids,
        item_names,
    }
}

/// Check a batch move and return the normalized items when it is legal
///
/// # Errors
///
/// Returns the first violation found, checking the destination first, then
/// each folder, then each file, then name clashes inside the batch.
pub fn validate_move(
    state: &AggregateState,
    item_ids: &[NodeId],
    data_room_id: &DataRoomId,
    destination_folder_id: Option<&FolderId>,
) -> Result<NormalizedSelection, MoveRejection> {
    let destination_id = destination_folder_id.ok_or(MoveRejection::NoDestination)?;
    let destination = state
        .folder(destination_id)
        .ok_or_else(|| MoveRejection::DestinationNotFound {
            folder_id: destination_id.clone(),
        })?;
    if &destination.data_room_id != data_room_id {
        return Err(MoveRejection::DestinationOutsideRoom {
            folder_id: destination_id.clone(),
        });
    }

    // Roots are not actionable, so look for them before normalizing drops them
    for item in item_ids {
        if let NodeId::Folder(id) = item {
            if let Some(folder) = state.folder(id) {
                if &folder.data_room_id == data_room_id && folder.parent_folder_id.is_none() {
                    return Err(MoveRejection::CannotMoveRoot {
                        folder_id: id.clone(),
                    });
                }
            }
        }
    }

    let selection = normalize_selection(state, item_ids, data_room_id);
    if selection.is_empty() {
        return Err(MoveRejection::NothingToMove);
    }

    for folder_id in &selection.top_level_folder_ids {
        let Some(folder) = state.folder(folder_id) else {
            continue;
        };
        let name = folder.name.clone();
        if folder_id == destination_id {
            return Err(MoveRejection::MoveIntoSelf { name });
        }
        if folder.parent_folder_id.as_ref() == Some(destination_id) {
            return Err(MoveRejection::AlreadyInDestination { name });
        }
        if is_descendant(state, destination_id, folder_id) {
            return Err(MoveRejection::MoveIntoDescendant { name });
        }
        if has_duplicate_folder_name(state, destination_id, &folder.name, Some(folder_id)) {
            return Err(MoveRejection::NameConflict { name });
        }
    }

    for file_id in &selection.standalone_file_ids {
        let Some(file) = state.file(file_id) else {
            continue;
        };
        let name = file.name.clone();
        if &file.parent_folder_id == destination_id {
            return Err(MoveRejection::AlreadyInDestination { name });
        }
        if has_duplicate_file_name(state, destination_id, &file.name, Some(file_id)) {
            return Err(MoveRejection::NameConflict { name });
        }
    }

    let mut folder_names = HashSet::new();
    for folder in selection
        .top_level_folder_ids
        .iter()
        .filter_map(|id| state.folder(id))
    {
        if !folder_names.insert(normalize_name(&folder.name)) {
            return Err(MoveRejection::DuplicateInSelection {
                name: folder.name.clone(),
            });
        }
    }
    let mut file_names = HashSet::new();
    for file in selection
        .standalone_file_ids
        .iter()
        .filter_map(|id| state.file(id))
    {
        if !file_names.insert(normalize_name(&file.name)) {
            return Err(MoveRejection::DuplicateInSelection {
                name: file.name.clone(),
            });
        }
    }

    Ok(selection)
}

/// Whether dragged items may be dropped on `folder_id`
pub fn can_drop_on_folder(
    state: &AggregateState,
    item_ids: &[NodeId],
    data_room_id: &DataRoomId,
    folder_id: &FolderId,
) -> bool {
    validate_move(state, item_ids, data_room_id, Some(folder_id)).is_ok()
}

/// Result of a committed batch move
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    pub next_state: Arc<AggregateState>,
    pub moved_folders: Vec<FolderId>,
    pub moved_files: Vec<FileId>,
}

/// Validate and apply a batch move as one transition
///
/// Either every normalized item moves or the state is left untouched.
///
/// # Errors
///
/// Returns the validator's rejection, or `EngineRejected` if a single move
/// fails after validation passed.
pub fn apply_move(
    state: &Arc<AggregateState>,
    item_ids: &[NodeId],
    data_room_id: &DataRoomId,
    destination_folder_id: Option<&FolderId>,
    now: DateTime<Utc>,
) -> Result<MoveOutcome, MoveRejection> {
    let started = Instant::now();
    log_op_start!("move_items", data_room_id = %data_room_id, items = item_ids.len());

    let selection = match validate_move(state, item_ids, data_room_id, destination_folder_id) {
        Ok(selection) => selection,
        Err(rejection) => {
            tracing::debug!(
                op = "move_items",
                event = dataroom_core_types::schema::EVENT_REJECTED,
                reason = rejection.code(),
                "{}",
                rejection
            );
            return Err(rejection);
        }
    };
    let destination_id = destination_folder_id.ok_or(MoveRejection::NoDestination)?;

    let mut next = AggregateState::clone(state);
    for folder_id in &selection.top_level_folder_ids {
        next = try_move_folder(&next, folder_id, destination_id, now).map_err(|err| {
            log_op_rejected!("move_items", &err);
            MoveRejection::EngineRejected(err)
        })?;
    }
    for file_id in &selection.standalone_file_ids {
        next = try_move_file(&next, file_id, destination_id, now).map_err(|err| {
            log_op_rejected!("move_items", &err);
            MoveRejection::EngineRejected(err)
        })?;
    }

    log_op_end!(
        "move_items",
        duration_ms = crate::ops::elapsed_ms(started),
        moved = selection.len()
    );

    Ok(MoveOutcome {
        next_state: Arc::new(next),
        moved_folders: selection.top_level_folder_ids,
        moved_files: selection.standalone_file_ids,
    })
}
