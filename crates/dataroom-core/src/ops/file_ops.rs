use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use super::transition::commit;
use crate::errors::{DataRoomError, Result};
use crate::model::{AggregateState, FileNode, Folder};
use crate::rules::naming::{has_duplicate_file_name, normalize_name, validate_name};
use crate::log_op_start;
use dataroom_core_types::{FileId, FolderId};

fn lookup_file(state: &AggregateState, file_id: &FileId) -> Result<FileNode> {
    state
        .file(file_id)
        .cloned()
        .ok_or_else(|| DataRoomError::FileNotFound {
            file_id: file_id.clone(),
        })
}

fn lookup_folder<'a>(state: &'a AggregateState, folder_id: &FolderId) -> Result<&'a Folder> {
    state
        .folder(folder_id)
        .ok_or_else(|| DataRoomError::FolderNotFound {
            folder_id: folder_id.clone(),
        })
}

/// Create a file record in `parent_folder_id`
///
/// Only metadata is tracked here; bytes belong to the blob store.
pub fn create_file(
    state: &Arc<AggregateState>,
    parent_folder_id: &FolderId,
    file_id: &FileId,
    name: &str,
    size: u64,
    now: DateTime<Utc>,
) -> Arc<AggregateState> {
    let started = Instant::now();
    log_op_start!("create_file", file_id = %file_id, parent_folder_id = %parent_folder_id);
    commit(
        "create_file",
        state,
        started,
        try_create_file(state, parent_folder_id, file_id, name, size, now),
    )
}

/// # Errors
/// * `FolderNotFound` - parent missing
/// * `InvalidName`
/// * `DuplicateFileName`
/// * `IdAlreadyExists`
pub fn try_create_file(
    state: &AggregateState,
    parent_folder_id: &FolderId,
    file_id: &FileId,
    name: &str,
    size: u64,
    now: DateTime<Utc>,
) -> Result<AggregateState> {
    let parent = lookup_folder(state, parent_folder_id)?;
    let data_room_id = parent.data_room_id.clone();

    let name = validate_name(name).map_err(|reason| DataRoomError::InvalidName { reason })?;

    if has_duplicate_file_name(state, parent_folder_id, name, None) {
        return Err(DataRoomError::DuplicateFileName {
            parent_folder_id: parent_folder_id.clone(),
            name: name.to_string(),
        });
    }

    if state.file(file_id).is_some() {
        return Err(DataRoomError::IdAlreadyExists {
            entity_id: file_id.to_string(),
        });
    }

    let mut next = state.clone();
    next.insert_file(FileNode::new(
        file_id.clone(),
        parent_folder_id.clone(),
        name.to_string(),
        size,
        now,
    ));
    if let Some(parent) = next.folder_mut(parent_folder_id) {
        parent.attach_file(file_id.clone());
    }
    next.touch_data_room(&data_room_id, now);

    Ok(next)
}

pub fn rename_file(
    state: &Arc<AggregateState>,
    file_id: &FileId,
    name: &str,
    now: DateTime<Utc>,
) -> Arc<AggregateState> {
    let started = Instant::now();
    log_op_start!("rename_file", file_id = %file_id);
    commit(
        "rename_file",
        state,
        started,
        try_rename_file(state, file_id, name, now),
    )
}

/// # Errors
/// * `FileNotFound`
/// * `InvalidName`
/// * `NameUnchanged`
/// * `DuplicateFileName`
pub fn try_rename_file(
    state: &AggregateState,
    file_id: &FileId,
    name: &str,
    now: DateTime<Utc>,
) -> Result<AggregateState> {
    let file = lookup_file(state, file_id)?;
    let name = validate_name(name).map_err(|reason| DataRoomError::InvalidName { reason })?;

    if normalize_name(&file.name) == normalize_name(name) {
        return Err(DataRoomError::NameUnchanged {
            entity_id: file_id.to_string(),
        });
    }

    if has_duplicate_file_name(state, &file.parent_folder_id, name, Some(file_id)) {
        return Err(DataRoomError::DuplicateFileName {
            parent_folder_id: file.parent_folder_id,
            name: name.to_string(),
        });
    }

    let data_room_id = state.data_room_of_file(file_id).cloned();
    let mut next = state.clone();
    if let Some(file) = next.file_mut(file_id) {
        file.name = name.to_string();
        file.updated_at = now;
    }
    if let Some(data_room_id) = data_room_id {
        next.touch_data_room(&data_room_id, now);
    }

    Ok(next)
}

/// Delete a single file record
///
/// The caller releases the blob for `file_id` once this is not a no-op.
pub fn delete_file(
    state: &Arc<AggregateState>,
    file_id: &FileId,
    now: DateTime<Utc>,
) -> Arc<AggregateState> {
    let started = Instant::now();
    log_op_start!("delete_file", file_id = %file_id);
    commit(
        "delete_file",
        state,
        started,
        try_delete_file(state, file_id, now),
    )
}

/// # Errors
/// * `FileNotFound`
/// * `FolderNotFound` - the file's parent is missing
pub fn try_delete_file(
    state: &AggregateState,
    file_id: &FileId,
    now: DateTime<Utc>,
) -> Result<AggregateState> {
    let file = lookup_file(state, file_id)?;
    let data_room_id = lookup_folder(state, &file.parent_folder_id)?
        .data_room_id
        .clone();

    let mut next = state.clone();
    next.remove_file(file_id);
    if let Some(parent) = next.folder_mut(&file.parent_folder_id) {
        parent.detach_file(file_id);
    }
    next.touch_data_room(&data_room_id, now);

    Ok(next)
}

pub fn move_file(
    state: &Arc<AggregateState>,
    file_id: &FileId,
    destination_folder_id: &FolderId,
    now: DateTime<Utc>,
) -> Arc<AggregateState> {
    let started = Instant::now();
    log_op_start!(
        "move_file",
        file_id = %file_id,
        destination_folder_id = %destination_folder_id
    );
    commit(
        "move_file",
        state,
        started,
        try_move_file(state, file_id, destination_folder_id, now),
    )
}

/// # Errors
/// * `FileNotFound` / `FolderNotFound` - file, its parent or destination missing
/// * `AlreadyInDestination`
/// * `CrossRoom` - destination belongs to another room
/// * `DuplicateFileName` - destination already has a file of that name
pub fn try_move_file(
    state: &AggregateState,
    file_id: &FileId,
    destination_folder_id: &FolderId,
    now: DateTime<Utc>,
) -> Result<AggregateState> {
    let file = lookup_file(state, file_id)?;
    let destination = lookup_folder(state, destination_folder_id)?;
    let source = lookup_folder(state, &file.parent_folder_id)?;

    if destination_folder_id == &file.parent_folder_id {
        return Err(DataRoomError::AlreadyInDestination {
            entity_id: file_id.to_string(),
            destination_folder_id: destination_folder_id.clone(),
        });
    }

    if destination.data_room_id != source.data_room_id {
        return Err(DataRoomError::CrossRoom {
            folder_id: destination.id.clone(),
            expected: source.data_room_id.clone(),
            actual: destination.data_room_id.clone(),
        });
    }

    if has_duplicate_file_name(state, destination_folder_id, &file.name, Some(file_id)) {
        return Err(DataRoomError::DuplicateFileName {
            parent_folder_id: destination_folder_id.clone(),
            name: file.name,
        });
    }

    let data_room_id = source.data_room_id.clone();
    let mut next = state.clone();

    for holder in next.folders_by_id.values_mut() {
        if holder.detach_file(file_id) && holder.id != file.parent_folder_id {
            tracing::warn!(
                file_id = %file_id,
                stale_holder_id = %holder.id,
                "removed stale file reference during move"
            );
        }
    }

    if let Some(destination) = next.folder_mut(destination_folder_id) {
        destination.attach_file(file_id.clone());
    }
    if let Some(moved) = next.file_mut(file_id) {
        moved.parent_folder_id = destination_folder_id.clone();
        moved.updated_at = now;
    }
    next.touch_data_room(&data_room_id, now);

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{create_data_room, create_folder};
    use dataroom_core_types::DataRoomId;

    fn room() -> DataRoomId {
        DataRoomId::try_new("room").unwrap()
    }

    fn folder(id: &str) -> FolderId {
        FolderId::try_new(id).unwrap()
    }

    fn file(id: &str) -> FileId {
        FileId::try_new(id).unwrap()
    }

    fn base() -> Arc<AggregateState> {
        let now = Utc::now();
        let state = create_data_room(
            &Arc::new(AggregateState::new()),
            &room(),
            &folder("root"),
            "Data Room",
            now,
        );
        create_folder(&state, &room(), &folder("root"), &folder("a"), "A", now)
    }

    #[test]
    fn test_create_file_attaches_to_parent() {
        let state = create_file(&base(), &folder("a"), &file("f1"), "report.pdf", 42, Utc::now());
        assert_eq!(state.folder(&folder("a")).unwrap().file_ids, vec![file("f1")]);
        let created = state.file(&file("f1")).unwrap();
        assert_eq!(created.size, 42);
        assert_eq!(created.mime_type.as_str(), "application/pdf");
    }

    #[test]
    fn test_file_and_folder_names_do_not_collide() {
        let state = create_file(&base(), &folder("root"), &file("f1"), "A", 1, Utc::now());
        assert!(state.file(&file("f1")).is_some());
    }

    #[test]
    fn test_create_file_duplicate_name_is_noop() {
        let state = create_file(&base(), &folder("a"), &file("f1"), "report.pdf", 1, Utc::now());
        let next = create_file(&state, &folder("a"), &file("f2"), "REPORT.pdf ", 1, Utc::now());
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn test_rename_file_updates_timestamp() {
        let state = create_file(&base(), &folder("a"), &file("f1"), "a.pdf", 1, Utc::now());
        let later = Utc::now() + chrono::Duration::seconds(10);
        let next = rename_file(&state, &file("f1"), "b.pdf", later);
        let renamed = next.file(&file("f1")).unwrap();
        assert_eq!(renamed.name, "b.pdf");
        assert_eq!(renamed.updated_at, later);
        assert_eq!(next.data_room(&room()).unwrap().updated_at, later);
    }

    #[test]
    fn test_delete_file_detaches() {
        let state = create_file(&base(), &folder("a"), &file("f1"), "a.pdf", 1, Utc::now());
        let next = delete_file(&state, &file("f1"), Utc::now());
        assert!(next.file(&file("f1")).is_none());
        assert!(next.folder(&folder("a")).unwrap().file_ids.is_empty());
    }

    #[test]
    fn test_move_file_to_current_parent_rejected() {
        let state = create_file(&base(), &folder("a"), &file("f1"), "a.pdf", 1, Utc::now());
        let result = try_move_file(&state, &file("f1"), &folder("a"), Utc::now());
        assert!(matches!(
            result,
            Err(DataRoomError::AlreadyInDestination { .. })
        ));
    }

    #[test]
    fn test_move_file_relinks() {
        let state = create_file(&base(), &folder("a"), &file("f1"), "a.pdf", 1, Utc::now());
        let next = move_file(&state, &file("f1"), &folder("root"), Utc::now());
        assert_eq!(next.file(&file("f1")).unwrap().parent_folder_id, folder("root"));
        assert!(next.folder(&folder("a")).unwrap().file_ids.is_empty());
        assert_eq!(next.folder(&folder("root")).unwrap().file_ids, vec![file("f1")]);
    }
}
