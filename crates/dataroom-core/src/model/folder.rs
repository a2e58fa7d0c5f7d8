use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dataroom_core_types::{DataRoomId, FileId, FolderId};

/// Folder - a named container of folders and files
///
/// The tree is kept as a two-way linkage: each folder points at its parent
/// and lists its children. `child_folder_ids` and `file_ids` are kept in
/// insertion order; display order is decided by the view layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,

    /// Owning data room (immutable)
    pub data_room_id: DataRoomId,

    /// None only for a data room's root folder
    pub parent_folder_id: Option<FolderId>,

    pub name: String,
    pub child_folder_ids: Vec<FolderId>,
    pub file_ids: Vec<FileId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Create the root folder of a data room
    pub fn new_root(
        id: FolderId,
        data_room_id: DataRoomId,
        name: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            data_room_id,
            parent_folder_id: None,
            name,
            child_folder_ids: Vec::new(),
            file_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a folder beneath `parent_folder_id`
    pub fn new_child(
        id: FolderId,
        data_room_id: DataRoomId,
        parent_folder_id: FolderId,
        name: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            parent_folder_id: Some(parent_folder_id),
            ..Self::new_root(id, data_room_id, name, now)
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_folder_id.is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.child_folder_ids.is_empty() && self.file_ids.is_empty()
    }

    pub(crate) fn attach_folder(&mut self, folder_id: FolderId) {
        if !self.child_folder_ids.contains(&folder_id) {
            self.child_folder_ids.push(folder_id);
        }
    }

    /// Remove every occurrence of `folder_id`; returns whether any was present
    pub(crate) fn detach_folder(&mut self, folder_id: &FolderId) -> bool {
        let before = self.child_folder_ids.len();
        self.child_folder_ids.retain(|id| id != folder_id);
        self.child_folder_ids.len() != before
    }

    pub(crate) fn attach_file(&mut self, file_id: FileId) {
        if !self.file_ids.contains(&file_id) {
            self.file_ids.push(file_id);
        }
    }

    pub(crate) fn detach_file(&mut self, file_id: &FileId) -> bool {
        let before = self.file_ids.len();
        self.file_ids.retain(|id| id != file_id);
        self.file_ids.len() != before
    }
}
