use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DataRoom, FileNode, Folder};
use dataroom_core_types::{DataRoomId, FileId, FolderId};

/// Version of the aggregate layout; persisted blobs with another version are
/// discarded by the store.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// The aggregate state: sole owner of every data room, folder and file
///
/// Entities are kept in flat id-keyed maps (an arena) with the parent/child
/// linkage expressed through ids. Maps are ordered so serialization and
/// iteration are deterministic. Data room display order is `data_room_order`.
///
/// Not thread-safe by itself; mutations produce new values (see `ops`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateState {
    pub(crate) schema_version: u32,
    pub(crate) data_room_order: Vec<DataRoomId>,
    pub(crate) data_rooms_by_id: BTreeMap<DataRoomId, DataRoom>,
    pub(crate) folders_by_id: BTreeMap<FolderId, Folder>,
    pub(crate) files_by_id: BTreeMap<FileId, FileNode>,
}

impl Default for AggregateState {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateState {
    /// Create an empty state at the current schema version
    pub fn new() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            data_room_order: Vec::new(),
            data_rooms_by_id: BTreeMap::new(),
            folders_by_id: BTreeMap::new(),
            files_by_id: BTreeMap::new(),
        }
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    pub fn data_room(&self, id: &DataRoomId) -> Option<&DataRoom> {
        self.data_rooms_by_id.get(id)
    }

    pub fn folder(&self, id: &FolderId) -> Option<&Folder> {
        self.folders_by_id.get(id)
    }

    pub fn file(&self, id: &FileId) -> Option<&FileNode> {
        self.files_by_id.get(id)
    }

    /// Data room ids in display order
    pub fn data_room_order(&self) -> &[DataRoomId] {
        &self.data_room_order
    }

    /// Data rooms in display order, skipping order entries with no room
    pub fn data_rooms(&self) -> impl Iterator<Item = &DataRoom> {
        self.data_room_order
            .iter()
            .filter_map(|id| self.data_rooms_by_id.get(id))
    }

    pub fn folders(&self) -> impl Iterator<Item = &Folder> {
        self.folders_by_id.values()
    }

    pub fn files(&self) -> impl Iterator<Item = &FileNode> {
        self.files_by_id.values()
    }

    pub fn folder_count(&self) -> usize {
        self.folders_by_id.len()
    }

    pub fn file_count(&self) -> usize {
        self.files_by_id.len()
    }

    /// Root folder of a data room, if both exist
    pub fn root_folder(&self, data_room_id: &DataRoomId) -> Option<&Folder> {
        self.data_room(data_room_id)
            .and_then(|room| self.folder(&room.root_folder_id))
    }

    /// Data room owning a file, resolved through its parent folder
    pub fn data_room_of_file(&self, file_id: &FileId) -> Option<&DataRoomId> {
        self.file(file_id)
            .and_then(|file| self.folder(&file.parent_folder_id))
            .map(|folder| &folder.data_room_id)
    }

    /// Insert a data room without validation and without touching the order
    ///
    /// Intended for fixtures and for the store when hydrating state. Engine
    /// mutations go through `ops`.
    pub fn insert_data_room(&mut self, room: DataRoom) {
        self.data_rooms_by_id.insert(room.id.clone(), room);
    }

    /// Append a room id to the display order (no deduplication)
    pub fn push_data_room_order(&mut self, id: DataRoomId) {
        self.data_room_order.push(id);
    }

    /// Insert a folder without validation or linkage maintenance
    pub fn insert_folder(&mut self, folder: Folder) {
        self.folders_by_id.insert(folder.id.clone(), folder);
    }

    /// Insert a file without validation or linkage maintenance
    pub fn insert_file(&mut self, file: FileNode) {
        self.files_by_id.insert(file.id.clone(), file);
    }

    /// Mutable access to a data room, bypassing validation
    pub fn data_room_mut(&mut self, id: &DataRoomId) -> Option<&mut DataRoom> {
        self.data_rooms_by_id.get_mut(id)
    }

    /// Mutable access to a folder, bypassing validation
    pub fn folder_mut(&mut self, id: &FolderId) -> Option<&mut Folder> {
        self.folders_by_id.get_mut(id)
    }

    /// Mutable access to a file, bypassing validation
    pub fn file_mut(&mut self, id: &FileId) -> Option<&mut FileNode> {
        self.files_by_id.get_mut(id)
    }

    pub(crate) fn remove_folder(&mut self, id: &FolderId) -> Option<Folder> {
        self.folders_by_id.remove(id)
    }

    pub(crate) fn remove_file(&mut self, id: &FileId) -> Option<FileNode> {
        self.files_by_id.remove(id)
    }

    pub(crate) fn remove_data_room(&mut self, id: &DataRoomId) -> Option<DataRoom> {
        self.data_room_order.retain(|existing| existing != id);
        self.data_rooms_by_id.remove(id)
    }

    /// Bump `updated_at` on the owning data room
    pub(crate) fn touch_data_room(&mut self, id: &DataRoomId, now: DateTime<Utc>) {
        if let Some(room) = self.data_rooms_by_id.get_mut(id) {
            room.touch(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_id(id: &str) -> DataRoomId {
        DataRoomId::try_new(id).unwrap()
    }

    fn folder_id(id: &str) -> FolderId {
        FolderId::try_new(id).unwrap()
    }

    #[test]
    fn test_new_state() {
        let state = AggregateState::new();
        assert_eq!(state.schema_version(), CURRENT_SCHEMA_VERSION);
        assert_eq!(state.data_rooms().count(), 0);
        assert_eq!(state.folder_count(), 0);
        assert_eq!(state.file_count(), 0);
    }

    #[test]
    fn test_data_rooms_follow_order() {
        let now = Utc::now();
        let mut state = AggregateState::new();
        for (id, name) in [("b", "Beta"), ("a", "Alpha")] {
            state.insert_data_room(DataRoom::new(
                room_id(id),
                name.to_string(),
                folder_id(&format!("{}-root", id)),
                now,
            ));
            state.push_data_room_order(room_id(id));
        }
        state.push_data_room_order(room_id("ghost"));

        let names: Vec<_> = state.data_rooms().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Beta", "Alpha"]);
    }

    #[test]
    fn test_data_room_of_file_resolves_through_parent() {
        let now = Utc::now();
        let mut state = AggregateState::new();
        state.insert_folder(Folder::new_root(
            folder_id("root"),
            room_id("room"),
            "Root".to_string(),
            now,
        ));
        let file_id = FileId::try_new("f").unwrap();
        state.insert_file(FileNode::new(
            file_id.clone(),
            folder_id("root"),
            "a.pdf".to_string(),
            3,
            now,
        ));

        assert_eq!(state.data_room_of_file(&file_id), Some(&room_id("room")));
    }
}
