//! Command inventory
//!
//! Every mutation the engine supports, as data. Commands are dispatched by
//! [`crate::apply::apply`] and can be serialized for scripting front ends.

use serde::{Deserialize, Serialize};

use dataroom_core_types::{DataRoomId, FileId, FolderId, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Create a data room and its root folder
    CreateDataRoom {
        data_room_id: DataRoomId,
        root_folder_id: FolderId,
        name: String,
    },

    RenameDataRoom {
        data_room_id: DataRoomId,
        name: String,
    },

    /// Delete a data room with everything it owns
    DeleteDataRoom { data_room_id: DataRoomId },

    CreateFolder {
        data_room_id: DataRoomId,
        parent_folder_id: FolderId,
        folder_id: FolderId,
        name: String,
    },

    RenameFolder { folder_id: FolderId, name: String },

    MoveFolder {
        folder_id: FolderId,
        destination_folder_id: FolderId,
    },

    /// Delete a folder and its subtree
    DeleteFolder { folder_id: FolderId },

    CreateFile {
        parent_folder_id: FolderId,
        file_id: FileId,
        name: String,
        size: u64,
    },

    RenameFile { file_id: FileId, name: String },

    MoveFile {
        file_id: FileId,
        destination_folder_id: FolderId,
    },

    DeleteFile { file_id: FileId },

    /// Validate and move a batch of folders and files together
    MoveItems {
        data_room_id: DataRoomId,
        item_ids: Vec<NodeId>,
        destination_folder_id: Option<FolderId>,
    },
}

impl Command {
    /// Operation name used in logs
    pub fn op_name(&self) -> &'static str {
        match self {
            Command::CreateDataRoom { .. } => "create_data_room",
            Command::RenameDataRoom { .. } => "rename_data_room",
            Command::DeleteDataRoom { .. } => "delete_data_room",
            Command::CreateFolder { .. } => "create_folder",
            Command::RenameFolder { .. } => "rename_folder",
            Command::MoveFolder { .. } => "move_folder",
            Command::DeleteFolder { .. } => "delete_folder_cascade",
            Command::CreateFile { .. } => "create_file",
            Command::RenameFile { .. } => "rename_file",
            Command::MoveFile { .. } => "move_file",
            Command::DeleteFile { .. } => "delete_file",
            Command::MoveItems { .. } => "move_items",
        }
    }
}
