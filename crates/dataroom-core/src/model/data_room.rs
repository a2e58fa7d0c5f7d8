use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dataroom_core_types::{DataRoomId, FolderId};

/// DataRoom - a top-level named workspace
///
/// Every data room owns exactly one root folder. The root folder id is fixed
/// at creation and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRoom {
    pub id: DataRoomId,

    /// Display name, stored trimmed
    pub name: String,

    /// The room's parent-less folder
    pub root_folder_id: FolderId,

    pub created_at: DateTime<Utc>,

    /// Bumped by every mutation of the room or anything beneath it
    pub updated_at: DateTime<Utc>,
}

impl DataRoom {
    pub fn new(
        id: DataRoomId,
        name: String,
        root_folder_id: FolderId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            root_folder_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
