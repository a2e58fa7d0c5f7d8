//! The state a fresh installation starts from

use chrono::{DateTime, Utc};

use crate::model::{AggregateState, DataRoom, Folder};
use dataroom_core_types::{DataRoomId, FolderId};

pub const SEED_DATA_ROOM_ID: &str = "default-data-room";
pub const SEED_ROOT_FOLDER_ID: &str = "default-data-room-root";
pub const SEED_ROOM_NAME: &str = "Data Room";

/// One data room named [`SEED_ROOM_NAME`] with an empty root folder
pub fn seeded_state(now: DateTime<Utc>) -> AggregateState {
    let mut state = AggregateState::new();
    let (Ok(room_id), Ok(root_id)) = (
        DataRoomId::try_new(SEED_DATA_ROOM_ID),
        FolderId::try_new(SEED_ROOT_FOLDER_ID),
    ) else {
        return state;
    };

    state.insert_folder(Folder::new_root(
        root_id.clone(),
        room_id.clone(),
        SEED_ROOM_NAME.to_string(),
        now,
    ));
    state.insert_data_room(DataRoom::new(
        room_id.clone(),
        SEED_ROOM_NAME.to_string(),
        root_id,
        now,
    ));
    state.push_data_room_order(room_id);
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::validate_state;

    #[test]
    fn test_seeded_state_is_valid() {
        let state = seeded_state(Utc::now());
        assert!(validate_state(&state).is_ok());
        assert_eq!(state.data_rooms().count(), 1);

        let room = state.data_rooms().next().unwrap();
        assert_eq!(room.name, SEED_ROOM_NAME);
        let root = state.root_folder(&room.id).unwrap();
        assert!(root.is_empty());
    }
}
