//! Single entry point for state transitions
//!
//! ## Atomicity Contract
//!
//! - **All-or-nothing**: a command either produces a new state or leaves the
//!   caller's `Arc` untouched; batch moves never half-apply
//! - **No panics**: invalid input becomes a no-op or a typed rejection
//! - **Deterministic**: ids and timestamps come from the caller
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use chrono::Utc;
//! use dataroom_core::{apply, AggregateState, Command, DataRoomId, FolderId};
//!
//! let state = Arc::new(AggregateState::new());
//! let cmd = Command::CreateDataRoom {
//!     data_room_id: DataRoomId::try_new("deals").unwrap(),
//!     root_folder_id: FolderId::try_new("deals-root").unwrap(),
//!     name: "Deals".to_string(),
//! };
//!
//! let outcome = apply(&state, cmd, Utc::now());
//! assert!(!outcome.is_noop(&state));
//! assert_eq!(outcome.next_state().data_rooms().count(), 1);
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::commands::Command;
use crate::model::AggregateState;
use crate::moves::{apply_move, MoveOutcome, MoveRejection};
use crate::ops::{self, DeleteDataRoomResult, DeleteFolderResult};

/// What a command did
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Plain create/rename/move/delete; the same `Arc` when rejected
    Transition(Arc<AggregateState>),
    DataRoomDeleted(DeleteDataRoomResult),
    FolderDeleted(DeleteFolderResult),
    Moved(MoveOutcome),
    MoveRejected {
        state: Arc<AggregateState>,
        rejection: MoveRejection,
    },
}

impl Outcome {
    pub fn next_state(&self) -> &Arc<AggregateState> {
        match self {
            Outcome::Transition(state) => state,
            Outcome::DataRoomDeleted(result) => &result.next_state,
            Outcome::FolderDeleted(result) => &result.next_state,
            Outcome::Moved(outcome) => &outcome.next_state,
            Outcome::MoveRejected { state, .. } => state,
        }
    }

    pub fn into_next_state(self) -> Arc<AggregateState> {
        match self {
            Outcome::Transition(state) => state,
            Outcome::DataRoomDeleted(result) => result.next_state,
            Outcome::FolderDeleted(result) => result.next_state,
            Outcome::Moved(outcome) => outcome.next_state,
            Outcome::MoveRejected { state, .. } => state,
        }
    }

    /// Did the command leave `previous` untouched?
    pub fn is_noop(&self, previous: &Arc<AggregateState>) -> bool {
        ops::is_noop(previous, self.next_state())
    }
}

/// Apply one command to `state`
pub fn apply(state: &Arc<AggregateState>, cmd: Command, now: DateTime<Utc>) -> Outcome {
    match cmd {
        Command::CreateDataRoom {
            data_room_id,
            root_folder_id,
            name,
        } => Outcome::Transition(ops::create_data_room(
            state,
            &data_room_id,
            &root_folder_id,
            &name,
            now,
        )),

        Command::RenameDataRoom { data_room_id, name } => {
            Outcome::Transition(ops::rename_data_room(state, &data_room_id, &name, now))
        }

        Command::DeleteDataRoom { data_room_id } => {
            Outcome::DataRoomDeleted(ops::delete_data_room(state, &data_room_id))
        }

        Command::CreateFolder {
            data_room_id,
            parent_folder_id,
            folder_id,
            name,
        } => Outcome::Transition(ops::create_folder(
            state,
            &data_room_id,
            &parent_folder_id,
            &folder_id,
            &name,
            now,
        )),

        Command::RenameFolder { folder_id, name } => {
            Outcome::Transition(ops::rename_folder(state, &folder_id, &name, now))
        }

        Command::MoveFolder {
            folder_id,
            destination_folder_id,
        } => Outcome::Transition(ops::move_folder(
            state,
            &folder_id,
            &destination_folder_id,
            now,
        )),

        Command::DeleteFolder { folder_id } => {
            Outcome::FolderDeleted(ops::delete_folder_cascade(state, &folder_id, now))
        }

        Command::CreateFile {
            parent_folder_id,
            file_id,
            name,
            size,
        } => Outcome::Transition(ops::create_file(
            state,
            &parent_folder_id,
            &file_id,
            &name,
            size,
            now,
        )),

        Command::RenameFile { file_id, name } => {
            Outcome::Transition(ops::rename_file(state, &file_id, &name, now))
        }

        Command::MoveFile {
            file_id,
            destination_folder_id,
        } => Outcome::Transition(ops::move_file(state, &file_id, &destination_folder_id, now)),

        Command::DeleteFile { file_id } => {
            Outcome::Transition(ops::delete_file(state, &file_id, now))
        }

        Command::MoveItems {
            data_room_id,
            item_ids,
            destination_folder_id,
        } => match apply_move(
            state,
            &item_ids,
            &data_room_id,
            destination_folder_id.as_ref(),
            now,
        ) {
            Ok(outcome) => Outcome::Moved(outcome),
            Err(rejection) => Outcome::MoveRejected {
                state: Arc::clone(state),
                rejection,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataroom_core_types::{DataRoomId, FolderId, NodeId};

    fn seeded() -> Arc<AggregateState> {
        Arc::new(crate::seed::seeded_state(Utc::now()))
    }

    fn root_id() -> FolderId {
        FolderId::try_new(crate::seed::SEED_ROOT_FOLDER_ID).unwrap()
    }

    fn room_id() -> DataRoomId {
        DataRoomId::try_new(crate::seed::SEED_DATA_ROOM_ID).unwrap()
    }

    #[test]
    fn test_rejected_command_is_noop() {
        let state = seeded();
        let outcome = apply(
            &state,
            Command::RenameFolder {
                folder_id: FolderId::try_new("missing").unwrap(),
                name: "X".into(),
            },
            Utc::now(),
        );
        assert!(outcome.is_noop(&state));
    }

    #[test]
    fn test_move_items_rejection_keeps_state() {
        let state = seeded();
        let outcome = apply(
            &state,
            Command::MoveItems {
                data_room_id: room_id(),
                item_ids: vec![NodeId::Folder(root_id())],
                destination_folder_id: None,
            },
            Utc::now(),
        );
        match &outcome {
            Outcome::MoveRejected { rejection, .. } => {
                assert_eq!(rejection, &MoveRejection::NoDestination)
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(outcome.is_noop(&state));
    }

    #[test]
    fn test_delete_folder_reports_fallback() {
        let state = seeded();
        let child = FolderId::try_new("child").unwrap();
        let state = apply(
            &state,
            Command::CreateFolder {
                data_room_id: room_id(),
                parent_folder_id: root_id(),
                folder_id: child.clone(),
                name: "Child".into(),
            },
            Utc::now(),
        )
        .into_next_state();

        let outcome = apply(&state, Command::DeleteFolder { folder_id: child }, Utc::now());
        match outcome {
            Outcome::FolderDeleted(result) => {
                assert!(result.deleted);
                assert_eq!(result.fallback_folder_id, Some(root_id()));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
