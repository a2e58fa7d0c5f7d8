//! Mutation engine
//!
//! One pure transition per operation. Each operation has two forms:
//!
//! - `try_*` takes `&AggregateState` and returns `Result<AggregateState>`
//!   with a typed rejection on failure.
//! - The public form takes `&Arc<AggregateState>` and returns an
//!   `Arc<AggregateState>`; on rejection it returns the *same* `Arc`, so
//!   callers detect no-ops with [`is_noop`] (`Arc::ptr_eq`).
//!
//! Cascading deletes always return a result record instead.

pub mod data_room_ops;
pub mod file_ops;
pub mod folder_ops;
mod transition;

pub use data_room_ops::{
    create_data_room, delete_data_room, preview_data_room_delete, rename_data_room,
    DeleteDataRoomResult,
};
pub use file_ops::{create_file, delete_file, move_file, rename_file};
pub use folder_ops::{
    create_folder, delete_folder_cascade, move_folder, preview_folder_delete, rename_folder,
    DeleteFolderResult,
};
pub(crate) use transition::elapsed_ms;
pub use transition::is_noop;
