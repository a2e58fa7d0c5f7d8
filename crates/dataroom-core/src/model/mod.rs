pub mod data_room;
pub mod file_node;
pub mod folder;
pub mod state;

pub use data_room::DataRoom;
pub use file_node::{FileNode, MimeType};
pub use folder::Folder;
pub use state::{AggregateState, CURRENT_SCHEMA_VERSION};
