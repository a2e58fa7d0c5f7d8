pub mod ancestry;

pub use ancestry::{collect_subtree, folder_path, is_descendant, is_file_inside_folder, SubtreeSummary};
