//! Blob paths are sharded into subdirectories by the first two characters of
//! the file id to keep directory sizes bounded.

use std::path::{Path, PathBuf};

/// `<root>/<first two chars>/<id>.<extension>`
pub fn shard_path(root: &Path, id: &str, extension: &str) -> PathBuf {
    let shard: String = id.chars().take(2).collect();
    root.join(shard).join(format!("{}.{}", id, extension))
}
