//! Atomic write primitives
//!
//! Writes go to a sibling temp file which is then renamed over the target,
//! so readers never observe a partial file.

use std::fs;
use std::path::Path;

use crate::errors::{io_error, Result};

/// Atomically replace `target_path` with `content`, creating parent
/// directories as needed
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_parent_dir", e))?;
    }

    let mut temp_name = target_path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    temp_name.push(".tmp");
    let temp_path = target_path.with_file_name(temp_name);

    fs::write(&temp_path, content).map_err(|e| io_error("write_temp", e))?;
    fs::rename(&temp_path, target_path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        io_error("rename_temp", e)
    })?;

    Ok(())
}
