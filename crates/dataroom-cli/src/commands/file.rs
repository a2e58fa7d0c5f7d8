//! File commands
//!
//! File records live in the state; bytes live in the blob directory under
//! the same id.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Args, Subcommand};
use dataroom_core::ops::file_ops;
use dataroom_core::{FileId, FolderId};
use dataroom_store::BlobStore;

use crate::workspace::{CliResult, Workspace};

#[derive(Debug, Args)]
pub struct FileArgs {
    #[command(subcommand)]
    pub command: FileCommand,
}

#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// Upload a local file into a folder
    Add {
        parent: FolderId,
        path: PathBuf,
        /// Name in the data room (defaults to the local file name)
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        id: Option<FileId>,
    },
    Rename {
        file: FileId,
        name: String,
    },
    Move {
        file: FileId,
        destination: FolderId,
    },
    Delete {
        file: FileId,
    },
    /// Write a file's content to a local path
    Get {
        file: FileId,
        output: PathBuf,
    },
}

pub fn execute(args: FileArgs, ws: &mut Workspace) -> CliResult {
    let now = Utc::now();
    match args.command {
        FileCommand::Add {
            parent,
            path,
            name,
            id,
        } => {
            let bytes = fs::read(&path)?;
            let name = match name {
                Some(name) => name,
                None => path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string)
                    .ok_or_else(|| format!("{} has no usable file name", path.display()))?,
            };
            let file_id = id.unwrap_or_else(FileId::generate);
            let size = u64::try_from(bytes.len())?;

            let next = file_ops::try_create_file(&ws.state, &parent, &file_id, &name, size, now)?;
            ws.blobs.put(&file_id, &bytes)?;
            ws.commit(Arc::new(next))?;
            println!("Added file {}", file_id);
        }
        FileCommand::Rename { file, name } => {
            let next = file_ops::try_rename_file(&ws.state, &file, &name, now)?;
            ws.commit(Arc::new(next))?;
            println!("Renamed file {}", file);
        }
        FileCommand::Move { file, destination } => {
            let next = file_ops::try_move_file(&ws.state, &file, &destination, now)?;
            ws.commit(Arc::new(next))?;
            println!("Moved file {} into {}", file, destination);
        }
        FileCommand::Delete { file } => {
            let next = file_ops::try_delete_file(&ws.state, &file, now)?;
            ws.commit(Arc::new(next))?;
            ws.blobs.delete(&file)?;
            println!("Deleted file {}", file);
        }
        FileCommand::Get { file, output } => {
            if ws.state.file(&file).is_none() {
                return Err(format!("file {} not found", file).into());
            }
            let bytes = ws
                .blobs
                .get(&file)?
                .ok_or_else(|| format!("no content stored for file {}", file))?;
            fs::write(&output, bytes)?;
        }
    }
    Ok(())
}
